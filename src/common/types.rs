//! Shared types used across the application.
//!
//! Every instant is an absolute wall-clock time. Countdowns are derived on
//! demand so repeated polling never accumulates drift.

use chrono::{DateTime, TimeDelta, Utc};

use crate::common::resources::{
    default_cooldown, CAPTURE_RETENTION_BUFFER_SECONDS, DEFAULT_COOLDOWN_SECONDS,
};

/// Absolute wall-clock instant.
pub type Instant = DateTime<Utc>;

/// Whole seconds from `now` until `target`, never negative.
///
/// Clamping here keeps displays sane if the host clock jumps backwards.
pub fn seconds_until(target: Instant, now: Instant) -> i64 {
    (target - now).num_seconds().max(0)
}

/// Whole seconds elapsed since `start`, never negative.
pub fn seconds_since(start: Instant, now: Instant) -> i64 {
    (now - start).num_seconds().max(0)
}

/// Territory names compare case-insensitively.
pub fn same_territory(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// An active territory countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryTimer {
    pub territory_name: String,
    pub end_time: Instant,
    pub sound_played: bool,
    pub command_executed: bool,
}

impl TerritoryTimer {
    pub fn new(territory_name: impl Into<String>, end_time: Instant) -> Self {
        Self {
            territory_name: territory_name.into(),
            end_time,
            sound_played: false,
            command_executed: false,
        }
    }

    pub fn remaining_seconds(&self, now: Instant) -> i64 {
        seconds_until(self.end_time, now)
    }
}

/// A finished countdown remembered for a short window.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredTimer {
    pub territory_name: String,
    pub expired_at: Instant,
}

/// A territory our guild took.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureEvent {
    pub territory_name: String,
    pub capture_time: Instant,
    pub announced: bool,
}

impl CaptureEvent {
    pub fn new(territory_name: impl Into<String>, capture_time: Instant) -> Self {
        Self {
            territory_name: territory_name.into(),
            capture_time,
            announced: false,
        }
    }

    pub fn elapsed_seconds(&self, now: Instant) -> i64 {
        seconds_since(self.capture_time, now)
    }

    /// Seconds until the assumed default cooldown of the capture runs out.
    pub fn remaining_seconds(&self, now: Instant) -> i64 {
        (DEFAULT_COOLDOWN_SECONDS - self.elapsed_seconds(now)).max(0)
    }

    /// Whether the event has outlived its cooldown plus the retention buffer.
    pub fn is_stale(&self, now: Instant) -> bool {
        now - self.capture_time
            > default_cooldown() + TimeDelta::seconds(CAPTURE_RETENTION_BUFFER_SECONDS)
    }
}

/// Which store a visible timer was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKind {
    Active,
    Expired,
    Capture,
}

/// Read-only projection of engine state for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleTimer {
    pub territory_name: String,
    pub remaining_seconds: i64,
    pub kind: TimerKind,
}

/// The single in-flight dependent-action retry campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRetry {
    pub territory_name: String,
    pub due_at: Instant,
    pub attempt_count: u32,
    pub schedule_started_at: Instant,
}
