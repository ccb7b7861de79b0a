//! Territory cooldown engine.
//!
//! Owns three independent stores keyed by territory name:
//! - active countdowns, created from cooldown and loss events
//! - expired countdowns, remembered for a configurable window
//! - capture events, used for "becomes attackable" reminders
//!
//! The engine never performs I/O. `update_timers` returns the side effects
//! that came due and the owning session dispatches them to the host.

use std::collections::{HashMap, HashSet};

use chrono::TimeDelta;
use tracing::{debug, info};

use crate::common::resources::default_cooldown;
use crate::common::types::same_territory;
use crate::common::{
    Announcement, CaptureEvent, EngineEffect, ExpiredTimer, Instant, TerritoryTimer, TimerKind,
    VisibleTimer,
};
use crate::config::TimerSettings;
use crate::engine::clock::Clock;
use crate::engine::retry::RetryCampaign;

/// Per-session cooldown state machine.
pub struct CooldownEngine {
    clock: Box<dyn Clock>,
    settings: TimerSettings,
    active: HashMap<String, TerritoryTimer>,
    expired: HashMap<String, ExpiredTimer>,
    captures: HashMap<String, CaptureEvent>,
    retry: RetryCampaign,
    /// Whether the player is connected to a world; cooldowns only start while true.
    session_active: bool,
}

impl CooldownEngine {
    pub fn new(clock: Box<dyn Clock>, settings: TimerSettings) -> Self {
        Self {
            clock,
            settings,
            active: HashMap::new(),
            expired: HashMap::new(),
            captures: HashMap::new(),
            retry: RetryCampaign::new(),
            session_active: true,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    #[cfg(test)]
    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
    }

    pub fn set_session_active(&mut self, active: bool) {
        if self.session_active != active {
            info!("Game session {}", if active { "started" } else { "ended" });
        }
        self.session_active = active;
    }

    /// Start (or restart) the countdown for a territory.
    ///
    /// Non-positive or unrepresentable durations and calls outside a game
    /// session are ignored. Returns whether a timer was started.
    pub fn start_cooldown(&mut self, duration_seconds: i64, territory_name: &str) -> bool {
        if duration_seconds <= 0 {
            debug!(
                "Ignoring cooldown of {}s for {}",
                duration_seconds, territory_name
            );
            return false;
        }
        if !self.session_active {
            debug!("Ignoring cooldown for {}: no game session", territory_name);
            return false;
        }

        let now = self.clock.now();
        let Some(end_time) = TimeDelta::try_seconds(duration_seconds)
            .and_then(|duration| now.checked_add_signed(duration))
        else {
            debug!(
                "Ignoring cooldown of {}s for {}: out of range",
                duration_seconds, territory_name
            );
            return false;
        };

        // Restarts keep the spelling the territory was first tracked under
        let key = key_for(&self.active, territory_name)
            .unwrap_or_else(|| territory_name.to_string());
        self.active
            .insert(key.clone(), TerritoryTimer::new(key, end_time));
        remove_by_name(&mut self.expired, territory_name);

        // The server timer is authoritative; line the capture up with it so
        // its remaining time matches the timer
        if let Some(capture) = find_by_name_mut(&mut self.captures, territory_name) {
            capture.capture_time = end_time - default_cooldown();
            debug!(
                "Re-synchronized capture of {} to {}",
                territory_name, capture.capture_time
            );
        }

        info!(
            "Started cooldown for {}: {}s",
            territory_name, duration_seconds
        );
        true
    }

    /// Remember that our guild captured a territory at `at`.
    pub fn record_capture(&mut self, territory_name: &str, at: Instant) {
        remove_by_name(&mut self.captures, territory_name);
        self.captures.insert(
            territory_name.to_string(),
            CaptureEvent::new(territory_name, at),
        );
        info!("Recorded capture of {}", territory_name);
    }

    /// Remove a territory from every store.
    ///
    /// Returns whether anything was removed.
    pub fn remove_cooldown(&mut self, territory_name: &str) -> bool {
        let active = remove_by_name(&mut self.active, territory_name).is_some();
        let expired = remove_by_name(&mut self.expired, territory_name).is_some();
        let captured = remove_by_name(&mut self.captures, territory_name).is_some();

        let removed = active || expired || captured;
        if removed {
            info!("Removed cooldown for {}", territory_name);
        }
        removed
    }

    pub fn clear_all_timers(&mut self) {
        self.active.clear();
        self.expired.clear();
        self.captures.clear();
        self.retry.clear();
        info!("Cleared all timers");
    }

    pub fn clear_expired_timers(&mut self) {
        self.expired.clear();
    }

    /// Advance every timer to the current time.
    ///
    /// `current_territory` is where the player stands right now; guild
    /// attacks are only sent from inside the target territory.
    pub fn update_timers(&mut self, current_territory: Option<&str>) -> Vec<EngineEffect> {
        let now = self.clock.now();
        let mut effects = Vec::new();
        let mut finished = Vec::new();
        let mut attack_requests = Vec::new();
        let sound_offset = TimeDelta::seconds(self.settings.sound_play_offset_seconds);

        for (name, timer) in self.active.iter_mut() {
            let sound_at = timer.end_time + sound_offset;

            if !timer.sound_played && now >= sound_at {
                timer.sound_played = true;
                effects.push(EngineEffect::PlaySound(self.settings.selected_sound));
            }

            if !timer.command_executed && now >= timer.end_time {
                timer.command_executed = true;
                if self.settings.send_guild_attack_at_end {
                    attack_requests.push((timer.remaining_seconds(now), name.clone()));
                }
            }

            if now >= timer.end_time.max(sound_at) {
                finished.push(name.clone());
            }
        }

        finished.sort();
        for name in finished {
            self.active.remove(&name);
            info!("Cooldown for {} finished", name);

            if self.settings.announce_timer_off_cooldown {
                effects.push(EngineEffect::Announce(Announcement::OffCooldown {
                    territory: name.clone(),
                }));
            }
            if self.settings.expired_timer_memory_seconds > 0 {
                self.expired.insert(
                    name.clone(),
                    ExpiredTimer {
                        territory_name: name,
                        expired_at: now,
                    },
                );
            }
        }
        self.purge_expired(now);

        attack_requests.sort();
        for (seconds_remaining, name) in attack_requests {
            if let Some(announcement) = self.retry.schedule(seconds_remaining, &name, now) {
                effects.push(EngineEffect::Announce(announcement));
            }
        }
        effects.extend(self.retry.poll(now, current_territory));

        self.evaluate_capture_reminders(now, &mut effects);

        effects
    }

    /// Timers to display, soonest first.
    ///
    /// Active and expired entries are interleaved by remaining time (expired
    /// entries read zero and sort after active ones at zero). Captures not
    /// already listed follow, most recent first.
    pub fn get_visible_timers(&mut self) -> Vec<VisibleTimer> {
        let now = self.clock.now();
        self.purge_expired(now);

        let mut timers: Vec<VisibleTimer> = self
            .active
            .values()
            .map(|timer| VisibleTimer {
                territory_name: timer.territory_name.clone(),
                remaining_seconds: timer.remaining_seconds(now),
                kind: TimerKind::Active,
            })
            .chain(self.expired.values().map(|expired| VisibleTimer {
                territory_name: expired.territory_name.clone(),
                remaining_seconds: 0,
                kind: TimerKind::Expired,
            }))
            .collect();
        timers.sort_by(|a, b| {
            a.remaining_seconds
                .cmp(&b.remaining_seconds)
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.territory_name.cmp(&b.territory_name))
        });

        let listed: HashSet<String> = timers
            .iter()
            .map(|timer| timer.territory_name.to_lowercase())
            .collect();
        let mut captures: Vec<&CaptureEvent> = self
            .captures
            .values()
            .filter(|capture| !listed.contains(&capture.territory_name.to_lowercase()))
            .collect();
        captures.sort_by(|a, b| {
            a.elapsed_seconds(now)
                .cmp(&b.elapsed_seconds(now))
                .then_with(|| a.territory_name.cmp(&b.territory_name))
        });

        timers.extend(captures.into_iter().map(|capture| VisibleTimer {
            territory_name: capture.territory_name.clone(),
            remaining_seconds: capture.remaining_seconds(now),
            kind: TimerKind::Capture,
        }));
        timers
    }

    /// Names with a running countdown, sorted.
    pub fn get_active_territories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.active.keys().cloned().collect();
        names.sort();
        names
    }

    #[cfg(test)]
    pub fn active_timer(&self, territory_name: &str) -> Option<&TerritoryTimer> {
        find_by_name(&self.active, territory_name)
    }

    #[cfg(test)]
    pub fn expired_timer(&self, territory_name: &str) -> Option<&ExpiredTimer> {
        find_by_name(&self.expired, territory_name)
    }

    #[cfg(test)]
    pub fn capture(&self, territory_name: &str) -> Option<&CaptureEvent> {
        find_by_name(&self.captures, territory_name)
    }

    #[cfg(test)]
    pub fn pending_retry(&self) -> Option<&crate::common::PendingRetry> {
        self.retry.pending()
    }

    fn purge_expired(&mut self, now: Instant) {
        let memory = TimeDelta::seconds(self.settings.expired_timer_memory_seconds);
        self.expired
            .retain(|_, expired| now - expired.expired_at <= memory && memory > TimeDelta::zero());
    }

    fn evaluate_capture_reminders(&mut self, now: Instant, effects: &mut Vec<EngineEffect>) {
        if self.settings.enable_capture_reminder {
            let lead = self.settings.capture_reminder_before_seconds;
            for capture in self.captures.values_mut().filter(|c| !c.announced) {
                let remaining = capture.remaining_seconds(now);
                if remaining > lead {
                    continue;
                }

                capture.announced = true;
                info!(
                    "Capture reminder for {}: {}s until attackable",
                    capture.territory_name, remaining
                );
                if self.settings.capture_reminder_play_sound {
                    effects.push(EngineEffect::PlaySound(self.settings.selected_sound));
                }
                if self.settings.capture_reminder_announce_chat {
                    effects.push(EngineEffect::Announce(Announcement::CaptureReminder {
                        territory: capture.territory_name.clone(),
                        remaining_seconds: remaining,
                    }));
                }
            }
        }

        self.captures.retain(|_, capture| !capture.is_stale(now));
    }
}

/// Find the key for a territory: exact match first, then case-insensitive.
fn key_for<V>(map: &HashMap<String, V>, territory_name: &str) -> Option<String> {
    if map.contains_key(territory_name) {
        return Some(territory_name.to_string());
    }
    map.keys()
        .find(|key| same_territory(key, territory_name))
        .cloned()
}

#[cfg(test)]
fn find_by_name<'a, V>(map: &'a HashMap<String, V>, territory_name: &str) -> Option<&'a V> {
    key_for(map, territory_name).and_then(|key| map.get(&key))
}

fn find_by_name_mut<'a, V>(
    map: &'a mut HashMap<String, V>,
    territory_name: &str,
) -> Option<&'a mut V> {
    let key = key_for(map, territory_name)?;
    map.get_mut(&key)
}

/// Remove every entry stored under any spelling of the territory name.
fn remove_by_name<V>(map: &mut HashMap<String, V>, territory_name: &str) -> Option<V> {
    let keys: Vec<String> = map
        .keys()
        .filter(|key| same_territory(key, territory_name))
        .cloned()
        .collect();
    let mut removed = None;
    for key in keys {
        let value = map.remove(&key);
        if key == territory_name || removed.is_none() {
            removed = value;
        }
    }
    removed
}
