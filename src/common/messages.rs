//! Canonical message types flowing between classifiers, engine and host.

use crate::common::resources::{DefenseLevel, SoundType};

/// Structured event recognized in a normalized chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// "Territory is in cooldown ..." with the parsed duration parts.
    CooldownStarted { minutes: u32, seconds: u32 },
    /// "The war for <name> will start in <N> minutes."
    WarStarting { territory: String, minutes: u32 },
    /// "<name> defense is <level>", sent when a territory gets queued.
    DefenseReported {
        territory: String,
        level: DefenseLevel,
    },
    /// "You have taken control of <name>[ from [TAG]]!"
    TerritoryCaptured {
        territory: String,
        from_guild: Option<String>,
    },
    /// "[TAG] has taken control of <name>!"
    TerritoryLost { territory: String, guild_tag: String },
}

/// Chat announcement requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// A regular timer finished.
    OffCooldown { territory: String },
    /// A territory we captured is about to become attackable.
    CaptureReminder {
        territory: String,
        remaining_seconds: i64,
    },
    /// The guild attack retry campaign gave up.
    RetryExhausted { territory: String, attempts: u32 },
}

impl Announcement {
    /// Template key understood by the notification sink.
    pub fn template_key(&self) -> &'static str {
        match self {
            Announcement::OffCooldown { .. } => "timer.off_cooldown",
            Announcement::CaptureReminder { .. } => "capture.reminder",
            Announcement::RetryExhausted { .. } => "retry.exhausted",
        }
    }

    /// Positional template arguments.
    pub fn args(&self) -> Vec<String> {
        match self {
            Announcement::OffCooldown { territory } => vec![territory.clone()],
            Announcement::CaptureReminder {
                territory,
                remaining_seconds,
            } => vec![
                territory.clone(),
                crate::hud::format_time(*remaining_seconds),
            ],
            Announcement::RetryExhausted {
                territory,
                attempts,
            } => vec![territory.clone(), attempts.to_string()],
        }
    }
}

/// Side effect the engine asks the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEffect {
    PlaySound(SoundType),
    SendGuildAttack { territory: String },
    Announce(Announcement),
}
