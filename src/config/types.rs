//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::common::resources::{HudAlignment, SoundType};

/// Current on-disk configuration layout.
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure.
///
/// Stored as a flat JSON object with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub config_version: u32,
    /// Master switch for event tracking and timer updates.
    pub is_mod_enabled: bool,
    /// Added to every server-announced cooldown duration.
    pub timer_offset_seconds: i32,
    /// Seconds after the end of a timer at which the sound plays (may be negative).
    pub sound_play_offset_seconds: i32,
    /// Send `/guild attack` when a timer runs out.
    pub send_guild_attack_at_end: bool,
    pub show_timer_hud: bool,
    pub hud_alignment: HudAlignment,
    pub sound_volume: f32,
    pub selected_sound: SoundType,
    pub text_color_hex: String,
    pub expired_text_color_hex: String,
    pub current_text_color_hex: String,
    /// How long finished timers stay visible (0 hides them immediately).
    pub expired_timer_memory_seconds: i32,
    /// Drop a timer once its territory is queued (defense or war-start message).
    pub remove_timer_on_queue: bool,
    pub announce_timer_off_cooldown: bool,
    pub enable_capture_reminder: bool,
    pub capture_reminder_announce_chat: bool,
    pub capture_reminder_play_sound: bool,
    /// Remind this many seconds before a captured territory becomes attackable.
    pub capture_reminder_before_seconds: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            is_mod_enabled: true,
            timer_offset_seconds: 0,
            sound_play_offset_seconds: 0,
            send_guild_attack_at_end: true,
            show_timer_hud: true,
            hud_alignment: HudAlignment::Right,
            sound_volume: 1.0,
            selected_sound: SoundType::WarHorn,
            text_color_hex: "FF5522".to_string(),
            expired_text_color_hex: "22FF55".to_string(),
            current_text_color_hex: "FF9900".to_string(),
            expired_timer_memory_seconds: 30,
            remove_timer_on_queue: true,
            announce_timer_off_cooldown: false,
            enable_capture_reminder: true,
            capture_reminder_announce_chat: true,
            capture_reminder_play_sound: false,
            capture_reminder_before_seconds: 30,
        }
    }
}

/// Subset of the configuration the cooldown engine reads on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSettings {
    pub sound_play_offset_seconds: i64,
    pub expired_timer_memory_seconds: i64,
    pub send_guild_attack_at_end: bool,
    pub announce_timer_off_cooldown: bool,
    pub selected_sound: SoundType,
    pub enable_capture_reminder: bool,
    pub capture_reminder_announce_chat: bool,
    pub capture_reminder_play_sound: bool,
    pub capture_reminder_before_seconds: i64,
}

impl From<&Config> for TimerSettings {
    fn from(config: &Config) -> Self {
        Self {
            sound_play_offset_seconds: i64::from(config.sound_play_offset_seconds),
            expired_timer_memory_seconds: i64::from(config.expired_timer_memory_seconds.max(0)),
            send_guild_attack_at_end: config.send_guild_attack_at_end,
            announce_timer_off_cooldown: config.announce_timer_off_cooldown,
            selected_sound: config.selected_sound,
            enable_capture_reminder: config.enable_capture_reminder,
            capture_reminder_announce_chat: config.capture_reminder_announce_chat,
            capture_reminder_play_sound: config.capture_reminder_play_sound,
            capture_reminder_before_seconds: i64::from(config.capture_reminder_before_seconds),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}
