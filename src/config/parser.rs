//! Configuration file parsing (flat JSON object).
//!
//! Fields are decoded one at a time: a bad value resets only that field to
//! its default, the rest of the file is still honored.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::common::error::ConfigError;
use crate::config::types::Config;
use crate::config::validate::validate_config;

/// Load configuration, creating the file with defaults if it does not exist.
///
/// Never fails: unreadable or malformed files fall back to defaults.
pub fn load_or_init(path: impl AsRef<Path>) -> Config {
    let path = path.as_ref();

    if !path.exists() {
        info!("No config found at {}, writing defaults", path.display());
        let config = Config::default();
        if let Err(e) = save_config(&config, path) {
            error!("Failed to write default config: {}", e);
        }
        return config;
    }

    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            error!("{} - using default configuration", e);
            Config::default()
        }
    }
}

/// Load configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_str(&content)
}

/// Load configuration from a JSON string, logging every recovered field.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    let (config, issues) = parse_config_str(content)?;
    for issue in &issues {
        warn!("Config: {}", issue);
    }
    Ok(config)
}

/// Parse a JSON string into a config plus the list of recovered fields.
pub fn parse_config_str(content: &str) -> Result<(Config, Vec<String>), ConfigError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;

    let Value::Object(map) = value else {
        return Err(ConfigError::ParseError {
            message: "expected a JSON object at the top level".to_string(),
        });
    };

    let defaults = Config::default();
    let mut issues = Vec::new();
    let issues_ref = &mut issues;

    let mut config = Config {
        config_version: field(&map, "configVersion", defaults.config_version, issues_ref),
        is_mod_enabled: field(&map, "isModEnabled", defaults.is_mod_enabled, issues_ref),
        timer_offset_seconds: field(
            &map,
            "timerOffsetSeconds",
            defaults.timer_offset_seconds,
            issues_ref,
        ),
        sound_play_offset_seconds: field(
            &map,
            "soundPlayOffsetSeconds",
            defaults.sound_play_offset_seconds,
            issues_ref,
        ),
        send_guild_attack_at_end: field(
            &map,
            "sendGuildAttackAtEnd",
            defaults.send_guild_attack_at_end,
            issues_ref,
        ),
        show_timer_hud: field(&map, "showTimerHud", defaults.show_timer_hud, issues_ref),
        hud_alignment: field(&map, "hudAlignment", defaults.hud_alignment, issues_ref),
        sound_volume: field(&map, "soundVolume", defaults.sound_volume, issues_ref),
        selected_sound: field(&map, "selectedSound", defaults.selected_sound, issues_ref),
        text_color_hex: field(&map, "textColorHex", defaults.text_color_hex, issues_ref),
        expired_text_color_hex: field(
            &map,
            "expiredTextColorHex",
            defaults.expired_text_color_hex,
            issues_ref,
        ),
        current_text_color_hex: field(
            &map,
            "currentTextColorHex",
            defaults.current_text_color_hex,
            issues_ref,
        ),
        expired_timer_memory_seconds: field(
            &map,
            "expiredTimerMemorySeconds",
            defaults.expired_timer_memory_seconds,
            issues_ref,
        ),
        remove_timer_on_queue: field(
            &map,
            "removeTimerOnQueue",
            defaults.remove_timer_on_queue,
            issues_ref,
        ),
        announce_timer_off_cooldown: field(
            &map,
            "announceTimerOffCooldown",
            defaults.announce_timer_off_cooldown,
            issues_ref,
        ),
        enable_capture_reminder: field(
            &map,
            "enableCaptureReminder",
            defaults.enable_capture_reminder,
            issues_ref,
        ),
        capture_reminder_announce_chat: field(
            &map,
            "captureReminderAnnounceChat",
            defaults.capture_reminder_announce_chat,
            issues_ref,
        ),
        capture_reminder_play_sound: field(
            &map,
            "captureReminderPlaySound",
            defaults.capture_reminder_play_sound,
            issues_ref,
        ),
        capture_reminder_before_seconds: field(
            &map,
            "captureReminderBeforeSeconds",
            defaults.capture_reminder_before_seconds,
            issues_ref,
        ),
    };

    issues.extend(validate_config(&mut config));
    Ok((config, issues))
}

/// Write configuration to disk as pretty-printed JSON.
pub fn save_config(config: &Config, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();

    let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::SerializeError {
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::IoError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    fs::write(path, json).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Decode a single field, falling back to `default` when absent or invalid.
fn field<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &str,
    default: T,
    issues: &mut Vec<String>,
) -> T {
    match map.get(key) {
        None | Some(Value::Null) => default,
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                issues.push(format!("{} has invalid value {} ({}), using default", key, value, e));
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::resources::{HudAlignment, SoundType};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "wwc-parser-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_empty_object_gives_defaults() {
        let (config, issues) = parse_config_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_fields_are_read() {
        let json = r#"{
            "isModEnabled": false,
            "timerOffsetSeconds": -5,
            "hudAlignment": "LEFT",
            "selectedSound": "BELL",
            "expiredTimerMemorySeconds": 0,
            "someFutureKey": [1, 2, 3]
        }"#;
        let (config, issues) = parse_config_str(json).unwrap();
        assert!(!config.is_mod_enabled);
        assert_eq!(config.timer_offset_seconds, -5);
        assert_eq!(config.hud_alignment, HudAlignment::Left);
        assert_eq!(config.selected_sound, SoundType::Bell);
        assert_eq!(config.expired_timer_memory_seconds, 0);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_invalid_enum_recovers_per_field() {
        let json = r#"{
            "hudAlignment": "DIAGONAL",
            "selectedSound": "TRUMPET",
            "timerOffsetSeconds": 7
        }"#;
        let (config, issues) = parse_config_str(json).unwrap();
        assert_eq!(config.hud_alignment, HudAlignment::Right);
        assert_eq!(config.selected_sound, SoundType::WarHorn);
        // Unrelated fields are kept
        assert_eq!(config.timer_offset_seconds, 7);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("hudAlignment"));
    }

    #[test]
    fn test_wrong_type_recovers_per_field() {
        let json = r#"{"isModEnabled": "yes", "soundVolume": 0.5}"#;
        let (config, issues) = parse_config_str(json).unwrap();
        assert!(config.is_mod_enabled);
        assert_eq!(config.sound_volume, 0.5);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_out_of_range_clamped_on_load() {
        let (config, issues) = parse_config_str(r#"{"timerOffsetSeconds": 100}"#).unwrap();
        assert_eq!(config.timer_offset_seconds, 20);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            parse_config_str("{not json"),
            Err(ConfigError::ParseError { .. })
        ));
        assert!(matches!(
            parse_config_str("[1, 2]"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let mut config = Config::default();
        config.show_timer_hud = false;
        config.capture_reminder_before_seconds = 90;

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"showTimerHud\": false"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let path = temp_path("init");
        fs::remove_file(&path).ok();

        let config = load_or_init(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_or_init_malformed_file_falls_back() {
        let path = temp_path("malformed");
        fs::write(&path, "this is not json").unwrap();

        let config = load_or_init(&path);
        assert_eq!(config, Config::default());
        // The broken file is left alone for the user to inspect
        assert_eq!(fs::read_to_string(&path).unwrap(), "this is not json");
        fs::remove_file(&path).ok();
    }
}
