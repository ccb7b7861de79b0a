//! Configuration validation.
//!
//! Out-of-range values are clamped and malformed colors reset to their
//! defaults. Every adjustment is reported so the caller can log it.

use std::ops::RangeInclusive;

use crate::config::types::{Config, CONFIG_VERSION};

pub const TIMER_OFFSET_RANGE: RangeInclusive<i32> = -20..=20;
pub const SOUND_OFFSET_RANGE: RangeInclusive<i32> = -20..=20;
pub const EXPIRED_MEMORY_RANGE: RangeInclusive<i32> = 0..=60;
pub const CAPTURE_REMINDER_RANGE: RangeInclusive<i32> = 0..=600;
pub const SOUND_VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Clamp and repair a configuration in place.
///
/// Returns a description of every value that had to change.
pub fn validate_config(config: &mut Config) -> Vec<String> {
    let mut issues = Vec::new();
    let defaults = Config::default();

    if config.config_version != CONFIG_VERSION {
        issues.push(format!(
            "configVersion {} is not supported, treating as {}",
            config.config_version, CONFIG_VERSION
        ));
        config.config_version = CONFIG_VERSION;
    }

    clamp_i32(
        &mut config.timer_offset_seconds,
        TIMER_OFFSET_RANGE,
        "timerOffsetSeconds",
        &mut issues,
    );
    clamp_i32(
        &mut config.sound_play_offset_seconds,
        SOUND_OFFSET_RANGE,
        "soundPlayOffsetSeconds",
        &mut issues,
    );
    clamp_i32(
        &mut config.expired_timer_memory_seconds,
        EXPIRED_MEMORY_RANGE,
        "expiredTimerMemorySeconds",
        &mut issues,
    );
    clamp_i32(
        &mut config.capture_reminder_before_seconds,
        CAPTURE_REMINDER_RANGE,
        "captureReminderBeforeSeconds",
        &mut issues,
    );

    if config.sound_volume.is_nan() {
        issues.push("soundVolume is not a number, using default".to_string());
        config.sound_volume = defaults.sound_volume;
    } else if !SOUND_VOLUME_RANGE.contains(&config.sound_volume) {
        let clamped = config
            .sound_volume
            .clamp(*SOUND_VOLUME_RANGE.start(), *SOUND_VOLUME_RANGE.end());
        issues.push(format!(
            "soundVolume {} out of range, clamped to {}",
            config.sound_volume, clamped
        ));
        config.sound_volume = clamped;
    }

    repair_color(&mut config.text_color_hex, &defaults.text_color_hex, "textColorHex", &mut issues);
    repair_color(
        &mut config.expired_text_color_hex,
        &defaults.expired_text_color_hex,
        "expiredTextColorHex",
        &mut issues,
    );
    repair_color(
        &mut config.current_text_color_hex,
        &defaults.current_text_color_hex,
        "currentTextColorHex",
        &mut issues,
    );

    issues
}

/// Parse an `RRGGBB` color, optionally prefixed with `#`.
///
/// Extra characters after the sixth hex digit are ignored.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let clean: String = hex.trim().trim_start_matches('#').chars().take(6).collect();
    if clean.len() != 6 || !clean.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(&clean, 16).ok()?;
    Some(((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

fn clamp_i32(value: &mut i32, range: RangeInclusive<i32>, field: &str, issues: &mut Vec<String>) {
    if !range.contains(value) {
        let clamped = (*value).clamp(*range.start(), *range.end());
        issues.push(format!("{} {} out of range, clamped to {}", field, value, clamped));
        *value = clamped;
    }
}

fn repair_color(value: &mut String, default: &str, field: &str, issues: &mut Vec<String>) {
    match parse_hex_color(value) {
        Some((r, g, b)) => {
            let canonical = format!("{:02X}{:02X}{:02X}", r, g, b);
            if *value != canonical {
                *value = canonical;
            }
        }
        None => {
            issues.push(format!("{} '{}' is not a hex color, using {}", field, value, default));
            *value = default.to_string();
        }
    }
}
