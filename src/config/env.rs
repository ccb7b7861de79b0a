//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `WWC_CONFIG` - Path of the JSON config file
//! - `WWC_TERRITORIES` - Path of the territory registry file
//! - `WWC_ENABLED` - Master switch (`true`/`false`)
//! - `WWC_TIMER_OFFSET` - Timer offset in seconds

use std::env;

use tracing::warn;

use crate::config::types::Config;
use crate::config::validate::TIMER_OFFSET_RANGE;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "WWC";

/// Apply environment variable overrides to a config.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(enabled) = env::var(format!("{}_ENABLED", ENV_PREFIX)) {
        match enabled.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => config.is_mod_enabled = true,
            "0" | "false" | "no" | "off" => config.is_mod_enabled = false,
            other => warn!("Ignoring {}_ENABLED={:?}", ENV_PREFIX, other),
        }
    }

    if let Ok(offset) = env::var(format!("{}_TIMER_OFFSET", ENV_PREFIX)) {
        match offset.trim().parse::<i32>() {
            Ok(offset) => {
                config.timer_offset_seconds =
                    offset.clamp(*TIMER_OFFSET_RANGE.start(), *TIMER_OFFSET_RANGE.end());
            }
            Err(_) => warn!("Ignoring {}_TIMER_OFFSET={:?}", ENV_PREFIX, offset),
        }
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `WWC_CONFIG` environment variable, otherwise returns "wynn-war-cooldown.json".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX))
        .unwrap_or_else(|_| "wynn-war-cooldown.json".to_string())
}

/// Get the territory registry path from environment or use default.
pub fn get_territories_path() -> String {
    env::var(format!("{}_TERRITORIES", ENV_PREFIX))
        .unwrap_or_else(|_| "territories.json".to_string())
}
