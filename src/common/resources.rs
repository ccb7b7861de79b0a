//! Game resources: sound choices, HUD alignment, defense levels and war constants.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Cooldown applied after a territory changes hands (10 minutes).
pub const DEFAULT_COOLDOWN_SECONDS: i64 = 600;

/// Grace period a capture event is kept after its assumed cooldown has ended.
pub const CAPTURE_RETENTION_BUFFER_SECONDS: i64 = 30;

/// Territory name used when the resolver cannot tell where the player is.
pub const UNKNOWN_TERRITORY: &str = "Unknown Territory";

/// Default cooldown as a `TimeDelta`.
pub fn default_cooldown() -> TimeDelta {
    TimeDelta::seconds(DEFAULT_COOLDOWN_SECONDS)
}

/// Sounds the notification sink can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundType {
    WarHorn,
    ExperienceOrb,
    Bell,
    LevelUp,
}

impl SoundType {
    pub const ALL: [SoundType; 4] = [
        SoundType::WarHorn,
        SoundType::ExperienceOrb,
        SoundType::Bell,
        SoundType::LevelUp,
    ];

    /// Parse a sound name as typed by an operator ("war_horn", "bell", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "war_horn" | "horn" => Some(Self::WarHorn),
            "experience_orb" | "orb" => Some(Self::ExperienceOrb),
            "bell" => Some(Self::Bell),
            "level_up" | "levelup" => Some(Self::LevelUp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::WarHorn => "War Horn",
            Self::ExperienceOrb => "Experience Orb",
            Self::Bell => "Bell",
            Self::LevelUp => "Level Up",
        }
    }

    /// Resource identifier in the game client's sound registry.
    pub fn sound_id(&self) -> &'static str {
        match self {
            Self::WarHorn => "wynn-war-cooldown:war_horn",
            Self::ExperienceOrb => "entity.experience_orb.pickup",
            Self::Bell => "block.bell.use",
            Self::LevelUp => "entity.player.levelup",
        }
    }

    /// Lowercase name accepted by `from_name`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::WarHorn => "war_horn",
            Self::ExperienceOrb => "experience_orb",
            Self::Bell => "bell",
            Self::LevelUp => "level_up",
        }
    }
}

/// Horizontal alignment of HUD lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HudAlignment {
    Left,
    Center,
    Right,
}

/// Defense rating announced when a territory is queued for war.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefenseLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl DefenseLevel {
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_lowercase().as_str() {
            "very low" => Some(Self::VeryLow),
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "very high" => Some(Self::VeryHigh),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_from_name() {
        assert_eq!(SoundType::from_name("war_horn"), Some(SoundType::WarHorn));
        assert_eq!(SoundType::from_name("Level-Up"), Some(SoundType::LevelUp));
        assert_eq!(SoundType::from_name(" BELL "), Some(SoundType::Bell));
        assert_eq!(SoundType::from_name("trumpet"), None);
    }

    #[test]
    fn test_sound_keys_round_trip() {
        for sound in SoundType::ALL {
            assert_eq!(SoundType::from_name(sound.key()), Some(sound));
        }
    }

    #[test]
    fn test_sound_serde_names() {
        let json = serde_json::to_string(&SoundType::ExperienceOrb).unwrap();
        assert_eq!(json, "\"EXPERIENCE_ORB\"");
        let parsed: HudAlignment = serde_json::from_str("\"CENTER\"").unwrap();
        assert_eq!(parsed, HudAlignment::Center);
    }

    #[test]
    fn test_defense_level_from_name() {
        assert_eq!(DefenseLevel::from_name("Very  High"), Some(DefenseLevel::VeryHigh));
        assert_eq!(DefenseLevel::from_name("low"), Some(DefenseLevel::Low));
        assert_eq!(DefenseLevel::from_name("extreme"), None);
    }
}
