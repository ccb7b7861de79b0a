//! Host collaborators.
//!
//! The engine never talks to the game directly. Everything host-specific
//! sits behind these three traits:
//! - `TerritoryResolver` answers where the player is and what the map knows
//! - `ActionSink` sends the dependent `/guild attack` command
//! - `NotificationSink` plays sounds and posts chat announcements

pub mod codec;
pub mod resolver;
pub mod sinks;

use crate::common::resources::SoundType;

pub use codec::ChatLineCodec;
pub use resolver::{match_territory_name, StaticTerritoryResolver};
pub use sinks::{TerminalActionSink, TerminalNotificationSink};

/// Live territory facts for a named territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerritoryStatus {
    pub is_on_cooldown: bool,
    pub time_held_millis: i64,
}

/// Lookup into the host's territory registry.
pub trait TerritoryResolver {
    /// Canonical name of the territory the player is standing in.
    fn current_territory_name(&self) -> Option<String>;

    /// Every known canonical territory name, in registry order.
    fn all_territory_names(&self) -> Vec<String>;

    fn territory_status(&self, name: &str) -> Option<TerritoryStatus>;

    /// Move the player to `name` (or nowhere). Hosts that track the real
    /// player position return `false`.
    fn set_current_territory(&mut self, _name: Option<String>) -> bool {
        false
    }
}

/// Receiver of the dependent action.
pub trait ActionSink {
    /// Fire-and-forget; delivery is not guaranteed.
    fn send_dependent_action(&mut self);
}

/// Receiver of sounds and chat announcements.
pub trait NotificationSink {
    fn play_sound(&mut self, sound: SoundType);

    fn announce(&mut self, template_key: &str, args: &[String]);
}
