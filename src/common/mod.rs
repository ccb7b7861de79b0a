//! Common utilities and types shared across the application.

pub mod error;
pub mod messages;
pub mod resources;
pub mod types;

// Re-export message types from messages module
pub use messages::{Announcement, ChatEvent, EngineEffect};

// Re-export the data model
pub use types::{
    CaptureEvent, ExpiredTimer, Instant, PendingRetry, TerritoryTimer, TimerKind, VisibleTimer,
};
