//! Cooldown tracking engine.

pub mod clock;
pub mod cooldown;
pub mod retry;

pub use clock::{Clock, SystemClock};
pub use cooldown::CooldownEngine;
