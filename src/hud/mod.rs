//! Timer HUD rendering.

pub mod formatter;

pub use formatter::{format_time, HudFormatter};
