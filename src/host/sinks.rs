//! Terminal implementations of the action and notification sinks.
//!
//! Commands and announcements go to stdout next to the HUD. Sounds become a
//! terminal bell on stderr.

use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::common::resources::SoundType;
use crate::hud::formatter::render_announcement;
use crate::host::{ActionSink, NotificationSink};

/// Command text sent as the dependent action.
pub const GUILD_ATTACK_COMMAND: &str = "/guild attack";

/// Prints the guild attack command.
pub struct TerminalActionSink<W: Write> {
    out: W,
}

impl TerminalActionSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalActionSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> ActionSink for TerminalActionSink<W> {
    fn send_dependent_action(&mut self) {
        info!("Sending {}", GUILD_ATTACK_COMMAND);
        let sent = writeln!(self.out, "{}", GUILD_ATTACK_COMMAND).and_then(|_| self.out.flush());
        if let Err(e) = sent {
            warn!("Failed to send {}: {}", GUILD_ATTACK_COMMAND, e);
        }
    }
}

/// Prints announcements and rings the terminal bell for sounds.
pub struct TerminalNotificationSink<W: Write, B: Write> {
    out: W,
    bell: B,
    volume: f32,
}

impl TerminalNotificationSink<io::Stdout, io::Stderr> {
    pub fn terminal(volume: f32) -> Self {
        Self::new(io::stdout(), io::stderr(), volume)
    }
}

impl<W: Write, B: Write> TerminalNotificationSink<W, B> {
    pub fn new(out: W, bell: B, volume: f32) -> Self {
        Self { out, bell, volume }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> (&W, &B) {
        (&self.out, &self.bell)
    }
}

impl<W: Write, B: Write> NotificationSink for TerminalNotificationSink<W, B> {
    fn play_sound(&mut self, sound: SoundType) {
        if self.volume <= 0.0 {
            debug!("Sound {} muted", sound.name());
            return;
        }

        info!(
            "Playing {} ({}) at volume {:.2}",
            sound.name(),
            sound.sound_id(),
            self.volume
        );
        if let Err(e) = self.bell.write_all(b"\x07").and_then(|_| self.bell.flush()) {
            warn!("Failed to play sound {}: {}", sound.name(), e);
        }
    }

    fn announce(&mut self, template_key: &str, args: &[String]) {
        let text = render_announcement(template_key, args);
        info!("Announcing: {}", text);
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!("Failed to announce '{}': {}", text, e);
        }
    }
}
