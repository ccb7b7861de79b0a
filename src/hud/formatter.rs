//! Text formatting for the timer HUD and chat announcements.
//!
//! Announcement templates use positional placeholders: `%1`, `%2`, ...

use crate::common::resources::{HudAlignment, DEFAULT_COOLDOWN_SECONDS};
use crate::common::types::{same_territory, TimerKind, VisibleTimer};
use crate::config::validate::parse_hex_color;
use crate::config::Config;

/// Template for a timer that ran out.
pub const OFF_COOLDOWN_TEMPLATE: &str = "%1 is off cooldown!";

/// Template for a capture reminder.
pub const CAPTURE_REMINDER_TEMPLATE: &str = "%1 becomes attackable in %2";

/// Template for a failed guild attack campaign.
pub const RETRY_EXHAUSTED_TEMPLATE: &str = "Failed to send guild attack for %1 after %2 attempts";

const ANSI_RESET: &str = "\x1b[0m";

/// Format seconds as `MM:SS`. Negative values read as zero.
pub fn format_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Look up the template for an announcement key.
pub fn template_for(key: &str) -> Option<&'static str> {
    match key {
        "timer.off_cooldown" => Some(OFF_COOLDOWN_TEMPLATE),
        "capture.reminder" => Some(CAPTURE_REMINDER_TEMPLATE),
        "retry.exhausted" => Some(RETRY_EXHAUSTED_TEMPLATE),
        _ => None,
    }
}

/// Substitute positional arguments into a template.
///
/// Higher indexes are replaced first so `%1` never eats the front of `%10`.
pub fn fill_template(template: &str, args: &[String]) -> String {
    args.iter()
        .enumerate()
        .rev()
        .fold(template.to_string(), |text, (index, arg)| {
            text.replace(&format!("%{}", index + 1), arg)
        })
}

/// Render an announcement. Unknown keys are shown with their arguments.
pub fn render_announcement(key: &str, args: &[String]) -> String {
    match template_for(key) {
        Some(template) => fill_template(template, args),
        None if args.is_empty() => key.to_string(),
        None => format!("{} {}", key, args.join(" ")),
    }
}

/// Plain text for one visible timer.
pub fn timer_line(timer: &VisibleTimer) -> String {
    match timer.kind {
        TimerKind::Active => format!(
            "{} {}",
            timer.territory_name,
            format_time(timer.remaining_seconds)
        ),
        TimerKind::Expired => format!("{} EXPIRED", timer.territory_name),
        TimerKind::Capture => format!(
            "{} {} (captured)",
            timer.territory_name,
            format_time(timer.remaining_seconds)
        ),
    }
}

/// Operator-facing text for one visible timer, as printed by `list`.
pub fn list_line(timer: &VisibleTimer) -> String {
    match timer.kind {
        TimerKind::Capture => format!(
            "{}: captured {} ago",
            timer.territory_name,
            format_time(DEFAULT_COOLDOWN_SECONDS - timer.remaining_seconds)
        ),
        TimerKind::Expired => format!("{}: EXPIRED", timer.territory_name),
        TimerKind::Active => format!(
            "{}: {}",
            timer.territory_name,
            format_time(timer.remaining_seconds)
        ),
    }
}

/// Renders the timer list as aligned, colored terminal lines.
#[derive(Debug, Clone, PartialEq)]
pub struct HudFormatter {
    alignment: HudAlignment,
    text_color: (u8, u8, u8),
    expired_color: (u8, u8, u8),
    current_color: (u8, u8, u8),
    colored: bool,
}

impl HudFormatter {
    pub fn from_config(config: &Config) -> Self {
        let defaults = Config::default();
        let color = |value: &str, default: &str| {
            parse_hex_color(value)
                .or_else(|| parse_hex_color(default))
                .unwrap_or((255, 255, 255))
        };

        Self {
            alignment: config.hud_alignment,
            text_color: color(&config.text_color_hex, &defaults.text_color_hex),
            expired_color: color(&config.expired_text_color_hex, &defaults.expired_text_color_hex),
            current_color: color(&config.current_text_color_hex, &defaults.current_text_color_hex),
            colored: true,
        }
    }

    /// Disable ANSI colors.
    #[cfg(test)]
    pub fn plain(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Render timers as HUD text, one line per timer.
    ///
    /// The timer for the player's current territory gets its own color.
    pub fn render(&self, timers: &[VisibleTimer], current_territory: Option<&str>) -> String {
        let lines: Vec<String> = timers.iter().map(timer_line).collect();
        let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        lines
            .iter()
            .zip(timers)
            .map(|(line, timer)| {
                let padded = self.align(line, width);
                if !self.colored {
                    return padded;
                }
                let is_current = current_territory
                    .is_some_and(|current| same_territory(current, &timer.territory_name));
                let (r, g, b) = match timer.kind {
                    _ if is_current => self.current_color,
                    TimerKind::Expired => self.expired_color,
                    _ => self.text_color,
                };
                format!("\x1b[38;2;{};{};{}m{}{}", r, g, b, padded, ANSI_RESET)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn align(&self, line: &str, width: usize) -> String {
        let gap = width.saturating_sub(line.chars().count());
        let indent = match self.alignment {
            HudAlignment::Left => 0,
            HudAlignment::Center => gap / 2,
            HudAlignment::Right => gap,
        };
        format!("{}{}", " ".repeat(indent), line)
    }
}
