//! Territory event classification.
//!
//! Each event kind is a matcher: a cheap lowercase phrase guard, the regex
//! patterns for that message shape, and an extractor turning captures into a
//! [`ChatEvent`]. Matchers are tried in order and the first hit wins, so the
//! structured queue signals (war start, defense) take priority over the
//! generic cooldown announcement.

use fancy_regex::{Captures, Regex};
use tracing::warn;

use crate::common::messages::ChatEvent;
use crate::common::resources::DefenseLevel;

/// Kind of event a matcher recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    WarStart,
    Defense,
    Capture,
    Loss,
    CooldownStart,
}

/// A guarded pattern/extractor pair.
#[derive(Debug, Clone)]
struct Matcher {
    kind: EventKind,
    /// Lowercase phrase that must be present before any pattern runs.
    guard: &'static str,
    patterns: Vec<Regex>,
    extract: fn(&[Regex], &str) -> Option<ChatEvent>,
}

/// Ordered list of matchers for territory chat events.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    matchers: Vec<Matcher>,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EventClassifier {
    pub fn new() -> Self {
        let matchers = vec![
            Matcher {
                kind: EventKind::WarStart,
                guard: "the war for",
                patterns: compile(&[r"(?i)the war for\s+(.+?)\s+will start in\s+(\d+)\s*minutes?"]),
                extract: extract_war_start,
            },
            Matcher {
                kind: EventKind::Defense,
                guard: "defense is",
                patterns: compile(&[
                    r"(?i)^(.+?)\s+defense is\s+(very\s+low|low|medium|high|very\s+high)\b",
                ]),
                extract: extract_defense,
            },
            Matcher {
                kind: EventKind::Capture,
                guard: "you have taken control of",
                patterns: compile(&[
                    r"(?i)you have taken control of\s+([^!\n\r]+?)(?:\s+from\s+\[([^\]]+)\])?!",
                ]),
                extract: extract_capture,
            },
            Matcher {
                kind: EventKind::Loss,
                guard: "has taken control of",
                patterns: compile(&[r"(?i)\[([A-Za-z]{3,4})\]\s+has taken control of\s+([^!]+)!"]),
                extract: extract_loss,
            },
            Matcher {
                kind: EventKind::CooldownStart,
                guard: "territory is in cooldown",
                patterns: compile(&[r"(?i)(\d+)\s*minutes?", r"(?i)(\d+)\s*seconds?"]),
                extract: extract_cooldown,
            },
        ];

        Self { matchers }
    }

    /// Classify a normalized chat line using every matcher.
    #[cfg(test)]
    pub fn classify(&self, text: &str) -> Option<ChatEvent> {
        self.classify_with(text, |_| true)
    }

    /// Classify a normalized chat line, skipping matchers whose kind is disabled.
    pub fn classify_with(
        &self,
        text: &str,
        enabled: impl Fn(EventKind) -> bool,
    ) -> Option<ChatEvent> {
        let lowered = text.to_lowercase();

        self.matchers
            .iter()
            .filter(|m| enabled(m.kind))
            .filter(|m| lowered.contains(m.guard))
            .find_map(|m| (m.extract)(&m.patterns, text))
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("static classifier pattern"))
        .collect()
}

/// Run a pattern, treating regex runtime errors as "no match".
fn captures<'t>(pattern: &Regex, text: &'t str) -> Option<Captures<'t>> {
    pattern.captures(text).unwrap_or_else(|e| {
        warn!("Regex match error for pattern '{}': {}", pattern.as_str(), e);
        None
    })
}

fn group(caps: &Captures<'_>, index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a numeric group; unusable values degrade to 0.
fn number(caps: Option<&Captures<'_>>, index: usize) -> u32 {
    caps.and_then(|c| c.get(index))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn extract_war_start(patterns: &[Regex], text: &str) -> Option<ChatEvent> {
    let caps = captures(&patterns[0], text)?;
    Some(ChatEvent::WarStarting {
        territory: group(&caps, 1)?,
        minutes: number(Some(&caps), 2),
    })
}

fn extract_defense(patterns: &[Regex], text: &str) -> Option<ChatEvent> {
    let caps = captures(&patterns[0], text)?;
    let level = caps.get(2).and_then(|m| DefenseLevel::from_name(m.as_str()))?;
    Some(ChatEvent::DefenseReported {
        territory: group(&caps, 1)?,
        level,
    })
}

fn extract_capture(patterns: &[Regex], text: &str) -> Option<ChatEvent> {
    let caps = captures(&patterns[0], text)?;
    Some(ChatEvent::TerritoryCaptured {
        territory: group(&caps, 1)?,
        from_guild: group(&caps, 2),
    })
}

fn extract_loss(patterns: &[Regex], text: &str) -> Option<ChatEvent> {
    let caps = captures(&patterns[0], text)?;
    Some(ChatEvent::TerritoryLost {
        guild_tag: group(&caps, 1)?,
        territory: group(&caps, 2)?,
    })
}

fn extract_cooldown(patterns: &[Regex], text: &str) -> Option<ChatEvent> {
    let minutes = number(captures(&patterns[0], text).as_ref(), 1);
    let seconds = number(captures(&patterns[1], text).as_ref(), 1);

    if minutes == 0 && seconds == 0 {
        return None;
    }
    Some(ChatEvent::CooldownStarted { minutes, seconds })
}
