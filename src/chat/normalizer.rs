//! Chat text normalization.
//!
//! Server messages arrive decorated with color codes, custom font glyphs and
//! stray control characters. Everything that is not plain text is stripped
//! before pattern matching.

use fancy_regex::Regex;

/// Strips formatting from raw chat text.
#[derive(Debug, Clone)]
pub struct MessageNormalizer {
    /// Removal patterns, applied in order until nothing changes.
    strip_patterns: Vec<Regex>,
    /// Runs of whitespace.
    whitespace: Regex,
}

impl Default for MessageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageNormalizer {
    pub fn new() -> Self {
        let strip_patterns = [
            // &a style color codes
            r"(?i)&[0-9a-fk-or]",
            // §a style color codes
            r"(?i)§[0-9a-fk-or]",
            // &{...} custom formatting codes
            r"&\{[^}]*\}",
            // Private-use glyphs used for custom fonts and icons
            r"\p{Co}",
            // Anything left that is not a letter, digit, punctuation or space
            r"[^\p{L}\p{N}\p{P}\p{Zs}]",
        ]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("static normalizer pattern"))
        .collect();

        Self {
            strip_patterns,
            whitespace: Regex::new(r"\s+").expect("static whitespace pattern"),
        }
    }

    /// Normalize raw chat text.
    ///
    /// Idempotent: normalizing the output again returns it unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = raw.to_string();

        // Removing one code can splice together another ("&&aa" -> "&a"),
        // so strip until a fixpoint. Each pass only ever shortens the text.
        loop {
            let stripped = self.strip_once(&text);
            if stripped == text {
                break;
            }
            text = stripped;
        }

        self.whitespace.replace_all(&text, " ").trim().to_string()
    }

    fn strip_once(&self, text: &str) -> String {
        self.strip_patterns
            .iter()
            .fold(text.to_string(), |acc, pattern| {
                pattern.replace_all(&acc, "").into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let normalizer = MessageNormalizer::new();
        assert_eq!(
            normalizer.normalize("Territory is in cooldown for 9 minutes 30 seconds."),
            "Territory is in cooldown for 9 minutes 30 seconds."
        );
    }

    #[test]
    fn test_color_codes_stripped() {
        let normalizer = MessageNormalizer::new();
        assert_eq!(
            normalizer.normalize("&cThe war for &bDetlas&r will start"),
            "The war for Detlas will start"
        );
        assert_eq!(
            normalizer.normalize("§4§lYou have taken control of §fAlmuj!"),
            "You have taken control of Almuj!"
        );
    }

    #[test]
    fn test_custom_format_codes_stripped() {
        let normalizer = MessageNormalizer::new();
        assert_eq!(
            normalizer.normalize("&{font:wynncraft}[ABC]&{reset} has taken control of Ragni!"),
            "[ABC] has taken control of Ragni!"
        );
    }

    #[test]
    fn test_private_use_and_symbols_stripped() {
        let normalizer = MessageNormalizer::new();
        assert_eq!(
            normalizer.normalize("\u{E001}\u{E002} Detlas defense is High \u{2694}"),
            "Detlas defense is High"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        let normalizer = MessageNormalizer::new();
        assert_eq!(
            normalizer.normalize("  Ragni\u{00A0}\u{00A0}Province   defense  is   Low  "),
            "Ragni Province defense is Low"
        );
        // Control characters are removed outright, not turned into spaces
        assert_eq!(normalizer.normalize("Territory is\nin cooldown"), "Territory isin cooldown");
        assert_eq!(normalizer.normalize("   "), "");
    }

    #[test]
    fn test_spliced_codes_fully_removed() {
        let normalizer = MessageNormalizer::new();
        assert_eq!(normalizer.normalize("&&aaDetlas"), "Detlas");
        assert_eq!(normalizer.normalize("&\u{0007}cDetlas"), "Detlas");
        assert_eq!(normalizer.normalize("&&a{x}Detlas"), "Detlas");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = MessageNormalizer::new();
        let samples = [
            "&&aa§§bbTerritory\u{E000} is in   cooldown",
            "&{a&{b}c}Detlas\t\t defense is Very Low",
            "[ABC]\u{0001} has taken control of Cinfras Entrance!",
            "&\u{0007}&\u{0008}cc",
            "",
        ];
        for sample in samples {
            let once = normalizer.normalize(sample);
            let twice = normalizer.normalize(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }
}
