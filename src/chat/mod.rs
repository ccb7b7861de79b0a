//! Chat text processing.
//!
//! - `normalizer`: strips formatting codes and glyphs from raw chat lines
//! - `classifier`: recognizes territory events in normalized lines

pub mod classifier;
pub mod normalizer;

pub use classifier::{EventClassifier, EventKind};
pub use normalizer::MessageNormalizer;
