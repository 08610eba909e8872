//! Shared types for rule-based grapheme-to-phoneme transcription.
//!
//! - [`rules`] -- Rule document model (`RuleSet`, `Subset`, `Rule`) and JSON loading
//! - [`grapheme`] -- Legal grapheme allow-list and the word boundary sentinel
//! - [`chunk`] -- Positional windows used for rule matching

pub mod chunk;
pub mod grapheme;
pub mod rules;

pub use chunk::Chunk;
pub use grapheme::{GraphemeSet, SENTINEL, SENTINEL_STR};
pub use rules::{ContextField, Rule, RuleSet, RuleSetError, Subset};
