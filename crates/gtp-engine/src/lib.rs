//! Context-sensitive grapheme-to-phoneme rule engine.
//!
//! A [`RuleTable`] is prepared once from a parsed [`gtp_core::RuleSet`] and
//! then shared read-only. Each word is windowed into single- and
//! double-character chunks, and every position resolves to the phonemes of
//! the most specific applicable rule: a digraph before a single character,
//! a context rule before the default.
//!
//! # Architecture
//!
//! - [`prepare`] -- Subset expansion, validation, and the resolved rule table
//! - [`window`] -- Sentinel-padded chunk windows of width 1 and 2
//! - [`resolve`] -- Candidate lookup and per-position rule precedence
//! - [`transcriber`] -- The position-scanning word transcriber
//!
//! ```
//! use gtp_core::{Rule, RuleSet};
//! use gtp_engine::prepare;
//!
//! let set = RuleSet {
//!     graphemes: "c h a".into(),
//!     subsets: vec![],
//!     rules: vec![Rule::new("ch", "tʃ"), Rule::new("c", "k"), Rule::new("a", "a")],
//! };
//! let table = prepare(&set).unwrap();
//! assert_eq!(table.transcriber().transcribe("chaca").unwrap(), "tʃaka");
//! ```

pub mod prepare;
pub mod resolve;
pub mod transcriber;
pub mod window;

pub use prepare::{ContextSet, PrepareError, PreparedRule, RuleTable, expand_subsets, prepare};
pub use resolve::{Candidates, Resolution, candidates, resolve, resolve_position};
pub use transcriber::{Segment, TranscribeError, Transcriber};
pub use window::{Width, window};
