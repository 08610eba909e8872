// Chunk: a positional (predecessor, center, successor) view into a word

use std::fmt;

use crate::grapheme::SENTINEL;

/// A window over a padded word used for rule matching.
///
/// `center` is one or two characters; `predecessor` and `successor` are the
/// single characters on either side, or [`SENTINEL`] at a word boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub predecessor: char,
    pub center: String,
    pub successor: char,
}

impl Chunk {
    pub fn new(predecessor: char, center: impl Into<String>, successor: char) -> Self {
        Self {
            predecessor,
            center: center.into(),
            successor,
        }
    }

    /// The synthetic chunk appended to the width-2 sequence so that it lines
    /// up with the width-1 sequence.
    pub fn terminal() -> Self {
        Self {
            predecessor: SENTINEL,
            center: SENTINEL.to_string(),
            successor: SENTINEL,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.predecessor == SENTINEL
            && self.successor == SENTINEL
            && self.center.len() == 1
            && self.center.starts_with(SENTINEL)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{},{},{}}}",
            self.predecessor, self.center, self.successor
        )
    }
}
