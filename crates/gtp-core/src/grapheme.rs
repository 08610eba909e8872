// Legal grapheme allow-list

use hashbrown::HashSet;

/// Boundary marker padded around every word before windowing.
pub const SENTINEL: char = '$';

/// The sentinel as a string slice, for comparisons against context tokens.
pub const SENTINEL_STR: &str = "$";

/// The exhaustive set of legal graphemes (letters and digraphs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphemeSet {
    members: HashSet<String>,
}

impl GraphemeSet {
    /// Parse a space-separated grapheme list.
    pub fn parse(list: &str) -> Self {
        Self {
            members: list.split_whitespace().map(str::to_owned).collect(),
        }
    }

    pub fn contains(&self, grapheme: &str) -> bool {
        self.members.contains(grapheme)
    }

    /// Whether `token` may appear in a rule context: a legal grapheme
    /// or the word boundary.
    pub fn is_context_symbol(&self, token: &str) -> bool {
        token == SENTINEL_STR || self.contains(token)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
