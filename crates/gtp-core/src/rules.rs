// Rule document model: graphemes, subsets, and context-sensitive rules
//
// A `RuleSet` is the parsed form of a rule file. It is plain data: subset
// references inside rule contexts are still symbolic here and are expanded
// by the engine's preparation step.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grapheme::GraphemeSet;

/// Error type for reading and parsing rule documents.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("failed to read rule file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule document: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Context fields
// ---------------------------------------------------------------------------

/// Which context field of a rule a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextField {
    Predecessor,
    Successor,
}

impl std::fmt::Display for ContextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextField::Predecessor => f.write_str("predecessor"),
            ContextField::Successor => f.write_str("successor"),
        }
    }
}

// ---------------------------------------------------------------------------
// Subset
// ---------------------------------------------------------------------------

/// A named group of graphemes used as shorthand in rule contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subset {
    pub name: String,
    /// Space-separated member graphemes.
    pub graphemes: String,
}

impl Subset {
    pub fn new(name: impl Into<String>, graphemes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graphemes: graphemes.into(),
        }
    }

    /// Iterate over the member graphemes.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.graphemes.split_whitespace()
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// One entry of the rule table.
///
/// `predecessor` and `successor` hold either a subset name or a literal
/// space-separated list of characters. A rule with neither is the default
/// rule for its center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub center: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<String>,
    pub phonemes: String,
}

impl Rule {
    /// Create a default (context-free) rule.
    pub fn new(center: impl Into<String>, phonemes: impl Into<String>) -> Self {
        Self {
            center: center.into(),
            predecessor: None,
            successor: None,
            phonemes: phonemes.into(),
        }
    }

    /// Set the predecessor condition.
    pub fn after(mut self, predecessor: impl Into<String>) -> Self {
        self.predecessor = Some(predecessor.into());
        self
    }

    /// Set the successor condition.
    pub fn before(mut self, successor: impl Into<String>) -> Self {
        self.successor = Some(successor.into());
        self
    }

    /// Whether this rule has no context condition.
    pub fn is_default(&self) -> bool {
        self.predecessor.is_none() && self.successor.is_none()
    }

    /// Value of the given context field.
    pub fn context(&self, field: ContextField) -> Option<&str> {
        match field {
            ContextField::Predecessor => self.predecessor.as_deref(),
            ContextField::Successor => self.successor.as_deref(),
        }
    }

    /// Mutable access to the given context field.
    pub fn context_mut(&mut self, field: ContextField) -> &mut Option<String> {
        match field {
            ContextField::Predecessor => &mut self.predecessor,
            ContextField::Successor => &mut self.successor,
        }
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// A complete rule document: legal graphemes, subsets, and ordered rules.
///
/// Rule order is significant; it decides which of several matching
/// context rules wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Space-separated list of every legal grapheme.
    pub graphemes: String,
    #[serde(default)]
    pub subsets: Vec<Subset>,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Parse a rule document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a rule document from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a rule document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RuleSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serialize the document as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, RuleSetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The legal grapheme set declared by this document.
    pub fn grapheme_set(&self) -> GraphemeSet {
        GraphemeSet::parse(&self.graphemes)
    }

    /// Look up a subset by name.
    pub fn subset(&self, name: &str) -> Option<&Subset> {
        self.subsets.iter().find(|s| s.name == name)
    }
}
