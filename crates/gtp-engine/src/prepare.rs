// Rule table preparation: subset expansion, validation, candidate index
//
// Preparation turns a parsed `RuleSet` into an immutable `RuleTable`. Subset
// names in rule contexts are replaced by their member lists, the document is
// checked for malformations that would make resolution ambiguous or
// impossible, and rules are indexed by center in source order.

use gtp_core::{ContextField, GraphemeSet, Rule, RuleSet, SENTINEL, Subset};
use hashbrown::{HashMap, HashSet};

use crate::transcriber::Transcriber;

/// Error type for rule table preparation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrepareError {
    #[error("rule {rule}: {field} refers to undefined subset {name:?}")]
    UndefinedSubset {
        rule: usize,
        field: ContextField,
        name: String,
    },
    #[error("rule {rule}: {field} lists {symbol:?}, which is not a known grapheme")]
    UnknownContextSymbol {
        rule: usize,
        field: ContextField,
        symbol: String,
    },
    #[error("rule {rule}: {field} is empty")]
    EmptyContext { rule: usize, field: ContextField },
    #[error("rule {rule}: invalid center {center:?}")]
    InvalidCenter { rule: usize, center: String },
    #[error("subset {0:?} is defined more than once")]
    DuplicateSubset(String),
    #[error("invalid subset name {0:?}")]
    InvalidSubsetName(String),
    #[error("subset {subset:?} lists {member:?}, which is not a known grapheme")]
    UnknownSubsetMember { subset: String, member: String },
    #[error("center {center:?} has more than one default rule (rules {first} and {second})")]
    DuplicateDefault {
        center: String,
        first: usize,
        second: usize,
    },
}

// ---------------------------------------------------------------------------
// Context sets
// ---------------------------------------------------------------------------

/// A resolved context condition: the literal symbols a neighboring
/// character must equal for the rule to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSet {
    symbols: Vec<String>,
}

impl ContextSet {
    fn parse(list: &str) -> Self {
        Self {
            symbols: list.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Whether `c` is one of the listed symbols.
    ///
    /// Multi-character symbols (digraphs pulled in through a subset) never
    /// match, since neighbors are always single characters.
    pub fn matches(&self, c: char) -> bool {
        self.symbols.iter().any(|s| {
            let mut chars = s.chars();
            chars.next() == Some(c) && chars.next().is_none()
        })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Prepared rules
// ---------------------------------------------------------------------------

/// A rule whose contexts have been expanded and parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRule {
    index: usize,
    rule: Rule,
    predecessor: Option<ContextSet>,
    successor: Option<ContextSet>,
}

impl PreparedRule {
    /// Position of this rule in the source document.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn center(&self) -> &str {
        &self.rule.center
    }

    pub fn phonemes(&self) -> &str {
        &self.rule.phonemes
    }

    pub fn predecessor(&self) -> Option<&ContextSet> {
        self.predecessor.as_ref()
    }

    pub fn successor(&self) -> Option<&ContextSet> {
        self.successor.as_ref()
    }

    pub fn is_default(&self) -> bool {
        self.predecessor.is_none() && self.successor.is_none()
    }

    /// The resolved rule as it would appear in a rule document.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

// ---------------------------------------------------------------------------
// RuleTable
// ---------------------------------------------------------------------------

/// The resolved, immutable rule table.
///
/// Built once by [`prepare`] and shared read-only by any number of
/// transcribers, including across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    grapheme_list: String,
    graphemes: GraphemeSet,
    subsets: Vec<Subset>,
    rules: Vec<PreparedRule>,
    /// Center -> rule indices, in source order.
    by_center: HashMap<String, Vec<usize>>,
}

impl RuleTable {
    pub fn graphemes(&self) -> &GraphemeSet {
        &self.graphemes
    }

    /// The subsets the table was prepared with, kept for inspection.
    pub fn subsets(&self) -> &[Subset] {
        &self.subsets
    }

    pub fn rules(&self) -> &[PreparedRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Indices of the rules for `center`, in source order.
    pub fn rule_indices(&self, center: &str) -> &[usize] {
        self.by_center.get(center).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The resolved rule document. Preparing it again yields an equal table.
    pub fn to_rule_set(&self) -> RuleSet {
        RuleSet {
            graphemes: self.grapheme_list.clone(),
            subsets: self.subsets.clone(),
            rules: self.rules.iter().map(|r| r.rule.clone()).collect(),
        }
    }

    /// Create a transcriber borrowing this table.
    pub fn transcriber(&self) -> Transcriber<'_> {
        Transcriber::new(self)
    }
}

// ---------------------------------------------------------------------------
// Subset expansion
// ---------------------------------------------------------------------------

/// Replace every context value that names a subset with that subset's
/// grapheme list.
///
/// Values that are not subset names are left untouched. The input is not
/// modified. Applying the expansion to its own output changes nothing, as
/// long as no subset name is also a grapheme list (which [`prepare`]
/// guarantees).
pub fn expand_subsets(rules: &[Rule], subsets: &[Subset]) -> Vec<Rule> {
    let lookup = subset_lookup(subsets);
    rules
        .iter()
        .map(|rule| {
            let mut resolved = rule.clone();
            for field in [ContextField::Predecessor, ContextField::Successor] {
                let slot = resolved.context_mut(field);
                if let Some(graphemes) = slot.as_deref().and_then(|v| lookup.get(v)) {
                    *slot = Some((*graphemes).to_owned());
                }
            }
            resolved
        })
        .collect()
}

/// Name -> grapheme list. The first definition wins for duplicated names.
fn subset_lookup(subsets: &[Subset]) -> HashMap<&str, &str> {
    let mut lookup = HashMap::with_capacity(subsets.len());
    for subset in subsets {
        lookup
            .entry(subset.name.as_str())
            .or_insert(subset.graphemes.as_str());
    }
    lookup
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Validate a rule document, expand its subsets, and build the rule table.
///
/// Candidate order is the document order. A rule with only a predecessor
/// condition can be shadowed by an earlier rule for the same center whose
/// successor condition matches; the table keeps that order as written.
pub fn prepare(set: &RuleSet) -> Result<RuleTable, PrepareError> {
    let graphemes = set.grapheme_set();
    validate_subsets(&set.subsets, &graphemes)?;

    let expanded = expand_subsets(&set.rules, &set.subsets);
    let neighbors = NeighborSymbols::new(&graphemes, &expanded);
    let mut rules = Vec::with_capacity(expanded.len());
    let mut by_center: HashMap<String, Vec<usize>> = HashMap::new();

    for (index, rule) in expanded.into_iter().enumerate() {
        if rule.center.is_empty() || rule.center.contains(SENTINEL) {
            return Err(PrepareError::InvalidCenter {
                rule: index,
                center: rule.center,
            });
        }

        let predecessor = parse_context(&rule, index, ContextField::Predecessor, &neighbors)?;
        let successor = parse_context(&rule, index, ContextField::Successor, &neighbors)?;

        by_center
            .entry(rule.center.clone())
            .or_default()
            .push(index);
        rules.push(PreparedRule {
            index,
            rule,
            predecessor,
            successor,
        });
    }

    check_defaults(&rules)?;

    let expansions = set
        .rules
        .iter()
        .flat_map(|r| [r.predecessor.as_deref(), r.successor.as_deref()])
        .flatten()
        .filter(|v| set.subset(v).is_some())
        .count();
    log::debug!(
        "prepared {} rules for {} centers ({} subset references expanded)",
        rules.len(),
        by_center.len(),
        expansions
    );

    Ok(RuleTable {
        grapheme_list: set.graphemes.clone(),
        graphemes,
        subsets: set.subsets.clone(),
        rules,
        by_center,
    })
}

/// At most one default rule per center.
fn check_defaults(rules: &[PreparedRule]) -> Result<(), PrepareError> {
    let mut defaults: HashMap<&str, usize> = HashMap::new();
    for prepared in rules.iter().filter(|r| r.is_default()) {
        if let Some(&first) = defaults.get(prepared.center()) {
            return Err(PrepareError::DuplicateDefault {
                center: prepared.center().to_owned(),
                first,
                second: prepared.index,
            });
        }
        defaults.insert(prepared.center(), prepared.index);
    }
    Ok(())
}

fn validate_subsets(subsets: &[Subset], graphemes: &GraphemeSet) -> Result<(), PrepareError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(subsets.len());
    for subset in subsets {
        let name = subset.name.as_str();
        if name.is_empty()
            || name.chars().any(char::is_whitespace)
            || graphemes.is_context_symbol(name)
        {
            return Err(PrepareError::InvalidSubsetName(subset.name.clone()));
        }
        if !seen.insert(name) {
            return Err(PrepareError::DuplicateSubset(subset.name.clone()));
        }
        if let Some(member) = subset.members().find(|m| !graphemes.is_context_symbol(m)) {
            return Err(PrepareError::UnknownSubsetMember {
                subset: subset.name.clone(),
                member: member.to_owned(),
            });
        }
    }
    Ok(())
}

/// Every symbol a neighboring character can be: a legal grapheme, the
/// boundary, or a trailing character of a multi-character center. The last
/// kind never passes the grapheme check itself, since the digraph absorbs it,
/// but it still sits next to the following position.
struct NeighborSymbols<'a> {
    graphemes: &'a GraphemeSet,
    digraph_tails: HashSet<String>,
}

impl<'a> NeighborSymbols<'a> {
    fn new(graphemes: &'a GraphemeSet, rules: &[Rule]) -> Self {
        let digraph_tails = rules
            .iter()
            .flat_map(|r| r.center.chars().skip(1))
            .map(String::from)
            .collect();
        Self {
            graphemes,
            digraph_tails,
        }
    }

    fn accepts(&self, token: &str) -> bool {
        self.graphemes.is_context_symbol(token) || self.digraph_tails.contains(token)
    }
}

/// Parse an already-expanded context value.
///
/// A lone token that is not a known neighbor symbol can only have been meant
/// as a subset name, so it is reported as an undefined subset.
fn parse_context(
    rule: &Rule,
    index: usize,
    field: ContextField,
    neighbors: &NeighborSymbols<'_>,
) -> Result<Option<ContextSet>, PrepareError> {
    let Some(value) = rule.context(field) else {
        return Ok(None);
    };
    let context = ContextSet::parse(value);
    if context.symbols.is_empty() {
        return Err(PrepareError::EmptyContext { rule: index, field });
    }
    if let Some(bad) = context.symbols().find(|s| !neighbors.accepts(s)) {
        return Err(if context.symbols.len() == 1 {
            PrepareError::UndefinedSubset {
                rule: index,
                field,
                name: bad.to_owned(),
            }
        } else {
            PrepareError::UnknownContextSymbol {
                rule: index,
                field,
                symbol: bad.to_owned(),
            }
        });
    }
    Ok(Some(context))
}
