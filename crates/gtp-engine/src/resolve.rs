// Candidate lookup and phoneme resolution
//
// Precedence, from strongest to weakest:
// 1. a matching digraph rule over any single-character rule;
// 2. a context rule over the default rule for the same center, where
//    context rules are tried in table order and, for each rule, the
//    predecessor is checked before the successor;
// 3. the default rule.

use gtp_core::Chunk;

use crate::prepare::{PreparedRule, RuleTable};

/// The rules whose center equals a chunk's center, in table order.
#[derive(Debug, Clone, Copy)]
pub struct Candidates<'t> {
    table: &'t RuleTable,
    indices: &'t [usize],
}

impl<'t> Candidates<'t> {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(self) -> impl Iterator<Item = &'t PreparedRule> {
        let rules = self.table.rules();
        self.indices.iter().map(move |&i| &rules[i])
    }
}

/// Look up every rule whose center is exactly `chunk.center`.
pub fn candidates<'t>(table: &'t RuleTable, chunk: &Chunk) -> Candidates<'t> {
    Candidates {
        table,
        indices: table.rule_indices(&chunk.center),
    }
}

/// Pick the rule that applies to `chunk` among its candidates.
///
/// The first candidate whose predecessor or successor condition is satisfied
/// wins. A later predecessor-only rule is therefore shadowed by an earlier
/// successor rule that also matches. Without a context hit, the default rule
/// applies, if there is one.
pub fn resolve<'t>(chunk: &Chunk, candidates: Candidates<'t>) -> Option<&'t PreparedRule> {
    let mut default = None;
    for rule in candidates.iter() {
        if rule.predecessor().is_some_and(|c| c.matches(chunk.predecessor)) {
            return Some(rule);
        }
        if rule.successor().is_some_and(|c| c.matches(chunk.successor)) {
            return Some(rule);
        }
        if rule.is_default() {
            default = Some(rule);
        }
    }
    default
}

/// The outcome of resolving one word position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'t> {
    pub rule: &'t PreparedRule,
    /// Whether the rule's center covered this position and the next one.
    pub consumed_two: bool,
}

impl<'t> Resolution<'t> {
    pub fn phonemes(&self) -> &'t str {
        self.rule.phonemes()
    }
}

/// Resolve a position from its single- and double-width chunks.
///
/// The digraph is tried first; when it has no candidates, or none of them
/// applies, the single character is resolved instead.
pub fn resolve_position<'t>(
    table: &'t RuleTable,
    single: &Chunk,
    double: &Chunk,
) -> Option<Resolution<'t>> {
    let double_candidates = candidates(table, double);
    if !double_candidates.is_empty() {
        if let Some(rule) = resolve(double, double_candidates) {
            return Some(Resolution {
                rule,
                consumed_two: true,
            });
        }
    }
    resolve(single, candidates(table, single)).map(|rule| Resolution {
        rule,
        consumed_two: false,
    })
}
