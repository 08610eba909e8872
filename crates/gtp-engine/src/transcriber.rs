// Word transcriber: position-scanning state machine over paired chunk windows
//
// Transcription is a pure function of (table, word). It never prints or
// logs; failures come back as `TranscribeError` and the caller decides what
// to do with them.

use gtp_core::Chunk;

use crate::prepare::RuleTable;
use crate::resolve::resolve_position;
use crate::window::{Width, window};

/// Error type for a single word that cannot be transcribed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscribeError {
    /// The word contains a character outside the legal grapheme set.
    #[error("character {grapheme:?} at position {position} not found in graphemes; {word:?} is not a valid word")]
    UnknownGrapheme {
        word: String,
        grapheme: String,
        position: usize,
    },

    /// A legal character has no applicable digraph, context, or default rule.
    #[error("no phoneme found for chunk {chunk} at position {position}; {word:?} is not a valid word")]
    UnresolvedChunk {
        word: String,
        chunk: Chunk,
        position: usize,
    },
}

impl TranscribeError {
    /// The word that failed.
    pub fn word(&self) -> &str {
        match self {
            TranscribeError::UnknownGrapheme { word, .. }
            | TranscribeError::UnresolvedChunk { word, .. } => word,
        }
    }

    /// Character offset of the failing position.
    pub fn position(&self) -> usize {
        match self {
            TranscribeError::UnknownGrapheme { position, .. }
            | TranscribeError::UnresolvedChunk { position, .. } => *position,
        }
    }
}

/// One resolved position of a transcribed word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Character offset in the word.
    pub position: usize,
    /// The grapheme or digraph that was matched.
    pub grapheme: String,
    pub phonemes: String,
    /// Index of the rule that fired, in document order.
    pub rule: usize,
    pub consumed_two: bool,
}

/// Transcribes words against a shared, read-only rule table.
#[derive(Debug, Clone, Copy)]
pub struct Transcriber<'t> {
    table: &'t RuleTable,
}

impl<'t> Transcriber<'t> {
    pub fn new(table: &'t RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t RuleTable {
        self.table
    }

    /// Transcribe a word into its phoneme string.
    pub fn transcribe(&self, word: &str) -> Result<String, TranscribeError> {
        let mut phonemes = String::with_capacity(word.len());
        self.scan(word, |segment| phonemes.push_str(&segment.phonemes))?;
        Ok(phonemes)
    }

    /// Transcribe a word, keeping one segment per resolved position.
    ///
    /// A digraph yields a single segment covering two characters.
    pub fn transcribe_segments(&self, word: &str) -> Result<Vec<Segment>, TranscribeError> {
        let mut segments = Vec::new();
        self.scan(word, |segment| segments.push(segment))?;
        Ok(segments)
    }

    /// Transcribe a batch of words. A failing word does not stop the batch.
    pub fn transcribe_all<'w, I>(&self, words: I) -> Vec<Result<String, TranscribeError>>
    where
        I: IntoIterator<Item = &'w str>,
    {
        words.into_iter().map(|w| self.transcribe(w)).collect()
    }

    /// Walk the word position by position, emitting a segment for each
    /// resolved position and stopping at the first failure.
    ///
    /// A position absorbed by the previous digraph is skipped without a
    /// grapheme check.
    fn scan<F>(&self, word: &str, mut emit: F) -> Result<(), TranscribeError>
    where
        F: FnMut(Segment),
    {
        let singles = window(word, Width::Single);
        let doubles = window(word, Width::Double);
        let graphemes = self.table.graphemes();
        let mut skip_next = false;

        for position in 0..singles.len() {
            if skip_next {
                skip_next = false;
                continue;
            }

            let single = &singles[position];
            if !graphemes.contains(&single.center) {
                return Err(TranscribeError::UnknownGrapheme {
                    word: word.to_owned(),
                    grapheme: single.center.clone(),
                    position,
                });
            }

            let double = &doubles[position];
            let Some(resolution) = resolve_position(self.table, single, double) else {
                return Err(TranscribeError::UnresolvedChunk {
                    word: word.to_owned(),
                    chunk: single.clone(),
                    position,
                });
            };

            let grapheme = if resolution.consumed_two {
                double.center.clone()
            } else {
                single.center.clone()
            };
            emit(Segment {
                position,
                grapheme,
                phonemes: resolution.phonemes().to_owned(),
                rule: resolution.rule.index(),
                consumed_two: resolution.consumed_two,
            });
            skip_next = resolution.consumed_two;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::prepare;
    use gtp_core::{Rule, RuleSet, Subset};

    fn table(graphemes: &str, rules: Vec<Rule>) -> RuleTable {
        prepare(&RuleSet {
            graphemes: graphemes.into(),
            subsets: vec![],
            rules,
        })
        .unwrap()
    }

    fn abc() -> RuleTable {
        table(
            "a b c",
            vec![Rule::new("a", "a"), Rule::new("b", "b"), Rule::new("c", "k")],
        )
    }

    #[test]
    fn transcribes_single_characters() {
        let t = abc();
        assert_eq!(t.transcriber().transcribe("cab").unwrap(), "kab");
    }

    #[test]
    fn empty_word() {
        let t = abc();
        assert_eq!(t.transcriber().transcribe("").unwrap(), "");
        assert!(t.transcriber().transcribe_segments("").unwrap().is_empty());
    }

    #[test]
    fn unknown_grapheme_fails_without_partial_result() {
        let t = abc();
        let err = t.transcriber().transcribe("abx").unwrap_err();
        assert_eq!(
            err,
            TranscribeError::UnknownGrapheme {
                word: "abx".into(),
                grapheme: "x".into(),
                position: 2,
            }
        );
        assert_eq!(err.word(), "abx");
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn unresolved_chunk() {
        let t = table("a z", vec![Rule::new("a", "a").after("a"), Rule::new("z", "z")]);
        let err = t.transcriber().transcribe("za").unwrap_err();
        assert_eq!(
            err,
            TranscribeError::UnresolvedChunk {
                word: "za".into(),
                chunk: Chunk::new('z', "a", '$'),
                position: 1,
            }
        );
        assert!(err.to_string().contains("{z,a,$}"));
    }

    #[test]
    fn digraph_counts_once() {
        let t = table(
            "u e s",
            vec![
                Rule::new("u", "u"),
                Rule::new("e", "e"),
                Rule::new("s", "s"),
                Rule::new("ue", "we"),
            ],
        );
        let tr = t.transcriber();
        assert_eq!(tr.transcribe("sues").unwrap(), "swes");
        let segments = tr.transcribe_segments("sues").unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].grapheme, "ue");
        assert_eq!(segments[1].position, 1);
        assert!(segments[1].consumed_two);
        assert_eq!(segments[2].position, 3);
        assert_eq!(segments[1].rule, 3);
    }

    #[test]
    fn absorbed_position_is_not_grapheme_checked() {
        // `h` alone is not legal, but `ch` as a digraph covers it.
        let t = table("c a", vec![Rule::new("ch", "tʃ"), Rule::new("a", "a")]);
        assert_eq!(t.transcriber().transcribe("cha").unwrap(), "tʃa");
        assert!(matches!(
            t.transcriber().transcribe("ha"),
            Err(TranscribeError::UnknownGrapheme { position: 0, .. })
        ));
    }

    #[test]
    fn absorbed_character_conditions_the_next_position() {
        let t = table(
            "c a",
            vec![
                Rule::new("ch", "tʃ"),
                Rule::new("a", "A").after("h"),
                Rule::new("a", "a"),
            ],
        );
        assert_eq!(t.transcriber().transcribe("cha").unwrap(), "tʃA");
        assert_eq!(t.transcriber().transcribe("chaa").unwrap(), "tʃAa");
    }

    #[test]
    fn single_character_word_uses_boundary_rules() {
        let t = table(
            "y",
            vec![Rule::new("y", "i").before("$"), Rule::new("y", "ʝ")],
        );
        assert_eq!(t.transcriber().transcribe("y").unwrap(), "i");
        assert_eq!(t.transcriber().transcribe("yy").unwrap(), "ʝi");
    }

    #[test]
    fn batch_continues_after_failure() {
        let t = abc();
        let results = t.transcriber().transcribe_all(["ab", "ax", "cc"]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_deref(), Ok("ab"));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_deref(), Ok("kk"));
    }

    #[test]
    fn subsets_resolve_through_transcription() {
        let set = RuleSet {
            graphemes: "c a e i o".into(),
            subsets: vec![Subset::new("FV", "e i")],
            rules: vec![
                Rule::new("c", "θ").before("FV"),
                Rule::new("c", "k"),
                Rule::new("a", "a"),
                Rule::new("e", "e"),
                Rule::new("i", "i"),
                Rule::new("o", "o"),
            ],
        };
        let t = prepare(&set).unwrap();
        assert_eq!(t.transcriber().transcribe("cica").unwrap(), "θika");
        assert_eq!(t.transcriber().transcribe("coce").unwrap(), "koθe");
    }
}
