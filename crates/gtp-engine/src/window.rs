// Chunk windowing over a sentinel-padded word

use std::iter;

use gtp_core::{Chunk, SENTINEL};

/// Center width of a chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Single,
    Double,
}

impl Width {
    /// Number of characters in a center of this width.
    pub fn chars(self) -> usize {
        match self {
            Width::Single => 1,
            Width::Double => 2,
        }
    }
}

/// Split `word` into overlapping chunks of the given center width.
///
/// The word is padded with [`SENTINEL`] on both ends, so every chunk has a
/// predecessor and a successor. A word of `L` characters yields `L` single
/// chunks and `L - 1` double chunks; the double sequence is then padded with
/// one [`Chunk::terminal`] so both sequences have length `L` and line up
/// position by position. An empty word yields no chunks of either width.
pub fn window(word: &str, width: Width) -> Vec<Chunk> {
    let padded: Vec<char> = iter::once(SENTINEL)
        .chain(word.chars())
        .chain(iter::once(SENTINEL))
        .collect();
    let n = width.chars();
    let word_len = padded.len() - 2;

    let mut chunks: Vec<Chunk> = (1..padded.len().saturating_sub(n))
        .map(|i| {
            Chunk::new(
                padded[i - 1],
                padded[i..i + n].iter().collect::<String>(),
                padded[i + n],
            )
        })
        .collect();

    if width == Width::Double && word_len > 0 {
        chunks.push(Chunk::terminal());
    }
    chunks
}
