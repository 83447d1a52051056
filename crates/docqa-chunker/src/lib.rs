//! Document chunking strategies for docqa.
//!
//! [`SentenceChunker`] is the default: it packs whole sentences greedily up to the
//! configured word budget. [`WordWindowChunker`] splits into fixed, non-overlapping
//! word windows and is used when sentence-aware mode is disabled or no sentence
//! boundaries can be found.

pub mod sentence;
pub mod window;

pub use sentence::SentenceChunker;
pub use window::WordWindowChunker;

/// Count whitespace-delimited words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
