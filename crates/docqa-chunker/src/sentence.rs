//! Sentence-aware chunking.
//!
//! Sentences are packed greedily into a buffer until the next one would push the
//! buffer past `chunk_size` words. A sentence that is longer than `chunk_size` on
//! its own is never split, so the size is a soft bound in this mode.

use async_trait::async_trait;
use docqa_core::{ChunkConfig, ChunkError, ChunkOutput, Chunker};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::window::split_windows;
use crate::word_count;

/// Chunker that keeps sentence boundaries intact.
pub struct SentenceChunker;

impl SentenceChunker {
    /// Create a new sentence chunker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Chunker for SentenceChunker {
    fn name(&self) -> &str {
        "sentence"
    }

    async fn chunk(&self, text: &str, config: &ChunkConfig) -> Result<Vec<ChunkOutput>, ChunkError> {
        let size = config.chunk_size;
        if size == 0 {
            return Err(ChunkError::InvalidConfig(
                "chunk_size must be > 0".to_string(),
            ));
        }

        let total_words = word_count(text);
        if total_words <= size {
            return Ok(vec![ChunkOutput::new(text.to_string())]);
        }

        let sentences: Vec<&str> = text
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if !config.sentence_aware || sentences.is_empty() {
            debug!("Falling back to word windows for {} words", total_words);
            let words: Vec<&str> = text.split_whitespace().collect();
            return Ok(split_windows(&words, size));
        }

        let chunks = pack_sentences(&sentences, size);
        debug!(
            "Packed {} sentences ({} words) into {} chunks",
            sentences.len(),
            total_words,
            chunks.len()
        );
        Ok(chunks)
    }
}

/// Greedily pack sentences into chunks of at most `size` words.
fn pack_sentences(sentences: &[&str], size: usize) -> Vec<ChunkOutput> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_words = 0usize;

    for sentence in sentences {
        let words = word_count(sentence);
        if buffer_words + words > size {
            if !buffer.is_empty() {
                chunks.push(finish(std::mem::take(&mut buffer), size));
            }
            buffer.push_str(sentence);
            buffer_words = words;
        } else {
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(sentence);
            buffer_words += words;
        }
    }

    if !buffer.is_empty() {
        chunks.push(finish(buffer, size));
    }

    chunks
}

fn finish(content: String, size: usize) -> ChunkOutput {
    let mut output = ChunkOutput::new(content);
    output.oversized = output.word_count > size;
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize) -> ChunkConfig {
        ChunkConfig {
            chunk_size,
            sentence_aware: true,
        }
    }

    /// A capitalized sentence of exactly `words` words ending with a period.
    ///
    /// The capital matters: a period followed by a lowercase word is not a
    /// sentence boundary.
    fn sentence(tag: &str, words: usize) -> String {
        let mut parts: Vec<String> = (0..words).map(|i| format!("{tag}{i}")).collect();
        if let Some(first) = parts.first_mut() {
            let mut chars = first.chars();
            if let Some(c) = chars.next() {
                *first = c.to_uppercase().chain(chars).collect();
            }
        }
        if let Some(last) = parts.last_mut() {
            last.push('.');
        }
        parts.join(" ")
    }

    #[tokio::test]
    async fn test_text_within_budget_is_single_chunk() {
        let chunker = SentenceChunker::new();
        let text = "First sentence here. Second one!  Third?";

        let chunks = chunker.chunk(text, &config(500)).await.unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
    }

    #[tokio::test]
    async fn test_text_exactly_at_budget_is_single_chunk() {
        let chunker = SentenceChunker::new();
        let text = sentence("w", 20);

        let chunks = chunker.chunk(&text, &config(20)).await.unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
    }

    #[tokio::test]
    async fn test_empty_text_is_single_chunk() {
        let chunker = SentenceChunker::new();
        let chunks = chunker.chunk("", &config(10)).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "");
    }

    #[tokio::test]
    async fn test_1200_words_make_three_chunks() {
        let chunker = SentenceChunker::new();
        let text = (0..120)
            .map(|i| sentence(&format!("s{i}w"), 10))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(word_count(&text), 1200);

        let chunks = chunker.chunk(&text, &config(500)).await.unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].word_count, 500);
        assert_eq!(chunks[1].word_count, 500);
        assert_eq!(chunks[2].word_count, 200);
        // Boundaries fall between sentences
        for chunk in &chunks {
            assert!(chunk.content.ends_with('.'));
            assert!(!chunk.oversized);
        }
    }

    #[tokio::test]
    async fn test_sentence_that_would_overflow_starts_new_chunk() {
        let chunker = SentenceChunker::new();
        let text = format!(
            "{} {} {}",
            sentence("a", 6),
            sentence("b", 6),
            sentence("c", 3)
        );

        let chunks = chunker.chunk(&text, &config(10)).await.unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, sentence("a", 6));
        assert_eq!(chunks[1].content, format!("{} {}", sentence("b", 6), sentence("c", 3)));
    }

    #[tokio::test]
    async fn test_oversized_sentence_is_kept_whole() {
        let chunker = SentenceChunker::new();
        let long = sentence("long", 25);
        let text = format!("{} {} {}", sentence("a", 4), long, sentence("b", 4));

        let chunks = chunker.chunk(&text, &config(10)).await.unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].content, long);
        assert_eq!(chunks[1].word_count, 25);
        assert!(chunks[1].oversized);
        assert!(!chunks[0].oversized);
        assert!(!chunks[2].oversized);
    }

    #[tokio::test]
    async fn test_chunks_respect_budget_except_oversized() {
        let chunker = SentenceChunker::new();
        let lengths = [3usize, 7, 12, 2, 9, 30, 1, 5, 8, 4, 11, 6];
        let text = lengths
            .iter()
            .enumerate()
            .map(|(i, n)| sentence(&format!("x{i}_"), *n))
            .collect::<Vec<_>>()
            .join(" ");

        let chunks = chunker.chunk(&text, &config(15)).await.unwrap();

        for chunk in &chunks {
            if chunk.oversized {
                assert!(chunk.word_count > 15);
                assert!(!chunk.content.trim_end_matches('.').contains('.'));
            } else {
                assert!(chunk.word_count <= 15, "chunk too big: {}", chunk.word_count);
            }
        }
        let total: usize = chunks.iter().map(|c| c.word_count).sum();
        assert_eq!(total, lengths.iter().sum::<usize>());
    }

    #[tokio::test]
    async fn test_disabled_sentence_mode_uses_word_windows() {
        let chunker = SentenceChunker::new();
        let text = format!("{} {}", sentence("a", 8), sentence("b", 8));
        let config = ChunkConfig {
            chunk_size: 10,
            sentence_aware: false,
        };

        let chunks = chunker.chunk(&text, &config).await.unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].word_count, 10);
        assert_eq!(chunks[1].word_count, 6);
    }

    #[tokio::test]
    async fn test_zero_chunk_size_is_rejected() {
        let chunker = SentenceChunker::new();
        let result = chunker.chunk("some text", &config(0)).await;
        assert!(matches!(result, Err(ChunkError::InvalidConfig(_))));
    }

    #[test]
    fn test_pack_sentences_directly() {
        let chunks = pack_sentences(&["a b c.", "d e.", "f g h i."], 5);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "a b c. d e.");
        assert_eq!(chunks[1].content, "f g h i.");
    }

    #[test]
    fn test_chunker_name() {
        assert_eq!(SentenceChunker::default().name(), "sentence");
    }
}
