//! Fixed-size word window chunking without overlap.

use async_trait::async_trait;
use docqa_core::{ChunkConfig, ChunkError, ChunkOutput, Chunker};

/// Splits text into consecutive windows of `chunk_size` words.
pub struct WordWindowChunker;

impl WordWindowChunker {
    /// Create a new word window chunker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for WordWindowChunker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Chunker for WordWindowChunker {
    fn name(&self) -> &str {
        "word_window"
    }

    async fn chunk(&self, text: &str, config: &ChunkConfig) -> Result<Vec<ChunkOutput>, ChunkError> {
        if config.chunk_size == 0 {
            return Err(ChunkError::InvalidConfig(
                "chunk_size must be > 0".to_string(),
            ));
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= config.chunk_size {
            return Ok(vec![ChunkOutput::new(text.to_string())]);
        }

        Ok(split_windows(&words, config.chunk_size))
    }
}

/// Join consecutive `size`-word windows.
pub(crate) fn split_windows(words: &[&str], size: usize) -> Vec<ChunkOutput> {
    words
        .chunks(size)
        .map(|window| ChunkOutput::new(window.join(" ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize) -> ChunkConfig {
        ChunkConfig {
            chunk_size,
            sentence_aware: false,
        }
    }

    #[tokio::test]
    async fn test_short_text_is_returned_whole() {
        let chunker = WordWindowChunker::new();
        let text = "  A short   text with odd spacing.  ";

        let chunks = chunker.chunk(text, &config(500)).await.unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
    }

    #[tokio::test]
    async fn test_windows_have_no_overlap() {
        let chunker = WordWindowChunker::new();
        let text = (0..25).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");

        let chunks = chunker.chunk(&text, &config(10)).await.unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].word_count, 10);
        assert_eq!(chunks[1].word_count, 10);
        assert_eq!(chunks[2].word_count, 5);
        assert!(chunks[0].content.starts_with("w0 "));
        assert!(chunks[1].content.starts_with("w10 "));
        assert_eq!(chunks[2].content, "w20 w21 w22 w23 w24");
    }

    #[tokio::test]
    async fn test_zero_chunk_size_is_rejected() {
        let chunker = WordWindowChunker::new();
        let result = chunker.chunk("anything", &config(0)).await;
        assert!(matches!(result, Err(ChunkError::InvalidConfig(_))));
    }

    #[test]
    fn test_chunker_name() {
        assert_eq!(WordWindowChunker::default().name(), "word_window");
    }
}
