//! Core traits for docqa components.
//!
//! - [`ContentExtractor`]: Extract text from files
//! - [`Chunker`]: Split text into chunks
//! - [`Embedder`]: Generate vector embeddings
//! - [`Retriever`]: Nearest-neighbor retrieval of stored chunks
//! - [`AnswerExtractor`]: Extract an answer span from a context
//!
//! The embedding and answering models are capability boundaries: they are passed
//! into the store and aggregator as trait objects so deterministic stand-ins can
//! replace them in tests.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{AnswerError, ChunkError, EmbedError, ExtractError, StoreError};
use crate::types::{ChunkConfig, ChunkOutput, DocumentFormat, ExtractedAnswer, ExtractedContent, SearchHit};

// ============================================================================
// Content Extraction
// ============================================================================

/// Trait for extracting text from files.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// The document format this extractor reads.
    fn format(&self) -> DocumentFormat;

    /// Check if this extractor handles the given file.
    fn can_extract(&self, path: &Path) -> bool {
        DocumentFormat::from_path(path).is_ok_and(|format| format == self.format())
    }

    /// Extract content from a file.
    async fn extract(&self, path: &Path) -> Result<ExtractedContent, ExtractError>;
}

// ============================================================================
// Chunking
// ============================================================================

/// Trait for splitting cleaned text into chunks.
#[async_trait]
pub trait Chunker: Send + Sync {
    /// Name of this chunking strategy.
    fn name(&self) -> &str;

    /// Chunk the text.
    async fn chunk(&self, text: &str, config: &ChunkConfig) -> Result<Vec<ChunkOutput>, ChunkError>;
}

// ============================================================================
// Embedding
// ============================================================================

/// Trait for generating embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input in input order.
    async fn embed_text(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a query.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let results = self.embed_text(&[query]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Inference("empty embedding result".to_string()))
    }
}

// ============================================================================
// Retrieval
// ============================================================================

/// Trait for retrieving the chunks nearest to a query.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `top_k` hits ordered by ascending distance.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, StoreError>;
}

// ============================================================================
// Extractive answering
// ============================================================================

/// Trait for extractive question answering over a single context.
#[async_trait]
pub trait AnswerExtractor: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Extract an answer span for `question` from `context`.
    async fn extract(&self, question: &str, context: &str) -> Result<ExtractedAnswer, AnswerError>;
}
