//! Core types for docqa.
//!
//! ## Documents
//! - [`DocumentFormat`]: Supported input formats
//! - [`ExtractedContent`]: Raw text pulled out of a document
//!
//! ## Chunks
//! - [`ChunkConfig`]: Chunking behaviour
//! - [`ChunkOutput`]: One produced chunk
//! - [`ChunkRecord`]: Metadata persisted per embedding
//!
//! ## Retrieval and answering
//! - [`SearchHit`]: A retrieved chunk with its distance
//! - [`ExtractedAnswer`]: Output of an extractive answerer
//! - [`Candidate`] / [`AnswerResult`]: Aggregated query output
//! - [`StoreStats`]: Index statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExtractError;

// ============================================================================
// Documents
// ============================================================================

/// Document formats accepted by the ingestion entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Txt,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" => Ok(Self::Txt),
            "docx" => Ok(Self::Docx),
            _ => Err(ExtractError::UnsupportedType(format!(".{ext}"))),
        }
    }

    /// Canonical lowercase extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Docx => "docx",
        }
    }
}

/// Content extracted from a file, before cleaning.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Raw text
    pub text: String,
    /// Source format
    pub format: DocumentFormat,
    /// Page count (PDF only)
    pub page_count: Option<u32>,
}

// ============================================================================
// Chunking
// ============================================================================

/// Configuration for chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Soft upper bound on words per chunk
    pub chunk_size: usize,
    /// Pack whole sentences; when false, split into fixed word windows
    pub sentence_aware: bool,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            sentence_aware: true,
        }
    }
}

/// Output from a chunker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutput {
    /// Chunk text
    pub content: String,
    /// Whitespace-delimited word count
    pub word_count: usize,
    /// A single sentence longer than the chunk size, kept whole
    pub oversized: bool,
}

impl ChunkOutput {
    pub fn new(content: String) -> Self {
        let word_count = content.split_whitespace().count();
        Self {
            content,
            word_count,
            oversized: false,
        }
    }
}

/// Metadata persisted alongside each embedding, positionally aligned with the vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk text
    pub text: String,
    /// Originating document (file name)
    pub source: String,
    /// Position of the chunk within its document
    #[serde(default)]
    pub chunk_index: u32,
    /// When the chunk was added
    #[serde(default)]
    pub indexed_at: Option<DateTime<Utc>>,
}

impl ChunkRecord {
    pub fn new(text: impl Into<String>, source: impl Into<String>, chunk_index: u32) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            chunk_index,
            indexed_at: Some(Utc::now()),
        }
    }
}

// ============================================================================
// Retrieval
// ============================================================================

/// A nearest-neighbor hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Chunk text
    pub text: String,
    /// Metadata record
    pub record: ChunkRecord,
    /// Squared L2 distance (lower is more similar)
    pub distance: f32,
}

/// Index store statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of stored chunks
    pub total_chunks: u64,
    /// Number of distinct sources
    pub total_documents: u64,
    /// Embedding dimension
    pub dimension: usize,
    /// Combined size of both artifacts on disk
    pub index_size_bytes: u64,
    /// Most recent `indexed_at` across records
    pub last_updated: Option<DateTime<Utc>>,
}

// ============================================================================
// Answering
// ============================================================================

/// An answer span extracted from a single context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedAnswer {
    /// Verbatim answer text
    pub answer: String,
    /// Confidence, higher is better
    pub score: f32,
    /// Byte offset of the span start in the context
    pub start: usize,
    /// Byte offset of the span end in the context
    pub end: usize,
}

/// One per-context answer produced during a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Extracted answer text (empty on failure)
    pub answer: String,
    /// Confidence score (0.0 on failure)
    pub score: f32,
    /// Context the answer was extracted from
    pub context: String,
    /// Metadata of the originating chunk
    pub record: ChunkRecord,
    /// Retrieval distance of the context
    pub distance: f32,
    /// Diagnostic when extraction failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated answer for a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Highest scoring candidate (first wins on ties)
    pub best_answer: Option<Candidate>,
    /// All candidates in retrieval order
    pub all_answers: Vec<Candidate>,
    /// Informational message when there is nothing to answer from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnswerResult {
    /// Message reported when the index holds no documents.
    pub const NO_DOCUMENTS: &'static str = "No documents in the index.";

    /// Result for an empty index.
    #[must_use]
    pub fn no_documents() -> Self {
        Self {
            best_answer: None,
            all_answers: Vec::new(),
            message: Some(Self::NO_DOCUMENTS.to_string()),
        }
    }
}
