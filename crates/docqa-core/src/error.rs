//! Error types for docqa.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docqa operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Content extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Chunking failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Index store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Content extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Failed(String),

    #[error("no text extracted from {}", .0.display())]
    Empty(PathBuf),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Extractive answering errors, recorded per candidate rather than propagated.
#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("context too long: {words} words, max {max}")]
    ContextTooLong { words: usize, max: usize },
}

/// Index store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt index artifact: {0}")]
    Corrupt(String),

    #[error("length mismatch: {texts} texts but {records} metadata records")]
    LengthMismatch { texts: usize, records: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedError),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for docqa operations.
pub type Result<T> = std::result::Result<T, Error>;
