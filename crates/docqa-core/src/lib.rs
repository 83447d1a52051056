//! # docqa-core
//!
//! Core types and traits for docqa, a single-user document question-answering tool.
//!
//! This crate provides the foundational abstractions used throughout docqa:
//!
//! - **Content Extraction**: [`ContentExtractor`] trait for reading text out of PDF/TXT/DOCX files
//! - **Document Chunking**: [`Chunker`] trait for splitting cleaned text into retrievable chunks
//! - **Embedding Generation**: [`Embedder`] trait for converting text to vectors
//! - **Retrieval**: [`Retriever`] trait for nearest-neighbor lookup of stored chunks
//! - **Extractive Answering**: [`AnswerExtractor`] trait for pulling an answer span out of a context
//!
//! ## Architecture
//!
//! ```text
//! File -> ContentExtractor -> clean -> Chunker -> Embedder -> IndexStore
//!                                                               |
//!                         Question -> Retriever (top-k) -> AnswerExtractor -> AnswerResult
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ChunkRecord`] | Metadata stored alongside every embedding |
//! | [`SearchHit`] | A retrieved chunk with its L2 distance |
//! | [`ExtractedAnswer`] | A span answer with confidence score |
//! | [`Candidate`] | One per-context answer produced during a query |
//! | [`AnswerResult`] | Best candidate plus all candidates in retrieval order |
//!
//! ## Related Crates
//!
//! - `docqa-extract`: Content extraction implementations
//! - `docqa-chunker`: Chunking strategies
//! - `docqa-embed`: Offline embedding implementation
//! - `docqa-store`: Flat L2 index with two-artifact persistence
//! - `docqa-index`: Document ingestion pipeline
//! - `docqa-query`: Answer aggregation and the default reader

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AnswerError, ChunkError, EmbedError, Error, ExtractError, Result, StoreError};
pub use traits::*;
pub use types::*;
