//! Document ingestion for docqa.
//!
//! This crate runs a file through the ingestion pipeline:
//! extraction → cleaning → chunking → embedding → storage.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_index::DocumentIndexer;
//!
//! let indexer = DocumentIndexer::new(store.clone(), ChunkConfig::default());
//! let report = indexer.index_file(Path::new("papers/attention.pdf")).await?;
//! println!("{}: {} chunks", report.source, report.chunk_count);
//! ```

pub mod indexer;

pub use indexer::{DocumentIndexer, IngestReport};
