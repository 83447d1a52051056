//! Index storage layer for docqa.
//!
//! This crate owns the embedding index and its positionally aligned metadata,
//! and keeps both durable across restarts.
//!
//! # Features
//!
//! - **Flat L2 search**: exact nearest-neighbor search over every stored vector
//! - **Two-artifact persistence**: a binary vector file plus a JSON metadata file,
//!   tied together by a blake3 digest
//! - **Forgiving load**: unreadable or mismatched artifacts degrade to an empty index
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_store::{IndexPaths, IndexStore};
//! use docqa_core::{ChunkRecord, Retriever};
//!
//! let store = IndexStore::open(IndexPaths::in_dir("data/index"), embedder).await;
//!
//! store.add(&["Penguins live in Antarctica."], vec![ChunkRecord::new(
//!     "Penguins live in Antarctica.", "birds.txt", 0,
//! )]).await?;
//!
//! let hits = store.search("where do penguins live", 3).await?;
//! ```

pub mod flat;
pub mod persist;
pub mod store;

pub use flat::FlatL2Index;
pub use persist::IndexPaths;
pub use store::IndexStore;
