//! # docqa-embed
//!
//! Embedding generation for docqa.
//!
//! The store and the query path only see the [`Embedder`](docqa_core::Embedder)
//! trait, so any model can be plugged in. This crate ships [`HashEmbedder`], an
//! offline, deterministic embedder that needs no model download:
//!
//! | Property | Value |
//! |----------|-------|
//! | Model | `hashing-bow` |
//! | Dimension | 384 (configurable) |
//! | Method | signed feature hashing of lowercase word tokens, L2-normalized |
//!
//! ```rust,ignore
//! use docqa_embed::HashEmbedder;
//! use docqa_core::Embedder;
//!
//! let embedder = HashEmbedder::new();
//! let vectors = embedder.embed_text(&["Hello world", "Machine learning"]).await?;
//! assert_eq!(vectors[0].len(), 384);
//! ```

pub mod hashing;

pub use hashing::HashEmbedder;
