//! The persisted index store.

use async_trait::async_trait;
use docqa_core::{
    ChunkRecord, EmbedError, Embedder, Retriever, SearchHit, StoreError, StoreStats,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::flat::FlatL2Index;
use crate::persist::{self, IndexPaths};

/// In-memory state: vectors and records, positionally aligned.
struct IndexState {
    index: FlatL2Index,
    records: Vec<ChunkRecord>,
}

impl IndexState {
    fn empty(dimension: usize) -> Self {
        Self {
            index: FlatL2Index::new(dimension),
            records: Vec::new(),
        }
    }
}

/// Embedding index plus metadata, persisted to two coupled artifacts.
///
/// Writers hold the write lock across embed, append and persist, so concurrent
/// `add` calls are applied one at a time.
pub struct IndexStore {
    paths: IndexPaths,
    embedder: Arc<dyn Embedder>,
    state: RwLock<IndexState>,
}

impl IndexStore {
    /// Open the store at `paths`, loading persisted artifacts when both are present.
    ///
    /// Unreadable or inconsistent artifacts are discarded with a warning and the
    /// store starts empty.
    pub async fn open(paths: IndexPaths, embedder: Arc<dyn Embedder>) -> Self {
        let dimension = embedder.dimension();

        let state = match persist::load(&paths, dimension).await {
            Ok(Some((index, records))) => {
                info!("Loaded {} indexed chunks from {:?}", records.len(), paths.metadata);
                IndexState { index, records }
            }
            Ok(None) => {
                debug!("No persisted index at {:?}, starting empty", paths.vectors);
                IndexState::empty(dimension)
            }
            Err(e) => {
                warn!(
                    "Discarding unreadable index at {:?} / {:?}: {}",
                    paths.vectors, paths.metadata, e
                );
                IndexState::empty(dimension)
            }
        };

        Self {
            paths,
            embedder,
            state: RwLock::new(state),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Embed `texts` and append them with their `records`, then persist.
    ///
    /// Returns the number of entries added. If persisting fails the in-memory
    /// index is rolled back, the previous artifacts are rewritten, and the
    /// error is returned.
    pub async fn add(&self, texts: &[&str], records: Vec<ChunkRecord>) -> Result<usize, StoreError> {
        if texts.len() != records.len() {
            return Err(StoreError::LengthMismatch {
                texts: texts.len(),
                records: records.len(),
            });
        }
        if texts.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.write().await;

        let vectors = self.embedder.embed_text(texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbedError::Inference(format!(
                "{} returned {} vectors for {} texts",
                self.embedder.model_name(),
                vectors.len(),
                texts.len()
            ))
            .into());
        }

        let previous = state.records.len();
        state.index.add(&vectors)?;
        state.records.extend(records);

        if let Err(e) = persist::save(&self.paths, &state.index, &state.records).await {
            state.index.truncate(previous);
            state.records.truncate(previous);

            // The vector file may already hold the new entries; put the
            // previous state back so it still matches the metadata on disk.
            if let Err(restore) = persist::save(&self.paths, &state.index, &state.records).await {
                warn!("Failed to restore index artifacts after failed add: {}", restore);
            }
            return Err(e);
        }

        debug!("Added {} entries (total {})", texts.len(), state.records.len());
        Ok(texts.len())
    }

    /// Write the current index and metadata to disk.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let state = self.state.read().await;
        persist::save(&self.paths, &state.index, &state.records).await
    }

    /// Delete both artifacts and clear the in-memory index.
    pub async fn reset(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        persist::remove(&self.paths).await?;
        state.index.clear();
        state.records.clear();
        info!("Index reset");
        Ok(())
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Embedding dimension of the index.
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    /// Snapshot of all metadata records in index order.
    pub async fn records(&self) -> Vec<ChunkRecord> {
        self.state.read().await.records.clone()
    }

    /// Chunk count per source document.
    pub async fn sources(&self) -> BTreeMap<String, usize> {
        let state = self.state.read().await;
        let mut sources = BTreeMap::new();
        for record in &state.records {
            *sources.entry(record.source.clone()).or_insert(0) += 1;
        }
        sources
    }

    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        let total_documents = state
            .records
            .iter()
            .map(|r| r.source.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        StoreStats {
            total_chunks: state.records.len() as u64,
            total_documents: total_documents as u64,
            dimension: state.index.dimension(),
            index_size_bytes: persist::disk_size(&self.paths).await,
            last_updated: state.records.iter().filter_map(|r| r.indexed_at).max(),
        }
    }
}

#[async_trait]
impl Retriever for IndexStore {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, StoreError> {
        let state = self.state.read().await;
        if state.index.is_empty() || state.records.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_query(query).await?;
        let hits = state.index.search(&query_vector, top_k)?;
        Ok(resolve_hits(&hits, &state.records))
    }
}

/// Pair index hits with their records, skipping positions with no record.
fn resolve_hits(hits: &[(usize, f32)], records: &[ChunkRecord]) -> Vec<SearchHit> {
    hits.iter()
        .filter_map(|&(position, distance)| match records.get(position) {
            Some(record) => Some(SearchHit {
                text: record.text.clone(),
                record: record.clone(),
                distance,
            }),
            None => {
                debug!("Skipping hit at position {} beyond {} records", position, records.len());
                None
            }
        })
        .collect()
}
