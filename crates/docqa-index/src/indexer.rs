//! Ingestion service.

use docqa_chunker::SentenceChunker;
use docqa_core::{ChunkConfig, ChunkRecord, Chunker, Error, Result};
use docqa_extract::ExtractorRegistry;
use docqa_store::IndexStore;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of ingesting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Source name recorded in metadata
    pub source: String,
    /// Chunks added to the index
    pub chunk_count: usize,
    /// Words in the cleaned text
    pub word_count: usize,
}

/// Runs documents through extraction, chunking and storage.
pub struct DocumentIndexer {
    extractors: Arc<ExtractorRegistry>,
    chunker: Arc<dyn Chunker>,
    store: Arc<IndexStore>,
    config: ChunkConfig,
}

impl DocumentIndexer {
    /// Indexer with the default extractors and the sentence chunker.
    pub fn new(store: Arc<IndexStore>, config: ChunkConfig) -> Self {
        Self::with_components(
            Arc::new(ExtractorRegistry::with_defaults()),
            Arc::new(SentenceChunker::new()),
            store,
            config,
        )
    }

    pub fn with_components(
        extractors: Arc<ExtractorRegistry>,
        chunker: Arc<dyn Chunker>,
        store: Arc<IndexStore>,
        config: ChunkConfig,
    ) -> Self {
        Self {
            extractors,
            chunker,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    /// Ingest a PDF, TXT or DOCX file.
    ///
    /// Unsupported extensions and documents with no text fail before the
    /// index is touched.
    pub async fn index_file(&self, path: &Path) -> Result<IngestReport> {
        let source = source_name(path);
        debug!("Indexing {:?} as {}", path, source);

        let text = self.extractors.load_and_clean(path).await?;
        let report = self.index_text(&source, &text).await?;

        info!("Indexed {:?} ({} chunks)", path, report.chunk_count);
        Ok(report)
    }

    /// Chunk already-cleaned text and add it under `source`.
    pub async fn index_text(&self, source: &str, text: &str) -> Result<IngestReport> {
        let chunks = self.chunker.chunk(text, &self.config).await?;

        let chunks: Vec<_> = chunks
            .into_iter()
            .filter(|c| !c.content.trim().is_empty())
            .collect();
        if chunks.is_empty() {
            return Err(Error::Other(format!("no text to index for {source}")));
        }

        let oversized = chunks.iter().filter(|c| c.oversized).count();
        if oversized > 0 {
            debug!("{}: {} chunks hold a single oversized sentence", source, oversized);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let records: Vec<ChunkRecord> = chunks
            .iter()
            .enumerate()
            .map(|(idx, c)| ChunkRecord::new(c.content.clone(), source, idx as u32))
            .collect();

        let chunk_count = self.store.add(&texts, records).await?;

        Ok(IngestReport {
            source: source.to_string(),
            chunk_count,
            word_count: docqa_chunker::word_count(text),
        })
    }
}

/// File name of `path`, falling back to the full path.
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::{ExtractError, Retriever};
    use docqa_embed::HashEmbedder;
    use docqa_store::IndexPaths;
    use tempfile::tempdir;

    async fn indexer_in(dir: &Path, chunk_size: usize) -> DocumentIndexer {
        let store = IndexStore::open(
            IndexPaths::in_dir(dir.join("index")),
            Arc::new(HashEmbedder::new()),
        )
        .await;
        DocumentIndexer::new(
            Arc::new(store),
            ChunkConfig {
                chunk_size,
                sentence_aware: true,
            },
        )
    }

    #[test]
    fn test_source_name() {
        assert_eq!(source_name(Path::new("/docs/report.pdf")), "report.pdf");
        assert_eq!(source_name(Path::new("notes.txt")), "notes.txt");
    }

    #[tokio::test]
    async fn test_index_txt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("penguins.txt");
        std::fs::write(
            &path,
            "Penguins live in the Southern Hemisphere.\n\nThey cannot fly. They swim well.",
        )
        .unwrap();
        let indexer = indexer_in(dir.path(), 6).await;

        let report = indexer.index_file(&path).await.unwrap();

        assert_eq!(report.source, "penguins.txt");
        assert_eq!(report.word_count, 12);
        assert_eq!(report.chunk_count, 2);

        let records = indexer.store().records().await;
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == "penguins.txt"));
        let indices: Vec<u32> = records.iter().map(|r| r.chunk_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(records[0].text, "Penguins live in the Southern Hemisphere.");
        assert_eq!(records[1].text, "They cannot fly. They swim well.");

        let hits = indexer.store().search("Southern Hemisphere penguins", 1).await.unwrap();
        assert_eq!(hits[0].record.chunk_index, 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_leaves_index_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slides.pptx");
        std::fs::write(&path, "Some slide text.").unwrap();
        let indexer = indexer_in(dir.path(), 500).await;

        let result = indexer.index_file(&path).await;

        assert!(matches!(
            result,
            Err(Error::Extraction(ExtractError::UnsupportedType(ref ext))) if ext == ".pptx"
        ));
        assert!(indexer.store().is_empty().await);
        assert!(!indexer.store().paths().metadata.exists());
    }

    #[tokio::test]
    async fn test_empty_document_leaves_index_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "\n\n   \n").unwrap();
        let indexer = indexer_in(dir.path(), 500).await;

        let result = indexer.index_file(&path).await;

        assert!(matches!(
            result,
            Err(Error::Extraction(ExtractError::Empty(_)))
        ));
        assert!(indexer.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_index_text_appends_across_documents() {
        let dir = tempdir().unwrap();
        let indexer = indexer_in(dir.path(), 500).await;

        indexer.index_text("a.txt", "Alpha document text.").await.unwrap();
        let report = indexer.index_text("b.txt", "Beta document text.").await.unwrap();

        assert_eq!(report.chunk_count, 1);
        let sources = indexer.store().sources().await;
        assert_eq!(sources.len(), 2);
        assert_eq!(indexer.store().len().await, 2);
    }

    #[tokio::test]
    async fn test_index_text_rejects_blank_text() {
        let dir = tempdir().unwrap();
        let indexer = indexer_in(dir.path(), 500).await;

        assert!(indexer.index_text("blank.txt", "   ").await.is_err());
        assert!(indexer.store().is_empty().await);
    }
}
