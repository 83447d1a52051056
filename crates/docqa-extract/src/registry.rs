//! Extractor registry: routes files to extractors by extension.

use docqa_core::{ContentExtractor, DocumentFormat, ExtractError, ExtractedContent};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::clean::clean_text;
use crate::{DocxExtractor, PdfExtractor, TextExtractor};

/// Registry of content extractors keyed by document format.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with the PDF, TXT and DOCX extractors.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TextExtractor::new());
        registry.register(PdfExtractor::new());
        registry.register(DocxExtractor::new());
        registry
    }

    /// Register an extractor, replacing any previous one for the same format.
    pub fn register<E: ContentExtractor + 'static>(&mut self, extractor: E) {
        self.extractors.insert(extractor.format(), Arc::new(extractor));
    }

    /// Get the extractor for a file, failing on unknown extensions.
    pub fn get_for_file(&self, path: &Path) -> Result<Arc<dyn ContentExtractor>, ExtractError> {
        let format = DocumentFormat::from_path(path)?;
        self.extractors
            .get(&format)
            .cloned()
            .ok_or_else(|| ExtractError::UnsupportedType(format!(".{}", format.extension())))
    }

    /// Extract raw content from a file.
    pub async fn extract(&self, path: &Path) -> Result<ExtractedContent, ExtractError> {
        let extractor = self.get_for_file(path)?;
        extractor.extract(path).await
    }

    /// Extract and clean a file's text; empty results are an error.
    pub async fn load_and_clean(&self, path: &Path) -> Result<String, ExtractError> {
        let content = self.extract(path).await?;
        let text = clean_text(&content.text);
        debug!(
            "Cleaned {:?}: {} -> {} bytes",
            path,
            content.text.len(),
            text.len()
        );
        if text.is_empty() {
            return Err(ExtractError::Empty(path.to_path_buf()));
        }
        Ok(text)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
