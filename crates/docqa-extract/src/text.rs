//! Plain text extractor.

use async_trait::async_trait;
use docqa_core::{ContentExtractor, DocumentFormat, ExtractError, ExtractedContent};
use std::path::Path;
use tokio::fs;

/// Extractor for `.txt` files.
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for TextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Txt
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedContent, ExtractError> {
        let bytes = fs::read(path).await?;
        // Undecodable bytes are replaced rather than rejected
        let text = String::from_utf8_lossy(&bytes).into_owned();

        Ok(ExtractedContent {
            text,
            format: DocumentFormat::Txt,
            page_count: None,
        })
    }
}
