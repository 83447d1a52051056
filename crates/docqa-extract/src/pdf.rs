//! PDF content extractor.
//!
//! Uses pdf-extract for the text layer. Scanned PDFs without a text layer yield
//! an empty string, which the registry reports as "no text extracted".

use async_trait::async_trait;
use docqa_core::{ContentExtractor, DocumentFormat, ExtractError, ExtractedContent};
use std::path::Path;
use tracing::debug;

/// Extractor for PDF files.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedContent, ExtractError> {
        debug!("Extracting PDF: {:?}", path);

        let bytes = tokio::fs::read(path).await?;

        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| ExtractError::Failed(format!("Task join error: {e}")))?
            .map_err(|e| ExtractError::Parse(format!("PDF extraction failed: {e}")))?;

        let page_count = estimate_page_count(&text);
        debug!("Extracted {} bytes from {} PDF pages", text.len(), page_count);

        Ok(ExtractedContent {
            text,
            format: DocumentFormat::Pdf,
            page_count: Some(page_count),
        })
    }
}

/// Extract text from PDF bytes using pdf-extract.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())
}

/// pdf-extract separates pages with form feeds.
fn estimate_page_count(text: &str) -> u32 {
    let breaks = text.matches('\u{c}').count() as u32;
    if text.trim_end_matches('\u{c}').is_empty() {
        0
    } else {
        breaks.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_estimate_page_count() {
        assert_eq!(estimate_page_count(""), 0);
        assert_eq!(estimate_page_count("single page, no break"), 1);
        assert_eq!(estimate_page_count("one\u{c}two\u{c}three\u{c}"), 3);
    }

    #[tokio::test]
    async fn test_extract_invalid_pdf_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let result = PdfExtractor::new().extract(&path).await;

        assert!(matches!(
            result,
            Err(ExtractError::Parse(_) | ExtractError::Failed(_))
        ));
    }

    #[test]
    fn test_can_extract() {
        let extractor = PdfExtractor::new();
        assert!(extractor.can_extract(Path::new("book.PDF")));
        assert!(!extractor.can_extract(Path::new("book.txt")));
    }
}
