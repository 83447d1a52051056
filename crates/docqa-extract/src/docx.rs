//! Word (.docx) content extractor.
//!
//! A .docx file is a ZIP container; the body text lives in `word/document.xml`
//! as `<w:t>` runs grouped into `<w:p>` paragraphs.

use async_trait::async_trait;
use docqa_core::{ContentExtractor, DocumentFormat, ExtractError, ExtractedContent};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

const DOCUMENT_XML: &str = "word/document.xml";

/// Extractor for Word documents.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for DocxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedContent, ExtractError> {
        debug!("Extracting DOCX: {:?}", path);

        let bytes = tokio::fs::read(path).await?;

        let text = tokio::task::spawn_blocking(move || read_document_xml(&bytes))
            .await
            .map_err(|e| ExtractError::Failed(format!("Task join error: {e}")))??;

        Ok(ExtractedContent {
            text: docx_xml_to_text(&text),
            format: DocumentFormat::Docx,
            page_count: None,
        })
    }
}

/// Pull `word/document.xml` out of the ZIP container.
fn read_document_xml(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Parse(format!("not a DOCX container: {e}")))?;

    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractError::Parse(format!("missing {DOCUMENT_XML}: {e}")))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Parse(format!("unreadable {DOCUMENT_XML}: {e}")))?;
    Ok(xml)
}

/// Convert WordprocessingML body XML to plain text.
///
/// Text comes only from `<w:t>` elements; paragraph ends become newlines, and
/// `<w:tab/>` / `<w:br/>` become a tab and a newline.
pub fn docx_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    let mut rest = xml;
    let mut in_text = false;

    while let Some(open) = rest.find('<') {
        if in_text {
            out.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("");

        match (name, tag.starts_with('/')) {
            ("w:t", false) => in_text = !self_closing,
            ("w:t", true) => in_text = false,
            ("w:p", true) => out.push('\n'),
            ("w:tab", false) => out.push('\t'),
            ("w:br" | "w:cr", false) => out.push('\n'),
            _ => {}
        }
    }

    out
}

/// Decode the predefined XML entities and numeric character references.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let Some(semi) = after.find(';') else {
            out.push_str(after);
            return out;
        };
        let entity = &after[1..semi];
        match decode_entity(entity) {
            Some(c) => out.push(c),
            None => out.push_str(&after[..=semi]),
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
