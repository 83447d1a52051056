//! # docqa-extract
//!
//! Text extraction for the docqa ingestion entry point.
//!
//! ## Supported Formats
//!
//! | Extractor | Extension | Backend |
//! |-----------|-----------|---------|
//! | [`TextExtractor`] | `.txt` | UTF-8 read, invalid sequences replaced |
//! | [`PdfExtractor`] | `.pdf` | `pdf-extract` |
//! | [`DocxExtractor`] | `.docx` | `zip` container + `word/document.xml` runs |
//!
//! [`ExtractorRegistry::load_and_clean`] is the entry point: it rejects unknown
//! extensions with [`ExtractError::UnsupportedType`](docqa_core::ExtractError) before
//! touching the file, extracts, and normalizes the result with [`clean_text`].
//!
//! ```rust,ignore
//! use docqa_extract::ExtractorRegistry;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let text = registry.load_and_clean(Path::new("book.pdf")).await?;
//! ```

pub mod clean;
pub mod docx;
pub mod pdf;
pub mod registry;
pub mod text;

pub use clean::clean_text;
pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use text::TextExtractor;
