#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-page text extraction for exam PDFs.
//!
//! Each page is first read with direct text extraction ([`pdf_extract`]).
//! Pages that come back blank are replayed through the same interpreter
//! with an output device that records word positions, and lines are
//! rebuilt from those (see [`words`]). A page with no text layer at all
//! yields an empty string rather than an error.
//!
//! The primary entry point is [`PageTextExtractor`].

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod page_text;
pub mod progress;
pub mod words;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;

pub use page_text::{PageText, PageTextExtractor, TextSource, resolve_page_text};
pub use progress::{NullProgress, ProgressCallback, null_progress};

/// Errors specific to PDF extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// The PDF file does not exist.
    #[error("PDF not found: {0}")]
    NotFound(PathBuf),

    /// The file could not be parsed as a PDF or a page could not be read.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs a `pdf_extract` call, turning both its errors and its panics into
/// [`PdfError::Extraction`].
///
/// The interpreter panics on some malformed fonts (for example a `Type0`
/// font without `DescendantFonts`).
pub(crate) fn guarded<T>(
    what: &str,
    f: impl FnOnce() -> Result<T, pdf_extract::OutputError>,
) -> Result<T, PdfError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(PdfError::Extraction(format!("{what}: {e}"))),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            Err(PdfError::Extraction(format!(
                "{what}: interpreter panicked: {message}"
            )))
        }
    }
}
