//! Per-page text with a word-position fallback.

use std::path::Path;

use pdf_extract::Document;

use crate::{PdfError, guarded};
use crate::words::{PageWords, extract_page_words, rebuild_text_from_words};

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    /// Direct text extraction returned something.
    Direct,
    /// Rebuilt from positioned words.
    Words,
    /// Neither method found any text.
    Empty,
}

/// Text of a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number.
    pub number: u32,
    /// The page text; empty when nothing could be extracted.
    pub text: String,
    /// Glyphs shown on the page, spaces included.
    pub glyph_count: usize,
    /// Which extraction method produced `text`.
    pub source: TextSource,
}

#[cfg(any(test, feature = "fixtures"))]
impl PageText {
    /// A page whose text is already known, counting one glyph per
    /// non-newline character.
    #[must_use]
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        let text = text.into();
        let glyph_count = text.chars().filter(|&c| c != '\n').count();
        let source = if text.trim().is_empty() {
            TextSource::Empty
        } else {
            TextSource::Direct
        };

        Self {
            number,
            text,
            glyph_count,
            source,
        }
    }
}

/// Picks the direct text if it has any content, otherwise rebuilds the
/// text from positioned words.
#[must_use]
pub fn resolve_page_text(direct: &str, words: &PageWords) -> (String, TextSource) {
    if !direct.trim().is_empty() {
        return (direct.to_owned(), TextSource::Direct);
    }

    if words.words.is_empty() {
        return (String::new(), TextSource::Empty);
    }

    (rebuild_text_from_words(&words.words), TextSource::Words)
}

/// Extracts text page by page from a loaded PDF.
pub struct PageTextExtractor {
    file_name: String,
    document: Document,
    pages: Vec<u32>,
    direct: Vec<String>,
}

impl std::fmt::Debug for PageTextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTextExtractor")
            .field("file_name", &self.file_name)
            .field("pages", &self.pages.len())
            .finish_non_exhaustive()
    }
}

impl PageTextExtractor {
    /// Opens and parses a PDF file.
    ///
    /// # Errors
    ///
    /// * [`PdfError::NotFound`] if `path` does not exist
    /// * [`PdfError::Io`] if it cannot be read
    /// * [`PdfError::Extraction`] if it is not a readable PDF
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        if !path.exists() {
            return Err(PdfError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

        log::debug!("Read {} bytes from {}", bytes.len(), path.display());

        Self::from_bytes(&bytes, file_name)
    }

    /// Parses a PDF held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
    pub fn from_bytes(bytes: &[u8], file_name: impl Into<String>) -> Result<Self, PdfError> {
        let document = Document::load_mem(bytes)
            .map_err(|e| PdfError::Extraction(format!("failed to parse PDF: {e}")))?;
        let pages: Vec<u32> = document.get_pages().into_keys().collect();

        let direct = guarded("direct text", || {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        })
        .unwrap_or_else(|e| {
            log::warn!("{e}; falling back to word positions");
            Vec::new()
        });

        log::debug!(
            "Parsed {} pages ({} with direct text)",
            pages.len(),
            direct.iter().filter(|t| !t.trim().is_empty()).count()
        );

        Ok(Self {
            file_name: file_name.into(),
            document,
            pages,
            direct,
        })
    }

    /// File name of the source PDF, used in page references.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Number of pages in the document.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of the page with the given 1-based number.
    ///
    /// Never fails: a page that cannot be interpreted contributes no
    /// words, and a page with no text at all yields an empty string.
    #[must_use]
    pub fn page(&self, number: u32) -> PageText {
        let words = extract_page_words(&self.document, number).unwrap_or_else(|e| {
            log::warn!("{e}");
            PageWords::default()
        });

        let direct = usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| self.direct.get(index))
            .map_or("", String::as_str);

        let (text, source) = resolve_page_text(direct, &words);
        if source == TextSource::Words {
            log::debug!("Page {number}: rebuilt text from {} words", words.words.len());
        }

        PageText {
            number,
            text,
            glyph_count: words.glyph_count,
            source,
        }
    }

    /// Every page in order.
    pub fn pages(&self) -> impl Iterator<Item = PageText> + '_ {
        self.pages.iter().map(|&number| self.page(number))
    }
}
