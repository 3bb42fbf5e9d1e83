#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Builds a task index from an exam PDF.
//!
//! Pages are read in order. Each page may set the current variant
//! ([`variant`]); every task number found at a line start ([`tasks`])
//! becomes one [`TaskEntry`] carrying that variant, a page reference, a
//! topic guess ([`theme`]) and a preview of the page text. The rows are
//! written to CSV and XLSX by [`table::TableBuilder`].

pub mod table;
pub mod tasks;
pub mod theme;
pub mod variant;

use std::path::Path;

use oge_tools_pdf::{PageText, PageTextExtractor, PdfError, ProgressCallback};
use oge_tools_task_index_models::{
    PREVIEW_CHARS, TaskEntry, collapse_whitespace, page_reference, preview,
};

pub use table::{TableBuilder, TableOutputs};
pub use variant::VariantTracker;

/// Default output directory of the CLI.
pub const DEFAULT_OUT_DIR: &str = "tools/oge_db/out";

/// Number of leading pages described by `--debug`.
pub const DEBUG_PAGES: u32 = 3;

/// Length of the text snippet in a debug line, in characters.
pub const DEBUG_SNIPPET_CHARS: usize = 200;

/// Errors raised while building the task index.
#[derive(Debug, thiserror::Error)]
pub enum TaskIndexError {
    /// Reading the PDF failed.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// No task numbers were found in the whole document.
    #[error(
        "Не удалось найти номера задач в PDF. Запустите с --debug и убедитесь, что PDF содержит текстовый слой (не сканы)."
    )]
    EmptyResult,

    /// Writing the CSV table failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the XLSX table failed.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a stream of pages into task entries.
///
/// Holds the only state carried between pages: the current variant.
#[derive(Debug, Clone)]
pub struct TaskIndexer {
    pdf_name: String,
    variants: VariantTracker,
    table: TableBuilder,
}

impl TaskIndexer {
    /// Creates an indexer whose page references point into `pdf_name`.
    #[must_use]
    pub fn new(pdf_name: impl Into<String>) -> Self {
        Self {
            pdf_name: pdf_name.into(),
            variants: VariantTracker::new(),
            table: TableBuilder::new(),
        }
    }

    /// Processes the next page and returns how many entries it added.
    ///
    /// Pages must be fed in document order.
    pub fn add_page(&mut self, page: &PageText) -> usize {
        let variant = self.variants.observe(&page.text);
        let text_preview = preview(&page.text, PREVIEW_CHARS);
        let before = self.table.len();

        for task_number in tasks::find_tasks(&page.text) {
            self.table.push(TaskEntry {
                variant,
                task_number,
                page: page.number,
                page_pdf: page_reference(&self.pdf_name, page.number),
                theme_guess: theme::guess_theme(task_number).to_owned(),
                text_preview: text_preview.clone(),
            });
        }

        let added = self.table.len() - before;
        log::debug!("Page {}: {added} task numbers", page.number);
        added
    }

    /// The variant in effect after the pages seen so far.
    #[must_use]
    pub const fn current_variant(&self) -> Option<u32> {
        self.variants.current()
    }

    /// Finishes indexing and returns the accumulated table.
    #[must_use]
    pub fn finish(self) -> TableBuilder {
        self.table
    }
}

/// Indexes every page, advancing `progress` once per page.
pub fn build_entries(
    pages: impl IntoIterator<Item = PageText>,
    pdf_name: &str,
    progress: &dyn ProgressCallback,
) -> TableBuilder {
    let mut indexer = TaskIndexer::new(pdf_name);

    for page in pages {
        indexer.add_page(&page);
        progress.inc(1);
    }

    let table = indexer.finish();
    progress.finish(format!("{} task entries", table.len()));
    table
}

/// Opens the PDF and indexes all of its pages.
///
/// # Errors
///
/// Returns [`TaskIndexError::Pdf`] if the file is missing or unreadable.
pub fn index_pdf(
    pdf: &Path,
    progress: &dyn ProgressCallback,
    mut on_page: impl FnMut(&PageText),
) -> Result<TableBuilder, TaskIndexError> {
    let extractor = PageTextExtractor::open(pdf)?;
    log::info!(
        "Indexing {} ({} pages)",
        extractor.file_name(),
        extractor.page_count()
    );

    progress.set_total(extractor.page_count() as u64);
    let pages = extractor.pages().inspect(|page| on_page(page));

    Ok(build_entries(pages, extractor.file_name(), progress))
}

/// The `--debug` description of a page.
#[must_use]
pub fn debug_line(page: &PageText) -> String {
    let snippet: String = collapse_whitespace(&page.text)
        .chars()
        .take(DEBUG_SNIPPET_CHARS)
        .collect();
    format!(
        "[DEBUG] Page {}: chars={} snippet='{snippet}'",
        page.number, page.glyph_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use oge_tools_pdf::fixtures::{FixtureFont, PdfFixture};
    use oge_tools_pdf::{NullProgress, TextSource, null_progress};
    use std::path::PathBuf;

    fn write_pdf(name: &str, fixture: &PdfFixture) -> PathBuf {
        let path = std::env::temp_dir().join(format!("oge_tools_task_index_{name}.pdf"));
        std::fs::write(&path, fixture.build().unwrap()).unwrap();
        path
    }

    fn pages(texts: &[&str]) -> Vec<PageText> {
        (1u32..)
            .zip(texts)
            .map(|(number, text)| PageText::new(number, *text))
            .collect()
    }

    fn rows(table: &TableBuilder) -> Vec<(Option<u32>, u8, u32)> {
        table
            .entries()
            .iter()
            .map(|e| (e.variant, e.task_number, e.page))
            .collect()
    }

    #[test]
    fn variant_marker_applies_to_following_headers() {
        let table = build_entries(
            pages(&["Вариант № 7\n1. Найдите\n2) Решите\n14 Вычислите"]),
            "exam.pdf",
            &NullProgress,
        );
        assert_eq!(
            rows(&table),
            vec![(Some(7), 1, 1), (Some(7), 2, 1), (Some(7), 14, 1)]
        );
    }

    #[test]
    fn out_of_range_header_yields_nothing() {
        let table = build_entries(pages(&["26. Найдите"]), "exam.pdf", &NullProgress);
        assert!(table.is_empty());
    }

    #[test]
    fn blank_page_is_skipped_without_error() {
        let table = build_entries(pages(&["", "   \n"]), "exam.pdf", &NullProgress);
        assert!(table.is_empty());
    }

    #[test]
    fn variant_carries_across_pages() {
        let table = build_entries(
            pages(&["3. Решите", "Вариант 12\n9) Найдите", "4. Ещё"]),
            "exam.pdf",
            null_progress().as_ref(),
        );
        assert_eq!(
            rows(&table),
            vec![(None, 3, 1), (Some(12), 9, 2), (Some(12), 4, 3)]
        );
    }

    #[test]
    fn entries_carry_reference_theme_and_preview() {
        let table = build_entries(
            pages(&["", "Вариант 1\n\n10.   Бросают   кость"]),
            "ОГЭ 2024.pdf",
            &NullProgress,
        );
        let entry = &table.entries()[0];
        assert_eq!(entry.page, 2);
        assert_eq!(entry.page_pdf, "ОГЭ 2024.pdf#page=2");
        assert_eq!(entry.theme_guess, "вероятность");
        assert_eq!(entry.text_preview, "Вариант 1 10. Бросают кость");
    }

    #[test]
    fn indexer_reports_entries_per_page() {
        let mut indexer = TaskIndexer::new("exam.pdf");
        assert_eq!(indexer.add_page(&PageText::new(1, "1. a\n1. b")), 2);
        assert_eq!(indexer.add_page(&PageText::new(2, "Вариант 5")), 0);
        assert_eq!(indexer.current_variant(), Some(5));
        assert_eq!(indexer.finish().len(), 2);
    }

    #[test]
    fn debug_line_format() {
        let mut page = PageText::new(2, "Вариант  №\n7");
        page.glyph_count = 42;
        assert_eq!(debug_line(&page), "[DEBUG] Page 2: chars=42 snippet='Вариант № 7'");

        let long = PageText::new(1, "x".repeat(500));
        let line = debug_line(&long);
        assert!(line.ends_with(&format!("snippet='{}'", "x".repeat(DEBUG_SNIPPET_CHARS))));
    }

    #[test]
    fn missing_pdf_is_reported() {
        let path = std::env::temp_dir().join("oge_tools_task_index_missing.pdf");
        let _ = std::fs::remove_file(&path);
        let err = index_pdf(&path, &NullProgress, |_| {}).unwrap_err();
        assert!(matches!(err, TaskIndexError::Pdf(PdfError::NotFound(_))));
    }

    #[test]
    fn indexes_a_real_pdf_end_to_end() {
        let path = write_pdf(
            "two_pages",
            &PdfFixture::new()
                .page(FixtureFont::Courier, &["3. Solve"])
                .page(FixtureFont::Identity, &["Вариант 12", "9) Найдите"]),
        );

        let mut seen = Vec::new();
        let table = index_pdf(&path, &NullProgress, |page| seen.push(page.number)).unwrap();

        assert_eq!(seen, vec![1, 2]);
        assert_eq!(rows(&table), vec![(None, 3, 1), (Some(12), 9, 2)]);
        assert_eq!(
            table.entries()[1].page_pdf,
            "oge_tools_task_index_two_pages.pdf#page=2"
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn indexes_pages_only_the_word_fallback_can_read() {
        let path = write_pdf(
            "word_fallback",
            &PdfFixture::new()
                .page(FixtureFont::Courier, &["Variant", "5. Solve"])
                .page(FixtureFont::Broken, &["6. Lost"]),
        );

        let mut sources = Vec::new();
        let table = index_pdf(&path, &NullProgress, |page| sources.push(page.source)).unwrap();

        assert_eq!(sources, vec![TextSource::Words, TextSource::Empty]);
        assert_eq!(rows(&table), vec![(None, 5, 1)]);

        let _ = std::fs::remove_file(&path);
    }
}
