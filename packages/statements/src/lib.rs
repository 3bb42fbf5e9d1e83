#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Exports the task 19 statement bank as a numbered PDF list.
//!
//! [`export`] locates the bank, extracts its statements and hands them to
//! an already-chosen [`PdfRenderer`]. A second PDF with `[#id]` tags is
//! written only when at least one statement carries an id.

use std::path::{Path, PathBuf};

use oge_tools_bank::{BankError, StatementRecord, extract, locate};
use oge_tools_bank_models::any_has_id;
use oge_tools_render::{PdfRenderer, RenderError};

/// File name of the plain statement list.
pub const OUTPUT_NAME: &str = "task19_base_statements_list.pdf";

/// File name of the statement list with id tags.
pub const OUTPUT_NAME_WITH_IDS: &str = "task19_base_statements_list_with_ids.pdf";

/// Errors raised by the export pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Locating or reading the bank failed.
    #[error(transparent)]
    Bank(#[from] BankError),

    /// Rendering a PDF failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to read the bank from and where to write the PDFs.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory searched for `*task19*.json`.
    pub root: PathBuf,
    /// Explicit bank file; skips the search when set.
    pub bank: Option<PathBuf>,
    /// Output directory; defaults to `root`.
    pub out_dir: Option<PathBuf>,
}

impl ExportConfig {
    /// Creates a config that searches and writes under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bank: None,
            out_dir: None,
        }
    }

    /// Uses an explicit bank file instead of searching.
    #[must_use]
    pub fn with_bank(mut self, bank: impl Into<PathBuf>) -> Self {
        self.bank = Some(bank.into());
        self
    }

    /// Writes output files to `out_dir` instead of the root.
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    /// The directory output files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.out_dir.as_deref().unwrap_or(&self.root)
    }
}

/// What an export run produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// The bank the statements came from.
    pub bank_path: PathBuf,
    /// Number of statements rendered.
    pub statement_count: usize,
    /// The plain list.
    pub output: PathBuf,
    /// The list with id tags, if any statement had an id.
    pub output_with_ids: Option<PathBuf>,
}

/// Locates the bank and extracts its statements.
///
/// # Errors
///
/// Returns [`ExportError::Bank`] if no bank qualifies or it has no
/// statements.
pub fn load_statements(config: &ExportConfig) -> Result<(PathBuf, Vec<StatementRecord>), ExportError> {
    let bank = match &config.bank {
        Some(path) => locate::load_bank(path)?,
        None => locate::find_bank(&config.root)?,
    };

    log::info!(
        "Using bank {} ({} cards)",
        bank.path.display(),
        bank.card_count
    );

    let statements = extract::extract_statements(&bank)?;
    Ok((bank.path, statements))
}

/// Runs the full export with the given renderer.
///
/// # Errors
///
/// Returns an [`ExportError`] if the bank cannot be loaded, the output
/// directory cannot be created, or rendering fails.
pub fn export(config: &ExportConfig, renderer: &dyn PdfRenderer) -> Result<ExportSummary, ExportError> {
    let (bank_path, statements) = load_statements(config)?;

    let out_dir = config.output_dir();
    std::fs::create_dir_all(out_dir)?;

    let output = out_dir.join(OUTPUT_NAME);
    renderer.render(&statements, false, &output)?;

    let output_with_ids = if any_has_id(&statements) {
        let path = out_dir.join(OUTPUT_NAME_WITH_IDS);
        renderer.render(&statements, true, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(ExportSummary {
        bank_path,
        statement_count: statements.len(),
        output,
        output_with_ids,
    })
}
