#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Statement bank discovery and statement extraction.
//!
//! [`locate::find_bank`] walks a directory tree for `*task19*.json` files,
//! keeps the ones shaped like a statement bank and picks the largest.
//! [`extract::extract_statements`] then flattens the chosen bank's cards
//! into an ordered list of [`StatementRecord`]s.

pub mod extract;
pub mod locate;

use std::path::PathBuf;

pub use oge_tools_bank_models::{BankCandidate, StatementField, StatementRecord};

/// Errors raised while locating a bank or extracting its statements.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    /// No file under the search root qualified as a statement bank.
    #[error("No task19 JSON bank found under {0}")]
    NotFound(PathBuf),

    /// An explicitly requested bank file is missing or has the wrong shape.
    #[error("Not a task19 statement bank: {0}")]
    InvalidBank(PathBuf),

    /// The bank was found but contains no statements.
    #[error("No statements found in task19 JSON {0}")]
    EmptyResult(PathBuf),

    /// Walking the search root failed.
    #[error("Failed to walk {path}: {source}")]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },
}
