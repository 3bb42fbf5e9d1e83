#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Row and column types for the exam task index.
//!
//! A [`TaskEntry`] is one occurrence of a task number on a page of an exam
//! PDF. [`TaskColumn`] fixes the column order shared by the CSV and XLSX
//! outputs.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Lowest task number accepted on an exam page.
pub const MIN_TASK_NUMBER: u8 = 1;

/// Highest task number accepted on an exam page.
pub const MAX_TASK_NUMBER: u8 = 25;

/// Maximum length of [`TaskEntry::text_preview`], in characters.
pub const PREVIEW_CHARS: usize = 240;

/// One task number found on one page.
///
/// Field order matches [`TaskColumn::ALL`]; the CSV writer serializes rows
/// straight from this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// The most recent variant marker at or before this page.
    pub variant: Option<u32>,
    /// Task number in `MIN_TASK_NUMBER..=MAX_TASK_NUMBER`.
    pub task_number: u8,
    /// 1-based page number.
    pub page: u32,
    /// Page reference of the form `<file>#page=<page>`.
    pub page_pdf: String,
    /// Topic guessed from the task number.
    pub theme_guess: String,
    /// Whitespace-collapsed page text, cut to [`PREVIEW_CHARS`] characters.
    pub text_preview: String,
}

/// Builds the `<file>#page=<page>` reference for a page.
#[must_use]
pub fn page_reference(pdf_name: &str, page: u32) -> String {
    format!("{pdf_name}#page={page}")
}

/// Collapses whitespace runs to single spaces and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max_chars` characters of the whitespace-collapsed text.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    collapse_whitespace(text).chars().take(max_chars).collect()
}

/// A column of the task index table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TaskColumn {
    /// Variant number, blank when unknown.
    Variant,
    /// Task number.
    TaskNumber,
    /// Page number.
    Page,
    /// Page reference.
    PagePdf,
    /// Topic guess.
    ThemeGuess,
    /// Page text preview.
    TextPreview,
}

impl TaskColumn {
    /// Every column in output order.
    pub const ALL: [Self; 6] = [
        Self::Variant,
        Self::TaskNumber,
        Self::Page,
        Self::PagePdf,
        Self::ThemeGuess,
        Self::TextPreview,
    ];

    /// Header names in output order.
    #[must_use]
    pub fn header() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| (*c).into()).collect()
    }
}
