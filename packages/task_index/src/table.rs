//! CSV and XLSX output for the task index.

use std::path::{Path, PathBuf};

use oge_tools_task_index_models::{TaskColumn, TaskEntry};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::TaskIndexError;

/// File name of the CSV output.
pub const CSV_FILE_NAME: &str = "oge_db.csv";

/// File name of the XLSX output.
pub const XLSX_FILE_NAME: &str = "oge_db.xlsx";

/// Name of the only worksheet in the XLSX output.
pub const SHEET_NAME: &str = "Sheet1";

/// Paths written by [`TableBuilder::write_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOutputs {
    /// The CSV file.
    pub csv: PathBuf,
    /// The XLSX file.
    pub xlsx: PathBuf,
}

/// Accumulates task entries and writes them as identical CSV and XLSX
/// tables.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    entries: Vec<TaskEntry>,
}

impl TableBuilder {
    /// An empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends one row.
    pub fn push(&mut self, entry: TaskEntry) {
        self.entries.push(entry);
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no rows have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the rows as CSV with a header row. A missing variant is an
    /// empty field.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIndexError::Csv`] if the file cannot be written.
    pub fn write_csv(&self, path: &Path) -> Result<(), TaskIndexError> {
        let mut writer = csv::Writer::from_path(path)?;
        if self.entries.is_empty() {
            writer.write_record(TaskColumn::header())?;
        }
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;

        log::debug!("Wrote {} rows to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Writes the rows as a single-sheet XLSX workbook with a header row.
    /// Numbers are numeric cells; a missing variant is a blank cell.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIndexError::Xlsx`] if the workbook cannot be built or
    /// saved.
    pub fn write_xlsx(&self, path: &Path) -> Result<(), TaskIndexError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, name) in (0u16..).zip(TaskColumn::header()) {
            sheet.write_string(0, col, name)?;
        }
        for (row, entry) in (1u32..).zip(&self.entries) {
            write_xlsx_row(sheet, row, entry)?;
        }

        workbook.save(path)?;

        log::debug!("Wrote {} rows to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Writes both tables into `out_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// * [`TaskIndexError::EmptyResult`] if there are no rows
    /// * [`TaskIndexError::Io`] if the directory cannot be created
    /// * [`TaskIndexError::Csv`] or [`TaskIndexError::Xlsx`] if writing fails
    pub fn write_all(&self, out_dir: &Path) -> Result<TableOutputs, TaskIndexError> {
        if self.entries.is_empty() {
            return Err(TaskIndexError::EmptyResult);
        }

        std::fs::create_dir_all(out_dir)?;

        let outputs = TableOutputs {
            csv: out_dir.join(CSV_FILE_NAME),
            xlsx: out_dir.join(XLSX_FILE_NAME),
        };
        self.write_csv(&outputs.csv)?;
        self.write_xlsx(&outputs.xlsx)?;

        Ok(outputs)
    }
}

impl From<Vec<TaskEntry>> for TableBuilder {
    fn from(entries: Vec<TaskEntry>) -> Self {
        Self { entries }
    }
}

fn write_xlsx_row(sheet: &mut Worksheet, row: u32, entry: &TaskEntry) -> Result<(), XlsxError> {
    for (col, column) in (0u16..).zip(TaskColumn::ALL) {
        match column {
            TaskColumn::Variant => {
                if let Some(variant) = entry.variant {
                    sheet.write_number(row, col, f64::from(variant))?;
                }
            }
            TaskColumn::TaskNumber => {
                sheet.write_number(row, col, f64::from(entry.task_number))?;
            }
            TaskColumn::Page => {
                sheet.write_number(row, col, f64::from(entry.page))?;
            }
            TaskColumn::PagePdf => {
                sheet.write_string(row, col, &entry.page_pdf)?;
            }
            TaskColumn::ThemeGuess => {
                sheet.write_string(row, col, &entry.theme_guess)?;
            }
            TaskColumn::TextPreview => {
                sheet.write_string(row, col, &entry.text_preview)?;
            }
        }
    }
    Ok(())
}
