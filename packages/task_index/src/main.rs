#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for building the exam task index.

use std::path::PathBuf;

use clap::Parser;
use oge_tools_cli_utils::IndicatifProgress;
use oge_tools_task_index::{DEBUG_PAGES, DEFAULT_OUT_DIR, debug_line, index_pdf};

#[derive(Parser)]
#[command(
    name = "oge_task_index",
    about = "Extract task numbers, variants and pages from an OGE PDF into CSV/XLSX"
)]
struct Cli {
    /// Path to the source PDF
    #[arg(long)]
    pdf: PathBuf,
    /// Output directory for oge_db.csv and oge_db.xlsx
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out: PathBuf,
    /// Print extraction details for the first few pages
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = oge_tools_cli_utils::init_logger();
    let cli = Cli::parse();

    let progress = IndicatifProgress::pages_bar(&multi, "Reading pages");
    let table = index_pdf(&cli.pdf, progress.as_ref(), |page| {
        if cli.debug && page.number <= DEBUG_PAGES {
            multi.suspend(|| println!("{}", debug_line(page)));
        }
    })?;

    let outputs = table.write_all(&cli.out)?;

    println!(
        "Saved {} records to {} and {}",
        table.len(),
        outputs.csv.display(),
        outputs.xlsx.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pdf_is_required_and_out_has_a_default() {
        assert!(Cli::try_parse_from(["oge_task_index"]).is_err());

        let cli = Cli::try_parse_from(["oge_task_index", "--pdf", "exam.pdf", "--debug"]).unwrap();
        assert_eq!(cli.pdf, PathBuf::from("exam.pdf"));
        assert_eq!(cli.out, PathBuf::from(DEFAULT_OUT_DIR));
        assert!(cli.debug);
    }
}
