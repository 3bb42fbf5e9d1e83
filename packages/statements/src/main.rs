#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for exporting the task 19 statement list.

use std::path::PathBuf;

use clap::Parser;
use oge_tools_render::{DEFAULT_FONT_PATH, RenderConfig, RendererPreference};
use oge_tools_statements::{ExportConfig, export};

#[derive(Parser)]
#[command(
    name = "oge_statements",
    about = "Render the task 19 statement bank as a numbered PDF list"
)]
struct Cli {
    /// Directory searched for `*task19*.json`; outputs are written here too
    #[arg(long, env = "OGE_TOOLS_ROOT", default_value = ".")]
    root: PathBuf,
    /// Use this bank file instead of searching the root
    #[arg(long)]
    bank: Option<PathBuf>,
    /// Write the PDFs here instead of the root
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// TrueType font embedded in the output
    #[arg(long, env = "OGE_TOOLS_FONT", default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,
    /// Rendering backend: `auto`, `layout` or `raster`
    #[arg(long, default_value = "auto")]
    renderer: RendererPreference,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _multi = oge_tools_cli_utils::init_logger();
    let cli = Cli::parse();

    let render_config = RenderConfig::probe(&cli.font, cli.renderer)?;
    let renderer = render_config.renderer()?;

    let mut config = ExportConfig::new(cli.root);
    if let Some(bank) = cli.bank {
        config = config.with_bank(bank);
    }
    if let Some(out_dir) = cli.out_dir {
        config = config.with_out_dir(out_dir);
    }

    let summary = export(&config, renderer.as_ref())?;

    println!(
        "Found {} statements in {}",
        summary.statement_count,
        summary.bank_path.display()
    );
    println!("Wrote {}", summary.output.display());
    if let Some(with_ids) = &summary.output_with_ids {
        println!("Wrote {}", with_ids.display());
    }

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
    fn renderer_flag_parses_each_preference() {
        let cli = Cli::try_parse_from(["oge_statements", "--renderer", "raster"]).unwrap();
        assert_eq!(cli.renderer, RendererPreference::Raster);

        let cli = Cli::try_parse_from(["oge_statements", "--renderer", "layout"]).unwrap();
        assert_eq!(cli.renderer, RendererPreference::Layout);

        assert!(Cli::try_parse_from(["oge_statements", "--renderer", "cairo"]).is_err());
    }

    #[test]
    fn defaults_search_current_directory() {
        let cli = Cli::try_parse_from(["oge_statements", "--root", "banks"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("banks"));
        assert_eq!(cli.renderer, RendererPreference::Auto);
        assert!(cli.bank.is_none());
        assert!(cli.out_dir.is_none());
    }
}
