#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Numbered statement list rendering to PDF.
//!
//! Two backends implement [`PdfRenderer`]:
//!
//! - [`layout::LayoutRenderer`] hands the whole list to the `genpdf`
//!   document engine, which flows the text across A4 pages. Only built with
//!   the `layout` feature.
//! - [`raster::RasterRenderer`] wraps and paginates by hand (see [`plan`]),
//!   rasterizes each page with `rusttype` and stitches the page images into
//!   a PDF (see [`image_pdf`]).
//!
//! Which one is used is decided once, by [`RenderConfig::probe`], and the
//! resulting renderer is handed to the caller as a `Box<dyn PdfRenderer>`.

pub mod image_pdf;
#[cfg(feature = "layout")]
pub mod layout;
pub mod plan;
pub mod raster;

use std::path::{Path, PathBuf};

use oge_tools_bank_models::StatementRecord;
use strum_macros::{AsRefStr, Display, EnumString};

/// Font used when none is configured.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Page width in points (A4).
pub const PAGE_WIDTH: u32 = 595;

/// Page height in points (A4).
pub const PAGE_HEIGHT: u32 = 842;

/// Margin on every side of the page, in points.
pub const PAGE_MARGIN: u32 = 36;

/// Body font size in points.
pub const FONT_SIZE: u8 = 12;

/// Baseline-to-baseline distance used by the layout backend, in points.
pub const LINE_LEADING: f64 = 16.0;

/// Resolution the raster backend renders at. At 72 DPI one pixel is one
/// point, so raster pages come out A4 sized.
pub const RASTER_DPI: f32 = 72.0;

/// Errors raised while preparing or running a renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The configured font file does not exist.
    #[error("Font not found at {0}")]
    FontNotFound(PathBuf),

    /// The font file could not be parsed.
    #[error("Invalid font file {0}")]
    InvalidFont(PathBuf),

    /// The requested backend is not available in this build or rejected the
    /// font.
    #[error("Renderer backend unavailable: {0}")]
    BackendUnavailable(RendererKind),

    /// The layout engine failed to lay out or write the document.
    #[error("Layout engine error: {0}")]
    Layout(String),

    /// Assembling the raster PDF failed.
    #[error("PDF assembly error: {0}")]
    Pdf(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A concrete rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RendererKind {
    /// Document-engine backend (`genpdf`).
    Layout,
    /// Hand-paginated raster backend.
    Raster,
}

/// Which backend the caller wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RendererPreference {
    /// Layout when available, raster otherwise.
    #[default]
    Auto,
    /// Layout or fail.
    Layout,
    /// Always raster.
    Raster,
}

/// Renders a list of statements as a numbered PDF list.
pub trait PdfRenderer {
    /// The backend behind this renderer.
    fn kind(&self) -> RendererKind;

    /// Writes `statements` to `output` as a 1-based numbered list.
    ///
    /// When `include_ids` is set, records with a non-empty id are prefixed
    /// with `[#id]`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if layout fails or the file cannot be
    /// written.
    fn render(
        &self,
        statements: &[StatementRecord],
        include_ids: bool,
        output: &Path,
    ) -> Result<(), RenderError>;
}

/// Outcome of the start-up capability probe.
///
/// Holds the loaded font and the chosen backend so that nothing about the
/// environment has to be re-checked per render call.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Where the font was loaded from.
    pub font_path: PathBuf,
    /// Raw TrueType data.
    pub font_bytes: Vec<u8>,
    /// Backend that [`RenderConfig::renderer`] will build.
    pub kind: RendererKind,
}

impl RenderConfig {
    /// Loads the font and decides which backend to use.
    ///
    /// # Errors
    ///
    /// * [`RenderError::FontNotFound`] if `font_path` does not exist
    /// * [`RenderError::InvalidFont`] if the font cannot be parsed
    /// * [`RenderError::BackendUnavailable`] if `Layout` is required but
    ///   cannot be used
    pub fn probe(font_path: &Path, preference: RendererPreference) -> Result<Self, RenderError> {
        if !font_path.is_file() {
            return Err(RenderError::FontNotFound(font_path.to_path_buf()));
        }

        let font_bytes = std::fs::read(font_path)?;
        if raster::load_font(&font_bytes).is_none() {
            return Err(RenderError::InvalidFont(font_path.to_path_buf()));
        }

        let layout_ok = layout_available(&font_bytes);
        log::debug!("Layout engine available: {layout_ok}");

        let kind = match preference {
            RendererPreference::Auto if layout_ok => RendererKind::Layout,
            RendererPreference::Auto | RendererPreference::Raster => RendererKind::Raster,
            RendererPreference::Layout if layout_ok => RendererKind::Layout,
            RendererPreference::Layout => {
                return Err(RenderError::BackendUnavailable(RendererKind::Layout));
            }
        };

        log::info!("Using {kind} renderer with font {}", font_path.display());

        Ok(Self {
            font_path: font_path.to_path_buf(),
            font_bytes,
            kind,
        })
    }

    /// Builds the renderer selected by the probe.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the backend cannot load the font.
    pub fn renderer(&self) -> Result<Box<dyn PdfRenderer>, RenderError> {
        match self.kind {
            RendererKind::Layout => layout_renderer(&self.font_bytes),
            RendererKind::Raster => {
                let renderer = raster::RasterRenderer::new(&self.font_bytes)
                    .ok_or_else(|| RenderError::InvalidFont(self.font_path.clone()))?;
                Ok(Box::new(renderer))
            }
        }
    }
}

#[cfg(feature = "layout")]
fn layout_available(font_bytes: &[u8]) -> bool {
    layout::LayoutRenderer::new(font_bytes).is_ok()
}

#[cfg(not(feature = "layout"))]
const fn layout_available(_font_bytes: &[u8]) -> bool {
    false
}

#[cfg(feature = "layout")]
fn layout_renderer(font_bytes: &[u8]) -> Result<Box<dyn PdfRenderer>, RenderError> {
    Ok(Box::new(layout::LayoutRenderer::new(font_bytes)?))
}

#[cfg(not(feature = "layout"))]
fn layout_renderer(_font_bytes: &[u8]) -> Result<Box<dyn PdfRenderer>, RenderError> {
    Err(RenderError::BackendUnavailable(RendererKind::Layout))
}

/// The default system font, if this machine has it.
#[cfg(test)]
pub(crate) fn test_font() -> Option<Vec<u8>> {
    std::fs::read(DEFAULT_FONT_PATH).ok()
}
