//! Raster backend: hand-wrapped pages drawn with `rusttype`.
//!
//! Pages are laid out by [`crate::plan::plan_pages`], drawn onto white
//! [`RgbImage`]s and then written as a single image-per-page PDF by
//! [`crate::image_pdf::write_image_pages`].

use std::path::Path;

use image::{Rgb, RgbImage};
use oge_tools_bank_models::StatementRecord;
use rusttype::{Font, Scale, point};

use crate::plan::{PageGeometry, PagePlan, TextMeasure, plan_pages};
use crate::{
    FONT_SIZE, PAGE_HEIGHT, PAGE_MARGIN, PAGE_WIDTH, PdfRenderer, RASTER_DPI, RenderError,
    RendererKind,
};

/// Extra pixels added below the measured `"Hg"` height for each line.
const LINE_GAP: f32 = 4.0;

/// Parses TrueType data, returning `None` if it is not a usable font.
#[must_use]
pub fn load_font(bytes: &[u8]) -> Option<Font<'static>> {
    Font::try_from_vec(bytes.to_vec())
}

/// Hand-paginating renderer that rasterizes every page.
pub struct RasterRenderer {
    font: Font<'static>,
    scale: Scale,
}

impl std::fmt::Debug for RasterRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterRenderer")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl RasterRenderer {
    /// Creates a renderer from TrueType data.
    ///
    /// Returns `None` if the font cannot be parsed.
    #[must_use]
    pub fn new(font_bytes: &[u8]) -> Option<Self> {
        Some(Self {
            font: load_font(font_bytes)?,
            scale: Scale::uniform(f32::from(FONT_SIZE)),
        })
    }

    /// Pixel height of `"Hg"` plus a small gap.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        let ascent = self.font.v_metrics(self.scale).ascent;
        let bounds = self
            .font
            .layout("Hg", self.scale, point(0.0, ascent))
            .filter_map(|g| g.pixel_bounding_box())
            .fold(None, |acc: Option<(i32, i32)>, bb| {
                Some(acc.map_or((bb.min.y, bb.max.y), |(top, bottom)| {
                    (top.min(bb.min.y), bottom.max(bb.max.y))
                }))
            });

        #[allow(clippy::cast_precision_loss)]
        let glyph_height = bounds.map_or(f32::from(FONT_SIZE), |(top, bottom)| {
            (bottom - top) as f32
        });

        glyph_height + LINE_GAP
    }

    /// Page geometry for this font.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            width: PAGE_WIDTH as f32,
            height: PAGE_HEIGHT as f32,
            margin: PAGE_MARGIN as f32,
            line_height: self.line_height(),
        }
    }

    /// Lays out the statements without drawing them.
    #[must_use]
    pub fn plan(&self, statements: &[StatementRecord], include_ids: bool) -> Vec<PagePlan> {
        plan_pages(statements, include_ids, self, self.geometry())
    }

    /// Draws one planned page onto a fresh white image.
    #[must_use]
    pub fn draw_page(&self, plan: &PagePlan) -> RgbImage {
        let mut image = RgbImage::from_pixel(PAGE_WIDTH, PAGE_HEIGHT, Rgb([255, 255, 255]));
        let ascent = self.font.v_metrics(self.scale).ascent;

        #[allow(clippy::cast_precision_loss)]
        let left = PAGE_MARGIN as f32;

        for line in &plan.lines {
            for glyph in self
                .font
                .layout(&line.text, self.scale, point(left, line.y + ascent))
            {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let x = i64::from(bb.min.x) + i64::from(gx);
                    let y = i64::from(bb.min.y) + i64::from(gy);
                    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                        return;
                    };
                    if x >= PAGE_WIDTH || y >= PAGE_HEIGHT {
                        return;
                    }
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let ink = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
                    let pixel = image.get_pixel_mut(x, y);
                    for channel in &mut pixel.0 {
                        *channel = (*channel).min(255 - ink);
                    }
                });
            }
        }

        image
    }
}

impl TextMeasure for RasterRenderer {
    fn text_width(&self, text: &str) -> f32 {
        let mut width = 0.0;
        let mut previous = None;

        for c in text.chars() {
            let glyph = self.font.glyph(c).scaled(self.scale);
            if let Some(prev) = previous {
                width += self.font.pair_kerning(self.scale, prev, glyph.id());
            }
            width += glyph.h_metrics().advance_width;
            previous = Some(glyph.id());
        }

        width
    }
}

impl PdfRenderer for RasterRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Raster
    }

    fn render(
        &self,
        statements: &[StatementRecord],
        include_ids: bool,
        output: &Path,
    ) -> Result<(), RenderError> {
        let plans = self.plan(statements, include_ids);
        log::debug!(
            "Raster layout: {} statements over {} page(s)",
            statements.len(),
            plans.len()
        );

        let pages: Vec<RgbImage> = plans.iter().map(|plan| self.draw_page(plan)).collect();

        crate::image_pdf::write_image_pages(&pages, RASTER_DPI, output)
    }
}
