//! Layout backend built on the `genpdf` document engine.
//!
//! The whole statement list is a single ordered-list element; `genpdf`
//! takes care of line flow and page breaks.

use std::path::Path;

use genpdf::elements::{OrderedList, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::{Document, Margins, PaperSize, SimplePageDecorator};
use oge_tools_bank_models::StatementRecord;

use crate::{FONT_SIZE, LINE_LEADING, PAGE_MARGIN, PdfRenderer, RenderError, RendererKind};

/// Millimetres per PostScript point.
const MM_PER_PT: f64 = 25.4 / 72.0;

/// Document title written into the PDF metadata.
const DOCUMENT_TITLE: &str = "Task 19 statements";

/// Renderer that delegates pagination to `genpdf`.
#[derive(Clone)]
pub struct LayoutRenderer {
    font: FontData,
}

impl std::fmt::Debug for LayoutRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutRenderer").finish_non_exhaustive()
    }
}

impl LayoutRenderer {
    /// Registers the font with the layout engine.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Layout`] if `genpdf` rejects the font data.
    pub fn new(font_bytes: &[u8]) -> Result<Self, RenderError> {
        let font = FontData::new(font_bytes.to_vec(), None)
            .map_err(|e| RenderError::Layout(format!("failed to load font: {e}")))?;

        Ok(Self { font })
    }

    /// The same face is used for every style, so the family is four copies
    /// of one font.
    fn family(&self) -> FontFamily<FontData> {
        FontFamily {
            regular: self.font.clone(),
            bold: self.font.clone(),
            italic: self.font.clone(),
            bold_italic: self.font.clone(),
        }
    }

    fn document(&self, statements: &[StatementRecord], include_ids: bool) -> Document {
        let mut doc = Document::new(self.family());
        doc.set_title(DOCUMENT_TITLE);
        doc.set_paper_size(PaperSize::A4);
        doc.set_font_size(FONT_SIZE);
        doc.set_line_spacing(LINE_LEADING / f64::from(FONT_SIZE));

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(Margins::all(f64::from(PAGE_MARGIN) * MM_PER_PT));
        doc.set_page_decorator(decorator);

        let mut list = OrderedList::with_start(1);
        for record in statements {
            list.push(Paragraph::new(record.display_text(include_ids)));
        }
        doc.push(list);

        doc
    }
}

impl PdfRenderer for LayoutRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Layout
    }

    fn render(
        &self,
        statements: &[StatementRecord],
        include_ids: bool,
        output: &Path,
    ) -> Result<(), RenderError> {
        log::debug!(
            "Laying out {} statements with genpdf into {}",
            statements.len(),
            output.display()
        );

        self.document(statements, include_ids)
            .render_to_file(output)
            .map_err(|e| RenderError::Layout(format!("failed to render {}: {e}", output.display())))
    }
}
