//! Manual wrapping and pagination for the raster backend.
//!
//! Everything here is independent of the font engine: widths come from a
//! [`TextMeasure`] implementation, so the line breaking and page breaking
//! rules can be exercised with a fixed-width measure in tests.

use oge_tools_bank_models::StatementRecord;

/// Measures rendered text width in pixels.
pub trait TextMeasure {
    /// Advance width of `text` as it would be drawn.
    fn text_width(&self, text: &str) -> f32;
}

/// Page dimensions and vertical rhythm, all in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
    /// Margin on every side.
    pub margin: f32,
    /// Distance from one line's top to the next.
    pub line_height: f32,
}

impl PageGeometry {
    /// Width available to text between the left and right margins.
    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest y a line may end at.
    #[must_use]
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin
    }
}

/// One line placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Top of the line, measured from the top of the page.
    pub y: f32,
    /// Text to draw at the left margin, prefix or indent included.
    pub text: String,
    /// 1-based list number if this is the first line of an item.
    pub item: Option<usize>,
}

/// All lines that land on a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    /// Lines in drawing order.
    pub lines: Vec<PlacedLine>,
}

/// Greedily breaks `text` into lines no wider than `max_width`.
///
/// A word is appended to the current line if the result fits, or if the
/// current line is still empty, so an over-long word gets a line of its
/// own rather than being dropped. Text without words yields one empty line.
#[must_use]
pub fn wrap_text(text: &str, measure: &dyn TextMeasure, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };

        if current.is_empty() || measure.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// A run of spaces roughly as wide as `prefix`, used to indent
/// continuation lines.
#[must_use]
pub fn make_indent(prefix: &str, measure: &dyn TextMeasure) -> String {
    let prefix_width = measure.text_width(prefix);
    let space_width = measure.text_width(" ");

    if space_width <= 0.0 {
        return " ".repeat(prefix.chars().count());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (prefix_width / space_width).floor().max(1.0) as usize;

    " ".repeat(count)
}

/// The list marker for item `number`, with the id tag when requested.
#[must_use]
pub fn item_prefix(number: usize, record: &StatementRecord, include_ids: bool) -> String {
    match record.non_empty_id() {
        Some(id) if include_ids => format!("{number}. [#{id}] "),
        _ => format!("{number}. "),
    }
}

/// Lays out every statement as numbered, wrapped lines across pages.
///
/// A new page is started whenever the next line would cross the bottom
/// margin. The last page is always part of the result, so an empty input
/// still produces one blank page.
#[must_use]
pub fn plan_pages(
    statements: &[StatementRecord],
    include_ids: bool,
    measure: &dyn TextMeasure,
    geometry: PageGeometry,
) -> Vec<PagePlan> {
    let mut pages = Vec::new();
    let mut page = PagePlan::default();
    let mut y = geometry.margin;

    for (index, record) in statements.iter().enumerate() {
        let number = index + 1;
        let prefix = item_prefix(number, record, include_ids);
        let available = geometry.content_width() - measure.text_width(&prefix);
        let wrapped = wrap_text(&record.text, measure, available);
        let indent = make_indent(&prefix, measure);

        for (line_index, line) in wrapped.into_iter().enumerate() {
            let (text, item) = if line_index == 0 {
                (format!("{prefix}{line}"), Some(number))
            } else {
                (format!("{indent}{line}"), None)
            };

            if y + geometry.line_height > geometry.bottom_limit() {
                pages.push(std::mem::take(&mut page));
                y = geometry.margin;
            }

            page.lines.push(PlacedLine { y, text, item });
            y += geometry.line_height;
        }
    }

    pages.push(page);
    pages
}
