//! Word-position extraction and line reconstruction.
//!
//! Used when a page's direct text extraction comes back blank. The page is
//! replayed through `pdf_extract`'s interpreter with a [`WordCollector`] as
//! the output device, which receives every glyph already decoded (font
//! encodings, `ToUnicode` maps and CID fonts included) together with its
//! position and advance width. Glyphs are grouped into [`Word`]s and lines
//! are rebuilt by bucketing words on their rounded top coordinate.

use std::collections::BTreeMap;

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};

use crate::{PdfError, guarded};

/// A gap wider than this fraction of the font size starts a new word.
const WORD_GAP: f64 = 0.1;

/// A vertical move larger than this fraction of the font size starts a new
/// word.
const LINE_SHIFT: f64 = 0.5;

/// A word with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// The word's characters.
    pub text: String,
    /// Left edge, in points from the left of the page.
    pub x0: f64,
    /// Top edge, in points from the top of the page.
    pub top: f64,
}

/// Words and glyph count collected from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageWords {
    /// Words in content-stream order.
    pub words: Vec<Word>,
    /// Number of glyphs shown on the page, spaces included.
    pub glyph_count: usize,
}

/// Joins words into lines: words sharing a rounded `top` form one line,
/// ordered left to right; lines are ordered top to bottom.
#[must_use]
pub fn rebuild_text_from_words(words: &[Word]) -> String {
    let mut lines: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();

    for word in words {
        #[allow(clippy::cast_possible_truncation)]
        let key = word.top.round() as i64;
        lines.entry(key).or_default().push(word);
    }

    lines
        .into_values()
        .map(|mut line| {
            line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            line.iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Effective font size in user space for a text rendering matrix.
fn rendered_size(trm: &Transform, font_size: f64) -> f64 {
    let x = font_size * (trm.m11 + trm.m21);
    let y = font_size * (trm.m12 + trm.m22);
    (x * y).abs().sqrt()
}

/// Output device that groups decoded glyphs into positioned words.
#[derive(Debug, Default)]
pub struct WordCollector {
    page_top: f64,
    current: Option<Word>,
    last_end: f64,
    last_y: f64,
    out: PageWords,
}

impl WordCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(&mut self) {
        if let Some(word) = self.current.take() {
            self.out.words.push(word);
        }
    }

    /// Glyphs seen so far, grouped into words.
    #[must_use]
    pub fn finish(mut self) -> PageWords {
        self.flush();
        self.out
    }
}

impl OutputDev for WordCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page_top = media_box.ury;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        self.out.glyph_count += 1;

        let size = rendered_size(trm, font_size);
        let (x, y) = (trm.m31, trm.m32);

        if char.trim().is_empty() {
            self.flush();
        } else {
            let gap = x - self.last_end;
            let continues = self.current.is_some()
                && (y - self.last_y).abs() <= size * LINE_SHIFT
                && gap.abs() <= size * WORD_GAP;

            if !continues {
                self.flush();
                self.current = Some(Word {
                    text: String::new(),
                    x0: x,
                    top: self.page_top - y - size,
                });
            }
            if let Some(word) = &mut self.current {
                word.text.push_str(char);
            }
        }

        self.last_end = x + width * size;
        self.last_y = y;
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}

/// Collects positioned words from the page with the given 1-based number.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the page cannot be interpreted,
/// including when the interpreter panics on a malformed resource.
pub fn extract_page_words(doc: &Document, page_number: u32) -> Result<PageWords, PdfError> {
    let mut collector = WordCollector::new();
    guarded(&format!("page {page_number}"), || {
        pdf_extract::output_doc_page(doc, &mut collector, page_number)
    })?;
    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FixtureFont, PdfFixture};

    fn word(text: &str, x0: f64, top: f64) -> Word {
        Word {
            text: text.to_owned(),
            x0,
            top,
        }
    }

    fn load(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).unwrap()
    }

    #[test]
    fn rebuilds_lines_top_to_bottom_left_to_right() {
        let words = vec![
            word("world", 60.0, 100.2),
            word("second", 10.0, 120.0),
            word("Hello", 10.0, 99.8),
            word("line", 70.0, 119.6),
        ];
        assert_eq!(
            rebuild_text_from_words(&words),
            "Hello world\nsecond line"
        );
    }

    #[test]
    fn no_words_is_empty_text() {
        assert_eq!(rebuild_text_from_words(&[]), "");
    }

    #[test]
    fn single_byte_font_words() {
        let bytes = PdfFixture::new()
            .page(FixtureFont::Courier, &["3. Solve", "Hello there"])
            .build()
            .unwrap();

        let out = extract_page_words(&load(&bytes), 1).unwrap();
        let texts: Vec<&str> = out.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["3.", "Solve", "Hello", "there"]);
        assert_eq!(out.glyph_count, "3. SolveHello there".len());

        // 12pt text with its baseline at y=760 on an 842pt page.
        assert!((out.words[0].x0 - 72.0).abs() < 0.01);
        assert!((out.words[0].top - 70.0).abs() < 0.01);
        assert!((out.words[2].top - 100.0).abs() < 0.01);
        assert_eq!(rebuild_text_from_words(&out.words), "3. Solve\nHello there");
    }

    #[test]
    fn two_byte_cid_font_is_decoded() {
        let bytes = PdfFixture::new()
            .page(FixtureFont::Identity, &["Вариант 12", "9) Найдите"])
            .build()
            .unwrap();

        let out = extract_page_words(&load(&bytes), 1).unwrap();
        assert_eq!(
            rebuild_text_from_words(&out.words),
            "Вариант 12\n9) Найдите"
        );
    }

    #[test]
    fn interpreter_panic_becomes_an_error() {
        let bytes = PdfFixture::new()
            .page(FixtureFont::Broken, &["3."])
            .build()
            .unwrap();

        assert!(matches!(
            extract_page_words(&load(&bytes), 1),
            Err(PdfError::Extraction(_))
        ));
    }

    #[test]
    fn unknown_page_is_an_error() {
        let bytes = PdfFixture::new()
            .page(FixtureFont::Courier, &["1."])
            .build()
            .unwrap();

        assert!(extract_page_words(&load(&bytes), 5).is_err());
    }
}
