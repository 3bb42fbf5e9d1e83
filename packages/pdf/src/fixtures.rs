//! Small in-memory PDFs for tests.
//!
//! Every page gets its own font resource named `F1` and shows its lines at
//! 12pt, starting at (72, 760) and moving down 30pt per line, on an A4
//! media box.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use pdf_extract::{Dictionary, Document, Object, ObjectId, Stream};

use crate::PdfError;

const FONT_SIZE: i64 = 12;
const LINE_STEP: i64 = 30;
const MEDIA_BOX: [i64; 4] = [0, 0, 595, 842];

/// Font used to show a fixture page's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFont {
    /// The core `Courier` font with single-byte codes. ASCII text only.
    Courier,
    /// A `Type0` font with `Identity-H` two-byte codes and a `ToUnicode`
    /// map, the way Cyrillic text is usually embedded.
    Identity,
    /// A `Type0` font without `DescendantFonts`.
    Broken,
}

/// Builder for a multi-page PDF.
#[derive(Debug, Default)]
pub struct PdfFixture {
    pages: Vec<(FixtureFont, Vec<String>)>,
}

impl PdfFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a page showing `lines` in `font`.
    #[must_use]
    pub fn page(mut self, font: FixtureFont, lines: &[&str]) -> Self {
        self.pages
            .push((font, lines.iter().map(|l| (*l).to_owned()).collect()));
        self
    }

    /// Serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the document cannot be written.
    pub fn build(&self) -> Result<Vec<u8>, PdfError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for (font, lines) in &self.pages {
            let page_id = add_page(&mut doc, pages_id, *font, lines);
            kids.push(Object::Reference(page_id));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        let mut pages = Dictionary::new();
        pages.set("Type", name("Pages"));
        pages.set("Kids", Object::Array(kids));
        pages.set("Count", Object::Integer(count));
        pages.set("MediaBox", media_box());
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", name("Catalog"));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn media_box() -> Object {
    Object::Array(MEDIA_BOX.iter().map(|&v| Object::Integer(v)).collect())
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    font: FixtureFont,
    lines: &[String],
) -> ObjectId {
    let codes = glyph_codes(lines);
    let font_id = match font {
        FixtureFont::Courier => add_courier(doc),
        FixtureFont::Identity => add_identity(doc, &codes),
        FixtureFont::Broken => add_broken(doc),
    };

    let mut operations = format!("BT\n/F1 {FONT_SIZE} Tf\n72 760 Td\n");
    for line in lines {
        match font {
            FixtureFont::Identity => {
                operations.push('<');
                for c in line.chars() {
                    let _ = write!(operations, "{:04X}", codes.get(&c).copied().unwrap_or(0));
                }
                operations.push_str("> Tj\n");
            }
            FixtureFont::Courier | FixtureFont::Broken => {
                operations.push('(');
                for c in line.chars() {
                    if matches!(c, '(' | ')' | '\\') {
                        operations.push('\\');
                    }
                    operations.push(c);
                }
                operations.push_str(") Tj\n");
            }
        }
        let _ = writeln!(operations, "0 -{LINE_STEP} Td");
    }
    operations.push_str("ET\n");

    let content_id = doc.add_object(Object::Stream(Stream::new(
        Dictionary::new(),
        operations.into_bytes(),
    )));

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let mut page = Dictionary::new();
    page.set("Type", name("Page"));
    page.set("Parent", Object::Reference(pages_id));
    page.set("MediaBox", media_box());
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Reference(content_id));
    doc.add_object(Object::Dictionary(page))
}

/// Assigns two-byte codes, starting at 1, to the distinct characters of
/// `lines` in order of first use.
fn glyph_codes(lines: &[String]) -> BTreeMap<char, u16> {
    let mut codes = BTreeMap::new();
    for c in lines.iter().flat_map(|l| l.chars()) {
        let next = u16::try_from(codes.len() + 1).unwrap_or(u16::MAX);
        codes.entry(c).or_insert(next);
    }
    codes
}

fn add_courier(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", name("Font"));
    font.set("Subtype", name("Type1"));
    font.set("BaseFont", name("Courier"));
    doc.add_object(Object::Dictionary(font))
}

fn add_broken(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", name("Font"));
    font.set("Subtype", name("Type0"));
    font.set("BaseFont", name("Broken"));
    font.set("Encoding", name("Identity-H"));
    doc.add_object(Object::Dictionary(font))
}

fn add_identity(doc: &mut Document, codes: &BTreeMap<char, u16>) -> ObjectId {
    let mut descriptor = Dictionary::new();
    descriptor.set("Type", name("FontDescriptor"));
    descriptor.set("FontName", name("FixtureSans"));
    descriptor.set("Flags", Object::Integer(32));
    descriptor.set(
        "FontBBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(-200),
            Object::Integer(1000),
            Object::Integer(900),
        ]),
    );
    descriptor.set("ItalicAngle", Object::Integer(0));
    descriptor.set("Ascent", Object::Integer(900));
    descriptor.set("Descent", Object::Integer(-200));
    descriptor.set("CapHeight", Object::Integer(700));
    descriptor.set("StemV", Object::Integer(80));
    let descriptor_id = doc.add_object(Object::Dictionary(descriptor));

    let mut system_info = Dictionary::new();
    system_info.set("Registry", Object::string_literal("Adobe"));
    system_info.set("Ordering", Object::string_literal("Identity"));
    system_info.set("Supplement", Object::Integer(0));

    let mut cid_font = Dictionary::new();
    cid_font.set("Type", name("Font"));
    cid_font.set("Subtype", name("CIDFontType2"));
    cid_font.set("BaseFont", name("FixtureSans"));
    cid_font.set("CIDSystemInfo", Object::Dictionary(system_info));
    cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
    cid_font.set("DW", Object::Integer(1000));
    let cid_font_id = doc.add_object(Object::Dictionary(cid_font));

    let to_unicode_id = doc.add_object(Object::Stream(Stream::new(
        Dictionary::new(),
        to_unicode_cmap(codes).into_bytes(),
    )));

    let mut font = Dictionary::new();
    font.set("Type", name("Font"));
    font.set("Subtype", name("Type0"));
    font.set("BaseFont", name("FixtureSans"));
    font.set("Encoding", name("Identity-H"));
    font.set(
        "DescendantFonts",
        Object::Array(vec![Object::Reference(cid_font_id)]),
    );
    font.set("ToUnicode", Object::Reference(to_unicode_id));
    doc.add_object(Object::Dictionary(font))
}

fn to_unicode_cmap(codes: &BTreeMap<char, u16>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(u16, char)> = codes.iter().map(|(&c, &code)| (code, c)).collect();
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (code, c) in chunk {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            let _ = writeln!(cmap, "<{code:04X}> <{hex}>");
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}
