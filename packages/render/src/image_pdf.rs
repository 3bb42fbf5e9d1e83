//! Stitching page images into a multi-page PDF.
//!
//! Each page becomes one Flate-compressed `DeviceRGB` image `XObject`
//! painted over the whole page. The page size in points is derived from the
//! pixel size and the given resolution.

use std::io::Write as _;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::RenderError;

/// Name the page image is registered under in each page's resources.
const IMAGE_NAME: &str = "Im0";

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Builds an in-memory PDF with one page per image.
///
/// # Errors
///
/// Returns [`RenderError::Pdf`] if the page content cannot be encoded, or
/// [`RenderError::Io`] if compression fails.
pub fn build_document(pages: &[RgbImage], dpi: f32) -> Result<Document, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let points_per_pixel = 72.0 / dpi;
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let (width, height) = page.dimensions();
        #[allow(clippy::cast_precision_loss)]
        let (width_pt, height_pt) = (
            width as f32 * points_per_pixel,
            height as f32 * points_per_pixel,
        );

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(page.as_raw())?,
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width_pt.into(),
                        0.into(),
                        0.into(),
                        height_pt.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(format!("failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), width_pt.into(), height_pt.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Writes `pages` to `output` as a single PDF.
///
/// # Errors
///
/// Returns a [`RenderError`] if the document cannot be built or saved.
pub fn write_image_pages(pages: &[RgbImage], dpi: f32, output: &Path) -> Result<(), RenderError> {
    let mut doc = build_document(pages, dpi)?;
    doc.save(output)
        .map_err(|e| RenderError::Pdf(format!("failed to save {}: {e}", output.display())))?;

    log::debug!("Wrote {} page(s) to {}", pages.len(), output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn writes_one_pdf_page_per_image() {
        let pages: Vec<RgbImage> = (0..3)
            .map(|_| RgbImage::from_pixel(20, 30, Rgb([255, 255, 255])))
            .collect();
        let path = std::env::temp_dir().join("oge_tools_render_image_pages.pdf");

        write_image_pages(&pages, 72.0, &path).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn page_size_follows_dpi() {
        let pages = vec![RgbImage::new(144, 72)];
        let doc = build_document(&pages, 144.0).unwrap();

        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();

        assert!((width - 72.0).abs() < f32::EPSILON);
        assert!((height - 36.0).abs() < f32::EPSILON);
    }
}
