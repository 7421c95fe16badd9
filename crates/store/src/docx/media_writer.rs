//! Media writer for DOCX files
//!
//! Photos go into `word/media/` and are referenced from inline drawings.
//! PNG, JPEG, GIF and BMP payloads are stored as they are; any other format
//! the `image` crate can read is converted to PNG first.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::namespaces;
use image::{ImageFormat, ImageReader};
use quick_xml::escape::escape;
use std::io::Cursor;

/// EMUs per point (914400 per inch)
const EMU_PER_POINT: f64 = 12700.0;

/// An image payload ready to be stored in the package
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub data: Vec<u8>,
    pub extension: &'static str,
    pub content_type: &'static str,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// An image stored in the package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaImage {
    /// Relationship id from document.xml
    pub rel_id: String,
    /// Drawing object id, unique within the document
    pub doc_pr_id: u32,
    pub name: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl MediaImage {
    /// Height in points when drawn `width` points wide
    pub fn height_for_width(&self, width: f64) -> f64 {
        if self.pixel_width == 0 {
            return width;
        }
        width * self.pixel_height as f64 / self.pixel_width as f64
    }
}

/// Names and numbers media parts
#[derive(Debug, Default)]
pub struct MediaWriter {
    count: u32,
}

impl MediaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` fully and pick how to store them
    pub fn prepare(bytes: &[u8]) -> DocxResult<PreparedImage> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| DocxError::ImageError("unrecognized image format".to_string()))?;
        let decoded = reader.decode()?;
        let (pixel_width, pixel_height) = (decoded.width(), decoded.height());
        if pixel_width == 0 || pixel_height == 0 {
            return Err(DocxError::ImageError("image has no pixels".to_string()));
        }

        let stored = match format {
            ImageFormat::Png => Some(("png", "image/png")),
            ImageFormat::Jpeg => Some(("jpeg", "image/jpeg")),
            ImageFormat::Gif => Some(("gif", "image/gif")),
            ImageFormat::Bmp => Some(("bmp", "image/bmp")),
            _ => None,
        };
        let (data, extension, content_type) = match stored {
            Some((extension, content_type)) => (bytes.to_vec(), extension, content_type),
            None => {
                let mut png = Cursor::new(Vec::new());
                decoded.write_to(&mut png, ImageFormat::Png)?;
                (png.into_inner(), "png", "image/png")
            }
        };

        Ok(PreparedImage {
            data,
            extension,
            content_type,
            pixel_width,
            pixel_height,
        })
    }

    /// Next media file name ("image1.png", "image2.jpeg", ...) and its
    /// drawing id
    pub fn next_file_name(&mut self, extension: &str) -> (String, u32) {
        self.count += 1;
        (format!("image{}.{}", self.count, extension), self.count)
    }
}

/// Generate a w:drawing element for an inline image `width` points wide
pub fn generate_inline_drawing(image: &MediaImage, width: f64) -> String {
    let cx = points_to_emu(width);
    let cy = points_to_emu(image.height_for_width(width));
    let name = escape(image.name.as_str());

    format!(
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{id}" name="{name}" descr="{name}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="{a}" noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic xmlns:a="{a}"><a:graphicData uri="{pic}">"#,
            r#"<pic:pic xmlns:pic="{pic}">"#,
            r#"<pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        ),
        cx = cx,
        cy = cy,
        id = image.doc_pr_id,
        name = name,
        a = namespaces::A,
        pic = namespaces::PIC,
        rel = image.rel_id,
    )
}

/// Convert points to EMUs (English Metric Units)
pub fn points_to_emu(points: f64) -> i64 {
    (points * EMU_PER_POINT).round() as i64
}
