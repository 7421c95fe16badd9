//! PDF Writer
//!
//! This module handles the PDF file structure:
//! - Object numbering and cross-reference table
//! - File structure (header, body, xref, trailer)
//! - Stream compression
//! - Assembly of a whole report document from rendered pages

use super::content::ContentStream;
use super::fonts::FontManager;
use super::images::ImageManager;
use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::renderer::render_page;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use layout_engine::LayoutError;
use render_model::PageRender;
use std::io::{self, Write};
use thiserror::Error;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// PDF version written in the header
const PDF_VERSION: &str = "1.7";

/// Producer recorded in the info dictionary
const PRODUCER: &str = concat!("site-report ", env!("CARGO_PKG_VERSION"));

/// Low-level PDF file writer
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// (object number, byte offset)
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W, compress: bool) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            compress,
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Allocate a new object number
    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    /// Write the PDF header
    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", PDF_VERSION))?;
        // Binary marker so transfer tools treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    /// Write an indirect object
    pub fn write_object(&mut self, obj_num: u32, object: PdfObject) -> Result<()> {
        self.offsets.push((obj_num, self.position));
        self.write_str(&format!("{} 0 obj\n", obj_num))?;
        self.write_bytes(&object.to_bytes())?;
        self.write_str("\nendobj\n")
    }

    /// Write a stream object, compressing it when enabled
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.encoded {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&stream.data)?;
            stream.data = encoder.finish()?;
            stream.encoded = true;
            stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
        }
        stream.dict.insert("Length", stream.data.len() as i64);

        self.offsets.push((obj_num, self.position));
        self.write_str(&format!("{} 0 obj\n", obj_num))?;
        self.write_bytes(&PdfObject::Dictionary(stream.dict).to_bytes())?;
        self.write_str("\nstream\n")?;
        self.write_bytes(&stream.data)?;
        self.write_str("\nendstream\nendobj\n")
    }

    /// Write the cross-reference table and trailer
    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: u32) -> Result<()> {
        let xref_offset = self.position;

        let mut entries = std::mem::take(&mut self.offsets);
        entries.sort_by_key(|(num, _)| *num);

        self.write_str("xref\n")?;
        self.write_str(&format!("0 {}\n", self.next_obj_num))?;
        self.write_str("0000000000 65535 f \n")?;

        let mut expected_num = 1u32;
        for (obj_num, offset) in &entries {
            // Allocated but never written
            while expected_num < *obj_num {
                self.write_str("0000000000 65535 f \n")?;
                expected_num += 1;
            }
            self.write_str(&format!("{:010} {:05} n \n", offset, 0))?;
            expected_num = obj_num + 1;
        }
        while expected_num < self.next_obj_num {
            self.write_str("0000000000 65535 f \n")?;
            expected_num += 1;
        }

        let trailer = PdfDictionary::new()
            .with("Size", self.next_obj_num)
            .with("Root", PdfObject::Reference(catalog_ref))
            .with("Info", PdfObject::Reference(info_ref));
        self.write_str("trailer\n")?;
        self.write_bytes(&PdfObject::Dictionary(trailer).to_bytes())?;
        self.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise
fn text_string(text: &str) -> PdfObject {
    if text.is_ascii() {
        return PdfObject::string(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    PdfObject::String(bytes)
}

/// Assembles laid-out report pages into a PDF file
pub struct PdfDocumentWriter {
    compress: bool,
    title: Option<String>,
}

impl PdfDocumentWriter {
    pub fn new(compress: bool) -> Self {
        Self {
            compress,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Write a complete document.
    ///
    /// Page content is rendered before any object is written so that the
    /// embedded font only lists glyphs the pages use.
    pub fn write<W: Write>(
        &self,
        pages: &[PageRender],
        fonts: &mut FontManager,
        images: &ImageManager,
        writer: W,
    ) -> Result<W> {
        if pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let contents: Vec<ContentStream> = pages.iter().map(|p| render_page(p, fonts)).collect();

        let mut pdf = PdfWriter::new(writer, self.compress);
        pdf.write_header()?;

        let catalog_ref = pdf.allocate_object();
        let pages_ref = pdf.allocate_object();
        let info_ref = pdf.allocate_object();

        let catalog = PdfDictionary::typed("Catalog").with("Pages", PdfObject::Reference(pages_ref));
        pdf.write_object(catalog_ref, catalog.into())?;

        let mut info = PdfDictionary::new().with("Producer", PdfObject::string(PRODUCER));
        if let Some(title) = &self.title {
            info.insert("Title", text_string(title));
        }
        pdf.write_object(info_ref, info.into())?;

        let font_refs = fonts.write_fonts(&mut pdf)?;
        let image_refs = images.write_images(&mut pdf)?;

        let mut resources = PdfDictionary::new();
        if !font_refs.is_empty() {
            let mut font_dict = PdfDictionary::new();
            for (name, obj) in &font_refs {
                font_dict.insert(name.clone(), PdfObject::Reference(*obj));
            }
            resources.insert("Font", font_dict);
        }
        if !image_refs.is_empty() {
            let mut xobjects = PdfDictionary::new();
            for (name, obj) in &image_refs {
                xobjects.insert(name.clone(), PdfObject::Reference(*obj));
            }
            resources.insert("XObject", xobjects);
        }

        let mut kids = Vec::with_capacity(pages.len());
        for (page, content) in pages.iter().zip(contents) {
            let page_ref = pdf.allocate_object();
            let content_ref = pdf.allocate_object();
            pdf.write_stream_object(content_ref, PdfStream::new(content.into_bytes()))?;

            let page_dict = PdfDictionary::typed("Page")
                .with("Parent", PdfObject::Reference(pages_ref))
                .with("MediaBox", PdfObject::reals(&[0.0, 0.0, page.width, page.height]))
                .with("Resources", resources.clone())
                .with("Contents", PdfObject::Reference(content_ref));
            pdf.write_object(page_ref, page_dict.into())?;
            kids.push(PdfObject::Reference(page_ref));
        }

        let pages_dict = PdfDictionary::typed("Pages")
            .with("Count", pages.len() as i64)
            .with("Kids", kids);
        pdf.write_object(pages_ref, pages_dict.into())?;

        pdf.write_xref_and_trailer(catalog_ref, info_ref)?;
        pdf.finish()
    }

    /// Write the document into memory
    pub fn write_to_bytes(
        &self,
        pages: &[PageRender],
        fonts: &mut FontManager,
        images: &ImageManager,
    ) -> Result<Vec<u8>> {
        self.write(pages, fonts, images, Vec::new())
    }
}
