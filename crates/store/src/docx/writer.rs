//! DOCX Writer Infrastructure
//!
//! Creates ZIP archives with the DOCX package structure. Every entry gets
//! the same fixed timestamp so identical reports produce identical bytes.

use crate::docx::content_types::{create_default_content_types, ContentTypes};
use crate::docx::error::DocxResult;
use crate::docx::media_writer::{MediaImage, MediaWriter};
use crate::docx::relationship_types;
use crate::docx::relationships::{create_document_rels, create_root_rels, Relationships};
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Main DOCX writer
pub struct DocxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    content_types: ContentTypes,
    root_rels: Relationships,
    doc_rels: Relationships,
    media: MediaWriter,
}

impl<W: Write + Seek> DocxWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            content_types: create_default_content_types(),
            root_rels: create_root_rels(),
            doc_rels: create_document_rels(),
            media: MediaWriter::new(),
        }
    }

    /// Store an image under `word/media/` and relate it to the document.
    ///
    /// Nothing is written when the payload cannot be decoded.
    pub fn add_image(&mut self, name: &str, bytes: &[u8]) -> DocxResult<MediaImage> {
        let prepared = MediaWriter::prepare(bytes)?;
        let (file_name, doc_pr_id) = self.media.next_file_name(prepared.extension);

        self.write_binary(&format!("word/media/{}", file_name), &prepared.data)?;
        self.content_types
            .add_default(prepared.extension, prepared.content_type);
        let rel_id = self
            .doc_rels
            .add(relationship_types::IMAGE, &format!("media/{}", file_name));

        Ok(MediaImage {
            rel_id,
            doc_pr_id,
            name: name.to_string(),
            pixel_width: prepared.pixel_width,
            pixel_height: prepared.pixel_height,
        })
    }

    /// Write the remaining parts and close the archive
    pub fn finish(mut self, document_xml: &str, styles_xml: &str) -> DocxResult<W> {
        self.write_file("word/document.xml", document_xml)?;
        self.write_file("word/styles.xml", styles_xml)?;

        let root_rels_xml = self.root_rels.to_xml();
        self.write_file("_rels/.rels", &root_rels_xml)?;
        let doc_rels_xml = self.doc_rels.to_xml();
        self.write_file("word/_rels/document.xml.rels", &doc_rels_xml)?;

        // Last, so it lists every media extension
        let content_types_xml = self.content_types.to_xml();
        self.write_file("[Content_Types].xml", &content_types_xml)?;

        Ok(self.zip.finish()?)
    }

    /// Write a text part to the ZIP archive
    pub fn write_file(&mut self, path: &str, content: &str) -> DocxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write binary data to the ZIP archive
    pub fn write_binary(&mut self, path: &str, data: &[u8]) -> DocxResult<()> {
        // Images are already compressed
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());
        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn png() -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(2, 2)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_parts() {
        let mut writer = DocxWriter::new(Cursor::new(Vec::new()));
        let image = writer.add_image("site.png", &png()).unwrap();
        assert_eq!(image.rel_id, "rId2");
        let bytes = writer.finish("<doc/>", "<styles/>").unwrap().into_inner();

        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "word/media/image1.png",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
        assert!(read_entry(&bytes, "[Content_Types].xml").contains(r#"Extension="png""#));
        assert!(read_entry(&bytes, "word/_rels/document.xml.rels").contains("media/image1.png"));
    }

    #[test]
    fn test_bad_image_writes_nothing() {
        let mut writer = DocxWriter::new(Cursor::new(Vec::new()));
        assert!(writer.add_image("bad.jpg", b"nope").is_err());
        let bytes = writer.finish("<doc/>", "<styles/>").unwrap().into_inner();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 5);
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = || {
            let mut writer = DocxWriter::new(Cursor::new(Vec::new()));
            writer.add_image("a.png", &png()).unwrap();
            writer.finish("<doc/>", "<styles/>").unwrap().into_inner()
        };
        assert_eq!(build(), build());
    }
}
