//! Document.xml writer
//!
//! Converts the report outline to WordprocessingML. Headings map to the
//! `Title`, `Heading1` and `Heading2` styles by level, photos become inline
//! drawings followed by a `Caption` paragraph, and the section properties
//! carry the configured page size and margins. Pagination is left to the
//! word processor.

use crate::docx::error::DocxResult;
use crate::docx::media_writer::{generate_inline_drawing, MediaImage};
use crate::docx::namespaces;
use crate::docx::styles_writer::twips;
use crate::docx::writer::DocxWriter;
use layout_engine::{FlowBlock, PageConfig, ReportOutline, SkippedPhoto};
use quick_xml::escape::escape;
use report_model::Draft;
use std::io::{Seek, Write};

/// Width the logo is drawn at, in points
const LOGO_WIDTH: f64 = 120.0;

/// Room kept under a photo for its caption, in points
const CAPTION_ALLOWANCE: f64 = 30.0;

/// Style id of each heading level
fn heading_style(level: u8) -> &'static str {
    match level {
        0 => "Title",
        1 => "Heading1",
        _ => "Heading2",
    }
}

/// document.xml plus what happened to the images
#[derive(Debug)]
pub struct DocumentBody {
    pub xml: String,
    pub placed_photos: usize,
    pub skipped_photos: Vec<SkippedPhoto>,
    pub logo_placed: bool,
}

/// Writer for document.xml
pub struct DocumentWriter<'a> {
    page: &'a PageConfig,
    body: String,
}

impl<'a> DocumentWriter<'a> {
    pub fn new(page: &'a PageConfig) -> Self {
        Self {
            page,
            body: String::new(),
        }
    }

    /// Generate document.xml for `outline`, storing images through `docx`.
    ///
    /// `draft` must be the draft the outline was built from; photo blocks
    /// refer to it by index. An image that cannot be read or decoded is
    /// recorded as skipped and the document goes on without it.
    pub fn write<W: Write + Seek>(
        mut self,
        outline: &ReportOutline,
        draft: &Draft,
        logo: Option<&[u8]>,
        docx: &mut DocxWriter<W>,
    ) -> DocxResult<DocumentBody> {
        let mut logo_placed = false;
        if let Some(logo) = logo {
            match docx.add_image("logo", logo) {
                Ok(image) => {
                    let width = self.fit_width(&image, LOGO_WIDTH, 0.0);
                    self.picture(&image, width, "left");
                    logo_placed = true;
                }
                Err(e) => tracing::warn!("Logo not embedded: {}", e),
            }
        }

        let mut placed_photos = 0;
        let mut skipped_photos = Vec::new();

        for block in &outline.blocks {
            match block {
                FlowBlock::Heading { level, text } => self.heading(*level, text),
                FlowBlock::Field { label, value } => self.field(label, value),
                FlowBlock::Paragraph { text } => self.paragraph(text),
                FlowBlock::Photo {
                    section,
                    photo,
                    caption,
                    width,
                } => {
                    let Some(source) = draft
                        .sections()
                        .get(*section)
                        .and_then(|s| s.photos.get(*photo))
                    else {
                        continue;
                    };

                    let stored = match source.read_bytes() {
                        Ok(bytes) => docx.add_image(&source.name, &bytes),
                        Err(e) => Err(e.into()),
                    };
                    match stored {
                        Ok(image) => {
                            let width = self.fit_width(&image, *width, CAPTION_ALLOWANCE);
                            self.picture(&image, width, "center");
                            self.caption(caption);
                            placed_photos += 1;
                        }
                        Err(e) => {
                            tracing::warn!("Skipping photo {}: {}", source.name, e);
                            skipped_photos.push(SkippedPhoto {
                                section: *section,
                                photo: *photo,
                                name: source.name.clone(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        Ok(DocumentBody {
            xml: self.finish(),
            placed_photos,
            skipped_photos,
            logo_placed,
        })
    }

    fn heading(&mut self, level: u8, text: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            heading_style(level)
        ));
        push_run(&mut self.body, text, false);
        self.body.push_str("</w:p>");
    }

    /// Bold label, then the value
    fn field(&mut self, label: &str, value: &str) {
        self.body.push_str("<w:p>");
        push_run(&mut self.body, &format!("{}: ", label), true);
        push_lines(&mut self.body, value);
        self.body.push_str("</w:p>");
    }

    fn paragraph(&mut self, text: &str) {
        self.body.push_str("<w:p>");
        push_lines(&mut self.body, text);
        self.body.push_str("</w:p>");
    }

    /// Largest width up to `width` at which `image` fits the printable
    /// area with `reserve` points left below it
    fn fit_width(&self, image: &MediaImage, width: f64, reserve: f64) -> f64 {
        let width = width.min(self.page.content_width());
        let max_height = self.page.content_height() - reserve;
        let height = image.height_for_width(width);
        if height > max_height {
            width * max_height / height
        } else {
            width
        }
    }

    fn picture(&mut self, image: &MediaImage, width: f64, align: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:keepNext/><w:jc w:val="{}"/></w:pPr><w:r>"#,
            align
        ));
        self.body.push_str(&generate_inline_drawing(image, width));
        self.body.push_str("</w:r></w:p>");
    }

    fn caption(&mut self, text: &str) {
        self.body
            .push_str(r#"<w:p><w:pPr><w:pStyle w:val="Caption"/><w:jc w:val="center"/></w:pPr>"#);
        push_run(&mut self.body, text, false);
        self.body.push_str("</w:p>");
    }

    fn finish(self) -> String {
        let page = self.page;
        let mut xml = String::with_capacity(self.body.len() + 1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}">"#,
            namespaces::W,
            namespaces::R,
            namespaces::WP,
            namespaces::A,
            namespaces::PIC,
        ));
        xml.push_str("<w:body>");
        xml.push_str(&self.body);
        xml.push_str(&format!(
            r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
            twips(page.page_width),
            twips(page.page_height),
            twips(page.margin_top),
            twips(page.margin_right),
            twips(page.margin_bottom),
            twips(page.margin_left),
        ));
        xml.push_str("</w:body></w:document>");
        xml
    }
}

fn push_run(xml: &mut String, text: &str, bold: bool) {
    xml.push_str("<w:r>");
    if bold {
        xml.push_str("<w:rPr><w:b/></w:rPr>");
    }
    xml.push_str(&format!(
        r#"<w:t xml:space="preserve">{}</w:t>"#,
        escape(text)
    ));
    xml.push_str("</w:r>");
}

/// One run, with `<w:br/>` where the text has newlines
fn push_lines(xml: &mut String, text: &str) {
    xml.push_str("<w:r>");
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        xml.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape(line)
        ));
    }
    xml.push_str("</w:r>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::media_writer::points_to_emu;
    use chrono::NaiveDate;
    use layout_engine::ReportLabels;
    use report_model::{Photo, Section};
    use std::io::Cursor;

    fn write(draft: &Draft, logo: Option<&[u8]>) -> DocumentBody {
        let page = PageConfig::a4();
        let outline = ReportOutline::build(draft, &ReportLabels::english(), 300.0);
        let mut docx = DocxWriter::new(Cursor::new(Vec::new()));
        DocumentWriter::new(&page)
            .write(&outline, draft, logo, &mut docx)
            .unwrap()
    }

    fn draft() -> Draft {
        let mut draft = Draft::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        draft.client_name = "Dupont & Fils".into();
        draft
    }

    #[test]
    fn test_headings_use_level_styles() {
        let mut draft = draft();
        draft.push_participant(report_model::Participant::new("Ana", "", ""));
        draft.push_section(Section::new("Boiler room", "Line one\nLine <two>"));
        let body = write(&draft, None);

        assert!(body.xml.contains(r#"<w:pStyle w:val="Title"/></w:pPr><w:r><w:t xml:space="preserve">Site Visit Report</w:t>"#));
        assert!(body.xml.contains(r#"<w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">Participants</w:t>"#));
        assert!(body.xml.contains(r#"<w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t xml:space="preserve">Boiler room</w:t>"#));
        assert!(body.xml.contains("Dupont &amp; Fils"));
        assert!(body.xml.contains(r#"Line one</w:t><w:br/><w:t xml:space="preserve">Line &lt;two&gt;"#));
        assert!(body.xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    }

    #[test]
    fn test_bad_photo_and_logo_are_skipped() {
        let mut draft = draft();
        let idx = draft.new_section();
        draft
            .append_photos(idx, [Photo::from_bytes("broken.png", b"junk".to_vec())])
            .unwrap();
        let body = write(&draft, Some(b"junk logo"));

        assert_eq!(body.placed_photos, 0);
        assert_eq!(body.skipped_photos.len(), 1);
        assert_eq!(body.skipped_photos[0].name, "broken.png");
        assert!(!body.logo_placed);
        assert!(!body.xml.contains("<w:drawing>"));
        assert!(body.xml.contains("Untitled section"));
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    fn extent(xml: &str) -> (i64, i64) {
        let start = xml.find("<wp:extent cx=\"").unwrap() + "<wp:extent cx=\"".len();
        let rest = &xml[start..];
        let (cx, rest) = rest.split_once("\" cy=\"").unwrap();
        let (cy, _) = rest.split_once('"').unwrap();
        (cx.parse().unwrap(), cy.parse().unwrap())
    }

    #[test]
    fn test_tall_photo_fits_printable_height() {
        let mut draft = draft();
        let idx = draft.new_section();
        draft
            .append_photos(idx, [Photo::from_bytes("mast.jpg", jpeg(30, 400))])
            .unwrap();
        let body = write(&draft, None);
        assert_eq!(body.placed_photos, 1);

        let page = PageConfig::a4();
        let (cx, cy) = extent(&body.xml);
        let max_height = points_to_emu(page.content_height() - CAPTION_ALLOWANCE);
        assert!(cy <= max_height + 1, "{} > {}", cy, max_height);
        assert!(cy >= max_height - 1);
        assert!(cx < points_to_emu(300.0));
    }

    #[test]
    fn test_empty_draft_is_well_formed() {
        let body = write(&draft(), None);
        let mut reader = quick_xml::Reader::from_str(&body.xml);
        while !matches!(reader.read_event().unwrap(), quick_xml::events::Event::Eof) {}
    }
}
