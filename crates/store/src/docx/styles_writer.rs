//! Styles.xml writer
//!
//! The report uses a fixed set of paragraph styles: `Normal`, `Title` for
//! the report title, `Heading1` for the participants block, `Heading2` for
//! section titles (with a rule underneath), and `Caption` under photos.

use crate::docx::namespaces;
use layout_engine::ReportStyle;
use render_model::Color;

/// A paragraph style definition
struct ParagraphStyle {
    id: &'static str,
    name: &'static str,
    outline_level: Option<u8>,
    size_pt: f64,
    bold: bool,
    italic: bool,
    color: Option<Color>,
    space_before_pt: f64,
    keep_next: bool,
    bottom_rule: Option<Color>,
}

/// Writer for styles.xml
pub struct StylesWriter<'a> {
    style: &'a ReportStyle,
}

impl<'a> StylesWriter<'a> {
    pub fn new(style: &'a ReportStyle) -> Self {
        Self { style }
    }

    /// Generate styles.xml content
    pub fn write(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, namespaces::W));

        self.write_doc_defaults(&mut xml);
        xml.push_str(concat!(
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">"#,
            r#"<w:name w:val="Normal"/><w:qFormat/></w:style>"#,
        ));
        for style in self.paragraph_styles() {
            write_style(&mut xml, &style);
        }

        xml.push_str("</w:styles>");
        xml
    }

    /// Document defaults
    fn write_doc_defaults(&self, xml: &mut String) {
        xml.push_str("<w:docDefaults>");
        xml.push_str("<w:rPrDefault><w:rPr>");
        xml.push_str(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#);
        xml.push_str(&format!(
            r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
            half_points(self.style.body_size)
        ));
        xml.push_str("</w:rPr></w:rPrDefault>");
        xml.push_str("<w:pPrDefault><w:pPr>");
        xml.push_str(r#"<w:spacing w:after="160" w:line="259" w:lineRule="auto"/>"#);
        xml.push_str("</w:pPr></w:pPrDefault>");
        xml.push_str("</w:docDefaults>");
    }

    fn paragraph_styles(&self) -> [ParagraphStyle; 4] {
        let style = self.style;
        [
            ParagraphStyle {
                id: "Title",
                name: "Title",
                outline_level: None,
                size_pt: style.title_size * 1.4,
                bold: true,
                italic: false,
                color: Some(style.header_fill),
                space_before_pt: 0.0,
                keep_next: true,
                bottom_rule: None,
            },
            ParagraphStyle {
                id: "Heading1",
                name: "heading 1",
                outline_level: Some(0),
                size_pt: style.heading_size + 2.0,
                bold: true,
                italic: false,
                color: Some(style.heading_color),
                space_before_pt: style.block_gap * 2.0,
                keep_next: true,
                bottom_rule: None,
            },
            ParagraphStyle {
                id: "Heading2",
                name: "heading 2",
                outline_level: Some(1),
                size_pt: style.heading_size,
                bold: true,
                italic: false,
                color: Some(style.heading_color),
                space_before_pt: style.block_gap,
                keep_next: true,
                bottom_rule: Some(style.rule_color),
            },
            ParagraphStyle {
                id: "Caption",
                name: "caption",
                outline_level: None,
                size_pt: style.caption_size,
                bold: false,
                italic: true,
                color: Some(style.caption_color),
                space_before_pt: 0.0,
                keep_next: false,
                bottom_rule: None,
            },
        ]
    }
}

fn write_style(xml: &mut String, style: &ParagraphStyle) {
    xml.push_str(&format!(
        r#"<w:style w:type="paragraph" w:styleId="{}"><w:name w:val="{}"/>"#,
        style.id, style.name
    ));
    xml.push_str(r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#);

    xml.push_str("<w:pPr>");
    if style.keep_next {
        xml.push_str("<w:keepNext/>");
    }
    if let Some(color) = style.bottom_rule {
        xml.push_str(&format!(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="{}"/></w:pBdr>"#,
            hex(color)
        ));
    }
    xml.push_str(&format!(
        r#"<w:spacing w:before="{}" w:after="120"/>"#,
        twips(style.space_before_pt)
    ));
    if let Some(level) = style.outline_level {
        xml.push_str(&format!(r#"<w:outlineLvl w:val="{}"/>"#, level));
    }
    xml.push_str("</w:pPr>");

    xml.push_str("<w:rPr>");
    if style.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    if style.italic {
        xml.push_str("<w:i/><w:iCs/>");
    }
    if let Some(color) = style.color {
        xml.push_str(&format!(r#"<w:color w:val="{}"/>"#, hex(color)));
    }
    xml.push_str(&format!(
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        half_points(style.size_pt)
    ));
    xml.push_str("</w:rPr>");

    xml.push_str("</w:style>");
}

fn hex(color: Color) -> String {
    format!("{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

/// Font sizes are written in half-points
fn half_points(points: f64) -> i64 {
    (points * 2.0).round() as i64
}

/// Spacing is written in twentieths of a point
pub fn twips(points: f64) -> i64 {
    (points * 20.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_styles_present() {
        let style = ReportStyle::default();
        let xml = StylesWriter::new(&style).write();
        for id in ["Normal", "Title", "Heading1", "Heading2", "Caption"] {
            assert!(xml.contains(&format!(r#"w:styleId="{}""#, id)), "missing {}", id);
        }
        assert!(xml.contains(r#"<w:sz w:val="22"/>"#));
        assert!(xml.contains(r#"<w:color w:val="003366"/>"#));
        assert!(xml.contains(r#"<w:outlineLvl w:val="1"/>"#));
        assert!(xml.ends_with("</w:styles>"));
    }

    #[test]
    fn test_units() {
        assert_eq!(half_points(10.5), 21);
        assert_eq!(twips(12.0), 240);
        assert_eq!(hex(Color::rgb(255, 0, 16)), "FF0010");
    }
}
