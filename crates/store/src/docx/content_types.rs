//! [Content_Types].xml generation
//!
//! Declares the content type of every part in the package.

use crate::docx::content_type_values;
use quick_xml::escape::escape;
use std::collections::BTreeMap;

/// Content types of a DOCX package
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Default content types by extension (e.g., "xml" -> "application/xml")
    pub defaults: BTreeMap<String, String>,
    /// Override content types by part name (e.g., "/word/document.xml" -> "...")
    pub overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Content types with the `rels` and `xml` defaults
    pub fn new() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", content_type_values::RELATIONSHIPS);
        ct.add_default("xml", "application/xml");
        ct
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }

    /// Add an override for a specific part
    pub fn add_override(&mut self, part_name: &str, content_type: &str) {
        let normalized = if part_name.starts_with('/') {
            part_name.to_string()
        } else {
            format!("/{}", part_name)
        };
        self.overrides.insert(normalized, content_type.to_string());
    }

    /// Generate XML content for [Content_Types].xml
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);

        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(ext.as_str()),
                escape(ct.as_str())
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape(part.as_str()),
                escape(ct.as_str())
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

/// Content types for a new report package
pub fn create_default_content_types() -> ContentTypes {
    let mut ct = ContentTypes::new();
    ct.add_override("/word/document.xml", content_type_values::DOCUMENT);
    ct.add_override("/word/styles.xml", content_type_values::STYLES);
    ct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types_creation() {
        let ct = ContentTypes::new();
        assert!(ct.defaults.contains_key("rels"));
        assert!(ct.defaults.contains_key("xml"));
        assert!(ct.overrides.is_empty());
    }

    #[test]
    fn test_defaults_are_lowercased() {
        let mut ct = create_default_content_types();
        ct.add_default("PNG", "image/png");
        assert_eq!(ct.defaults.get("png").map(String::as_str), Some("image/png"));
        assert!(ct.overrides.contains_key("/word/document.xml"));
        ct.add_override("word/header1.xml", "application/xml");
        assert!(ct.overrides.contains_key("/word/header1.xml"));
    }

    #[test]
    fn test_to_xml_is_sorted() {
        let mut ct = create_default_content_types();
        ct.add_default("jpeg", "image/jpeg");
        let xml = ct.to_xml();
        let jpeg = xml.find(r#"Extension="jpeg""#).unwrap();
        let rels = xml.find(r#"Extension="rels""#).unwrap();
        assert!(jpeg < rels);
        assert!(xml.contains(r#"<Override PartName="/word/styles.xml""#));
        assert!(xml.ends_with("</Types>"));
    }
}
