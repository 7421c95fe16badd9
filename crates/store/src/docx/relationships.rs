//! Relationships (.rels) generation
//!
//! DOCX uses relationships to connect parts of the package together.

use crate::docx::relationship_types;
use quick_xml::escape::escape;

/// A single internal relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique ID within the rels file (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part
    pub target: String,
}

/// Relationships of one part, in insertion order
#[derive(Debug, Clone)]
pub struct Relationships {
    relationships: Vec<Relationship>,
    next_id: u32,
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new()
    }
}

impl Relationships {
    pub fn new() -> Self {
        Self {
            relationships: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a relationship and return its ID
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.next_id);
        self.next_id += 1;
        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// Generate XML content for the .rels file
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        for rel in &self.relationships {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                rel.id,
                escape(rel.rel_type.as_str()),
                escape(rel.target.as_str())
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Package-level relationships: the main document
pub fn create_root_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(relationship_types::DOCUMENT, "word/document.xml");
    rels
}

/// Document relationships before any image is added
pub fn create_document_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(relationship_types::STYLES, "styles.xml");
    rels
}
