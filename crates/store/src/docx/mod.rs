//! DOCX Export Module
//!
//! Writes the report as a Microsoft Word DOCX file, the Office Open XML
//! format defined in ECMA-376.
//!
//! ## Structure
//!
//! A DOCX file is a ZIP archive containing XML files:
//! - `[Content_Types].xml` - Content type definitions
//! - `_rels/.rels` - Root relationships
//! - `word/document.xml` - Main document content
//! - `word/styles.xml` - Style definitions
//! - `word/_rels/document.xml.rels` - Document relationships
//! - `word/media/` - Embedded images

mod api;
mod content_types;
mod document_writer;
mod error;
mod media_writer;
mod relationships;
mod styles_writer;
mod writer;

pub use api::{render_docx, DocxOutput};
pub use error::{DocxError, DocxResult};

/// XML namespaces used in DOCX files
pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    /// DrawingML namespace
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    /// WordprocessingML Drawing namespace
    pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
    /// Picture namespace
    pub const PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
}

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// Content types for DOCX parts
pub mod content_type_values {
    pub const DOCUMENT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}
