//! Store - Draft persistence and report export
//!
//! This crate saves and restores report drafts (photos included, as
//! base64 text), loads settings and optional resources, and renders a
//! draft as PDF, DOCX, or plain text.

mod draft_store;
mod error;
mod export;
mod resources;
mod settings;
mod snapshot;
mod text_export;
pub mod docx;
pub mod pdf;

pub use draft_store::*;
pub use error::*;
pub use export::*;
pub use resources::*;
pub use settings::*;
pub use snapshot::{
    decode, encode, DatePolicy, Decoded, DraftSnapshot, Encoded, ParticipantSnapshot,
    PhotoSnapshot, SectionSnapshot, SkippedAttachment, SnapshotError, SNAPSHOT_FORMAT_VERSION,
};
pub use text_export::render_text;

pub use docx::{render_docx, DocxError, DocxOutput, DocxResult};
pub use pdf::{render_pdf, PdfError, PdfOutput};
