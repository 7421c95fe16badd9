//! PDF Export Module
//!
//! Writes a laid-out report as a PDF file.
//!
//! # Architecture
//!
//! - `objects`: PDF object model (dictionaries, arrays, streams, references)
//! - `content`: content stream operators
//! - `fonts`: standard fonts and the embedded Type0 font
//! - `images`: image XObjects; also the layout's image sink
//! - `renderer`: converts a `PageRender` into a content stream
//! - `writer`: file structure and document assembly
//! - `api`: public entry point

mod api;
mod content;
mod fonts;
mod images;
mod objects;
mod renderer;
mod writer;

pub use api::*;
pub use images::ImageManager;
pub use writer::{PdfDocumentWriter, PdfError};
