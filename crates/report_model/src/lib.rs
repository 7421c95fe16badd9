//! Report Model - In-memory draft of a site-visit report
//!
//! A [`Draft`] owns everything the technician enters while on site: the
//! client and visit details, the people who attended, and an ordered list
//! of observation [`Section`]s, each with free text and photos.
//!
//! # Modules
//!
//! - `draft`: the root aggregate and its list operations
//! - `section`: observation blocks and photo list operations
//! - `participant`: attendee contact entries
//! - `photo`: photo metadata and media type inference
//! - `attachment`: photo payload sources

mod attachment;
mod draft;
mod error;
mod participant;
mod photo;
mod section;

pub use attachment::*;
pub use draft::*;
pub use error::*;
pub use participant::*;
pub use photo::*;
pub use section::*;
