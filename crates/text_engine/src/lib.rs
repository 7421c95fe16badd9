//! Text Engine - Sanitizing, fonts, and metrics for report output
//!
//! Report text is free-form input typed on a phone or tablet. Before it
//! reaches a renderer it is mapped onto the character repertoire that
//! renderer can actually show, and measured with the font it will be
//! drawn in.
//!
//! # Modules
//!
//! - `sanitize`: repertoires and the one-for-one character substitution
//! - `winansi`: Windows-1252 encoding used by the standard PDF fonts
//! - `font`: extended TrueType font loading
//! - `metrics`: advance widths for the base and extended fonts

mod error;
mod font;
mod metrics;
mod sanitize;
pub mod winansi;

pub use error::*;
pub use font::*;
pub use metrics::*;
pub use sanitize::*;
