//! Layout Engine - Page and flow layout for site-visit reports
//!
//! This crate decides where report content goes. For paginated output the
//! [`ReportLayouter`] walks the draft once, breaking pages and placing
//! photos so none is split across a page. For flow output the
//! [`ReportOutline`] lists the same content as headings, paragraphs, and
//! inline photos and leaves pagination to the consumer.

mod error;
mod image_sink;
mod line_breaker;
mod outline;
mod page;
mod report_layout;
mod style;

pub use error::*;
pub use image_sink::*;
pub use line_breaker::*;
pub use outline::*;
pub use page::*;
pub use report_layout::*;
pub use style::*;
