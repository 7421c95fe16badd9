//! Render Model - Positioned page content
//!
//! The layout engine emits one [`PageRender`] per page. Renderers draw the
//! items in order. Coordinates are points with the origin at the top-left
//! corner of the page.

mod render_item;

pub use render_item::*;
