//! Page geometry

use crate::error::{LayoutError, Result};
use render_model::Rect;
use serde::{Deserialize, Serialize};

/// Smallest content area accepted, in points
const MIN_CONTENT_EXTENT: f64 = 72.0;

/// Standard page sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// A4 (210mm x 297mm)
    A4,
    /// US Letter (8.5" x 11")
    Letter,
    /// Legal (8.5" x 14")
    Legal,
    /// Custom size in points
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// Get the width and height in points
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.276, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Page dimensions and margins in points
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub page_size: PageSize,
    pub page_width: f64,
    pub page_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
}

impl PageConfig {
    /// Page of `page_size` with the same margin on every side
    pub fn new(page_size: PageSize, margin: f64) -> Self {
        let (page_width, page_height) = page_size.dimensions();
        Self {
            page_size,
            page_width,
            page_height,
            margin_top: margin,
            margin_bottom: margin,
            margin_left: margin,
            margin_right: margin,
        }
    }

    pub fn a4() -> Self {
        Self::new(PageSize::A4, 40.0)
    }

    pub fn letter() -> Self {
        Self::new(PageSize::Letter, 40.0)
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f64 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Lowest y content may reach
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin_bottom
    }

    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.margin_left,
            self.margin_top,
            self.content_width(),
            self.content_height(),
        )
    }

    /// Reject pages whose margins leave no usable room
    pub fn validate(&self) -> Result<()> {
        if !(self.page_width.is_finite() && self.page_height.is_finite()) {
            return Err(LayoutError::InvalidPageSetup(
                "page dimensions must be finite".to_string(),
            ));
        }
        if self.content_width() < MIN_CONTENT_EXTENT || self.content_height() < MIN_CONTENT_EXTENT {
            return Err(LayoutError::InvalidPageSetup(format!(
                "content area {:.1}x{:.1}pt is too small",
                self.content_width(),
                self.content_height()
            )));
        }
        Ok(())
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::a4()
    }
}
