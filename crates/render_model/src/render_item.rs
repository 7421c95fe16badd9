//! Render item types

use serde::{Deserialize, Serialize};

/// A rectangle in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Components scaled to 0.0..=1.0
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A single line of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text to draw, already sanitized for the target font
    pub text: String,
    /// Font family
    pub font_family: String,
    /// Font size in points
    pub font_size: f64,
    pub bold: bool,
    pub color: Color,
    /// Baseline start
    pub x: f64,
    pub y: f64,
}

/// An image drawn into a box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Resource ID assigned by the renderer when the image was registered
    pub resource_id: String,
    /// Where the image is drawn
    pub bounds: Rect,
}

/// A render item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderItem {
    Text(TextRun),
    Rectangle {
        bounds: Rect,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },
    Image(ImagePlacement),
}

/// Everything drawn on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRender {
    /// Zero-based page index
    pub page_index: usize,
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    pub items: Vec<RenderItem>,
}

impl PageRender {
    pub fn new(page_index: usize, width: f64, height: f64) -> Self {
        Self {
            page_index,
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    /// Placed images on this page
    pub fn images(&self) -> impl Iterator<Item = &ImagePlacement> {
        self.items.iter().filter_map(|item| match item {
            RenderItem::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Text runs on this page
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            RenderItem::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Full page rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let page = Rect::new(0.0, 0.0, 100.0, 200.0);
        assert!(page.contains(&Rect::new(10.0, 10.0, 50.0, 50.0)));
        assert!(!page.contains(&Rect::new(60.0, 180.0, 50.0, 50.0)));
    }

    #[test]
    fn test_color_to_unit() {
        assert_eq!(Color::WHITE.to_unit(), (1.0, 1.0, 1.0));
        assert_eq!(Color::BLACK.to_unit(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_page_filters() {
        let mut page = PageRender::new(0, 595.0, 842.0);
        page.push(RenderItem::Image(ImagePlacement {
            resource_id: "Im0".into(),
            bounds: Rect::new(40.0, 100.0, 200.0, 150.0),
        }));
        page.push(RenderItem::Text(TextRun {
            text: "Roof".into(),
            font_family: "Helvetica".into(),
            font_size: 12.0,
            bold: false,
            color: Color::BLACK,
            x: 40.0,
            y: 90.0,
        }));
        assert_eq!(page.images().count(), 1);
        assert_eq!(page.text_runs().next().map(|r| r.text.as_str()), Some("Roof"));
        assert!(page.bounds().contains(&page.images().next().unwrap().bounds));
    }

    #[test]
    fn test_serialized_tag() {
        let item = RenderItem::Line {
            x1: 0.0,
            y1: 1.0,
            x2: 2.0,
            y2: 1.0,
            color: Color::BLACK,
            width: 0.5,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"Line\""));
    }
}
