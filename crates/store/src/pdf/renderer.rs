//! Render model to PDF content streams
//!
//! Layout coordinates run top-down from the page's top-left corner; PDF
//! user space runs bottom-up, so every y is flipped against the page height.
//! Graphics are painted before text so header bands sit under their titles.

use super::content::{ContentStream, TextRenderingMode};
use super::fonts::{EncodedText, FontManager};
use render_model::{PageRender, Rect, RenderItem, TextRun};

/// Stroke width for synthetic bold, relative to the font size
const SYNTHETIC_BOLD_STROKE: f64 = 0.03;

/// Build the content stream of one page
pub fn render_page(page: &PageRender, fonts: &mut FontManager) -> ContentStream {
    let mut content = ContentStream::new();
    let height = page.height;

    for item in &page.items {
        match item {
            RenderItem::Rectangle {
                bounds,
                fill,
                stroke,
                stroke_width,
            } => {
                if fill.is_none() && stroke.is_none() {
                    continue;
                }
                content.save_state();
                if let Some(fill) = fill {
                    content.set_fill_rgb(fill.to_unit());
                }
                if let Some(stroke) = stroke {
                    content.set_stroke_rgb(stroke.to_unit()).set_line_width(*stroke_width);
                }
                let (x, y, w, h) = flip_rect(bounds, height);
                content.rect(x, y, w, h);
                match (fill.is_some(), stroke.is_some()) {
                    (true, true) => content.fill_and_stroke(),
                    (true, false) => content.fill(),
                    _ => content.stroke(),
                };
                content.restore_state();
            }
            RenderItem::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                content
                    .save_state()
                    .set_stroke_rgb(color.to_unit())
                    .set_line_width(*width)
                    .move_to(*x1, height - y1)
                    .line_to(*x2, height - y2)
                    .stroke()
                    .restore_state();
            }
            RenderItem::Image(placement) => {
                let (x, y, w, h) = flip_rect(&placement.bounds, height);
                content
                    .save_state()
                    .transform(w, 0.0, 0.0, h, x, y)
                    .draw_xobject(&placement.resource_id)
                    .restore_state();
            }
            RenderItem::Text(_) => {}
        }
    }

    let mut runs = page.text_runs().filter(|run| !run.text.is_empty()).peekable();
    if runs.peek().is_some() {
        content.begin_text();
        for run in runs {
            write_run(&mut content, run, height, fonts);
        }
        content.end_text();
    }

    content
}

fn write_run(content: &mut ContentStream, run: &TextRun, page_height: f64, fonts: &mut FontManager) {
    let encoded = fonts.encode_run(&run.text, run.bold);
    let color = run.color.to_unit();

    content.set_font(&encoded.resource, run.font_size).set_fill_rgb(color);
    if encoded.synthetic_bold {
        content
            .set_stroke_rgb(color)
            .set_line_width(run.font_size * SYNTHETIC_BOLD_STROKE)
            .set_text_rendering_mode(TextRenderingMode::FillStroke);
    }
    content.set_text_position(run.x, page_height - run.y);
    match &encoded.text {
        EncodedText::Bytes(bytes) => content.show_bytes(bytes),
        EncodedText::Glyphs(glyphs) => content.show_glyphs(glyphs),
    };
    if encoded.synthetic_bold {
        content.set_text_rendering_mode(TextRenderingMode::Fill);
    }
}

/// Bottom-left origin and size of `rect` in PDF space
fn flip_rect(rect: &Rect, page_height: f64) -> (f64, f64, f64, f64) {
    (rect.x, page_height - rect.y - rect.height, rect.width, rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use render_model::{Color, ImagePlacement};
    use text_engine::ReportFont;

    fn render(page: &PageRender) -> String {
        let mut fonts = FontManager::new(ReportFont::Base);
        String::from_utf8(render_page(page, &mut fonts).into_bytes()).unwrap()
    }

    #[test]
    fn test_header_band_is_flipped() {
        let mut page = PageRender::new(0, 600.0, 800.0);
        page.push(RenderItem::Rectangle {
            bounds: Rect::new(0.0, 0.0, 600.0, 72.0),
            fill: Some(Color::BLACK),
            stroke: None,
            stroke_width: 0.0,
        });
        let out = render(&page);
        assert!(out.contains("0 0 0 rg\n0 728 600 72 re\nf\n"));
    }

    #[test]
    fn test_image_transform() {
        let mut page = PageRender::new(0, 600.0, 800.0);
        page.push(RenderItem::Image(ImagePlacement {
            resource_id: "Im0".to_string(),
            bounds: Rect::new(150.0, 100.0, 300.0, 225.0),
        }));
        let out = render(&page);
        assert!(out.contains("300 0 0 225 150 475 cm\n/Im0 Do\n"));
    }

    #[test]
    fn test_text_after_graphics() {
        let mut page = PageRender::new(0, 600.0, 800.0);
        page.push(RenderItem::Text(TextRun {
            text: "Title".to_string(),
            font_family: "Helvetica".to_string(),
            font_size: 20.0,
            bold: true,
            color: Color::WHITE,
            x: 40.0,
            y: 44.0,
        }));
        page.push(RenderItem::Line {
            x1: 40.0,
            y1: 100.0,
            x2: 560.0,
            y2: 100.0,
            color: Color::BLACK,
            width: 0.8,
        });
        let out = render(&page);
        let line = out.find(" l\n").unwrap();
        let text = out.find("BT\n").unwrap();
        assert!(line < text);
        assert!(out.contains("/F1 20 Tf\n1 1 1 rg\n1 0 0 1 40 756 Tm\n(Title) Tj\n"));
        assert!(!out.contains("Tr"));
    }

    #[test]
    fn test_empty_page_has_no_text_object() {
        let out = render(&PageRender::new(0, 600.0, 800.0));
        assert!(out.is_empty());
    }
}
