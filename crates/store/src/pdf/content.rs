//! PDF content stream builder
//!
//! Operators are appended as text lines. Coordinates passed in are already
//! in PDF space (origin bottom-left).

use super::objects::{format_real, write_literal_string};

/// Text rendering modes (Tr)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRenderingMode {
    Fill = 0,
    /// Fill then stroke the outline; used for synthetic bold
    FillStroke = 2,
}

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    // Graphics state

    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    /// Concatenate a transformation matrix (cm)
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "cm")
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(&[width], "w")
    }

    pub fn set_fill_rgb(&mut self, (r, g, b): (f64, f64, f64)) -> &mut Self {
        self.op(&[r, g, b], "rg")
    }

    pub fn set_stroke_rgb(&mut self, (r, g, b): (f64, f64, f64)) -> &mut Self {
        self.op(&[r, g, b], "RG")
    }

    // Paths

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "m")
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "l")
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(&[x, y, width, height], "re")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(&[], "S")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(&[], "f")
    }

    pub fn fill_and_stroke(&mut self) -> &mut Self {
        self.op(&[], "B")
    }

    // Text

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(&[], "BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(&[], "ET")
    }

    /// Select font resource `name` at `size` (Tf)
    pub fn set_font(&mut self, name: &str, size: f64) -> &mut Self {
        self.data.push(b'/');
        self.data.extend_from_slice(name.as_bytes());
        self.data.push(b' ');
        self.op(&[size], "Tf")
    }

    /// Place the next text at (x, y) with no scaling (Tm)
    pub fn set_text_position(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[1.0, 0.0, 0.0, 1.0, x, y], "Tm")
    }

    pub fn set_text_rendering_mode(&mut self, mode: TextRenderingMode) -> &mut Self {
        self.op(&[mode as i32 as f64], "Tr")
    }

    /// Show single-byte encoded text (Tj)
    pub fn show_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        write_literal_string(bytes, &mut self.data);
        self.data.extend_from_slice(b" Tj\n");
        self
    }

    /// Show two-byte glyph ids as a hex string (Tj)
    pub fn show_glyphs(&mut self, glyphs: &[u16]) -> &mut Self {
        self.data.push(b'<');
        for gid in glyphs {
            self.data.extend_from_slice(format!("{:04X}", gid).as_bytes());
        }
        self.data.extend_from_slice(b"> Tj\n");
        self
    }

    /// Paint XObject `name` (Do)
    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        self.data.push(b'/');
        self.data.extend_from_slice(name.as_bytes());
        self.data.extend_from_slice(b" Do\n");
        self
    }

    fn op(&mut self, operands: &[f64], operator: &str) -> &mut Self {
        for operand in operands {
            self.data.extend_from_slice(format_real(*operand).as_bytes());
            self.data.push(b' ');
        }
        self.data.extend_from_slice(operator.as_bytes());
        self.data.push(b'\n');
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(build: impl FnOnce(&mut ContentStream)) -> String {
        let mut content = ContentStream::new();
        build(&mut content);
        String::from_utf8(content.into_bytes()).unwrap()
    }

    #[test]
    fn test_filled_rectangle() {
        let out = render(|c| {
            c.save_state()
                .set_fill_rgb((0.0, 0.2, 0.4))
                .rect(0.0, 769.89, 595.276, 72.0)
                .fill()
                .restore_state();
        });
        assert_eq!(out, "q\n0 0.2 0.4 rg\n0 769.89 595.276 72 re\nf\nQ\n");
    }

    #[test]
    fn test_text_object() {
        let out = render(|c| {
            c.begin_text()
                .set_font("F1", 11.0)
                .set_text_position(40.0, 700.5)
                .show_bytes(b"Leak (valve 3)")
                .end_text();
        });
        assert_eq!(
            out,
            "BT\n/F1 11 Tf\n1 0 0 1 40 700.5 Tm\n(Leak \\(valve 3\\)) Tj\nET\n"
        );
    }

    #[test]
    fn test_glyph_hex() {
        let out = render(|c| {
            c.show_glyphs(&[0x0024, 0x01F4]);
        });
        assert_eq!(out, "<002401F4> Tj\n");
    }

    #[test]
    fn test_image_placement() {
        let out = render(|c| {
            c.transform(300.0, 0.0, 0.0, 225.0, 147.638, 400.0)
                .draw_xobject("Im0");
        });
        assert_eq!(out, "300 0 0 225 147.638 400 cm\n/Im0 Do\n");
    }

    #[test]
    fn test_rendering_mode() {
        let out = render(|c| {
            c.set_text_rendering_mode(TextRenderingMode::FillStroke);
        });
        assert_eq!(out, "2 Tr\n");
    }
}
