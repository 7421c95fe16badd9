//! Text metric calculations

use crate::font::ExtendedFont;
use crate::sanitize::Repertoire;
use std::sync::Arc;

/// Family name of the base font
pub const BASE_FONT_FAMILY: &str = "Helvetica";

/// Measures text for line breaking
pub trait TextMeasure {
    /// Advance width of `text` in points
    fn text_width(&self, text: &str, font_size: f64, bold: bool) -> f64;
}

/// Helvetica advance widths for printable ASCII (0x20..=0x7E), 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for printable ASCII, 1/1000 em
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for non-ASCII WinAnsi characters (most accented letters)
const NON_ASCII_WIDTH: u16 = 556;

/// Advance of `c` in the base font, 1/1000 em
pub fn base_char_width(c: char, bold: bool) -> u16 {
    let table = if bold {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    match c {
        ' '..='~' => table[c as usize - 0x20],
        _ => NON_ASCII_WIDTH,
    }
}

/// Metrics of the standard Helvetica faces
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseFontMetrics;

impl TextMeasure for BaseFontMetrics {
    fn text_width(&self, text: &str, font_size: f64, bold: bool) -> f64 {
        let units: u32 = text.chars().map(|c| base_char_width(c, bold) as u32).sum();
        units as f64 * font_size / 1000.0
    }
}

impl TextMeasure for ExtendedFont {
    fn text_width(&self, text: &str, font_size: f64, _bold: bool) -> f64 {
        let units: f64 = text.chars().map(|c| self.char_width(c)).sum();
        units * font_size / 1000.0
    }
}

/// Font used for one export: the extended font when it loaded, the base
/// font otherwise
#[derive(Debug, Clone)]
pub enum ReportFont {
    Base,
    Extended(Arc<ExtendedFont>),
}

impl ReportFont {
    /// Pick the extended font when available
    pub fn resolve(extended: Option<Arc<ExtendedFont>>) -> Self {
        match extended {
            Some(font) => ReportFont::Extended(font),
            None => ReportFont::Base,
        }
    }

    /// Family name written into render items
    pub fn family(&self) -> &str {
        match self {
            ReportFont::Base => BASE_FONT_FAMILY,
            ReportFont::Extended(font) => font.family(),
        }
    }

    /// Characters this font can show
    pub fn repertoire(&self) -> Repertoire {
        match self {
            ReportFont::Base => Repertoire::WinAnsi,
            ReportFont::Extended(font) => Repertoire::Font(Arc::clone(font)),
        }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, ReportFont::Extended(_))
    }
}

impl TextMeasure for ReportFont {
    fn text_width(&self, text: &str, font_size: f64, bold: bool) -> f64 {
        match self {
            ReportFont::Base => BaseFontMetrics.text_width(text, font_size, bold),
            ReportFont::Extended(font) => font.text_width(text, font_size, bold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(base_char_width(' ', false), 278);
        assert_eq!(base_char_width('W', false), 944);
        assert_eq!(base_char_width('i', false), 222);
        assert_eq!(base_char_width('i', true), 278);
        assert_eq!(base_char_width('~', true), 584);
        assert_eq!(base_char_width('é', false), NON_ASCII_WIDTH);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let m = BaseFontMetrics;
        let w10 = m.text_width("Valve", 10.0, false);
        let w20 = m.text_width("Valve", 20.0, false);
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
        // V=667 a=556 l=222 v=500 e=556
        assert!((w10 - 25.01).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let m = BaseFontMetrics;
        assert!(m.text_width("maintenance", 12.0, true) > m.text_width("maintenance", 12.0, false));
    }

    #[test]
    fn test_base_report_font() {
        let font = ReportFont::resolve(None);
        assert_eq!(font.family(), BASE_FONT_FAMILY);
        assert!(!font.is_extended());
        assert!(matches!(font.repertoire(), Repertoire::WinAnsi));
        assert_eq!(font.text_width("", 12.0, false), 0.0);
    }
}
