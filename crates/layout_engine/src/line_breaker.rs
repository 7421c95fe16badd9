//! Line breaking
//!
//! Greedy fill using UAX #14 break opportunities. Hard `'\n'` breaks always
//! start a new line, and a word wider than the line is split between
//! grapheme clusters so nothing overflows the right margin.

use text_engine::TextMeasure;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Break `text` into lines no wider than `max_width` points.
///
/// Every paragraph (text between `'\n'`) yields at least one line, so blank
/// lines survive. Trailing whitespace is trimmed from each line.
pub fn wrap_text(
    text: &str,
    max_width: f64,
    font_size: f64,
    bold: bool,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, max_width, font_size, bold, measure, &mut lines);
    }
    lines
}

fn wrap_paragraph(
    paragraph: &str,
    max_width: f64,
    font_size: f64,
    bold: bool,
    measure: &dyn TextMeasure,
    lines: &mut Vec<String>,
) {
    let fits = |s: &str| measure.text_width(s.trim_end(), font_size, bold) <= max_width;
    let mut current = String::new();
    let mut start = 0;

    for (end, opportunity) in linebreaks(paragraph) {
        let segment = &paragraph[start..end];
        start = end;

        let candidate = format!("{}{}", current, segment);
        if fits(&candidate) {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(current.trim_end().to_string());
                current.clear();
            }
            if fits(segment) {
                current.push_str(segment);
            } else {
                current = split_graphemes(segment, &fits, lines);
            }
        }

        if opportunity == BreakOpportunity::Mandatory && end < paragraph.len() {
            lines.push(current.trim_end().to_string());
            current.clear();
        }
    }

    lines.push(current.trim_end().to_string());
}

/// Split an over-wide segment between graphemes. Full lines are pushed;
/// the unfinished remainder is returned.
fn split_graphemes(segment: &str, fits: &dyn Fn(&str) -> bool, lines: &mut Vec<String>) -> String {
    let mut current = String::new();
    for grapheme in segment.graphemes(true) {
        let candidate = format!("{}{}", current, grapheme);
        // A single grapheme wider than the line still gets a line of its own
        if fits(&candidate) || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current.trim_end().to_string());
            current = grapheme.to_string();
        }
    }
    current
}
