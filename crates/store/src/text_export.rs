//! Plain-text report summary

use layout_engine::{FlowBlock, ReportLabels, ReportOutline, TITLE_LEVEL};
use report_model::Draft;

/// Render `draft` as plain text.
///
/// Photos are listed by name; their bytes are not read.
pub fn render_text(draft: &Draft, labels: &ReportLabels) -> String {
    let outline = ReportOutline::build(draft, labels, 0.0);
    let mut out = String::new();

    for block in &outline.blocks {
        match block {
            FlowBlock::Heading { level, text } => {
                if !out.is_empty() {
                    out.push('\n');
                }
                let underline = if *level == TITLE_LEVEL { '=' } else { '-' };
                out.push_str(text);
                out.push('\n');
                out.extend(std::iter::repeat(underline).take(text.chars().count().max(1)));
                out.push('\n');
            }
            FlowBlock::Field { label, value } => {
                out.push_str(&format!("{}: {}\n", label, value));
            }
            FlowBlock::Paragraph { text } => {
                out.push_str(text);
                out.push('\n');
            }
            FlowBlock::Photo { caption, .. } => {
                out.push_str(&format!("  [{}]\n", caption));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use report_model::{Participant, Photo, Section};

    fn draft() -> Draft {
        let mut draft = Draft::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        draft.client_name = "ACME".into();
        draft.site_address = "1 Main St".into();
        draft
    }

    #[test]
    fn test_header_fields() {
        let text = render_text(&draft(), &ReportLabels::english());
        assert!(text.starts_with("Site Visit Report\n=================\n"));
        assert!(text.contains("Client: ACME\n"));
        assert!(text.contains("Visit date: 2024-03-05\n"));
    }

    #[test]
    fn test_sections_and_photos() {
        let mut draft = draft();
        draft.push_participant(Participant::new("Ana", "555-0101", ""));
        let idx = draft.push_section(Section::new("", "Water on the floor\nnear the pump"));
        draft
            .append_photos(idx, [Photo::from_bytes("pump.jpg", vec![1u8])])
            .unwrap();

        let text = render_text(&draft, &ReportLabels::english());
        assert!(text.contains("Ana | 555-0101\n"));
        assert!(text.contains("\nUntitled section\n----------------\n"));
        assert!(text.contains("Water on the floor\nnear the pump\n"));
        assert!(text.contains("  [pump.jpg]\n"));
    }

    #[test]
    fn test_rules_match_heading_width() {
        let mut draft = draft();
        draft.push_section(Section::new("Pompe n°2", ""));
        let text = render_text(&draft, &ReportLabels::english());
        assert!(text.contains("\nPompe n°2\n---------\n"));
        assert!(text.ends_with('\n'));
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn test_french_labels() {
        let text = render_text(&draft(), &ReportLabels::french());
        assert!(text.contains("Date de visite: 2024-03-05"));
    }
}
