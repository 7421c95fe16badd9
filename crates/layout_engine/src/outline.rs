//! Flow outline
//!
//! Reflowable outputs do their own pagination, so all they need from layout
//! is the order of blocks and their heading levels.

use crate::style::ReportLabels;
use report_model::Draft;

/// Heading level of the report title
pub const TITLE_LEVEL: u8 = 0;
/// Heading level of the participants block
pub const PARTICIPANTS_LEVEL: u8 = 1;
/// Heading level of section titles
pub const SECTION_LEVEL: u8 = 2;

/// One block of flow content
#[derive(Debug, Clone, PartialEq)]
pub enum FlowBlock {
    Heading { level: u8, text: String },
    /// Labelled header field ("Client: ACME")
    Field { label: String, value: String },
    /// Body text; may contain `'\n'`
    Paragraph { text: String },
    /// Photo `photo` of section `section`, drawn `width` points wide
    Photo {
        section: usize,
        photo: usize,
        caption: String,
        width: f64,
    },
}

/// Ordered flow content of a report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOutline {
    pub blocks: Vec<FlowBlock>,
}

impl ReportOutline {
    /// Build the outline of `draft`.
    ///
    /// Blank participants are left out, and the participants heading only
    /// appears when at least one participant remains.
    pub fn build(draft: &Draft, labels: &ReportLabels, photo_width: f64) -> Self {
        let mut blocks = vec![FlowBlock::Heading {
            level: TITLE_LEVEL,
            text: labels.report_title.clone(),
        }];

        let fields = [
            (&labels.client, draft.client_name.clone()),
            (&labels.site, draft.site_address.clone()),
            (&labels.technician, draft.technician.clone()),
            (&labels.visit_date, draft.visit_date.format("%Y-%m-%d").to_string()),
        ];
        for (label, value) in fields {
            blocks.push(FlowBlock::Field {
                label: label.clone(),
                value,
            });
        }

        let participants: Vec<String> = draft
            .participants()
            .iter()
            .filter(|p| !p.is_blank())
            .map(|p| p.contact_parts().collect::<Vec<_>>().join(" | "))
            .collect();
        if !participants.is_empty() {
            blocks.push(FlowBlock::Heading {
                level: PARTICIPANTS_LEVEL,
                text: labels.participants.clone(),
            });
            blocks.extend(participants.into_iter().map(|text| FlowBlock::Paragraph { text }));
        }

        for (section_index, section) in draft.sections().iter().enumerate() {
            blocks.push(FlowBlock::Heading {
                level: SECTION_LEVEL,
                text: labels.section_title(&section.title).to_string(),
            });
            if !section.description.trim().is_empty() {
                blocks.push(FlowBlock::Paragraph {
                    text: section.description.clone(),
                });
            }
            for (photo_index, photo) in section.photos.iter().enumerate() {
                blocks.push(FlowBlock::Photo {
                    section: section_index,
                    photo: photo_index,
                    caption: photo.name.clone(),
                    width: photo_width,
                });
            }
        }

        Self { blocks }
    }

    /// Headings in document order
    pub fn headings(&self) -> impl Iterator<Item = (u8, &str)> {
        self.blocks.iter().filter_map(|block| match block {
            FlowBlock::Heading { level, text } => Some((*level, text.as_str())),
            _ => None,
        })
    }

    pub fn photo_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, FlowBlock::Photo { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use report_model::{Participant, Photo, Section};

    fn draft() -> Draft {
        let mut draft = Draft::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        draft.client_name = "ACME".into();
        draft
    }

    #[test]
    fn test_empty_draft_outline() {
        let outline = ReportOutline::build(&draft(), &ReportLabels::english(), 300.0);
        let headings: Vec<_> = outline.headings().collect();
        assert_eq!(headings, vec![(TITLE_LEVEL, "Site Visit Report")]);
        assert!(outline.blocks.contains(&FlowBlock::Field {
            label: "Visit date".into(),
            value: "2024-03-05".into(),
        }));
    }

    #[test]
    fn test_heading_levels() {
        let mut draft = draft();
        draft.push_participant(Participant::new("Ana", "555-0101", ""));
        draft.push_participant(Participant::default());
        draft.push_section(Section::new("", "Water on the floor"));
        let idx = draft.push_section(Section::new("Pump", ""));
        draft
            .append_photos(idx, [Photo::from_bytes("pump.jpg", vec![1u8])])
            .unwrap();

        let outline = ReportOutline::build(&draft, &ReportLabels::english(), 250.0);
        let headings: Vec<_> = outline.headings().collect();
        assert_eq!(
            headings,
            vec![
                (TITLE_LEVEL, "Site Visit Report"),
                (PARTICIPANTS_LEVEL, "Participants"),
                (SECTION_LEVEL, "Untitled section"),
                (SECTION_LEVEL, "Pump"),
            ]
        );
        assert!(outline.blocks.contains(&FlowBlock::Paragraph {
            text: "Ana | 555-0101".into()
        }));
        assert_eq!(outline.photo_count(), 1);
        assert_eq!(
            outline.blocks.last(),
            Some(&FlowBlock::Photo {
                section: 1,
                photo: 0,
                caption: "pump.jpg".into(),
                width: 250.0,
            })
        );
    }

    #[test]
    fn test_only_blank_participants() {
        let mut draft = draft();
        draft.new_participant();
        let outline = ReportOutline::build(&draft, &ReportLabels::english(), 300.0);
        assert_eq!(outline.headings().count(), 1);
    }
}
