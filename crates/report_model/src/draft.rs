//! The draft report aggregate

use crate::error::{ModelError, Result};
use crate::participant::Participant;
use crate::photo::Photo;
use crate::section::Section;
use chrono::NaiveDate;

/// Section title used by [`Draft::quick_report`] for the observed problem
pub const PROBLEM_SECTION_TITLE: &str = "Problem identified";
/// Section title used by [`Draft::quick_report`] for the work carried out
pub const WORK_SECTION_TITLE: &str = "Work performed";

/// In-progress site-visit report.
///
/// Participants and sections keep insertion order. Removal shifts later
/// entries down so indexes always stay dense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub client_name: String,
    pub site_address: String,
    pub technician: String,
    pub visit_date: NaiveDate,
    participants: Vec<Participant>,
    sections: Vec<Section>,
}

impl Draft {
    /// Create an empty draft for a visit on `visit_date`
    pub fn new(visit_date: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            site_address: String::new(),
            technician: String::new(),
            visit_date,
            participants: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Create an empty draft dated today (local time)
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    /// Two-section draft holding a problem statement and the work done
    pub fn quick_report(
        client_name: impl Into<String>,
        visit_date: NaiveDate,
        problem: impl Into<String>,
        work_done: impl Into<String>,
    ) -> Self {
        let mut draft = Self::new(visit_date);
        draft.client_name = client_name.into();
        draft.push_section(Section::new(PROBLEM_SECTION_TITLE, problem));
        draft.push_section(Section::new(WORK_SECTION_TITLE, work_done));
        draft
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn participant_mut(&mut self, index: usize) -> Result<&mut Participant> {
        let len = self.participants.len();
        self.participants
            .get_mut(index)
            .ok_or(ModelError::ParticipantOutOfRange { index, len })
    }

    pub fn section_mut(&mut self, index: usize) -> Result<&mut Section> {
        let len = self.sections.len();
        self.sections
            .get_mut(index)
            .ok_or(ModelError::SectionOutOfRange { index, len })
    }

    /// Append an empty section and return its index
    pub fn new_section(&mut self) -> usize {
        self.push_section(Section::default())
    }

    /// Append `section` and return its index
    pub fn push_section(&mut self, section: Section) -> usize {
        self.sections.push(section);
        self.sections.len() - 1
    }

    /// Remove the section at `index`
    pub fn remove_section(&mut self, index: usize) -> Result<Section> {
        if index >= self.sections.len() {
            return Err(ModelError::SectionOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        Ok(self.sections.remove(index))
    }

    /// Append an empty participant and return its index
    pub fn new_participant(&mut self) -> usize {
        self.push_participant(Participant::default())
    }

    /// Append `participant` and return its index
    pub fn push_participant(&mut self, participant: Participant) -> usize {
        self.participants.push(participant);
        self.participants.len() - 1
    }

    /// Remove the participant at `index`
    pub fn remove_participant(&mut self, index: usize) -> Result<Participant> {
        if index >= self.participants.len() {
            return Err(ModelError::ParticipantOutOfRange {
                index,
                len: self.participants.len(),
            });
        }
        Ok(self.participants.remove(index))
    }

    /// Replace the photos of section `section`, returning the old ones
    pub fn replace_photos(
        &mut self,
        section: usize,
        photos: impl IntoIterator<Item = Photo>,
    ) -> Result<Vec<Photo>> {
        Ok(self.section_mut(section)?.replace_photos(photos))
    }

    /// Append photos to section `section`, returning its new photo count
    pub fn append_photos(
        &mut self,
        section: usize,
        photos: impl IntoIterator<Item = Photo>,
    ) -> Result<usize> {
        Ok(self.section_mut(section)?.append_photos(photos))
    }

    /// Total number of photos across all sections
    pub fn photo_count(&self) -> usize {
        self.sections.iter().map(|s| s.photos.len()).sum()
    }

    pub fn has_client_name(&self) -> bool {
        !self.client_name.trim().is_empty()
    }

    /// Check the draft can be exported
    pub fn validate_for_export(&self) -> Result<()> {
        if !self.has_client_name() {
            return Err(ModelError::MissingClientName);
        }
        Ok(())
    }

    /// Copy of the draft with `f` applied to every free-text field.
    ///
    /// Photo names are included; photo payloads and media types are not.
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> Draft {
        Draft {
            client_name: f(&self.client_name),
            site_address: f(&self.site_address),
            technician: f(&self.technician),
            visit_date: self.visit_date,
            participants: self
                .participants
                .iter()
                .map(|p| Participant {
                    name: f(&p.name),
                    phone: f(&p.phone),
                    email: f(&p.email),
                })
                .collect(),
            sections: self
                .sections
                .iter()
                .map(|s| Section {
                    title: f(&s.title),
                    description: f(&s.description),
                    photos: s
                        .photos
                        .iter()
                        .map(|p| Photo {
                            name: f(&p.name),
                            media_type: p.media_type.clone(),
                            attachment: p.attachment.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn draft_with_participants(n: usize) -> Draft {
        let mut draft = Draft::new(date());
        for i in 0..n {
            draft.push_participant(Participant::new(format!("p{}", i), "", ""));
        }
        draft
    }

    #[test]
    fn test_new_draft_is_empty() {
        let draft = Draft::new(date());
        assert!(draft.participants().is_empty());
        assert!(draft.sections().is_empty());
        assert_eq!(draft.photo_count(), 0);
        assert!(!draft.has_client_name());
    }

    #[test]
    fn test_new_section_returns_index() {
        let mut draft = Draft::new(date());
        assert_eq!(draft.new_section(), 0);
        assert_eq!(draft.new_section(), 1);
        draft.section_mut(1).unwrap().title = "Electrical panel".into();
        assert_eq!(draft.sections()[1].title, "Electrical panel");
    }

    #[test]
    fn test_remove_section_repacks() {
        let mut draft = Draft::new(date());
        for title in ["A", "B", "C"] {
            draft.push_section(Section::new(title, ""));
        }
        let removed = draft.remove_section(0).unwrap();
        assert_eq!(removed.title, "A");
        let titles: Vec<_> = draft.sections().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[test]
    fn test_remove_until_empty() {
        let mut draft = draft_with_participants(2);
        draft.remove_participant(1).unwrap();
        draft.remove_participant(0).unwrap();
        assert!(draft.participants().is_empty());
        assert_eq!(
            draft.remove_participant(0),
            Err(ModelError::ParticipantOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_out_of_range_section() {
        let mut draft = Draft::new(date());
        assert_eq!(
            draft.remove_section(3),
            Err(ModelError::SectionOutOfRange { index: 3, len: 0 })
        );
        assert!(draft.append_photos(0, Vec::new()).is_err());
    }

    #[test]
    fn test_replace_and_append_photos() {
        let mut draft = Draft::new(date());
        let idx = draft.new_section();
        draft
            .append_photos(idx, [Photo::from_bytes("a.jpg", vec![1u8])])
            .unwrap();
        assert_eq!(
            draft
                .append_photos(idx, [Photo::from_bytes("b.jpg", vec![2u8])])
                .unwrap(),
            2
        );
        let old = draft
            .replace_photos(idx, [Photo::from_bytes("c.jpg", vec![3u8])])
            .unwrap();
        assert_eq!(old.len(), 2);
        assert_eq!(draft.photo_count(), 1);
    }

    #[test]
    fn test_validate_for_export() {
        let mut draft = Draft::new(date());
        assert_eq!(draft.validate_for_export(), Err(ModelError::MissingClientName));
        draft.client_name = "   ".into();
        assert_eq!(draft.validate_for_export(), Err(ModelError::MissingClientName));
        draft.client_name = "ACME Facilities".into();
        assert!(draft.validate_for_export().is_ok());
    }

    #[test]
    fn test_quick_report() {
        let draft = Draft::quick_report("ACME", date(), "Leak at valve 3", "Replaced gasket");
        assert_eq!(draft.sections().len(), 2);
        assert_eq!(draft.sections()[0].title, PROBLEM_SECTION_TITLE);
        assert_eq!(draft.sections()[1].description, "Replaced gasket");
    }

    #[test]
    fn test_map_text_leaves_original_untouched() {
        let mut draft = Draft::quick_report("acme", date(), "leak", "fixed");
        draft.push_participant(Participant::new("ana", "1", "a@b"));
        let idx = draft.new_section();
        draft
            .append_photos(idx, [Photo::from_bytes("pic.png", vec![9u8])])
            .unwrap();

        let upper = draft.map_text(|s| s.to_uppercase());
        assert_eq!(upper.client_name, "ACME");
        assert_eq!(upper.participants()[0].email, "A@B");
        assert_eq!(upper.sections()[0].description, "LEAK");
        assert_eq!(upper.sections()[2].photos[0].name, "PIC.PNG");
        assert_eq!(upper.sections()[2].photos[0].media_type, "image/png");
        assert_eq!(upper.visit_date, date());
        assert_eq!(draft.client_name, "acme");
    }

    proptest! {
        #[test]
        fn prop_remove_participant_repacks(n in 1usize..20, k_seed in 0usize..100) {
            let k = k_seed % n;
            let mut draft = draft_with_participants(n);
            let removed = draft.remove_participant(k).unwrap();
            prop_assert_eq!(removed.name, format!("p{}", k));

            let expected: Vec<String> = (0..n).filter(|i| *i != k).map(|i| format!("p{}", i)).collect();
            let actual: Vec<String> = draft.participants().iter().map(|p| p.name.clone()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
