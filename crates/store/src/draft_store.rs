//! The draft store
//!
//! Owns the draft being edited and moves it to and from its serialized
//! form. A restore builds the new draft completely before swapping it in,
//! so a failed restore leaves the current draft exactly as it was.

use crate::error::{Result, StoreError};
use crate::snapshot::{self, DatePolicy, DraftSnapshot, SkippedAttachment};
use chrono::NaiveDate;
use report_model::{Draft, Participant, Photo, Section};
use std::path::Path;

/// Outcome of a save
#[derive(Debug, Clone)]
pub struct SaveReport {
    /// Pretty-printed JSON snapshot
    pub text: String,
    /// Photos left out because their bytes could not be read
    pub skipped: Vec<SkippedAttachment>,
}

/// Outcome of a successful restore
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    pub skipped: Vec<SkippedAttachment>,
    pub date_defaulted: bool,
}

/// Holds the current draft
#[derive(Debug, Clone)]
pub struct DraftStore {
    draft: Draft,
    date_policy: DatePolicy,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new(Draft::today())
    }
}

impl DraftStore {
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            date_policy: DatePolicy::default(),
        }
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Replace the current draft with an empty one
    pub fn reset(&mut self, visit_date: NaiveDate) -> Draft {
        std::mem::replace(&mut self.draft, Draft::new(visit_date))
    }

    /// Serialize the current draft
    pub fn save(&self) -> Result<SaveReport> {
        let encoded = snapshot::encode(&self.draft);
        let text = serde_json::to_string_pretty(&encoded.snapshot)?;
        Ok(SaveReport {
            text,
            skipped: encoded.skipped,
        })
    }

    /// Replace the current draft with the one serialized in `source`
    pub fn restore(&mut self, source: &str) -> Result<RestoreReport> {
        self.restore_with_today(source, chrono::Local::now().date_naive())
    }

    /// [`restore`](Self::restore) with an explicit fallback date
    pub fn restore_with_today(&mut self, source: &str, today: NaiveDate) -> Result<RestoreReport> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        if !value.is_object() {
            return Err(StoreError::InvalidFormat(
                "a saved draft must be a JSON object".to_string(),
            ));
        }
        let parsed: DraftSnapshot = serde_json::from_value(value)?;
        let decoded = snapshot::decode(&parsed, self.date_policy, today)?;

        self.draft = decoded.draft;
        tracing::info!(
            "Restored draft for {:?}: {} section(s), {} participant(s), {} photo(s)",
            self.draft.client_name,
            self.draft.sections().len(),
            self.draft.participants().len(),
            self.draft.photo_count()
        );
        Ok(RestoreReport {
            skipped: decoded.skipped,
            date_defaulted: decoded.date_defaulted,
        })
    }

    /// Save the draft to `path`
    pub fn save_to_path(&self, path: &Path) -> Result<SaveReport> {
        let report = self.save()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &report.text)?;
        Ok(report)
    }

    /// Restore the draft saved at `path`
    pub fn restore_from_path(&mut self, path: &Path) -> Result<RestoreReport> {
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.display().to_string()));
        }
        let source = std::fs::read_to_string(path)?;
        self.restore(&source)
    }

    /// Append an empty section and return its index
    pub fn new_section(&mut self) -> usize {
        self.draft.new_section()
    }

    pub fn remove_section(&mut self, index: usize) -> Result<Section> {
        Ok(self.draft.remove_section(index)?)
    }

    /// Append an empty participant and return its index
    pub fn new_participant(&mut self) -> usize {
        self.draft.new_participant()
    }

    pub fn remove_participant(&mut self, index: usize) -> Result<Participant> {
        Ok(self.draft.remove_participant(index)?)
    }

    pub fn replace_photos(&mut self, section: usize, photos: Vec<Photo>) -> Result<Vec<Photo>> {
        Ok(self.draft.replace_photos(section, photos)?)
    }

    pub fn append_photos(&mut self, section: usize, photos: Vec<Photo>) -> Result<usize> {
        Ok(self.draft.append_photos(section, photos)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn store() -> DraftStore {
        let mut draft = Draft::quick_report("ACME", date(), "Leak", "Fixed");
        draft.push_participant(Participant::new("Ana", "", ""));
        DraftStore::new(draft)
    }

    #[test]
    fn test_save_restore() {
        let original = store();
        let saved = original.save().unwrap();
        assert!(saved.text.contains("\"visit_date\": \"2024-03-05\""));

        let mut restored = DraftStore::new(Draft::new(date()));
        let report = restored.restore(&saved.text).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(restored.draft(), original.draft());
    }

    #[test]
    fn test_invalid_source_keeps_draft() {
        let mut store = store();
        let before = store.draft().clone();

        for source in ["not json", "[1, 2]", "\"text\"", r#"{"sections": "oops"}"#] {
            assert!(store.restore(source).is_err(), "{} accepted", source);
            assert_eq!(store.draft(), &before);
        }
    }

    #[test]
    fn test_strict_date_keeps_draft() {
        let mut store = store().with_date_policy(DatePolicy::Strict);
        let before = store.draft().clone();
        let err = store.restore(r#"{"client_name":"Other","visit_date":"yesterday"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Snapshot(_)));
        assert_eq!(store.draft(), &before);
    }

    #[test]
    fn test_lenient_date_defaults() {
        let mut store = store();
        let report = store
            .restore_with_today(r#"{"client_name":"Other"}"#, date())
            .unwrap();
        assert!(report.date_defaulted);
        assert_eq!(store.draft().client_name, "Other");
        assert!(store.draft().sections().is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("drafts").join("acme.json");
        let original = store();
        original.save_to_path(&path).unwrap();

        let mut restored = DraftStore::default();
        restored.restore_from_path(&path).unwrap();
        assert_eq!(restored.draft(), original.draft());

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            restored.restore_from_path(&missing),
            Err(StoreError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_forwarded_operations() {
        let mut store = store();
        assert_eq!(store.new_section(), 2);
        assert_eq!(store.remove_section(0).unwrap().title, "Problem identified");
        assert_eq!(store.new_participant(), 1);
        store.remove_participant(0).unwrap();
        store.remove_participant(0).unwrap();
        assert!(store.draft().participants().is_empty());
        assert!(matches!(store.remove_participant(0), Err(StoreError::Model(_))));
    }
}
