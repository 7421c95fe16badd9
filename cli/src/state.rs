//! Session state
//!
//! One invocation works on one draft file. The session loads settings and
//! resources once, restores the draft if the file exists, and writes it
//! back after every change.

use report_model::Draft;
use std::path::{Path, PathBuf};
use store::{DraftStore, ReportResources, ReportSettings, SettingsManager, StoreError};

/// Everything a command needs
pub struct ReportSession {
    pub store: DraftStore,
    pub settings: ReportSettings,
    pub resources: ReportResources,
    draft_path: PathBuf,
}

impl ReportSession {
    /// Open the draft at `draft_path`, reading settings from `config_dir`.
    ///
    /// A missing draft file starts an empty draft dated today; a draft file
    /// that cannot be restored is an error.
    pub fn open(draft_path: PathBuf, config_dir: &Path) -> Result<Self, StoreError> {
        let mut manager = SettingsManager::new(config_dir.to_path_buf());
        if let Err(e) = manager.load_sync() {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
        }
        let settings = manager.get().clone();
        let resources = ReportResources::load(&settings.resources.relative_to(config_dir));

        let mut store = DraftStore::new(Draft::today()).with_date_policy(settings.export.date_policy());
        if draft_path.exists() {
            let report = store.restore_from_path(&draft_path)?;
            if report.date_defaulted {
                tracing::warn!(
                    "Visit date in {} could not be read, using {}",
                    draft_path.display(),
                    store.draft().visit_date
                );
            }
        } else {
            tracing::debug!("No draft at {}, starting a new one", draft_path.display());
        }

        Ok(Self {
            store,
            settings,
            resources,
            draft_path,
        })
    }

    /// Session over an in-memory draft with default settings
    #[cfg(test)]
    pub fn detached(draft_path: PathBuf, draft: Draft) -> Self {
        Self {
            store: DraftStore::new(draft),
            settings: ReportSettings::default(),
            resources: ReportResources::none(),
            draft_path,
        }
    }

    pub fn draft_path(&self) -> &Path {
        &self.draft_path
    }

    pub fn draft(&self) -> &Draft {
        self.store.draft()
    }

    /// Write the draft back to its file
    pub fn save(&self) -> Result<(), StoreError> {
        let report = self.store.save_to_path(&self.draft_path)?;
        for skipped in &report.skipped {
            tracing::warn!(
                "Photo {:?} in section {} was not saved: {}",
                skipped.name,
                skipped.section + 1,
                skipped.reason
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_without_draft_file() {
        let temp_dir = TempDir::new().unwrap();
        let session = ReportSession::open(temp_dir.path().join("draft.json"), temp_dir.path()).unwrap();
        assert!(session.draft().sections().is_empty());
        assert!(session.resources.logo().is_none());
        assert_eq!(session.settings, ReportSettings::default());
    }

    #[test]
    fn test_save_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("draft.json");
        let mut session = ReportSession::open(path.clone(), temp_dir.path()).unwrap();
        session.store.draft_mut().client_name = "ACME".into();
        session.store.new_section();
        session.save().unwrap();

        let reopened = ReportSession::open(path, temp_dir.path()).unwrap();
        assert_eq!(reopened.draft(), session.draft());
    }

    #[test]
    fn test_corrupt_draft_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("draft.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(ReportSession::open(path, temp_dir.path()).is_err());
    }
}
