//! Optional report resources
//!
//! The logo and the extended font are looked up at configured paths. Either
//! may be missing or unusable; the report is then rendered without a logo or
//! with the base font.

use crate::settings::ResourceSettings;
use std::sync::Arc;
use text_engine::{ExtendedFont, ReportFont};

/// Read-only resources shared by every export of a session
#[derive(Debug, Clone, Default)]
pub struct ReportResources {
    pub logo: Option<Vec<u8>>,
    pub font: Option<Arc<ExtendedFont>>,
}

impl ReportResources {
    /// No logo, base font
    pub fn none() -> Self {
        Self::default()
    }

    /// Load whatever resources are available
    pub fn load(settings: &ResourceSettings) -> Self {
        let logo = match std::fs::read(&settings.logo_path) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => {
                tracing::warn!("Logo file {} is empty", settings.logo_path.display());
                None
            }
            Err(e) => {
                tracing::warn!("No logo loaded from {}: {}", settings.logo_path.display(), e);
                None
            }
        };

        let font = match ExtendedFont::load(&settings.font_path) {
            Ok(font) => Some(Arc::new(font)),
            Err(e) => {
                tracing::warn!(
                    "Extended font unavailable ({}), falling back to {}: {}",
                    settings.font_path.display(),
                    text_engine::BASE_FONT_FAMILY,
                    e
                );
                None
            }
        };

        Self { logo, font }
    }

    pub fn logo(&self) -> Option<&[u8]> {
        self.logo.as_deref()
    }

    /// Font used for PDF output
    pub fn report_font(&self) -> ReportFont {
        ReportFont::resolve(self.font.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_resources_are_not_errors() {
        let temp_dir = TempDir::new().unwrap();
        let settings = ResourceSettings::default().relative_to(temp_dir.path());
        let resources = ReportResources::load(&settings);
        assert!(resources.logo().is_none());
        assert!(!resources.report_font().is_extended());
    }

    #[test]
    fn test_logo_and_broken_font() {
        let temp_dir = TempDir::new().unwrap();
        let settings = ResourceSettings::default().relative_to(temp_dir.path());
        std::fs::create_dir_all(settings.logo_path.parent().unwrap()).unwrap();
        std::fs::write(&settings.logo_path, b"\x89PNG...").unwrap();
        std::fs::write(&settings.font_path, b"not a font").unwrap();

        let resources = ReportResources::load(&settings);
        assert_eq!(resources.logo(), Some(&b"\x89PNG..."[..]));
        assert!(resources.font.is_none());
    }
}
