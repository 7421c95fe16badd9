//! Report settings management
//!
//! Settings live in a `settings.json` file. Every field has a default so a
//! partial or older file still loads; a file that is not valid JSON at all
//! is replaced by defaults with a warning.

use crate::snapshot::DatePolicy;
use crate::Result;
use layout_engine::{PageConfig, PageSize, ReportStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the company logo
pub const DEFAULT_LOGO_PATH: &str = "assets/logo.png";
/// Default location of the extended-character font
pub const DEFAULT_FONT_PATH: &str = "assets/DejaVuSans.ttf";

/// Main settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    pub resources: ResourceSettings,
    pub layout: LayoutSettings,
    pub export: ExportSettings,
}

/// Where the optional resources are looked up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceSettings {
    pub logo_path: PathBuf,
    pub font_path: PathBuf,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
        }
    }
}

impl ResourceSettings {
    /// Resolve relative paths against `base`
    pub fn relative_to(&self, base: &Path) -> Self {
        Self {
            logo_path: base.join(&self.logo_path),
            font_path: base.join(&self.font_path),
        }
    }
}

/// Page geometry of the fixed-page report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub page_size: PageSize,
    /// Margin on all four sides, in points
    pub margin: f64,
    /// Target width of photos, in points
    pub photo_width: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: 40.0,
            photo_width: 300.0,
        }
    }
}

impl LayoutSettings {
    pub fn page_config(&self) -> PageConfig {
        PageConfig::new(self.page_size, self.margin)
    }

    pub fn report_style(&self) -> ReportStyle {
        let photo_width = if valid_width(self.photo_width) {
            self.photo_width
        } else {
            Self::default().photo_width
        };
        ReportStyle {
            photo_width,
            ..ReportStyle::default()
        }
    }

    /// Replace an unusable photo width with the default
    pub fn normalize(&mut self) {
        if !valid_width(self.photo_width) {
            let fallback = Self::default().photo_width;
            tracing::warn!(
                "Invalid photo width {}, using {}",
                self.photo_width,
                fallback
            );
            self.photo_width = fallback;
        }
    }
}

fn valid_width(width: f64) -> bool {
    width.is_finite() && width > 0.0
}

/// Output options shared by every format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Language of the fixed labels ("en", "fr")
    pub language: String,
    /// Flate-compress PDF content streams
    pub compress: bool,
    /// Reject drafts whose visit date cannot be parsed instead of using today
    pub strict_dates: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            compress: true,
            strict_dates: false,
        }
    }
}

impl ExportSettings {
    /// How restores treat a visit date that cannot be parsed
    pub fn date_policy(&self) -> DatePolicy {
        if self.strict_dates {
            DatePolicy::Strict
        } else {
            DatePolicy::FallbackToToday
        }
    }
}

/// Settings manager for loading, saving, and updating report settings
pub struct SettingsManager {
    settings_path: PathBuf,
    current: ReportSettings,
}

impl SettingsManager {
    /// Create a settings manager over `<config_dir>/settings.json`
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            settings_path: config_dir.join("settings.json"),
            current: ReportSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_sync(&mut self) -> Result<&ReportSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<ReportSettings>(&content) {
                Ok(mut settings) => {
                    settings.layout.normalize();
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                    self.current = ReportSettings::default();
                }
            }
        } else {
            self.current = ReportSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &ReportSettings {
        &self.current
    }

    /// Replace the settings and save them
    pub fn update_sync(&mut self, mut settings: ReportSettings) -> Result<()> {
        settings.layout.normalize();
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults and save
    pub fn reset_sync(&mut self) -> Result<&ReportSettings> {
        self.current = ReportSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = ReportSettings::default();
        assert_eq!(settings.resources.logo_path, PathBuf::from("assets/logo.png"));
        assert_eq!(settings.resources.font_path, PathBuf::from("assets/DejaVuSans.ttf"));
        assert_eq!(settings.layout.page_size, PageSize::A4);
        assert_eq!(settings.layout.photo_width, 300.0);
        assert_eq!(settings.export.language, "en");
        assert!(settings.export.compress);
        assert!(!settings.export.strict_dates);
        assert_eq!(settings.export.date_policy(), DatePolicy::FallbackToToday);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: ReportSettings =
            serde_json::from_str(r#"{"export":{"language":"fr"},"future_field":1}"#).unwrap();
        assert_eq!(parsed.export.language, "fr");
        assert!(parsed.export.compress);
        assert_eq!(parsed.layout, LayoutSettings::default());
    }

    #[test]
    fn test_layout_settings_feed_page_config() {
        let layout = LayoutSettings {
            page_size: PageSize::Letter,
            margin: 36.0,
            photo_width: 250.0,
        };
        let config = layout.page_config();
        assert_eq!(config.margin_left, 36.0);
        assert_eq!(config.page_width, 612.0);
        assert_eq!(layout.report_style().photo_width, 250.0);
    }

    #[test]
    fn test_unusable_photo_width_falls_back() {
        for width in [0.0, -20.0, f64::NAN, f64::INFINITY] {
            let layout = LayoutSettings {
                photo_width: width,
                ..LayoutSettings::default()
            };
            assert_eq!(layout.report_style().photo_width, 300.0);
        }

        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"layout":{"photo_width":-5}}"#,
        )
        .unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());
        assert_eq!(manager.load_sync().unwrap().layout.photo_width, 300.0);

        let mut settings = ReportSettings::default();
        settings.layout.photo_width = 0.0;
        manager.update_sync(settings).unwrap();
        assert_eq!(manager.get().layout.photo_width, 300.0);
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &ReportSettings::default());

        let mut new_settings = ReportSettings::default();
        new_settings.export.language = "fr".to_string();
        new_settings.layout.page_size = PageSize::Letter;
        manager.update_sync(new_settings).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path().to_path_buf());
        let loaded = manager2.load_sync().unwrap();
        assert_eq!(loaded.export.language, "fr");
        assert_eq!(loaded.layout.page_size, PageSize::Letter);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{ not json").unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());
        assert_eq!(manager.load_sync().unwrap(), &ReportSettings::default());
    }

    #[test]
    fn test_settings_manager_reset_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut new_settings = ReportSettings::default();
        new_settings.export.compress = false;
        manager.update_sync(new_settings).unwrap();

        let settings = manager.reset_sync().unwrap();
        assert!(settings.export.compress);
    }
}
