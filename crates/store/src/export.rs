//! Export boundary
//!
//! Validates the draft once, then hands it to the renderer for the
//! requested format. Nothing is rendered for a draft that fails validation.

use crate::docx::{render_docx, DocxError};
use crate::pdf::{render_pdf, PdfError};
use crate::resources::ReportResources;
use crate::settings::ReportSettings;
use crate::text_export::render_text;
use layout_engine::{ReportLabels, SkippedPhoto};
use report_model::Draft;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Text => "txt",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Text => "text",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors that stop an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Enter a client name before exporting the report")]
    MissingClientName,

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("PDF export failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("DOCX export failed: {0}")]
    Docx(#[from] DocxError),
}

/// A finished export, ready to be written or handed back to the caller
#[derive(Debug)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
    pub placed_photos: usize,
    pub skipped_photos: Vec<SkippedPhoto>,
}

/// Render `draft` as `format`.
///
/// The client name is checked before any rendering work begins.
pub fn export(
    draft: &Draft,
    format: ExportFormat,
    resources: &ReportResources,
    settings: &ReportSettings,
) -> Result<ExportArtifact, ExportError> {
    draft
        .validate_for_export()
        .map_err(|_| ExportError::MissingClientName)?;

    let (bytes, placed_photos, skipped_photos) = match format {
        ExportFormat::Pdf => {
            let out = render_pdf(draft, resources, settings)?;
            (out.bytes, out.placed_photos, out.skipped_photos)
        }
        ExportFormat::Docx => {
            let out = render_docx(draft, resources, settings)?;
            (out.bytes, out.placed_photos, out.skipped_photos)
        }
        ExportFormat::Text => {
            let labels = ReportLabels::for_language(&settings.export.language);
            let text = render_text(draft, &labels);
            (text.into_bytes(), 0, Vec::new())
        }
    };

    let artifact = ExportArtifact {
        format,
        file_name: file_name(draft, format),
        media_type: format.media_type(),
        bytes,
        placed_photos,
        skipped_photos,
    };
    tracing::info!("Exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());
    Ok(artifact)
}

/// `Report_<client>_<date>.<ext>` with characters unsafe in file names
/// replaced by `_`
pub fn file_name(draft: &Draft, format: ExportFormat) -> String {
    let client: String = draft
        .client_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "Report_{}_{}.{}",
        client,
        draft.visit_date.format("%Y-%m-%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(client: &str) -> Draft {
        let mut draft = Draft::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        draft.client_name = client.into();
        draft
    }

    #[test]
    fn test_missing_client_name_rejected() {
        for client in ["", "   "] {
            for format in [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Text] {
                let err = export(
                    &draft(client),
                    format,
                    &ReportResources::none(),
                    &ReportSettings::default(),
                )
                .unwrap_err();
                assert!(matches!(err, ExportError::MissingClientName));
            }
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name(&draft("ACME Corp/West"), ExportFormat::Pdf),
            "Report_ACME_Corp_West_2024-03-05.pdf"
        );
        assert_eq!(
            file_name(&draft(" Société "), ExportFormat::Docx),
            "Report_Société_2024-03-05.docx"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!(
            "odt".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_text_export() {
        let artifact = export(
            &draft("ACME"),
            ExportFormat::Text,
            &ReportResources::none(),
            &ReportSettings::default(),
        )
        .unwrap();
        assert_eq!(artifact.media_type, "text/plain; charset=utf-8");
        assert_eq!(artifact.file_name, "Report_ACME_2024-03-05.txt");
        assert!(String::from_utf8(artifact.bytes).unwrap().contains("Client: ACME"));
    }

    #[test]
    fn test_pdf_export_artifact() {
        let artifact = export(
            &draft("ACME"),
            ExportFormat::Pdf,
            &ReportResources::none(),
            &ReportSettings::default(),
        )
        .unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF-"));
        assert_eq!(artifact.media_type, "application/pdf");
    }
}
