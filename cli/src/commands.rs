//! Report commands
//!
//! Each command takes the session, applies one change or produces one
//! output, and reports failures as a [`CommandError`] that can be shown
//! to the user or serialized for a calling process.

use crate::state::ReportSession;
use chrono::NaiveDate;
use layout_engine::ReportLabels;
use report_model::{Draft, ModelError, Participant, Photo, Section};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use store::{export, render_text, ExportError, ExportFormat, StoreError};
use thiserror::Error;

/// Broad category of a command failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The user asked for something that does not exist
    InvalidArgument,
    /// The draft is not ready for the requested operation
    Validation,
    /// Reading or writing a draft or output file failed
    Storage,
    /// A renderer failed
    Render,
}

/// Structured error returned by every command
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }
}

impl From<ModelError> for CommandError {
    fn from(err: ModelError) -> Self {
        let kind = match err {
            ModelError::MissingClientName => ErrorKind::Validation,
            _ => ErrorKind::InvalidArgument,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Model(e) => e.into(),
            other => Self::new(ErrorKind::Storage, other.to_string()),
        }
    }
}

impl From<ExportError> for CommandError {
    fn from(err: ExportError) -> Self {
        let kind = match err {
            ExportError::MissingClientName => ErrorKind::Validation,
            ExportError::UnknownFormat(_) => ErrorKind::InvalidArgument,
            ExportError::Pdf(_) | ExportError::Docx(_) => ErrorKind::Render,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Storage, err.to_string())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Header fields to change; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct HeaderUpdate {
    pub client_name: Option<String>,
    pub site_address: Option<String>,
    pub technician: Option<String>,
    pub visit_date: Option<NaiveDate>,
}

/// Result of an export command
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub bytes: usize,
    pub placed_photos: usize,
    pub skipped_photos: Vec<String>,
}

/// Turn a 1-based position typed by the user into an index
fn to_index(position: usize, what: &str) -> CommandResult<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| CommandError::invalid(format!("{} numbers start at 1", what)))
}

/// Start a fresh draft, discarding the current one
pub fn new_draft(
    session: &mut ReportSession,
    client_name: Option<String>,
    visit_date: Option<NaiveDate>,
) -> CommandResult<()> {
    let date = visit_date.unwrap_or_else(|| chrono::Local::now().date_naive());
    session.store.reset(date);
    if let Some(client_name) = client_name {
        session.store.draft_mut().client_name = client_name;
    }
    session.save()?;
    Ok(())
}

/// Start a draft with the two standard sections filled in
pub fn quick_report(
    session: &mut ReportSession,
    client_name: String,
    problem: String,
    solution: String,
) -> CommandResult<()> {
    let draft = Draft::quick_report(
        client_name,
        chrono::Local::now().date_naive(),
        problem,
        solution,
    );
    *session.store.draft_mut() = draft;
    session.save()?;
    Ok(())
}

pub fn set_header(session: &mut ReportSession, update: HeaderUpdate) -> CommandResult<()> {
    let draft = session.store.draft_mut();
    if let Some(value) = update.client_name {
        draft.client_name = value;
    }
    if let Some(value) = update.site_address {
        draft.site_address = value;
    }
    if let Some(value) = update.technician {
        draft.technician = value;
    }
    if let Some(value) = update.visit_date {
        draft.visit_date = value;
    }
    session.save()?;
    Ok(())
}

/// Add a participant and return its 1-based position
pub fn add_participant(session: &mut ReportSession, participant: Participant) -> CommandResult<usize> {
    let index = session.store.new_participant();
    *session.store.draft_mut().participant_mut(index)? = participant;
    session.save()?;
    Ok(index + 1)
}

pub fn remove_participant(session: &mut ReportSession, position: usize) -> CommandResult<Participant> {
    let removed = session.store.remove_participant(to_index(position, "Participant")?)?;
    session.save()?;
    Ok(removed)
}

/// Add a section and return its 1-based position
pub fn add_section(session: &mut ReportSession, title: String, description: String) -> CommandResult<usize> {
    let index = session.store.new_section();
    *session.store.draft_mut().section_mut(index)? = Section::new(title, description);
    session.save()?;
    Ok(index + 1)
}

/// Change the title and/or description of a section
pub fn edit_section(
    session: &mut ReportSession,
    position: usize,
    title: Option<String>,
    description: Option<String>,
) -> CommandResult<()> {
    let section = session.store.draft_mut().section_mut(to_index(position, "Section")?)?;
    if let Some(title) = title {
        section.title = title;
    }
    if let Some(description) = description {
        section.description = description;
    }
    session.save()?;
    Ok(())
}

pub fn remove_section(session: &mut ReportSession, position: usize) -> CommandResult<Section> {
    let removed = session.store.remove_section(to_index(position, "Section")?)?;
    session.save()?;
    Ok(removed)
}

/// Attach image files to a section and return its photo count.
///
/// The files are read when the draft is saved, which happens before this
/// returns, so the draft no longer depends on them afterwards.
pub fn add_photos(
    session: &mut ReportSession,
    position: usize,
    paths: &[PathBuf],
    replace: bool,
) -> CommandResult<usize> {
    let index = to_index(position, "Section")?;
    if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
        return Err(CommandError::invalid(format!(
            "Photo file not found: {}",
            missing.display()
        )));
    }
    let photos: Vec<Photo> = paths.iter().map(Photo::captured).collect();
    let count = if replace {
        session.store.replace_photos(index, photos)?;
        session.store.draft().sections()[index].photos.len()
    } else {
        session.store.append_photos(index, photos)?
    };
    session.save()?;
    Ok(count)
}

/// Plain-text view of the draft
pub fn show(session: &ReportSession) -> String {
    let labels = ReportLabels::for_language(&session.settings.export.language);
    render_text(session.draft(), &labels)
}

/// Export the draft, writing the result into `output` (a file path, or a
/// directory that receives the default file name)
pub fn export_report(
    session: &ReportSession,
    format: ExportFormat,
    output: Option<&Path>,
) -> CommandResult<ExportSummary> {
    let artifact = export(session.draft(), format, &session.resources, &session.settings)?;
    let path = match output {
        Some(path) if path.is_dir() => path.join(&artifact.file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&artifact.file_name),
    };
    std::fs::write(&path, &artifact.bytes)?;

    Ok(ExportSummary {
        path,
        format,
        bytes: artifact.bytes.len(),
        placed_photos: artifact.placed_photos,
        skipped_photos: artifact.skipped_photos.into_iter().map(|s| s.name).collect(),
    })
}
