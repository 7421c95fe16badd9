//! Error types for the report model

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Section index {index} out of range (draft has {len} sections)")]
    SectionOutOfRange { index: usize, len: usize },

    #[error("Participant index {index} out of range (draft has {len} participants)")]
    ParticipantOutOfRange { index: usize, len: usize },

    #[error("Photo index {index} out of range (section has {len} photos)")]
    PhotoOutOfRange { index: usize, len: usize },

    #[error("A client name is required before the report can be exported")]
    MissingClientName,
}

pub type Result<T> = std::result::Result<T, ModelError>;
