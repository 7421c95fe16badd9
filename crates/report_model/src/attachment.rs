//! Photo payload sources
//!
//! A photo is either still sitting in the file the capture step wrote, or
//! its bytes are already in memory (typically decoded from a saved draft).
//! Callers never check which one they hold; they ask for the bytes.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Failure to obtain a photo's bytes
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Failed to read captured photo {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Photo payload is empty")]
    Empty,
}

/// Where a photo's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Freshly captured photo, read from its capture file on demand
    Captured { path: PathBuf },
    /// Payload held in memory
    Restored { bytes: Arc<[u8]> },
}

impl Attachment {
    /// Reference a capture file
    pub fn captured(path: impl Into<PathBuf>) -> Self {
        Attachment::Captured { path: path.into() }
    }

    /// Wrap bytes that are already in memory
    pub fn restored(bytes: impl Into<Arc<[u8]>>) -> Self {
        Attachment::Restored {
            bytes: bytes.into(),
        }
    }

    /// Read the full byte payload.
    ///
    /// In-memory payloads are borrowed; capture files are read each time,
    /// so a file removed after capture surfaces here as an error.
    pub fn read_bytes(&self) -> Result<Cow<'_, [u8]>, AttachmentError> {
        match self {
            Attachment::Captured { path } => {
                let bytes = std::fs::read(path).map_err(|source| AttachmentError::Unreadable {
                    path: path.clone(),
                    source,
                })?;
                if bytes.is_empty() {
                    return Err(AttachmentError::Empty);
                }
                Ok(Cow::Owned(bytes))
            }
            Attachment::Restored { bytes } => {
                if bytes.is_empty() {
                    return Err(AttachmentError::Empty);
                }
                Ok(Cow::Borrowed(bytes))
            }
        }
    }

    /// Path of the capture file, if the payload has not been loaded yet
    pub fn capture_path(&self) -> Option<&Path> {
        match self {
            Attachment::Captured { path } => Some(path),
            Attachment::Restored { .. } => None,
        }
    }
}
