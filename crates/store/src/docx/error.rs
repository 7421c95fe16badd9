//! Error types for DOCX operations

use thiserror::Error;

/// Errors that can occur during DOCX export
#[derive(Debug, Error)]
pub enum DocxError {
    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Photo payload that cannot be read
    #[error("Attachment error: {0}")]
    Attachment(#[from] report_model::AttachmentError),

    /// Image payload that cannot be embedded
    #[error("Image error: {0}")]
    ImageError(String),

    /// Page setup rejected before writing
    #[error("Layout error: {0}")]
    Layout(#[from] layout_engine::LayoutError),
}

impl From<image::ImageError> for DocxError {
    fn from(err: image::ImageError) -> Self {
        DocxError::ImageError(err.to_string())
    }
}

/// Result type for DOCX operations
pub type DocxResult<T> = std::result::Result<T, DocxError>;
