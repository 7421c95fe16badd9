//! Error types for text engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid font data: {0}")]
    InvalidFontData(String),

    #[error("Unsupported font: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, FontError>;
