//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid page setup: {0}")]
    InvalidPageSetup(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
