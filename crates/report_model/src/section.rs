//! Observation sections

use crate::error::{ModelError, Result};
use crate::photo::Photo;

/// One titled observation block. The title may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Free text, may contain newlines
    pub description: String,
    pub photos: Vec<Photo>,
}

impl Section {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            photos: Vec::new(),
        }
    }

    /// Whether the title has any visible content
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Swap the whole photo list for `photos`, returning the previous list
    pub fn replace_photos(&mut self, photos: impl IntoIterator<Item = Photo>) -> Vec<Photo> {
        std::mem::replace(&mut self.photos, photos.into_iter().collect())
    }

    /// Add `photos` after the existing ones. Returns the new photo count.
    pub fn append_photos(&mut self, photos: impl IntoIterator<Item = Photo>) -> usize {
        self.photos.extend(photos);
        self.photos.len()
    }

    /// Remove the photo at `index`, shifting later photos down
    pub fn remove_photo(&mut self, index: usize) -> Result<Photo> {
        if index >= self.photos.len() {
            return Err(ModelError::PhotoOutOfRange {
                index,
                len: self.photos.len(),
            });
        }
        Ok(self.photos.remove(index))
    }
}
