//! Photo metadata

use crate::attachment::{Attachment, AttachmentError};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// Media type used when nothing better is known
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// A photo attached to a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Original file name as supplied by the capture/upload step
    pub name: String,
    /// Declared media type (e.g. "image/jpeg")
    pub media_type: String,
    /// Payload source
    pub attachment: Attachment,
}

impl Photo {
    /// Photo backed by a capture file. Name and media type come from the path.
    pub fn captured(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = media_type_for_name(&name).to_string();
        Self {
            name,
            media_type,
            attachment: Attachment::captured(path),
        }
    }

    /// Photo whose payload is already in memory
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let media_type = media_type_for_name(&name).to_string();
        Self {
            name,
            media_type,
            attachment: Attachment::restored(bytes),
        }
    }

    /// Override the declared media type
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Read the full byte payload
    pub fn read_bytes(&self) -> Result<Cow<'_, [u8]>, AttachmentError> {
        self.attachment.read_bytes()
    }
}

/// Infer a media type from a file name's extension
pub fn media_type_for_name(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MEDIA_TYPE,
    };
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => DEFAULT_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_for_name() {
        assert_eq!(media_type_for_name("pump.JPG"), "image/jpeg");
        assert_eq!(media_type_for_name("valve.png"), "image/png");
        assert_eq!(media_type_for_name("scan.tif"), "image/tiff");
        assert_eq!(media_type_for_name("notes.txt"), DEFAULT_MEDIA_TYPE);
        assert_eq!(media_type_for_name("no_extension"), DEFAULT_MEDIA_TYPE);
    }

    #[test]
    fn test_captured_photo_metadata() {
        let photo = Photo::captured("/tmp/site/IMG_0042.jpeg");
        assert_eq!(photo.name, "IMG_0042.jpeg");
        assert_eq!(photo.media_type, "image/jpeg");
        assert!(photo.attachment.capture_path().is_some());
    }

    #[test]
    fn test_with_media_type() {
        let photo = Photo::from_bytes("blob", vec![1u8]).with_media_type("image/webp");
        assert_eq!(photo.media_type, "image/webp");
    }
}
