//! Image registration seam between layout and renderers

use thiserror::Error;

/// Why an image could not be registered
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported or corrupt image: {0}")]
    Decode(String),

    #[error("Image has zero width or height")]
    EmptyImage,
}

/// An image the renderer accepted, with the name it will be drawn under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredImage {
    pub resource_id: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl RegisteredImage {
    /// Height divided by width
    pub fn aspect_ratio(&self) -> f64 {
        if self.pixel_width == 0 {
            return 1.0;
        }
        self.pixel_height as f64 / self.pixel_width as f64
    }
}

/// Receives image payloads during layout.
///
/// The renderer decodes the bytes and keeps whatever it needs to embed the
/// image later. A failure here makes the layout skip that image only.
pub trait ImageSink {
    fn register_image(&mut self, name: &str, bytes: &[u8]) -> Result<RegisteredImage, ImageError>;
}
