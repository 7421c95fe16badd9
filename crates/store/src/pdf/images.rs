//! PDF Image Handling
//!
//! Photos and the logo become image XObjects:
//! - JPEG in gray or RGB is passed through untouched (DCTDecode)
//! - everything else is decoded to RGB and Flate-compressed, with the
//!   alpha channel split into a soft mask when it is not fully opaque

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfWriter, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::ImageFormat;
use layout_engine::{ImageError, ImageSink, RegisteredImage};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    DCTDecode,
    FlateDecode,
}

impl ImageFilter {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageFilter::DCTDecode => "DCTDecode",
            ImageFilter::FlateDecode => "FlateDecode",
        }
    }
}

/// An image ready to embed
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub filter: ImageFilter,
    /// Encoded sample data
    pub data: Vec<u8>,
    /// Flate-compressed 8-bit alpha, when any pixel is translucent
    pub alpha: Option<Vec<u8>>,
}

impl PdfImage {
    /// Decode an image payload
    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Decode("empty payload".to_string()));
        }
        let format = image::guess_format(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage);
        }

        if format == ImageFormat::Jpeg {
            if let Some(color_space) = dct_color_space(bytes) {
                return Ok(Self {
                    width,
                    height,
                    color_space,
                    filter: ImageFilter::DCTDecode,
                    data: bytes.to_vec(),
                    alpha: None,
                });
            }
        }

        let rgba = decoded.to_rgba8();
        let pixels = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let has_alpha = alpha.iter().any(|a| *a != u8::MAX);

        Ok(Self {
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
            filter: ImageFilter::FlateDecode,
            data: deflate(&rgb)?,
            alpha: if has_alpha { Some(deflate(&alpha)?) } else { None },
        })
    }

    fn image_dict(&self, color_space: ColorSpace) -> PdfDictionary {
        PdfDictionary::typed("XObject")
            .with("Subtype", PdfObject::name("Image"))
            .with("Width", self.width)
            .with("Height", self.height)
            .with("ColorSpace", PdfObject::name(color_space.pdf_name()))
            .with("BitsPerComponent", 8i64)
    }

    fn xobject(&self, smask: Option<u32>) -> PdfStream {
        let mut dict = self.image_dict(self.color_space);
        if let Some(obj) = smask {
            dict.insert("SMask", PdfObject::Reference(obj));
        }
        PdfStream::encoded(dict, self.filter.pdf_name(), self.data.clone())
    }

    fn smask(&self) -> Option<PdfStream> {
        let alpha = self.alpha.as_ref()?;
        Some(PdfStream::encoded(
            self.image_dict(ColorSpace::DeviceGray),
            ImageFilter::FlateDecode.pdf_name(),
            alpha.clone(),
        ))
    }
}

/// Color space for embedding a JPEG as-is. CMYK, YCCK and 12-bit frames
/// are re-encoded instead.
fn dct_color_space(bytes: &[u8]) -> Option<ColorSpace> {
    match jpeg_frame_header(bytes)? {
        (8, 1) => Some(ColorSpace::DeviceGray),
        (8, 3) => Some(ColorSpace::DeviceRGB),
        _ => None,
    }
}

/// (sample precision, component count) from the first SOF segment
fn jpeg_frame_header(bytes: &[u8]) -> Option<(u8, u8)> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            // fill byte
            pos += 1;
            continue;
        }
        pos += 2;
        match marker {
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            return Some((*bytes.get(pos + 2)?, *bytes.get(pos + 7)?));
        }
        if length < 2 {
            return None;
        }
        pos += length;
    }
    None
}

fn deflate(data: &[u8]) -> std::result::Result<Vec<u8>, ImageError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    encoder.finish().map_err(|e| ImageError::Decode(e.to_string()))
}

/// Images registered during layout, named "Im0", "Im1", ...
#[derive(Debug, Default)]
pub struct ImageManager {
    images: Vec<(String, PdfImage)>,
}

impl ImageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, resource_id: &str) -> Option<&PdfImage> {
        self.images
            .iter()
            .find(|(id, _)| id == resource_id)
            .map(|(_, image)| image)
    }

    /// Write every image; returns (resource name, object number) pairs
    pub fn write_images<W: Write>(&self, pdf: &mut PdfWriter<W>) -> Result<Vec<(String, u32)>> {
        let mut refs = Vec::with_capacity(self.images.len());
        for (id, image) in &self.images {
            let smask_ref = match image.smask() {
                Some(stream) => {
                    let obj = pdf.allocate_object();
                    pdf.write_stream_object(obj, stream)?;
                    Some(obj)
                }
                None => None,
            };
            let obj = pdf.allocate_object();
            pdf.write_stream_object(obj, image.xobject(smask_ref))?;
            refs.push((id.clone(), obj));
        }
        Ok(refs)
    }
}

impl ImageSink for ImageManager {
    fn register_image(
        &mut self,
        name: &str,
        bytes: &[u8],
    ) -> std::result::Result<RegisteredImage, ImageError> {
        let image = PdfImage::decode(bytes)?;
        let resource_id = format!("Im{}", self.images.len());
        tracing::debug!(
            "Registered image {} as {} ({}x{}, {:?})",
            name,
            resource_id,
            image.width,
            image.height,
            image.filter
        );
        let registered = RegisteredImage {
            resource_id: resource_id.clone(),
            pixel_width: image.width,
            pixel_height: image.height,
        };
        self.images.push((resource_id, image));
        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(image: image::DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_jpeg_passthrough() {
        let bytes = encode(RgbImage::from_pixel(8, 4, Rgb([200, 10, 10])).into(), ImageFormat::Jpeg);
        let image = PdfImage::decode(&bytes).unwrap();
        assert_eq!(image.filter, ImageFilter::DCTDecode);
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!((image.width, image.height), (8, 4));
        assert_eq!(image.data, bytes);
    }

    #[test]
    fn test_jpeg_frame_header() {
        let rgb = encode(RgbImage::new(2, 2).into(), ImageFormat::Jpeg);
        assert_eq!(jpeg_frame_header(&rgb), Some((8, 3)));

        // SOI, APP14 (Adobe), SOF0 with 4 components
        let mut cmyk = vec![0xFF, 0xD8, 0xFF, 0xEE, 0x00, 0x04, 0x00, 0x00];
        cmyk.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x14, 0x08, 0x00, 0x02, 0x00, 0x02, 0x04]);
        cmyk.extend_from_slice(&[1, 0x11, 0, 2, 0x11, 0, 3, 0x11, 0, 4, 0x11, 0]);
        assert_eq!(jpeg_frame_header(&cmyk), Some((8, 4)));
        assert_eq!(dct_color_space(&cmyk), None);

        let mut gray = cmyk.clone();
        gray[17] = 1;
        assert_eq!(dct_color_space(&gray), Some(ColorSpace::DeviceGray));

        let mut twelve_bit = cmyk;
        twelve_bit[12] = 12;
        twelve_bit[17] = 3;
        assert_eq!(dct_color_space(&twelve_bit), None);

        assert_eq!(jpeg_frame_header(b"\x89PNG"), None);
        assert_eq!(jpeg_frame_header(&[0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02]), None);
    }

    #[test]
    fn test_opaque_png_has_no_mask() {
        let bytes = encode(RgbImage::from_pixel(3, 5, Rgb([1, 2, 3])).into(), ImageFormat::Png);
        let image = PdfImage::decode(&bytes).unwrap();
        assert_eq!(image.filter, ImageFilter::FlateDecode);
        assert!(image.alpha.is_none());
        assert!(image.smask().is_none());
    }

    #[test]
    fn test_translucent_png_has_mask() {
        let mut rgba = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let bytes = encode(rgba.into(), ImageFormat::Png);
        let image = PdfImage::decode(&bytes).unwrap();
        assert!(image.alpha.is_some());

        let mut pdf = PdfWriter::new(Vec::new(), true);
        let mut manager = ImageManager::new();
        manager.images.push(("Im0".to_string(), image));
        let refs = manager.write_images(&mut pdf).unwrap();
        // mask first, then the image that points at it
        assert_eq!(refs, vec![("Im0".to_string(), 2)]);
        let text = String::from_utf8_lossy(&pdf.into_inner()).into_owned();
        assert!(text.contains("/SMask 1 0 R"));
    }

    #[test]
    fn test_corrupt_payload_is_rejected() {
        let mut manager = ImageManager::new();
        assert!(manager.register_image("junk.jpg", b"not an image").is_err());
        assert!(manager.register_image("empty.jpg", &[]).is_err());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_register_names_in_order() {
        let png = encode(RgbImage::new(4, 2).into(), ImageFormat::Png);
        let mut manager = ImageManager::new();
        let first = manager.register_image("a.png", &png).unwrap();
        let second = manager.register_image("b.png", &png).unwrap();
        assert_eq!(first.resource_id, "Im0");
        assert_eq!(second.resource_id, "Im1");
        assert_eq!((second.pixel_width, second.pixel_height), (4, 2));
        assert!(manager.get("Im1").is_some());
    }
}
