//! Extended TrueType font loading
//!
//! The base PDF fonts only cover WinAnsi. When a TrueType file is available
//! the report is drawn with it instead, embedded whole. Only the tables the
//! writer and the layout need are extracted here, so the parsed face does
//! not have to outlive the load call.

use crate::error::{FontError, Result};
use rustybuzz::ttf_parser::{Face, GlyphId};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A TrueType font loaded from disk
pub struct ExtendedFont {
    family: String,
    data: Vec<u8>,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    cap_height: i16,
    bbox: [i16; 4],
    glyphs: HashMap<char, u16>,
    advances: Vec<u16>,
}

impl ExtendedFont {
    /// Load and parse a TrueType file. The family name is taken from the
    /// file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let family = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ExtendedFont".to_string());
        Self::from_bytes(&family, data)
    }

    /// Parse TrueType data already in memory
    pub fn from_bytes(family: &str, data: Vec<u8>) -> Result<Self> {
        let tables = FaceTables::read(&data)?;
        let font = Self {
            family: sanitize_family(family),
            data,
            units_per_em: tables.units_per_em,
            ascender: tables.ascender,
            descender: tables.descender,
            cap_height: tables.cap_height,
            bbox: tables.bbox,
            glyphs: tables.glyphs,
            advances: tables.advances,
        };
        tracing::debug!(
            "Loaded font {} ({} glyphs, {} mapped chars)",
            font.family,
            font.advances.len(),
            font.glyphs.len()
        );
        Ok(font)
    }

    /// PostScript-safe family name
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font program, embedded as-is
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.glyphs.get(&c).copied()
    }

    /// Advance of glyph `gid` in 1/1000 em
    pub fn glyph_width(&self, gid: u16) -> f64 {
        let advance = self.advances.get(gid as usize).copied().unwrap_or(0);
        self.scale(advance as i32)
    }

    /// Advance of `c` in 1/1000 em; unmapped chars use the .notdef width
    pub fn char_width(&self, c: char) -> f64 {
        self.glyph_width(self.glyph_id(c).unwrap_or(0))
    }

    pub fn ascent(&self) -> f64 {
        self.scale(self.ascender as i32)
    }

    pub fn descent(&self) -> f64 {
        self.scale(self.descender as i32)
    }

    pub fn cap_height(&self) -> f64 {
        self.scale(self.cap_height as i32)
    }

    /// Font bounding box in 1/1000 em: [x_min, y_min, x_max, y_max]
    pub fn bbox(&self) -> [f64; 4] {
        self.bbox.map(|v| self.scale(v as i32))
    }

    fn scale(&self, units: i32) -> f64 {
        if self.units_per_em == 0 {
            return 0.0;
        }
        units as f64 * 1000.0 / self.units_per_em as f64
    }
}

impl fmt::Debug for ExtendedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedFont")
            .field("family", &self.family)
            .field("bytes", &self.data.len())
            .field("glyphs", &self.advances.len())
            .field("mapped_chars", &self.glyphs.len())
            .finish()
    }
}

/// Values read out of the face tables
struct FaceTables {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    cap_height: i16,
    bbox: [i16; 4],
    glyphs: HashMap<char, u16>,
    advances: Vec<u16>,
}

impl FaceTables {
    fn read(data: &[u8]) -> Result<Self> {
        let face = Face::parse(data, 0).map_err(|e| FontError::InvalidFontData(e.to_string()))?;

        if face.tables().glyf.is_none() {
            return Err(FontError::Unsupported(
                "only TrueType (glyf) outlines can be embedded".to_string(),
            ));
        }

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|code_point| {
                    let (Some(c), Some(gid)) =
                        (char::from_u32(code_point), subtable.glyph_index(code_point))
                    else {
                        return;
                    };
                    if gid.0 != 0 {
                        glyphs.entry(c).or_insert(gid.0);
                    }
                });
            }
        }
        if glyphs.is_empty() {
            return Err(FontError::Unsupported("font has no Unicode cmap".to_string()));
        }

        let advances = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0))
            .collect();
        let bbox = face.global_bounding_box();
        let ascender = face.ascender();

        Ok(Self {
            units_per_em: face.units_per_em(),
            ascender,
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or(ascender),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            glyphs,
            advances,
        })
    }
}

/// Keep only characters allowed unescaped in a PDF name
fn sanitize_family(family: &str) -> String {
    let cleaned: String = family
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "ExtendedFont".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_rejected() {
        let err = ExtendedFont::from_bytes("Broken", b"definitely not a font".to_vec()).unwrap_err();
        assert!(matches!(err, FontError::InvalidFontData(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ExtendedFont::load(Path::new("/nonexistent/DejaVuSans.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io(_)));
    }

    #[test]
    fn test_sanitize_family() {
        assert_eq!(sanitize_family("DejaVu Sans (Book)"), "DejaVuSansBook");
        assert_eq!(sanitize_family("Noto-Sans_Regular"), "Noto-Sans_Regular");
        assert_eq!(sanitize_family("  "), "ExtendedFont");
    }
}
