//! PDF font resources
//!
//! With the base font, text is drawn with the standard Helvetica faces in
//! WinAnsiEncoding. With an extended font, the TrueType program is embedded
//! whole as a Type0/CIDFontType2 font using Identity-H, text is written as
//! glyph ids, and a ToUnicode CMap keeps it extractable. Embedded fonts
//! have a single weight, so bold is synthesized by stroking the outline.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfWriter, Result};
use std::collections::BTreeMap;
use std::io::Write;
use text_engine::{winansi, ExtendedFont, ReportFont};

/// bfchar entries per CMap block (the format caps blocks at 100)
const CMAP_CHUNK: usize = 100;

/// Standard faces used by the base font
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub fn for_weight(bold: bool) -> Self {
        if bold {
            StandardFont::HelveticaBold
        } else {
            StandardFont::Helvetica
        }
    }

    pub fn pdf_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn font_dict(&self) -> PdfDictionary {
        PdfDictionary::typed("Font")
            .with("Subtype", PdfObject::name("Type1"))
            .with("BaseFont", PdfObject::name(self.pdf_name()))
            .with("Encoding", PdfObject::name("WinAnsiEncoding"))
    }
}

/// A font resource referenced from page content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontResource {
    Standard(StandardFont),
    Embedded,
}

/// Text of one run, encoded for its font resource
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedText {
    /// WinAnsi bytes
    Bytes(Vec<u8>),
    /// Two-byte glyph ids
    Glyphs(Vec<u16>),
}

/// How to draw one run
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRun {
    pub resource: String,
    pub text: EncodedText,
    /// Stroke the glyph outlines to fake a bold weight
    pub synthetic_bold: bool,
}

/// Tracks font resources used by the document.
///
/// Resource names ("F1", "F2", ...) are handed out in order of first use.
pub struct FontManager {
    font: ReportFont,
    resources: Vec<(String, FontResource)>,
    /// Glyphs drawn with the embedded font, with the char each one shows
    used_glyphs: BTreeMap<u16, char>,
}

impl FontManager {
    pub fn new(font: ReportFont) -> Self {
        Self {
            font,
            resources: Vec::new(),
            used_glyphs: BTreeMap::new(),
        }
    }

    /// Resource name for `resource`, registering it on first use
    fn resource_name(&mut self, resource: FontResource) -> String {
        if let Some((name, _)) = self.resources.iter().find(|(_, r)| *r == resource) {
            return name.clone();
        }
        let name = format!("F{}", self.resources.len() + 1);
        self.resources.push((name.clone(), resource));
        name
    }

    /// Encode `text` for whichever font this document uses
    pub fn encode_run(&mut self, text: &str, bold: bool) -> EncodedRun {
        match self.font.clone() {
            ReportFont::Base => EncodedRun {
                resource: self.resource_name(FontResource::Standard(StandardFont::for_weight(bold))),
                text: EncodedText::Bytes(winansi::encode(text)),
                synthetic_bold: false,
            },
            ReportFont::Extended(font) => {
                let glyphs = text
                    .chars()
                    .map(|c| {
                        let gid = font.glyph_id(c).unwrap_or(0);
                        if gid != 0 {
                            self.used_glyphs.entry(gid).or_insert(c);
                        }
                        gid
                    })
                    .collect();
                EncodedRun {
                    resource: self.resource_name(FontResource::Embedded),
                    text: EncodedText::Glyphs(glyphs),
                    synthetic_bold: bold,
                }
            }
        }
    }

    pub fn resources(&self) -> &[(String, FontResource)] {
        &self.resources
    }

    /// Write every used font; returns (resource name, object number) pairs
    pub fn write_fonts<W: Write>(&self, pdf: &mut PdfWriter<W>) -> Result<Vec<(String, u32)>> {
        let mut refs = Vec::new();
        for (name, resource) in &self.resources {
            let obj = match (resource, &self.font) {
                (FontResource::Standard(standard), _) => {
                    let obj = pdf.allocate_object();
                    pdf.write_object(obj, standard.font_dict().into())?;
                    obj
                }
                (FontResource::Embedded, ReportFont::Extended(font)) => {
                    write_type0_font(pdf, font, &self.used_glyphs)?
                }
                (FontResource::Embedded, ReportFont::Base) => continue,
            };
            refs.push((name.clone(), obj));
        }
        Ok(refs)
    }
}

/// Embed `font` and return the Type0 font object number
fn write_type0_font<W: Write>(
    pdf: &mut PdfWriter<W>,
    font: &ExtendedFont,
    used: &BTreeMap<u16, char>,
) -> Result<u32> {
    let family = font.family();

    let file_obj = pdf.allocate_object();
    let mut file = PdfStream::new(font.data().to_vec());
    file.dict.insert("Length1", font.data().len() as i64);
    pdf.write_stream_object(file_obj, file)?;

    let descriptor_obj = pdf.allocate_object();
    let descriptor = PdfDictionary::typed("FontDescriptor")
        .with("FontName", PdfObject::name(family))
        // Nonsymbolic
        .with("Flags", 32i64)
        .with("FontBBox", PdfObject::reals(&font.bbox()))
        .with("ItalicAngle", 0i64)
        .with("Ascent", font.ascent())
        .with("Descent", font.descent())
        .with("CapHeight", font.cap_height())
        .with("StemV", 80i64)
        .with("FontFile2", PdfObject::Reference(file_obj));
    pdf.write_object(descriptor_obj, descriptor.into())?;

    let cid_obj = pdf.allocate_object();
    let system_info = PdfDictionary::new()
        .with("Registry", PdfObject::string("Adobe"))
        .with("Ordering", PdfObject::string("Identity"))
        .with("Supplement", 0i64);
    let cid_font = PdfDictionary::typed("Font")
        .with("Subtype", PdfObject::name("CIDFontType2"))
        .with("BaseFont", PdfObject::name(family))
        .with("CIDSystemInfo", system_info)
        .with("FontDescriptor", PdfObject::Reference(descriptor_obj))
        .with("DW", font.glyph_width(0))
        .with("W", glyph_widths(font, used))
        .with("CIDToGIDMap", PdfObject::name("Identity"));
    pdf.write_object(cid_obj, cid_font.into())?;

    let cmap_obj = pdf.allocate_object();
    pdf.write_stream_object(cmap_obj, PdfStream::new(to_unicode_cmap(used).into_bytes()))?;

    let type0_obj = pdf.allocate_object();
    let type0 = PdfDictionary::typed("Font")
        .with("Subtype", PdfObject::name("Type0"))
        .with("BaseFont", PdfObject::name(family))
        .with("Encoding", PdfObject::name("Identity-H"))
        .with("DescendantFonts", vec![PdfObject::Reference(cid_obj)])
        .with("ToUnicode", PdfObject::Reference(cmap_obj));
    pdf.write_object(type0_obj, type0.into())?;

    tracing::debug!("Embedded font {} with {} used glyphs", family, used.len());
    Ok(type0_obj)
}

/// `/W` array: `gid [width]` for every used glyph
fn glyph_widths(font: &ExtendedFont, used: &BTreeMap<u16, char>) -> PdfObject {
    let mut entries = Vec::with_capacity(used.len() * 2);
    for gid in used.keys() {
        entries.push(PdfObject::Integer(*gid as i64));
        entries.push(PdfObject::Array(vec![PdfObject::Real(font.glyph_width(*gid))]));
    }
    PdfObject::Array(entries)
}

/// ToUnicode CMap mapping glyph ids back to text
pub fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = used.iter().collect();
    for chunk in entries.chunks(CMAP_CHUNK) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, c) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}
