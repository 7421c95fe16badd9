//! PDF object model
//!
//! Only the object kinds the report writer produces. Dictionaries keep keys
//! sorted so identical input always serializes to identical bytes.

use std::collections::BTreeMap;

/// A PDF object
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// Literal string, already in the target byte encoding
    String(Vec<u8>),
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    /// Indirect reference to object `n` (generation 0)
    Reference(u32),
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn string(s: impl Into<Vec<u8>>) -> Self {
        PdfObject::String(s.into())
    }

    /// `[a b c d]` from numbers
    pub fn reals(values: &[f64]) -> Self {
        PdfObject::Array(values.iter().map(|v| PdfObject::Real(*v)).collect())
    }

    /// Serialize into `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            PdfObject::Integer(n) => out.extend_from_slice(n.to_string().as_bytes()),
            PdfObject::Real(n) => out.extend_from_slice(format_real(*n).as_bytes()),
            PdfObject::String(bytes) => write_literal_string(bytes, out),
            PdfObject::Name(name) => write_name(name, out),
            PdfObject::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            PdfObject::Dictionary(dict) => dict.write_to(out),
            PdfObject::Reference(n) => out.extend_from_slice(format!("{} 0 R", n).as_bytes()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }
}

impl From<i64> for PdfObject {
    fn from(n: i64) -> Self {
        PdfObject::Integer(n)
    }
}

impl From<u32> for PdfObject {
    fn from(n: u32) -> Self {
        PdfObject::Integer(n as i64)
    }
}

impl From<f64> for PdfObject {
    fn from(n: f64) -> Self {
        PdfObject::Real(n)
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<Vec<PdfObject>> for PdfObject {
    fn from(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }
}

/// PDF dictionary with sorted keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with a `/Type` entry
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.insert("Type", PdfObject::name(type_name));
        dict
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PdfObject>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<<");
        for (key, value) in &self.entries {
            out.push(b' ');
            write_name(key, out);
            out.push(b' ');
            value.write_to(out);
        }
        out.extend_from_slice(b" >>");
    }
}

/// Stream object: dictionary plus payload
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// The payload already carries its `/Filter`
    pub encoded: bool,
}

impl PdfStream {
    /// Plain stream, compressed by the writer when compression is on
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            encoded: false,
        }
    }

    /// Stream whose payload is already encoded with `filter`
    pub fn encoded(dict: PdfDictionary, filter: &str, data: Vec<u8>) -> Self {
        Self {
            dict: dict.with("Filter", PdfObject::name(filter)),
            data,
            encoded: true,
        }
    }
}

/// Reals with at most 4 decimals and no trailing zeros
pub fn format_real(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

pub(crate) fn write_literal_string(bytes: &[u8], out: &mut Vec<u8>) {
    out.push(b'(');
    for &byte in bytes {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            0x20..=0x7E => out.push(byte),
            _ => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
        }
    }
    out.push(b')');
}

fn write_name(name: &str, out: &mut Vec<u8>) {
    out.push(b'/');
    for byte in name.bytes() {
        match byte {
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' => {
                out.extend_from_slice(format!("#{:02X}", byte).as_bytes())
            }
            0x21..=0x7E => out.push(byte),
            _ => out.extend_from_slice(format!("#{:02X}", byte).as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(obj: &PdfObject) -> String {
        String::from_utf8(obj.to_bytes()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(text(&PdfObject::Integer(42)), "42");
        assert_eq!(text(&PdfObject::Real(3.14159)), "3.1416");
        assert_eq!(text(&PdfObject::Real(612.0)), "612");
        assert_eq!(text(&PdfObject::Real(-0.00001)), "0");
        assert_eq!(text(&PdfObject::Reference(7)), "7 0 R");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(text(&PdfObject::string("a(b)\\c")), "(a\\(b\\)\\\\c)");
        // WinAnsi e-acute
        assert_eq!(text(&PdfObject::string(vec![0xE9])), "(\\351)");
    }

    #[test]
    fn test_name_escaping() {
        assert_eq!(text(&PdfObject::name("Type")), "/Type");
        assert_eq!(text(&PdfObject::name("A B#")), "/A#20B#23");
    }

    #[test]
    fn test_dictionary_keys_sorted() {
        let dict = PdfDictionary::typed("Page").with("Contents", PdfObject::Reference(4));
        let obj = PdfObject::Dictionary(dict);
        assert_eq!(text(&obj), "<< /Contents 4 0 R /Type /Page >>");
    }

    #[test]
    fn test_array() {
        assert_eq!(text(&PdfObject::reals(&[0.0, 0.0, 595.276, 841.89])), "[0 0 595.276 841.89]");
    }
}
