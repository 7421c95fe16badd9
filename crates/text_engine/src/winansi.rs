//! Windows-1252 ("WinAnsi") text encoding
//!
//! The standard 14 PDF fonts are addressed with single-byte strings in
//! WinAnsiEncoding. Anything outside that code page cannot be shown by
//! them.

use encoding_rs::WINDOWS_1252;

/// Byte used for characters with no WinAnsi code
pub const REPLACEMENT_BYTE: u8 = b'?';

/// WinAnsi byte for `c`, if the code page has one
pub fn encode_char(c: char) -> Option<u8> {
    if c.is_ascii() {
        return Some(c as u8);
    }
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match (&*bytes, had_errors) {
        ([byte], false) => Some(*byte),
        _ => None,
    }
}

/// Encode `text` byte-per-char, substituting [`REPLACEMENT_BYTE`]
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| encode_char(c).unwrap_or(REPLACEMENT_BYTE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode("Pump 3"), b"Pump 3".to_vec());
    }

    #[test]
    fn test_latin1_and_typographic() {
        assert_eq!(encode_char('é'), Some(0xE9));
        assert_eq!(encode_char('€'), Some(0x80));
        assert_eq!(encode_char('\u{2019}'), Some(0x92));
        assert_eq!(encode_char('\u{2014}'), Some(0x97));
    }

    #[test]
    fn test_outside_code_page() {
        assert_eq!(encode_char('Ж'), None);
        assert_eq!(encode_char('\u{1F527}'), None);
        assert_eq!(encode("café ✓"), vec![b'c', b'a', b'f', 0xE9, b' ', b'?']);
    }
}
