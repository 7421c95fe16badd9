//! Character repertoire sanitizing
//!
//! Each renderer can only show a subset of Unicode: the standard PDF fonts
//! are limited to WinAnsi, an embedded font to the glyphs it carries, and
//! WordprocessingML to characters legal in XML 1.0. [`sanitize`] maps text
//! onto one of those sets one character at a time:
//!
//! - `'\n'` is kept (line structure belongs to the text)
//! - any other control character becomes a space
//! - a character outside the repertoire becomes [`SUBSTITUTE`]
//!
//! The output always has as many chars as the input, and sanitizing twice
//! gives the same result as sanitizing once.

use crate::font::ExtendedFont;
use crate::winansi;
use std::sync::Arc;

/// Replacement for characters the target cannot show
pub const SUBSTITUTE: char = '?';

/// Set of characters a renderer can show
#[derive(Debug, Clone)]
pub enum Repertoire {
    /// Windows-1252, the encoding of the standard PDF fonts
    WinAnsi,
    /// Characters mapped by an embedded font's cmap
    Font(Arc<ExtendedFont>),
    /// Characters allowed in an XML 1.0 document
    Xml,
}

impl Repertoire {
    /// Whether `c` can be shown as-is
    pub fn supports(&self, c: char) -> bool {
        match self {
            Repertoire::WinAnsi => winansi::encode_char(c).is_some(),
            Repertoire::Font(font) => font.has_glyph(c),
            Repertoire::Xml => matches!(
                c,
                '\t' | '\n' | '\r'
                    | '\u{20}'..='\u{D7FF}'
                    | '\u{E000}'..='\u{FFFD}'
                    | '\u{10000}'..='\u{10FFFF}'
            ),
        }
    }

    /// Sanitize `text` for this repertoire
    pub fn sanitize(&self, text: &str) -> String {
        sanitize(text, self)
    }
}

/// Map one character onto `repertoire`
pub fn sanitize_char(c: char, repertoire: &Repertoire) -> char {
    if c == '\n' {
        return c;
    }
    if c.is_control() {
        return ' ';
    }
    if c == ' ' || c == SUBSTITUTE || repertoire.supports(c) {
        c
    } else {
        SUBSTITUTE
    }
}

/// Map every character of `text` onto `repertoire`
pub fn sanitize(text: &str, repertoire: &Repertoire) -> String {
    text.chars().map(|c| sanitize_char(c, repertoire)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_winansi_keeps_french_text() {
        let text = "Compteur défectueux, remplacé « à l'œil »";
        assert_eq!(sanitize(text, &Repertoire::WinAnsi), text);
    }

    #[test]
    fn test_winansi_substitutes_outside_chars() {
        assert_eq!(sanitize("Valve ✓ Ω", &Repertoire::WinAnsi), "Valve ? ?");
        assert_eq!(sanitize("Ремонт", &Repertoire::WinAnsi), "??????");
    }

    #[test]
    fn test_controls_become_spaces() {
        assert_eq!(sanitize("a\tb\r\nc\u{7}", &Repertoire::WinAnsi), "a b \nc ");
        assert_eq!(sanitize("x\u{1}y", &Repertoire::Xml), "x y");
    }

    #[test]
    fn test_xml_accepts_astral() {
        assert_eq!(sanitize("pipe 🔧", &Repertoire::Xml), "pipe 🔧");
        assert_eq!(sanitize("\u{FFFE}", &Repertoire::Xml), "?");
    }

    #[test]
    fn test_empty() {
        assert_eq!(sanitize("", &Repertoire::WinAnsi), "");
    }

    fn any_repertoire() -> impl Strategy<Value = Repertoire> {
        prop_oneof![Just(Repertoire::WinAnsi), Just(Repertoire::Xml)]
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(text in any::<String>(), repertoire in any_repertoire()) {
            let once = sanitize(&text, &repertoire);
            let twice = sanitize(&once, &repertoire);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_sanitize_preserves_char_count(text in any::<String>(), repertoire in any_repertoire()) {
            let out = sanitize(&text, &repertoire);
            prop_assert_eq!(out.chars().count(), text.chars().count());
        }

        #[test]
        fn prop_winansi_output_is_encodable(text in any::<String>()) {
            let out = sanitize(&text, &Repertoire::WinAnsi);
            prop_assert!(out.chars().all(|c| c == '\n' || winansi::encode_char(c).is_some()));
        }
    }
}
