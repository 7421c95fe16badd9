//! Tests against a small TrueType fixture covering ASCII, Latin-1 and Cyrillic

use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use text_engine::{sanitize, ExtendedFont, ReportFont, Repertoire, TextMeasure, SUBSTITUTE};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/FieldSans.ttf")
}

fn font() -> Arc<ExtendedFont> {
    Arc::new(ExtendedFont::load(&fixture_path()).unwrap())
}

#[test]
fn loads_family_and_metrics() {
    let font = font();
    assert_eq!(font.family(), "FieldSans");
    assert!(font.has_glyph('A'));
    assert!(font.has_glyph('é'));
    assert!(font.has_glyph('Ж'));
    assert!(!font.has_glyph('✓'));
    assert_eq!(font.char_width('A'), 600.0);
    assert_eq!(font.char_width('Ж'), 700.0);
    assert_eq!(font.ascent(), 800.0);
    assert_eq!(font.descent(), -200.0);
    assert_eq!(font.bbox(), [0.0, -200.0, 600.0, 800.0]);
}

#[test]
fn unsupported_glyphs_become_substitute() {
    let repertoire = Repertoire::Font(font());
    assert_eq!(
        sanitize("Société Ремонт ✓ Ω", &repertoire),
        format!("Société Ремонт {} {}", SUBSTITUTE, SUBSTITUTE)
    );
}

#[test]
fn extended_report_font() {
    let report_font = ReportFont::resolve(Some(font()));
    assert!(report_font.is_extended());
    assert_eq!(report_font.family(), "FieldSans");
    assert!(matches!(report_font.repertoire(), Repertoire::Font(_)));
    // 4 Cyrillic glyphs at 700 units, 10pt
    assert!((report_font.text_width("Жизн", 10.0, false) - 28.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn font_sanitize_is_idempotent(text in any::<String>()) {
        let repertoire = Repertoire::Font(font());
        let once = sanitize(&text, &repertoire);
        let twice = sanitize(&once, &repertoire);
        prop_assert_eq!(once.chars().count(), text.chars().count());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn font_sanitize_output_is_drawable(text in "[a-zA-Zéà Ж✓\u{4E00}-\u{4E10}\n\t]{0,40}") {
        let font = font();
        let out = sanitize(&text, &Repertoire::Font(Arc::clone(&font)));
        prop_assert!(out.chars().all(|c| c == '\n' || font.has_glyph(c)));
    }
}
