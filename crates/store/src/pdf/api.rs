//! PDF Export Public API

use super::fonts::FontManager;
use super::images::ImageManager;
use super::writer::{PdfDocumentWriter, Result};
use crate::resources::ReportResources;
use crate::settings::ReportSettings;
use layout_engine::{ReportLabels, ReportLayouter, SkippedPhoto};
use report_model::Draft;

/// A rendered PDF report
#[derive(Debug)]
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub placed_photos: usize,
    pub skipped_photos: Vec<SkippedPhoto>,
    pub logo_placed: bool,
    /// Family the text was drawn with
    pub font_family: String,
}

/// Lay out `draft` and write it as a PDF document.
///
/// Photos that cannot be decoded and a logo that cannot be used are left
/// out; they never fail the export.
pub fn render_pdf(
    draft: &Draft,
    resources: &ReportResources,
    settings: &ReportSettings,
) -> Result<PdfOutput> {
    let font = resources.report_font();
    let labels = ReportLabels::for_language(&settings.export.language);
    let config = settings.layout.page_config();
    let style = settings.layout.report_style();

    let mut images = ImageManager::new();
    let layout = ReportLayouter::new(&config, &style, &labels, &font)
        .with_logo(resources.logo())
        .layout(draft, &mut images)?;

    let mut fonts = FontManager::new(font.clone());
    let bytes = PdfDocumentWriter::new(settings.export.compress)
        .with_title(format!("{} - {}", labels.report_title, draft.client_name.trim()))
        .write_to_bytes(&layout.pages, &mut fonts, &images)?;

    tracing::info!(
        "Rendered PDF: {} page(s), {} photo(s) placed, {} skipped, {} bytes",
        layout.pages.len(),
        layout.placed_photos,
        layout.skipped_photos.len(),
        bytes.len()
    );

    Ok(PdfOutput {
        bytes,
        page_count: layout.pages.len(),
        placed_photos: layout.placed_photos,
        skipped_photos: layout.skipped_photos,
        logo_placed: layout.logo_placed,
        font_family: font.family().to_string(),
    })
}
