//! DOCX Export Public API

use crate::docx::document_writer::DocumentWriter;
use crate::docx::error::DocxResult;
use crate::docx::styles_writer::StylesWriter;
use crate::docx::writer::DocxWriter;
use crate::resources::ReportResources;
use crate::settings::ReportSettings;
use layout_engine::{ReportLabels, ReportOutline, SkippedPhoto};
use report_model::Draft;
use std::io::Cursor;
use text_engine::Repertoire;

/// A rendered DOCX report
#[derive(Debug)]
pub struct DocxOutput {
    pub bytes: Vec<u8>,
    pub placed_photos: usize,
    pub skipped_photos: Vec<SkippedPhoto>,
    pub logo_placed: bool,
}

/// Write `draft` as a reflowable DOCX document.
///
/// Text is first reduced to characters XML can carry. Photos that cannot
/// be decoded and an unusable logo are left out.
pub fn render_docx(
    draft: &Draft,
    resources: &ReportResources,
    settings: &ReportSettings,
) -> DocxResult<DocxOutput> {
    let page = settings.layout.page_config();
    page.validate()?;
    let style = settings.layout.report_style();

    let repertoire = Repertoire::Xml;
    let draft = draft.map_text(|s| repertoire.sanitize(s));
    let labels = ReportLabels::for_language(&settings.export.language)
        .map_text(|s| repertoire.sanitize(s));
    let outline = ReportOutline::build(&draft, &labels, style.photo_width);

    let mut docx = DocxWriter::new(Cursor::new(Vec::new()));
    let body = DocumentWriter::new(&page).write(&outline, &draft, resources.logo(), &mut docx)?;
    let styles = StylesWriter::new(&style).write();
    let bytes = docx.finish(&body.xml, &styles)?.into_inner();

    tracing::info!(
        "Rendered DOCX: {} photo(s) placed, {} skipped, {} bytes",
        body.placed_photos,
        body.skipped_photos.len(),
        bytes.len()
    );

    Ok(DocxOutput {
        bytes,
        placed_photos: body.placed_photos,
        skipped_photos: body.skipped_photos,
        logo_placed: body.logo_placed,
    })
}
