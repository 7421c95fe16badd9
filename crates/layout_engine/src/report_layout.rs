//! Fixed-page report layout
//!
//! A single pass over the draft driven by [`LayoutState`]. Each step emits
//! one block into the current page and returns the next state. When a block
//! does not fit, the step returns [`LayoutState::NeedsPageBreak`] carrying
//! the state to resume in, so the block is retried at the top of a fresh
//! page. A block that does not fit on an empty page is placed anyway, which
//! keeps the pass finite.
//!
//! Photos are registered with the renderer through an [`ImageSink`]. A
//! photo that cannot be read or decoded is logged and skipped; it never
//! aborts the section or the document.

use crate::error::Result;
use crate::image_sink::{ImageError, ImageSink, RegisteredImage};
use crate::line_breaker::wrap_text;
use crate::page::PageConfig;
use crate::style::{ReportLabels, ReportStyle};
use render_model::{Color, ImagePlacement, PageRender, Rect, RenderItem, TextRun};
use report_model::{Draft, Photo};
use text_engine::{ReportFont, TextMeasure};

/// Name the logo is registered under
pub const LOGO_NAME: &str = "logo";

/// Baseline offset from the top of a line, as a fraction of the font size
const BASELINE_RATIO: f64 = 0.8;
/// Space between a section title and its rule
const RULE_OFFSET: f64 = 2.0;
/// Space between a rule and the text below it
const RULE_GAP: f64 = 6.0;
/// Slack for float comparisons against page limits
const EPSILON: f64 = 0.01;

/// Position of the layout pass
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutState {
    AtHeader,
    /// `next` indexes the non-blank participants
    InParticipants { next: usize },
    InSectionTitle { section: usize },
    InSectionBody { section: usize, line: usize },
    PlacingPhoto { section: usize, photo: usize },
    NeedsPageBreak { resume: Box<LayoutState> },
    Finished,
}

/// A photo left out of the document
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPhoto {
    pub section: usize,
    pub photo: usize,
    pub name: String,
    pub reason: String,
}

/// Result of laying out a report
#[derive(Debug, Default)]
pub struct LayoutOutput {
    pub pages: Vec<PageRender>,
    pub placed_photos: usize,
    pub skipped_photos: Vec<SkippedPhoto>,
    pub logo_placed: bool,
}

/// Lays a draft out onto fixed-size pages
pub struct ReportLayouter<'a> {
    config: &'a PageConfig,
    style: &'a ReportStyle,
    labels: &'a ReportLabels,
    font: &'a ReportFont,
    logo: Option<&'a [u8]>,
}

impl<'a> ReportLayouter<'a> {
    pub fn new(
        config: &'a PageConfig,
        style: &'a ReportStyle,
        labels: &'a ReportLabels,
        font: &'a ReportFont,
    ) -> Self {
        Self {
            config,
            style,
            labels,
            font,
            logo: None,
        }
    }

    /// Draw `logo` in the header band when it decodes
    pub fn with_logo(mut self, logo: Option<&'a [u8]>) -> Self {
        self.logo = logo;
        self
    }

    /// Lay out `draft`, registering every image with `sink`.
    ///
    /// All text is sanitized to the font's repertoire first, so widths are
    /// measured on exactly what gets drawn.
    pub fn layout<S: ImageSink + ?Sized>(&self, draft: &Draft, sink: &mut S) -> Result<LayoutOutput> {
        self.config.validate()?;

        let repertoire = self.font.repertoire();
        let draft = draft.map_text(|s| repertoire.sanitize(s));
        let labels = self.labels.map_text(|s| repertoire.sanitize(s));

        let mut run = LayoutRun {
            config: self.config,
            style: self.style,
            font: self.font,
            logo: self.logo,
            draft: &draft,
            labels: &labels,
            sink,
            output: LayoutOutput::default(),
            cursor: 0.0,
            body_lines: Vec::new(),
            pending: None,
        };

        let mut state = LayoutState::AtHeader;
        while state != LayoutState::Finished {
            state = run.step(state);
        }
        Ok(run.finish())
    }
}

/// A photo registered before a page break, placed after it
struct PendingPhoto {
    section: usize,
    photo: usize,
    image: RegisteredImage,
}

struct LayoutRun<'r, S: ImageSink + ?Sized> {
    config: &'r PageConfig,
    style: &'r ReportStyle,
    font: &'r ReportFont,
    logo: Option<&'r [u8]>,
    draft: &'r Draft,
    labels: &'r ReportLabels,
    sink: &'r mut S,
    output: LayoutOutput,
    /// Top of the next block on the current page
    cursor: f64,
    /// Wrapped description of the section being laid out
    body_lines: Vec<String>,
    pending: Option<PendingPhoto>,
}

impl<'r, S: ImageSink + ?Sized> LayoutRun<'r, S> {
    fn step(&mut self, state: LayoutState) -> LayoutState {
        match state {
            LayoutState::AtHeader => {
                self.emit_header();
                LayoutState::InParticipants { next: 0 }
            }
            LayoutState::InParticipants { next } => self.emit_participants(next),
            LayoutState::InSectionTitle { section } => self.emit_section_title(section),
            LayoutState::InSectionBody { section, line } => self.emit_section_body(section, line),
            LayoutState::PlacingPhoto { section, photo } => self.place_photo(section, photo),
            LayoutState::NeedsPageBreak { resume } => {
                self.new_page();
                *resume
            }
            LayoutState::Finished => LayoutState::Finished,
        }
    }

    fn section_start(&self, section: usize) -> LayoutState {
        if section < self.draft.sections().len() {
            LayoutState::InSectionTitle { section }
        } else {
            LayoutState::Finished
        }
    }

    // --- page handling ---

    fn new_page(&mut self) {
        let index = self.output.pages.len();
        tracing::debug!("Starting page {}", index + 1);
        self.output.pages.push(PageRender::new(
            index,
            self.config.page_width,
            self.config.page_height,
        ));
        self.cursor = self.config.margin_top;
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.config.margin_top + EPSILON
    }

    fn fits(&self, height: f64) -> bool {
        self.cursor + height <= self.config.content_bottom() + EPSILON
    }

    /// Page break resuming in `resume` when `height` does not fit below
    /// the cursor
    fn break_before(&self, height: f64, resume: LayoutState) -> Option<LayoutState> {
        if self.fits(height) || self.at_page_top() {
            return None;
        }
        Some(LayoutState::NeedsPageBreak {
            resume: Box::new(resume),
        })
    }

    fn push_item(&mut self, item: RenderItem) {
        if let Some(page) = self.output.pages.last_mut() {
            page.push(item);
        }
    }

    /// Text whose line box starts at `top`
    fn push_text(&mut self, text: &str, x: f64, top: f64, size: f64, bold: bool, color: Color) {
        if text.is_empty() {
            return;
        }
        self.push_item(RenderItem::Text(TextRun {
            text: text.to_string(),
            font_family: self.font.family().to_string(),
            font_size: size,
            bold,
            color,
            x,
            y: top + size * BASELINE_RATIO,
        }));
    }

    fn content_width(&self) -> f64 {
        self.config.content_width()
    }

    fn wrap(&self, text: &str, size: f64, bold: bool) -> Vec<String> {
        wrap_text(text, self.content_width(), size, bold, self.font)
    }

    // --- blocks ---

    fn emit_header(&mut self) {
        let (config, style, labels, draft) = (self.config, self.style, self.labels, self.draft);
        self.new_page();

        self.push_item(RenderItem::Rectangle {
            bounds: Rect::new(0.0, 0.0, config.page_width, style.header_height),
            fill: Some(style.header_fill),
            stroke: None,
            stroke_width: 0.0,
        });

        let mut title_x = config.margin_left;
        if let Some(logo) = self.logo {
            match self.sink.register_image(LOGO_NAME, logo) {
                Ok(image) if image.pixel_width > 0 && image.pixel_height > 0 => {
                    let aspect = image.aspect_ratio();
                    let mut height = style.logo_height.min(style.header_height);
                    let mut width = height / aspect;
                    if width > style.logo_max_width {
                        width = style.logo_max_width;
                        height = width * aspect;
                    }
                    let bounds = Rect::new(
                        config.margin_left,
                        (style.header_height - height) / 2.0,
                        width,
                        height,
                    );
                    self.push_item(RenderItem::Image(ImagePlacement {
                        resource_id: image.resource_id,
                        bounds,
                    }));
                    title_x += width + style.block_gap;
                    self.output.logo_placed = true;
                }
                Ok(_) => tracing::warn!("Logo has no pixels, continuing without it"),
                Err(e) => tracing::warn!("Logo could not be embedded, continuing without it: {}", e),
            }
        }

        let title_top = (style.header_height - style.title_size) / 2.0;
        self.push_text(
            &labels.report_title,
            title_x,
            title_top,
            style.title_size,
            true,
            style.header_text,
        );
        self.cursor = style.header_height + style.block_gap;

        let visit_date = draft.visit_date.format("%Y-%m-%d").to_string();
        let fields = [
            (&labels.client, draft.client_name.as_str()),
            (&labels.site, draft.site_address.as_str()),
            (&labels.technician, draft.technician.as_str()),
            (&labels.visit_date, visit_date.as_str()),
        ];
        for (label, value) in fields {
            self.emit_field(label, value);
        }
        self.cursor += style.block_gap;
    }

    /// "Label: value", the value wrapped beside the label
    fn emit_field(&mut self, label: &str, value: &str) {
        let style = self.style;
        let size = style.body_size;
        let line_height = style.line_height(size);
        let label = format!("{}:", label);
        let indent = self.font.text_width(&label, size, true) + self.font.text_width(" ", size, false);
        let value_width = (self.content_width() - indent).max(self.content_width() / 4.0);
        let lines = wrap_text(value, value_width, size, false, self.font);

        for (i, line) in lines.iter().enumerate() {
            // Header fields are short; break inline rather than through a state
            if !self.fits(line_height) && !self.at_page_top() {
                self.new_page();
            }
            let x = self.config.margin_left;
            if i == 0 {
                self.push_text(&label, x, self.cursor, size, true, style.body_color);
            }
            self.push_text(line, x + indent, self.cursor, size, false, style.body_color);
            self.cursor += line_height;
        }
    }

    /// Colored title with a rule under it
    fn emit_heading(&mut self, lines: &[String]) {
        let style = self.style;
        let line_height = style.line_height(style.heading_size);
        for line in lines {
            self.push_text(
                line,
                self.config.margin_left,
                self.cursor,
                style.heading_size,
                true,
                style.heading_color,
            );
            self.cursor += line_height;
        }
        let y = self.cursor + RULE_OFFSET;
        self.push_item(RenderItem::Line {
            x1: self.config.margin_left,
            y1: y,
            x2: self.config.margin_left + self.content_width(),
            y2: y,
            color: style.rule_color,
            width: style.rule_width,
        });
        self.cursor = y + style.rule_width + RULE_GAP;
    }

    fn heading_height(&self, line_count: usize) -> f64 {
        line_count as f64 * self.style.line_height(self.style.heading_size)
            + RULE_OFFSET
            + self.style.rule_width
            + RULE_GAP
    }

    fn emit_participants(&mut self, next: usize) -> LayoutState {
        let (style, labels, draft) = (self.style, self.labels, self.draft);
        let blocks: Vec<Vec<String>> = draft
            .participants()
            .iter()
            .filter(|p| !p.is_blank())
            .map(|p| {
                let text = format!("- {}", p.contact_parts().collect::<Vec<_>>().join(" | "));
                self.wrap(&text, style.body_size, false)
            })
            .collect();
        if blocks.is_empty() {
            return self.section_start(0);
        }

        let line_height = style.line_height(style.body_size);
        let block_height = |lines: &Vec<String>| lines.len() as f64 * line_height;
        let mut checked = false;

        if next == 0 {
            let heading = self.wrap(&labels.participants, style.heading_size, true);
            // Keep the heading with the first participant
            let needed = self.heading_height(heading.len()) + block_height(&blocks[0]);
            if let Some(page_break) = self.break_before(needed, LayoutState::InParticipants { next: 0 }) {
                return page_break;
            }
            self.emit_heading(&heading);
            checked = true;
        }

        for (i, lines) in blocks.iter().enumerate().skip(next) {
            if !(checked && i == next) {
                if let Some(page_break) =
                    self.break_before(block_height(lines), LayoutState::InParticipants { next: i })
                {
                    return page_break;
                }
            }
            for line in lines {
                self.push_text(
                    line,
                    self.config.margin_left,
                    self.cursor,
                    style.body_size,
                    false,
                    style.body_color,
                );
                self.cursor += line_height;
            }
        }

        self.cursor += style.block_gap;
        self.section_start(0)
    }

    fn emit_section_title(&mut self, index: usize) -> LayoutState {
        let (style, labels, draft) = (self.style, self.labels, self.draft);
        let Some(section) = draft.sections().get(index) else {
            return LayoutState::Finished;
        };

        let title = self.wrap(labels.section_title(&section.title), style.heading_size, true);
        self.body_lines = if section.description.trim().is_empty() {
            Vec::new()
        } else {
            self.wrap(&section.description, style.body_size, false)
        };

        // Keep the title with the first line of its description
        let first_line = if self.body_lines.is_empty() {
            0.0
        } else {
            style.line_height(style.body_size)
        };
        let needed = self.heading_height(title.len()) + first_line;
        if let Some(page_break) = self.break_before(needed, LayoutState::InSectionTitle { section: index }) {
            return page_break;
        }

        self.emit_heading(&title);
        LayoutState::InSectionBody {
            section: index,
            line: 0,
        }
    }

    fn emit_section_body(&mut self, section: usize, start: usize) -> LayoutState {
        let style = self.style;
        let line_height = style.line_height(style.body_size);

        for i in start..self.body_lines.len() {
            if let Some(page_break) =
                self.break_before(line_height, LayoutState::InSectionBody { section, line: i })
            {
                return page_break;
            }
            let line = self.body_lines[i].clone();
            self.push_text(
                &line,
                self.config.margin_left,
                self.cursor,
                style.body_size,
                false,
                style.body_color,
            );
            self.cursor += line_height;
        }

        if !self.body_lines.is_empty() {
            self.cursor += style.photo_gap;
        }
        LayoutState::PlacingPhoto { section, photo: 0 }
    }

    fn place_photo(&mut self, section: usize, index: usize) -> LayoutState {
        let (style, draft) = (self.style, self.draft);
        let Some(photos) = draft.sections().get(section).map(|s| &s.photos) else {
            return LayoutState::Finished;
        };
        let Some(photo) = photos.get(index) else {
            self.cursor += style.block_gap;
            return self.section_start(section + 1);
        };

        let image = match self.pending.take() {
            Some(pending) if pending.section == section && pending.photo == index => pending.image,
            _ => match self.register(photo) {
                Ok(image) => image,
                Err(reason) => {
                    tracing::warn!(
                        "Skipping photo {} in section {}: {}",
                        photo.name,
                        section + 1,
                        reason
                    );
                    self.output.skipped_photos.push(SkippedPhoto {
                        section,
                        photo: index,
                        name: photo.name.clone(),
                        reason,
                    });
                    return LayoutState::PlacingPhoto {
                        section,
                        photo: index + 1,
                    };
                }
            },
        };

        let caption_height = style.line_height(style.caption_size);
        let (width, height) = self.photo_size(&image, caption_height);
        let room = self.config.content_bottom() - self.cursor;
        let too_low = room < style.photo_bottom_threshold || !self.fits(height + caption_height);
        if too_low && !self.at_page_top() {
            tracing::debug!(
                "Page break before photo {} of section {} ({:.1}pt left)",
                index + 1,
                section + 1,
                room
            );
            self.pending = Some(PendingPhoto {
                section,
                photo: index,
                image,
            });
            return LayoutState::NeedsPageBreak {
                resume: Box::new(LayoutState::PlacingPhoto { section, photo: index }),
            };
        }

        let x = self.config.margin_left + (self.content_width() - width) / 2.0;
        self.push_item(RenderItem::Image(ImagePlacement {
            resource_id: image.resource_id,
            bounds: Rect::new(x, self.cursor, width, height),
        }));
        self.cursor += height;

        let caption_x = if self.font.text_width(&photo.name, style.caption_size, false) > width {
            self.config.margin_left
        } else {
            x
        };
        self.push_text(
            &photo.name,
            caption_x,
            self.cursor,
            style.caption_size,
            false,
            style.caption_color,
        );
        self.cursor += caption_height + style.photo_gap;
        self.output.placed_photos += 1;

        LayoutState::PlacingPhoto {
            section,
            photo: index + 1,
        }
    }

    fn register(&mut self, photo: &Photo) -> std::result::Result<RegisteredImage, String> {
        let bytes = photo.read_bytes().map_err(|e| e.to_string())?;
        let image = self
            .sink
            .register_image(&photo.name, &bytes)
            .map_err(|e| e.to_string())?;
        if image.pixel_width == 0 || image.pixel_height == 0 {
            return Err(ImageError::EmptyImage.to_string());
        }
        Ok(image)
    }

    /// Target width scaled by the pixel aspect ratio, shrunk so photo and
    /// caption fit on one page
    fn photo_size(&self, image: &RegisteredImage, caption_height: f64) -> (f64, f64) {
        let max_height = self.config.content_height() - caption_height;
        let mut width = self.style.photo_width.min(self.content_width());
        let mut height = width * image.aspect_ratio();
        if height > max_height {
            width *= max_height / height;
            height = max_height;
        }
        (width, height)
    }

    /// Stamp "Page n / N" footers
    fn finish(mut self) -> LayoutOutput {
        let total = self.output.pages.len();
        let size = self.style.footer_size;
        let top = self.config.page_height - (self.config.margin_bottom + size) / 2.0;
        for page in &mut self.output.pages {
            let text = format!("{} {} / {}", self.labels.page, page.page_index + 1, total);
            let width = self.font.text_width(&text, size, false);
            page.push(RenderItem::Text(TextRun {
                text,
                font_family: self.font.family().to_string(),
                font_size: size,
                bold: false,
                color: self.style.caption_color,
                x: (page.width - width) / 2.0,
                y: top + size * BASELINE_RATIO,
            }));
        }
        tracing::debug!(
            "Laid out {} page(s), {} photo(s) placed, {} skipped",
            total,
            self.output.placed_photos,
            self.output.skipped_photos.len()
        );
        self.output
    }
}
