//! Report look and wording

use render_model::Color;

/// Visual parameters of the fixed-page report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStyle {
    /// Height of the colored band at the top of the first page
    pub header_height: f64,
    pub header_fill: Color,
    /// Text color inside the header band
    pub header_text: Color,
    pub title_size: f64,
    pub logo_height: f64,
    pub logo_max_width: f64,

    pub heading_color: Color,
    pub heading_size: f64,
    pub rule_color: Color,
    pub rule_width: f64,

    pub body_color: Color,
    pub body_size: f64,
    /// Line height as a multiple of the font size
    pub line_spacing: f64,
    /// Vertical space between blocks
    pub block_gap: f64,

    /// Width photos are drawn at, before fitting to the page
    pub photo_width: f64,
    /// A photo starts a new page when less than this much room remains
    /// below the cursor
    pub photo_bottom_threshold: f64,
    pub photo_gap: f64,
    pub caption_size: f64,
    pub caption_color: Color,

    pub footer_size: f64,
}

impl Default for ReportStyle {
    fn default() -> Self {
        let navy = Color::rgb(0, 51, 102);
        Self {
            header_height: 72.0,
            header_fill: navy,
            header_text: Color::WHITE,
            title_size: 20.0,
            logo_height: 48.0,
            logo_max_width: 140.0,
            heading_color: navy,
            heading_size: 14.0,
            rule_color: navy,
            rule_width: 0.8,
            body_color: Color::BLACK,
            body_size: 11.0,
            line_spacing: 1.35,
            block_gap: 12.0,
            photo_width: 300.0,
            photo_bottom_threshold: 60.0,
            photo_gap: 10.0,
            caption_size: 8.0,
            caption_color: Color::rgb(96, 96, 96),
            footer_size: 8.0,
        }
    }
}

impl ReportStyle {
    pub fn line_height(&self, font_size: f64) -> f64 {
        font_size * self.line_spacing
    }
}

/// Fixed strings printed in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub report_title: String,
    pub participants: String,
    pub client: String,
    pub site: String,
    pub technician: String,
    pub visit_date: String,
    /// Shown in place of an empty section title
    pub untitled_section: String,
    pub page: String,
}

impl ReportLabels {
    pub fn english() -> Self {
        Self {
            report_title: "Site Visit Report".to_string(),
            participants: "Participants".to_string(),
            client: "Client".to_string(),
            site: "Site address".to_string(),
            technician: "Technician".to_string(),
            visit_date: "Visit date".to_string(),
            untitled_section: "Untitled section".to_string(),
            page: "Page".to_string(),
        }
    }

    pub fn french() -> Self {
        Self {
            report_title: "Rapport d'intervention".to_string(),
            participants: "Participants".to_string(),
            client: "Client".to_string(),
            site: "Adresse du site".to_string(),
            technician: "Technicien".to_string(),
            visit_date: "Date de visite".to_string(),
            untitled_section: "Section sans titre".to_string(),
            page: "Page".to_string(),
        }
    }

    /// Labels for an ISO 639-1 language code; unknown codes get English
    pub fn for_language(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Self::french(),
            _ => Self::english(),
        }
    }

    /// Copy with `f` applied to every label
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> Self {
        Self {
            report_title: f(&self.report_title),
            participants: f(&self.participants),
            client: f(&self.client),
            site: f(&self.site),
            technician: f(&self.technician),
            visit_date: f(&self.visit_date),
            untitled_section: f(&self.untitled_section),
            page: f(&self.page),
        }
    }

    /// Label for a section, falling back to the placeholder when the
    /// title is blank
    pub fn section_title<'a>(&'a self, title: &'a str) -> &'a str {
        if title.trim().is_empty() {
            &self.untitled_section
        } else {
            title
        }
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lookup() {
        assert_eq!(ReportLabels::for_language("FR").client, "Client");
        assert_eq!(ReportLabels::for_language("fr").technician, "Technicien");
        assert_eq!(ReportLabels::for_language("de"), ReportLabels::english());
    }

    #[test]
    fn test_section_title_placeholder() {
        let labels = ReportLabels::english();
        assert_eq!(labels.section_title("  "), "Untitled section");
        assert_eq!(labels.section_title("Roof"), "Roof");
    }
}
