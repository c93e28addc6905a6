//! Page layout for PDF export.
//!
//! Text is measured with a static Helvetica width table (em units, ASCII
//! 0x20..=0x7E, index = char - 32) and word-wrapped greedily. The planner is
//! pure: it turns a [`PreviewDocument`] into positioned text runs and rules per
//! page, which the writer then draws. All coordinates are PDF points with the
//! origin at the bottom-left corner of the page.

use serde::{Deserialize, Serialize};

use crate::preview::{PreviewDocument, PreviewSection};

pub const POINTS_PER_INCH: f32 = 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Fixed export geometry and type scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Sheet size in portrait terms; `orientation` decides which side is wide.
    pub sheet_width_in: f32,
    pub sheet_height_in: f32,
    pub orientation: Orientation,
    pub margin_in: f32,
    pub name_size_pt: f32,
    pub title_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub line_height: f32,
}

/// US letter, portrait, half-inch margins.
pub fn letter_portrait() -> PageConfig {
    PageConfig {
        sheet_width_in: 8.5,
        sheet_height_in: 11.0,
        orientation: Orientation::Portrait,
        margin_in: 0.5,
        name_size_pt: 20.0,
        title_size_pt: 12.0,
        heading_size_pt: 11.0,
        body_size_pt: 10.0,
        line_height: 1.35,
    }
}

impl PageConfig {
    pub fn page_width_pt(&self) -> f32 {
        let w = match self.orientation {
            Orientation::Portrait => self.sheet_width_in,
            Orientation::Landscape => self.sheet_height_in,
        };
        w * POINTS_PER_INCH
    }

    pub fn page_height_pt(&self) -> f32 {
        let h = match self.orientation {
            Orientation::Portrait => self.sheet_height_in,
            Orientation::Landscape => self.sheet_width_in,
        };
        h * POINTS_PER_INCH
    }

    pub fn margin_pt(&self) -> f32 {
        self.margin_in * POINTS_PER_INCH
    }

    pub fn text_width_pt(&self) -> f32 {
        self.page_width_pt() - 2.0 * self.margin_pt()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metrics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside printable ASCII.
    pub average_char_width: f32,
    /// Bold glyphs run slightly wider than the regular table.
    pub bold_factor: f32,
}

impl FontMetricTable {
    /// Width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    pub fn width_pt(&self, s: &str, style: FontStyle, size_pt: f32) -> f32 {
        let factor = match style {
            FontStyle::Bold => self.bold_factor,
            FontStyle::Regular | FontStyle::Oblique => 1.0,
        };
        self.measure_str(s) * size_pt * factor
    }

    /// Greedy word wrap. Explicit newlines start a new paragraph; a single word
    /// wider than the line is split at character boundaries.
    pub fn wrap(&self, text: &str, style: FontStyle, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                for piece in self.split_long_word(word, style, size_pt, max_width_pt) {
                    let candidate = if current.is_empty() {
                        piece.clone()
                    } else {
                        format!("{current} {piece}")
                    };
                    if current.is_empty() || self.width_pt(&candidate, style, size_pt) <= max_width_pt {
                        current = candidate;
                    } else {
                        lines.push(std::mem::take(&mut current));
                        current = piece;
                    }
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }

    fn split_long_word(&self, word: &str, style: FontStyle, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        if self.width_pt(word, style, size_pt) <= max_width_pt {
            return vec![word.to_string()];
        }
        let mut pieces = Vec::new();
        let mut current = String::new();
        for c in word.chars() {
            current.push(c);
            if self.width_pt(&current, style, size_pt) > max_width_pt && current.chars().count() > 1 {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }
}

/// Helvetica advance widths (AFM units / 1000).
pub static HELVETICA: FontMetricTable = FontMetricTable {
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    bold_factor: 1.06,
};

// ────────────────────────────────────────────────────────────────────────────
// Planned output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub style: FontStyle,
    pub size_pt: f32,
    pub x_pt: f32,
    pub y_pt: f32,
}

/// Horizontal rule under a section heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub x1_pt: f32,
    pub x2_pt: f32,
    pub y_pt: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlannedPage {
    pub runs: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

const BULLET: &str = "-";
const BULLET_INDENT_PT: f32 = 12.0;
const SECTION_GAP_PT: f32 = 10.0;
const ENTRY_GAP_PT: f32 = 5.0;

struct Planner<'a> {
    config: &'a PageConfig,
    metrics: &'a FontMetricTable,
    pages: Vec<PlannedPage>,
    /// Baseline of the next line on the current page.
    cursor_y: f32,
}

impl<'a> Planner<'a> {
    fn new(config: &'a PageConfig, metrics: &'a FontMetricTable) -> Self {
        Self {
            config,
            metrics,
            pages: vec![PlannedPage::default()],
            cursor_y: config.page_height_pt() - config.margin_pt(),
        }
    }

    fn left(&self) -> f32 {
        self.config.margin_pt()
    }

    fn right(&self) -> f32 {
        self.config.page_width_pt() - self.config.margin_pt()
    }

    fn current_page(&mut self) -> &mut PlannedPage {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Moves the cursor down one line of `size_pt`, starting a new page when
    /// the line would cross the bottom margin. Returns the baseline to use.
    fn advance(&mut self, size_pt: f32) -> f32 {
        let step = size_pt * self.config.line_height;
        let top = self.config.page_height_pt() - self.config.margin_pt();
        let at_top = (self.cursor_y - top).abs() < f32::EPSILON;
        if !at_top && self.cursor_y - step < self.config.margin_pt() {
            self.pages.push(PlannedPage::default());
            self.cursor_y = top;
        }
        self.cursor_y -= step;
        self.cursor_y
    }

    fn gap(&mut self, pt: f32) {
        self.cursor_y -= pt;
    }

    fn push_run(&mut self, text: String, style: FontStyle, size_pt: f32, x_pt: f32, y_pt: f32) {
        self.current_page().runs.push(TextRun {
            text,
            style,
            size_pt,
            x_pt,
            y_pt,
        });
    }

    fn paragraph(&mut self, text: &str, style: FontStyle, size_pt: f32, indent_pt: f32) {
        let x = self.left() + indent_pt;
        let width = self.config.text_width_pt() - indent_pt;
        for line in self.metrics.wrap(text, style, size_pt, width) {
            let y = self.advance(size_pt);
            self.push_run(line, style, size_pt, x, y);
        }
    }

    fn bullets(&mut self, items: &[String]) {
        let size = self.config.body_size_pt;
        let x = self.left();
        let width = self.config.text_width_pt() - BULLET_INDENT_PT;
        for item in items {
            for (i, line) in self
                .metrics
                .wrap(item, FontStyle::Regular, size, width)
                .into_iter()
                .enumerate()
            {
                let y = self.advance(size);
                if i == 0 {
                    self.push_run(BULLET.to_string(), FontStyle::Regular, size, x + 2.0, y);
                }
                self.push_run(line, FontStyle::Regular, size, x + BULLET_INDENT_PT, y);
            }
        }
    }

    fn heading(&mut self, text: &str) {
        self.gap(SECTION_GAP_PT);
        let size = self.config.heading_size_pt;
        let y = self.advance(size);
        let (left, right) = (self.left(), self.right());
        self.push_run(text.to_uppercase(), FontStyle::Bold, size, left, y);
        self.current_page().rules.push(Rule {
            x1_pt: left,
            x2_pt: right,
            y_pt: y - 3.0,
        });
        self.gap(2.0);
    }

    /// Bold title, then " - company" on the same line when it fits, and the
    /// duration right-aligned on the first line when it fits.
    fn entry_heading(&mut self, title: &str, company: Option<&str>, duration: Option<&str>) {
        let size = self.config.body_size_pt;
        let metrics = self.metrics;
        let left = self.left();
        let right = self.right();
        let duration_w = duration
            .map(|d| metrics.width_pt(d, FontStyle::Oblique, size) + 8.0)
            .unwrap_or(0.0);

        let title_lines = metrics.wrap(title, FontStyle::Bold, size, self.config.text_width_pt());
        let mut first_y = None;
        let mut last_end = left;
        for line in &title_lines {
            let y = self.advance(size);
            first_y.get_or_insert(y);
            last_end = left + metrics.width_pt(line, FontStyle::Bold, size);
            self.push_run(line.clone(), FontStyle::Bold, size, left, y);
        }

        if let Some(company) = company {
            let tail = format!(" - {company}");
            let tail_w = metrics.width_pt(&tail, FontStyle::Regular, size);
            let reserved = if title_lines.len() == 1 { duration_w } else { 0.0 };
            if last_end + tail_w <= right - reserved {
                let y = self.cursor_y;
                self.push_run(tail, FontStyle::Regular, size, last_end, y);
                last_end += tail_w;
            } else {
                self.paragraph(company, FontStyle::Regular, size, 0.0);
            }
        }

        if let Some(duration) = duration {
            let fits_first_line = title_lines.len() == 1 && last_end + duration_w <= right;
            match first_y {
                Some(y) if fits_first_line && self.cursor_y == y => {
                    let x = right - (duration_w - 8.0);
                    self.push_run(duration.to_string(), FontStyle::Oblique, size, x, y);
                }
                _ => self.paragraph(duration, FontStyle::Oblique, size, 0.0),
            }
        }
    }

    fn section(&mut self, section: &PreviewSection) {
        self.heading(section.kind().heading());
        let body = self.config.body_size_pt;
        match section {
            PreviewSection::ProfileOverview(text) => {
                self.paragraph(text, FontStyle::Regular, body, 0.0);
            }
            PreviewSection::KeyHighlights(items) => self.bullets(items),
            PreviewSection::ProfessionalExperience(entries) => {
                for (i, exp) in entries.iter().enumerate() {
                    if i > 0 {
                        self.gap(ENTRY_GAP_PT);
                    }
                    self.entry_heading(&exp.job_title, exp.company.as_deref(), exp.duration.as_deref());
                    self.bullets(&exp.responsibilities);
                }
            }
            PreviewSection::TechnicalSkills(groups) => {
                for group in groups {
                    let label = format!("{}:", group.category);
                    let line = format!("{label} {}", group.skills);
                    // Wrap the whole line, then re-run the label in bold over its
                    // regular rendering on the first line.
                    let x = self.left();
                    let lines =
                        self.metrics
                            .wrap(&line, FontStyle::Regular, body, self.config.text_width_pt());
                    for (j, text) in lines.into_iter().enumerate() {
                        let y = self.advance(body);
                        if j == 0 && text.starts_with(&label) {
                            let rest = text[label.len()..].to_string();
                            let label_w = self.metrics.width_pt(&label, FontStyle::Bold, body);
                            self.push_run(label.clone(), FontStyle::Bold, body, x, y);
                            self.push_run(rest, FontStyle::Regular, body, x + label_w, y);
                        } else {
                            self.push_run(text, FontStyle::Regular, body, x, y);
                        }
                    }
                }
            }
            PreviewSection::ProjectExperience(projects) => {
                for (i, proj) in projects.iter().enumerate() {
                    if i > 0 {
                        self.gap(ENTRY_GAP_PT);
                    }
                    self.paragraph(&proj.title, FontStyle::Bold, body, 0.0);
                    if let Some(description) = &proj.description {
                        self.paragraph(description, FontStyle::Regular, body, 0.0);
                    }
                }
            }
        }
    }
}

/// Lays out the whole document. Always returns at least one page.
pub fn plan_document(doc: &PreviewDocument, config: &PageConfig, metrics: &FontMetricTable) -> Vec<PlannedPage> {
    let mut planner = Planner::new(config, metrics);

    planner.paragraph(&doc.header.name, FontStyle::Bold, config.name_size_pt, 0.0);
    if let Some(title) = &doc.header.title {
        planner.paragraph(title, FontStyle::Regular, config.title_size_pt, 0.0);
    }
    if let Some(email) = &doc.header.email {
        planner.paragraph(email, FontStyle::Regular, config.body_size_pt, 0.0);
    }

    for section in &doc.sections {
        planner.section(section);
    }

    planner.pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeData;
    use crate::preview::project_preview;

    #[test]
    fn test_letter_portrait_geometry() {
        let config = letter_portrait();
        assert_eq!(config.page_width_pt(), 612.0);
        assert_eq!(config.page_height_pt(), 792.0);
        assert_eq!(config.margin_pt(), 36.0);
        assert_eq!(config.text_width_pt(), 540.0);
    }

    #[test]
    fn test_landscape_swaps_sides() {
        let mut config = letter_portrait();
        config.orientation = Orientation::Landscape;
        assert_eq!(config.page_width_pt(), 792.0);
        assert_eq!(config.page_height_pt(), 612.0);
    }

    #[test]
    fn test_measure_uses_fallback_for_non_ascii() {
        assert!((HELVETICA.measure_str("é") - HELVETICA.average_char_width).abs() < 1e-6);
        assert!((HELVETICA.measure_str("ii") - 0.444).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "Designed and shipped a distributed build cache that cut CI time in half across forty services";
        let lines = HELVETICA.wrap(text, FontStyle::Regular, 10.0, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(HELVETICA.width_pt(line, FontStyle::Regular, 10.0) <= 150.0, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_overlong_word_and_keeps_paragraphs() {
        let word = "x".repeat(200);
        let lines = HELVETICA.wrap(&word, FontStyle::Regular, 10.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);

        let lines = HELVETICA.wrap("first\nsecond", FontStyle::Regular, 10.0, 500.0);
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_empty_document_has_only_name() {
        let config = letter_portrait();
        let pages = plan_document(&project_preview(&ResumeData::empty()), &config, &HELVETICA);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].runs.len(), 1);
        assert_eq!(pages[0].runs[0].text, "Your Name");
        assert_eq!(pages[0].runs[0].style, FontStyle::Bold);
        assert!(pages[0].rules.is_empty());
    }

    #[test]
    fn test_runs_stay_inside_margins() {
        let mut data = ResumeData::empty();
        data.header.name = "Ada Lovelace".into();
        data.profile_overview = "Mathematician and writer. ".repeat(20);
        data.professional_experience[0].job_title = "Engineer".into();
        data.professional_experience[0].company = "Analytical Engines".into();
        data.professional_experience[0].duration = "1842 - 1843".into();
        data.professional_experience[0].responsibilities = vec!["Led team".into()];

        let config = letter_portrait();
        let pages = plan_document(&project_preview(&data), &config, &HELVETICA);
        for run in pages.iter().flat_map(|p| &p.runs) {
            assert!(run.x_pt >= config.margin_pt());
            assert!(run.y_pt >= config.margin_pt(), "{run:?} below bottom margin");
            let end = run.x_pt + HELVETICA.width_pt(&run.text, run.style, run.size_pt);
            assert!(end <= config.page_width_pt() - config.margin_pt() + 0.5, "{run:?} past right margin");
        }
        let texts: Vec<_> = pages[0].runs.iter().map(|r| r.text.as_str()).collect();
        assert!(texts.contains(&"Engineer"));
        assert!(texts.contains(&" - Analytical Engines"));
        assert!(texts.contains(&"1842 - 1843"));
        assert!(texts.contains(&"Led team"));
    }

    #[test]
    fn test_long_content_paginates() {
        let mut data = ResumeData::empty();
        data.key_highlights = (0..120).map(|i| format!("Highlight number {i}")).collect();

        let config = letter_portrait();
        let pages = plan_document(&project_preview(&data), &config, &HELVETICA);
        assert!(pages.len() >= 2);
        let bullets: usize = pages
            .iter()
            .flat_map(|p| &p.runs)
            .filter(|r| r.text == BULLET)
            .count();
        assert_eq!(bullets, 120);
    }

    #[test]
    fn test_skill_label_is_bold() {
        let mut data = ResumeData::empty();
        data.technical_skills[0].category = "Languages".into();
        data.technical_skills[0].skills = "Rust, Go".into();
        let pages = plan_document(&project_preview(&data), &letter_portrait(), &HELVETICA);
        let label = pages[0].runs.iter().find(|r| r.text == "Languages:").unwrap();
        assert_eq!(label.style, FontStyle::Bold);
        assert!(pages[0].runs.iter().any(|r| r.text == " Rust, Go"));
    }
}
