use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Rgb,
};

use crate::export::layout::{plan_document, FontStyle, PageConfig, PlannedPage, HELVETICA};
use crate::export::ExportError;
use crate::preview::PreviewDocument;

const LAYER_NAME: &str = "Resume";

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, ExportError> {
        let load = |font| {
            doc.add_builtin_font(font)
                .map_err(|e| ExportError::Render(format!("font: {e}")))
        };
        Ok(Self {
            regular: load(BuiltinFont::Helvetica)?,
            bold: load(BuiltinFont::HelveticaBold)?,
            oblique: load(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Oblique => &self.oblique,
        }
    }
}

/// Characters WinAnsiEncoding places in 0x80..=0x9F, where Latin-1 has
/// control codes.
const WIN_ANSI_EXTRAS: &[char] = &[
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}', '\u{02C6}',
    '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}', '\u{2019}', '\u{201C}',
    '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
    '\u{0153}', '\u{017E}', '\u{0178}',
];

/// Builtin fonts are written with WinAnsiEncoding. Characters it cannot
/// represent become `?`; control characters become spaces.
fn to_builtin_charset(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_control() => ' ',
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c,
            c if WIN_ANSI_EXTRAS.contains(&c) => c,
            _ => '?',
        })
        .collect()
}

fn draw_page(layer: &PdfLayerReference, page: &PlannedPage, fonts: &Fonts) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
    for run in &page.runs {
        layer.use_text(
            to_builtin_charset(&run.text),
            run.size_pt,
            mm(run.x_pt),
            mm(run.y_pt),
            fonts.get(run.style),
        );
    }

    if page.rules.is_empty() {
        return;
    }
    layer.set_outline_color(Color::Rgb(Rgb::new(0.55, 0.55, 0.55, None)));
    layer.set_outline_thickness(0.6);
    for rule in &page.rules {
        layer.add_line(Line {
            points: vec![
                (Point::new(mm(rule.x1_pt), mm(rule.y_pt)), false),
                (Point::new(mm(rule.x2_pt), mm(rule.y_pt)), false),
            ],
            is_closed: false,
        });
    }
}

/// Writes `doc` as a PDF and returns the file bytes. CPU-bound.
pub fn render_pdf(doc: &PreviewDocument, config: &PageConfig, title: &str) -> Result<Vec<u8>, ExportError> {
    let pages = plan_document(doc, config, &HELVETICA);
    let width = mm(config.page_width_pt());
    let height = mm(config.page_height_pt());

    let (pdf, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let fonts = Fonts::load(&pdf)?;

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &fonts);
    }

    pdf.save_to_bytes()
        .map_err(|e| ExportError::Render(format!("serialize: {e}")))
}
