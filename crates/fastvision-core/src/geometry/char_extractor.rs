//! Char Extractor — per-page character primitives from a PDF.

use pdfium_render::prelude::*;

use crate::error::{FvError, Result};
use crate::types::Bbox;

/// Atomic glyph primitive. Pure whitespace other than `U+0020` is dropped at
/// extraction time; a lone space character is kept so word-gap inference
/// downstream still sees it.
#[derive(Debug, Clone)]
pub struct Char {
    pub text: String,
    pub bbox: Bbox,
    pub fontname: String,
    pub size: f64,
    pub color: String,
}

pub struct PageChars {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub chars: Vec<Char>,
}

/// Raw color as sampled from the content stream's non-stroking color space,
/// prior to RGB conversion. Kept as a distinct enum (rather than converting
/// inline) so the conversion formulas are independently testable.
#[derive(Debug, Clone, Copy)]
pub enum RawColor {
    Gray(f64),
    Rgb(f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
    Missing,
}

/// `grayscale → #gggggg; RGB → #rrggbb; CMYK → R=255(1-c)(1-k), ...; missing → #000000`.
pub fn color_to_hex(color: RawColor) -> String {
    let (r, g, b) = match color {
        RawColor::Missing => (0u8, 0u8, 0u8),
        RawColor::Gray(v) => {
            let g = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            (g, g, g)
        }
        RawColor::Rgb(r, g, b) => (
            (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ),
        RawColor::Cmyk(c, m, y, k) => {
            let (c, m, y, k) = (c.clamp(0.0, 1.0), m.clamp(0.0, 1.0), y.clamp(0.0, 1.0), k.clamp(0.0, 1.0));
            let r = 255.0 * (1.0 - c) * (1.0 - k);
            let g = 255.0 * (1.0 - m) * (1.0 - k);
            let b = 255.0 * (1.0 - y) * (1.0 - k);
            (r.round() as u8, g.round() as u8, b.round() as u8)
        }
    };
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Reads per-page glyphs via pdfium, deriving color from each char's fill color.
pub fn extract_chars_from_pdf(pdf_path: &std::path::Path) -> Result<Vec<PageChars>> {
    let pdfium = Pdfium::default();
    let document = pdfium.load_pdf_from_file(pdf_path, None).map_err(|e| FvError::IoFailure {
        path: pdf_path.to_path_buf(),
        source: std::io::Error::other(e.to_string()),
    })?;

    let mut pages = Vec::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let page_number = idx + 1;
        let width = page.width().value as f64;
        let height = page.height().value as f64;

        let chars = match extract_page_chars(&page, height) {
            Ok(chars) => chars,
            Err(reason) => {
                tracing::warn!(page = page_number, %reason, "page extraction failed, treating page as empty");
                Vec::new()
            }
        };

        pages.push(PageChars {
            page_number,
            width,
            height,
            chars,
        });
    }

    Ok(pages)
}

/// Converts pdfium's bottom-up PDF coordinates into the schema's top-down
/// `[x0, y0, x1, y1]` convention (y0 ≤ y1, origin at the page's top-left).
///
/// `pub(crate)` so the pipeline orchestrator can call it per-page, alongside
/// table extraction, without re-opening the document through
/// [`extract_chars_from_pdf`].
pub(crate) fn extract_page_chars(page: &PdfPage, page_height: f64) -> std::result::Result<Vec<Char>, String> {
    let text = page.text().map_err(|e| e.to_string())?;
    let chars = text.chars();

    let mut out = Vec::with_capacity(chars.len());
    for i in 0..chars.len() {
        let Ok(pdf_char) = chars.get(i) else { continue };
        let Some(unicode) = pdf_char.unicode_char() else { continue };

        if unicode.is_whitespace() && unicode != ' ' {
            continue;
        }

        let Ok(bounds) = pdf_char.loose_bounds() else { continue };
        let (fontname, _bold_flag, _italic_flag) = pdf_char.font_info();
        let size = pdf_char.unscaled_font_size().value as f64;

        let color = pdf_char
            .fill_color()
            .map(|c| color_to_hex(RawColor::Rgb(c.red() as f64 / 255.0, c.green() as f64 / 255.0, c.blue() as f64 / 255.0)))
            .unwrap_or_else(|_| color_to_hex(RawColor::Missing));

        let bottom = bounds.bottom().value as f64;
        let top = bounds.top().value as f64;
        out.push(Char {
            text: unicode.to_string(),
            bbox: [
                bounds.left().value as f64,
                page_height - top,
                bounds.right().value as f64,
                page_height - bottom,
            ],
            fontname,
            size: round2(size),
            color,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_converts_to_equal_channels() {
        assert_eq!(color_to_hex(RawColor::Gray(0.0)), "#000000");
        assert_eq!(color_to_hex(RawColor::Gray(1.0)), "#ffffff");
    }

    #[test]
    fn rgb_round_trips() {
        assert_eq!(color_to_hex(RawColor::Rgb(1.0, 0.0, 0.0)), "#ff0000");
    }

    #[test]
    fn cmyk_full_black_is_black() {
        assert_eq!(color_to_hex(RawColor::Cmyk(0.0, 0.0, 0.0, 1.0)), "#000000");
    }

    #[test]
    fn cmyk_pure_cyan_drops_red_channel() {
        let hex = color_to_hex(RawColor::Cmyk(1.0, 0.0, 0.0, 0.0));
        assert_eq!(hex, "#00ffff");
    }

    #[test]
    fn missing_color_is_black() {
        assert_eq!(color_to_hex(RawColor::Missing), "#000000");
    }

    #[test]
    fn round2_rounds_to_two_decimals() {
        assert_eq!(round2(12.345), 12.35);
        assert_eq!(round2(12.0), 12.0);
    }
}
