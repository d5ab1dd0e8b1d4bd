//! Font identities and the metrics capability used to measure text.
//!
//! Layout never touches font files directly: everything that needs a glyph
//! width asks a [`FontMetrics`] implementation. [`StandardFonts`] answers for
//! the PDF base-14 faces the sink knows how to reference, so a document can be
//! measured and serialized without embedding any font program. [`FontSet`]
//! swaps individual faces for TrueType fonts loaded from disk; those are
//! measured from the font file and embedded in the output.

mod truetype;

pub use truetype::{FontSet, TrueTypeFace};

use crate::error::{Error, Result};

/// The faces a document may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontId {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl FontId {
    pub fn all() -> &'static [FontId] {
        &[FontId::Helvetica, FontId::HelveticaBold, FontId::Courier]
    }

    /// The PostScript name of the base-14 font.
    pub fn base_name(&self) -> &'static str {
        match self {
            FontId::Helvetica => "Helvetica",
            FontId::HelveticaBold => "Helvetica-Bold",
            FontId::Courier => "Courier",
        }
    }

    /// Name of the font inside a page's resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontId::Helvetica => "F1",
            FontId::HelveticaBold => "F2",
            FontId::Courier => "F3",
        }
    }
}

/// Glyph metrics for a set of fonts, in thousandths of an em.
pub trait FontMetrics {
    /// Advance width of `c`, or `None` if the font cannot encode it.
    fn advance(&self, font: FontId, c: char) -> Option<f32>;
    /// Height above the baseline.
    fn ascent(&self, font: FontId) -> f32;
    /// Depth below the baseline, as a positive number.
    fn descent(&self, font: FontId) -> f32;
    /// The font program to embed for `font`, if it is not a base-14 face.
    fn embedded(&self, _font: FontId) -> Option<&TrueTypeFace> {
        None
    }
}

/// Width of `text` set in `font` at `size` points.
pub fn width_of_text(fonts: &dyn FontMetrics, text: &str, font: FontId, size: f32) -> Result<f32> {
    let mut units = 0.0;
    for c in text.chars() {
        units += fonts.advance(font, c).ok_or_else(|| {
            Error::measurement(
                format!("text `{text}`"),
                format!("{} has no glyph for {c:?}", font.base_name()),
            )
        })?;
    }
    Ok(units * size / 1000.0)
}

/// Distance from the top of a line box to its baseline.
pub fn ascent(fonts: &dyn FontMetrics, font: FontId, size: f32) -> f32 {
    fonts.ascent(font) * size / 1000.0
}

/// Distance from the baseline to the bottom of the glyphs.
pub fn descent(fonts: &dyn FontMetrics, font: FontId, size: f32) -> f32 {
    fonts.descent(font) * size / 1000.0
}

/// AFM metrics for the base-14 fonts.
///
/// Printable ASCII and the Latin-1 supplement use the published widths.
/// Anything else cannot be encoded with WinAnsi and is reported as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFonts;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Codes 160 to 255.
#[rustfmt::skip]
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

impl FontMetrics for StandardFonts {
    fn advance(&self, font: FontId, c: char) -> Option<f32> {
        let code = c as u32;
        let width = match (font, code) {
            (FontId::Courier, 32..=126 | 160..=255) => 600,
            (FontId::Helvetica, 32..=126) => HELVETICA_WIDTHS[(code - 32) as usize],
            (FontId::HelveticaBold, 32..=126) => HELVETICA_BOLD_WIDTHS[(code - 32) as usize],
            (FontId::Helvetica, 160..=255) => HELVETICA_LATIN1_WIDTHS[(code - 160) as usize],
            (FontId::HelveticaBold, 160..=255) => HELVETICA_BOLD_LATIN1_WIDTHS[(code - 160) as usize],
            _ => return None,
        };
        Some(width as f32)
    }

    fn ascent(&self, font: FontId) -> f32 {
        match font {
            FontId::Helvetica | FontId::HelveticaBold => 718.0,
            FontId::Courier => 629.0,
        }
    }

    fn descent(&self, font: FontId) -> f32 {
        match font {
            FontId::Helvetica | FontId::HelveticaBold => 207.0,
            FontId::Courier => 157.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_is_monospaced() {
        let width = width_of_text(&StandardFonts, "abc", FontId::Courier, 10.0).unwrap();
        assert!((width - 18.0).abs() < 1e-4);
    }

    #[test]
    fn helvetica_widths_follow_the_afm_tables() {
        let fonts = StandardFonts;
        assert_eq!(fonts.advance(FontId::Helvetica, ' '), Some(278.0));
        assert_eq!(fonts.advance(FontId::Helvetica, 'W'), Some(944.0));
        assert_eq!(fonts.advance(FontId::HelveticaBold, 'm'), Some(889.0));
        assert_eq!(fonts.advance(FontId::Helvetica, '~'), Some(584.0));
    }

    #[test]
    fn accented_letters_use_their_own_widths() {
        let fonts = StandardFonts;
        assert_eq!(fonts.advance(FontId::Helvetica, 'Ä'), Some(667.0));
        assert_eq!(fonts.advance(FontId::Helvetica, 'é'), Some(556.0));
        assert_eq!(fonts.advance(FontId::Helvetica, 'Æ'), Some(1000.0));
        assert_eq!(fonts.advance(FontId::Helvetica, 'ç'), Some(500.0));
        assert_eq!(fonts.advance(FontId::Helvetica, 'ÿ'), Some(500.0));
        assert_eq!(fonts.advance(FontId::HelveticaBold, 'Ö'), Some(778.0));
        assert_eq!(fonts.advance(FontId::HelveticaBold, 'ü'), Some(611.0));
        assert_eq!(fonts.advance(FontId::HelveticaBold, 'ÿ'), Some(556.0));

        let width = width_of_text(&fonts, "Ä", FontId::Helvetica, 1000.0).unwrap();
        assert!((width - 667.0).abs() < 1e-3);
    }

    #[test]
    fn unencodable_glyphs_are_measurement_errors() {
        let err = width_of_text(&StandardFonts, "日本", FontId::Helvetica, 10.0).unwrap_err();
        assert!(matches!(err, Error::Measurement { .. }));
    }
}
