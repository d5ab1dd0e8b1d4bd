use super::{FontId, FontMetrics, StandardFonts};
use crate::error::{Error, Result};
use owned_ttf_parser::{name_id, AsFaceRef, OwnedFace};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A TrueType font read from disk, measured over the codes a WinAnsi simple
/// font can address.
///
/// Widths, ascent and descent are stored in thousandths of an em like the
/// base-14 tables, so the layout code cannot tell the two apart. The font
/// program is kept for embedding.
#[derive(Debug, Clone)]
pub struct TrueTypeFace {
    name: String,
    data: Arc<Vec<u8>>,
    widths: Vec<Option<f32>>,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    bbox: [f32; 4],
    monospaced: bool,
}

fn is_win_ansi(code: u32) -> bool {
    matches!(code, 32..=126 | 160..=255)
}

impl TrueTypeFace {
    /// Read and parse the font at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TrueTypeFace> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::resource(path.display(), e))?;
        let fallback_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "EmbeddedFont".to_string());
        TrueTypeFace::parse(data, &fallback_name).map_err(|reason| Error::resource(path.display(), reason))
    }

    fn parse(data: Vec<u8>, fallback_name: &str) -> std::result::Result<TrueTypeFace, String> {
        let owned = OwnedFace::from_vec(data.clone(), 0).map_err(|e| format!("not a usable font: {e}"))?;
        let face = owned.as_face_ref();

        let scale = 1000.0 / face.units_per_em().max(1) as f32;
        let widths: Vec<Option<f32>> = (0u32..=255)
            .map(|code| {
                if !is_win_ansi(code) {
                    return None;
                }
                let glyph = face.glyph_index(char::from_u32(code)?)?;
                face.glyph_hor_advance(glyph).map(|w| w as f32 * scale)
            })
            .collect();
        if widths[' ' as usize].is_none() || widths['a' as usize].is_none() {
            return Err("font has no glyphs for Latin text".to_string());
        }

        let name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == name_id::POST_SCRIPT_NAME)
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| fallback_name.to_string());
        let name: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();

        let bbox = face.global_bounding_box();
        let ascent = face.ascender() as f32 * scale;
        let loaded = TrueTypeFace {
            name: if name.is_empty() { "EmbeddedFont".to_string() } else { name },
            widths,
            ascent,
            descent: -(face.descender() as f32) * scale,
            cap_height: face.capital_height().map(|h| h as f32 * scale).unwrap_or(ascent),
            bbox: [
                bbox.x_min as f32 * scale,
                bbox.y_min as f32 * scale,
                bbox.x_max as f32 * scale,
                bbox.y_max as f32 * scale,
            ],
            monospaced: face.is_monospaced(),
            data: Arc::new(data),
        };
        log::debug!("loaded font {}", loaded.name);
        Ok(loaded)
    }

    /// PostScript name, restricted to characters valid in a PDF name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw font program.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn advance(&self, c: char) -> Option<f32> {
        self.widths.get(c as usize).copied().flatten()
    }

    /// Width of the glyph at WinAnsi `code`, zero if the font has none.
    pub fn width_of_code(&self, code: u8) -> f32 {
        self.widths[code as usize].unwrap_or(0.0)
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn cap_height(&self) -> f32 {
        self.cap_height
    }

    /// `[x_min, y_min, x_max, y_max]`
    pub fn bbox(&self) -> [f32; 4] {
        self.bbox
    }

    pub fn is_monospaced(&self) -> bool {
        self.monospaced
    }
}

/// The base-14 faces with some of them replaced by TrueType fonts.
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    faces: HashMap<FontId, TrueTypeFace>,
}

impl FontSet {
    pub fn new() -> FontSet {
        FontSet::default()
    }

    /// Load a TrueType file for each listed face. The first file that cannot
    /// be read or parsed aborts the load.
    pub fn load<'a, I>(files: I) -> Result<FontSet>
    where
        I: IntoIterator<Item = (FontId, &'a Path)>,
    {
        let mut set = FontSet::new();
        for (font, path) in files {
            let face = TrueTypeFace::load(path)?;
            log::info!("using {} for {}", path.display(), font.base_name());
            set.faces.insert(font, face);
        }
        Ok(set)
    }
}

impl FontMetrics for FontSet {
    fn advance(&self, font: FontId, c: char) -> Option<f32> {
        match self.faces.get(&font) {
            Some(face) => face.advance(c),
            None => StandardFonts.advance(font, c),
        }
    }

    fn ascent(&self, font: FontId) -> f32 {
        match self.faces.get(&font) {
            Some(face) => face.ascent(),
            None => StandardFonts.ascent(font),
        }
    }

    fn descent(&self, font: FontId) -> f32 {
        match self.faces.get(&font) {
            Some(face) => face.descent(),
            None => StandardFonts.descent(font),
        }
    }

    fn embedded(&self, font: FontId) -> Option<&TrueTypeFace> {
        self.faces.get(&font)
    }
}
