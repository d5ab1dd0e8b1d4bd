use super::Refs;
use crate::error::{Error, Result};
use crate::fonts::{FontId, FontMetrics, TrueTypeFace};
use pdf_writer::types::FontFlags;
use pdf_writer::{Filter, Name, Pdf, Rect, Ref};

/// The fonts referenced by every page.
///
/// Base-14 faces are not embedded: viewers supply them, so only a font
/// dictionary naming the face and its encoding is written. TrueType faces are
/// embedded whole as simple WinAnsi fonts.
pub struct FontRefs {
    refs: Vec<(FontId, Ref)>,
}

impl FontRefs {
    pub fn write(pdf: &mut Pdf, refs: &mut Refs, fonts: &dyn FontMetrics) -> FontRefs {
        let refs = FontId::all()
            .iter()
            .map(|font| {
                let id = refs.next();
                match fonts.embedded(*font) {
                    Some(face) => write_truetype(pdf, refs, id, face),
                    None => {
                        pdf.type1_font(id)
                            .base_font(Name(font.base_name().as_bytes()))
                            .encoding_predefined(Name(b"WinAnsiEncoding"));
                    }
                }
                (*font, id)
            })
            .collect();
        FontRefs { refs }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontId, Ref)> + '_ {
        self.refs.iter().copied()
    }
}

fn write_truetype(pdf: &mut Pdf, refs: &mut Refs, id: Ref, face: &TrueTypeFace) {
    let descriptor_id = refs.next();
    let file_id = refs.next();
    let name = Name(face.name().as_bytes());

    // pdf-writer 0.12 has no typed TrueType font writer; write the dictionary by hand.
    {
        let mut font = pdf.indirect(id).dict();
        font.pair(Name(b"Type"), Name(b"Font"));
        font.pair(Name(b"Subtype"), Name(b"TrueType"));
        font.pair(Name(b"BaseFont"), name);
        font.pair(Name(b"FirstChar"), 32);
        font.pair(Name(b"LastChar"), 255);
        font.insert(Name(b"Widths"))
            .array()
            .items((32..=255u8).map(|code| face.width_of_code(code)));
        font.pair(Name(b"FontDescriptor"), descriptor_id);
        font.pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
    }

    let mut flags = FontFlags::NON_SYMBOLIC;
    if face.is_monospaced() {
        flags |= FontFlags::FIXED_PITCH;
    }
    let [x_min, y_min, x_max, y_max] = face.bbox();
    pdf.font_descriptor(descriptor_id)
        .name(name)
        .flags(flags)
        .bbox(Rect::new(x_min, y_min, x_max, y_max))
        .italic_angle(0.0)
        .ascent(face.ascent())
        .descent(-face.descent())
        .cap_height(face.cap_height())
        .stem_v(80.0)
        .font_file2(file_id);

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(face.data(), 6);
    pdf.stream(file_id, &compressed)
        .filter(Filter::FlateDecode)
        .pair(Name(b"Length1"), face.data().len() as i32);
    log::debug!("embedded font {} ({} bytes)", face.name(), face.data().len());
}

/// Encode `text` for a simple font using WinAnsi.
///
/// Printable ASCII and the Latin-1 supplement map to themselves; anything else
/// has no code in the encoding.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (32..=126 | 160..=255) => Ok(code as u8),
            _ => Err(Error::Serialization(format!(
                "{c:?} in `{text}` cannot be encoded as WinAnsi"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_text_maps_to_single_bytes() {
        assert_eq!(encode_win_ansi("Ab 1").unwrap(), b"Ab 1".to_vec());
        assert_eq!(encode_win_ansi("café").unwrap(), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn characters_outside_the_encoding_are_rejected() {
        let err = encode_win_ansi("π").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(encode_win_ansi("tab\there").is_err());
    }
}
