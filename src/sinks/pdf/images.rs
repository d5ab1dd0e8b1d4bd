use super::Refs;
use crate::raster::{PixelFormat, RasterImage};
use pdf_writer::{Filter, Pdf, Ref};
use std::collections::HashMap;
use std::sync::Arc;

/// Image XObjects written so far, keyed by the shared raster they came from.
///
/// A raster drawn on many pages (a logo in every header, say) is only written
/// to the file once.
#[derive(Default)]
pub struct ImageCache {
    written: HashMap<usize, (String, Ref)>,
}

impl ImageCache {
    /// The resource name of `image`, writing it to `pdf` on first use.
    pub fn name_for(&mut self, image: &Arc<RasterImage>, pdf: &mut Pdf, refs: &mut Refs) -> (String, Ref) {
        let key = Arc::as_ptr(image) as usize;
        if let Some(existing) = self.written.get(&key) {
            return existing.clone();
        }

        let id = refs.next();
        let name = format!("Im{}", self.written.len() + 1);
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(image.pixels(), 6);

        let mut xobject = pdf.image_xobject(id, &compressed);
        xobject.filter(Filter::FlateDecode);
        xobject.width(image.width() as i32);
        xobject.height(image.height() as i32);
        match image.format() {
            PixelFormat::Grey8 => xobject.color_space().device_gray(),
            PixelFormat::Rgb8 => xobject.color_space().device_rgb(),
        };
        xobject.bits_per_component(8);
        drop(xobject);

        log::debug!(
            "embedded {}x{} image as {name}",
            image.width(),
            image.height()
        );
        self.written.insert(key, (name.clone(), id));
        (name, id)
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }
}
