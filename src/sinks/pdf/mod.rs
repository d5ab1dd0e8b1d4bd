//! Serialize a laid-out document to PDF with `pdf-writer`.
//!
//! Every page is painted into a [`Canvas`] first; the display list is then
//! translated operator by operator into a content stream. Layout works
//! top-down, so every y coordinate is flipped against the page height here.

mod fonts;
mod images;
mod outline;

pub use fonts::encode_win_ansi;

use crate::canvas::{Canvas, DrawOp};
use crate::composer::FinalDocument;
use crate::error::Result;
use crate::fonts::FontMetrics;
use crate::style::{Colour, Rect};
use fonts::FontRefs;
use images::ImageCache;
use pdf_writer::{Content, Date, Filter, Name, Pdf, Ref, Str, TextStr};

/// Hands out object ids in order.
#[derive(Debug)]
pub(crate) struct Refs(i32);

impl Refs {
    fn new() -> Refs {
        Refs(0)
    }

    pub fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Serialize `document`. Nothing is written anywhere; the caller decides what
/// to do with the bytes.
pub fn render(document: &FinalDocument, fonts: &dyn FontMetrics) -> Result<Vec<u8>> {
    let mut refs = Refs::new();
    let catalog_id = refs.next();
    let page_tree_id = refs.next();
    let info_id = refs.next();

    let mut pdf = Pdf::new();
    let font_refs = FontRefs::write(&mut pdf, &mut refs, fonts);
    let mut image_cache = ImageCache::default();

    let page_ids: Vec<Ref> = document.pages.iter().map(|_| refs.next()).collect();
    let height = document.geometry.height;

    for (page, page_id) in document.pages.iter().zip(&page_ids) {
        let canvas = page.paint(fonts)?;
        let mut used_images: Vec<(String, Ref)> = Vec::new();
        let stream = encode_canvas(&canvas, height, |image| {
            let named = image_cache.name_for(image, &mut pdf, &mut refs);
            if !used_images.contains(&named) {
                used_images.push(named.clone());
            }
            named.0
        })?;

        let content_id = refs.next();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&stream, 6);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        let mut pdf_page = pdf.page(*page_id);
        pdf_page
            .media_box(pdf_writer::Rect::new(0.0, 0.0, document.geometry.width, height))
            .parent(page_tree_id)
            .contents(content_id);
        let mut resources = pdf_page.resources();
        {
            let mut font_dict = resources.fonts();
            for (font, id) in font_refs.iter() {
                font_dict.pair(Name(font.resource_name().as_bytes()), id);
            }
        }
        if !used_images.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, id) in &used_images {
                xobjects.pair(Name(name.as_bytes()), *id);
            }
        }
        log::debug!("serialized page {} ({:?})", page.index, page.kind);
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let outline_id = outline::write(&mut pdf, &mut refs, &document.ledger, &page_ids);
    let mut catalog = pdf.catalog(catalog_id);
    catalog.pages(page_tree_id);
    if let Some(outline_id) = outline_id {
        catalog.outlines(outline_id);
    }
    drop(catalog);

    let metadata = &document.metadata;
    let producer = format!("{} {}", metadata.producer, metadata.version);
    let mut info = pdf.document_info(info_id);
    info.producer(TextStr(&producer))
        .creator(TextStr(&producer))
        .creation_date(pdf_date(metadata.generated));
    if !metadata.title.is_empty() {
        info.title(TextStr(&metadata.title));
    }
    if !metadata.author.is_empty() {
        info.author(TextStr(&metadata.author));
    }
    drop(info);

    log::info!(
        "serialized {} pages with {} images",
        page_ids.len(),
        image_cache.len()
    );
    Ok(pdf.finish())
}

fn pdf_date(at: chrono::DateTime<chrono::Local>) -> Date {
    use chrono::{Datelike, Timelike};
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
}

fn set_fill(content: &mut Content, colour: Colour) {
    content.set_fill_rgb(colour.r, colour.g, colour.b);
}

/// `rect` in PDF user space, which grows upward from the bottom of the page.
fn flipped(rect: Rect, page_height: f32) -> (f32, f32, f32, f32) {
    (rect.x, page_height - rect.y - rect.height, rect.width, rect.height)
}

/// Translate a display list into content stream bytes. `image_name` returns
/// the resource name an image is registered under.
fn encode_canvas<F>(canvas: &Canvas, page_height: f32, mut image_name: F) -> Result<Vec<u8>>
where
    F: FnMut(&std::sync::Arc<crate::raster::RasterImage>) -> String,
{
    let mut content = Content::new();
    for op in canvas.ops() {
        match op {
            DrawOp::Text {
                x,
                y,
                font,
                size,
                colour,
                text,
            } => {
                let encoded = encode_win_ansi(text)?;
                set_fill(&mut content, *colour);
                content
                    .begin_text()
                    .set_font(Name(font.resource_name().as_bytes()), *size)
                    .next_line(*x, page_height - *y)
                    .show(Str(&encoded))
                    .end_text();
            }
            DrawOp::FillRect { rect, colour } => {
                let (x, y, w, h) = flipped(*rect, page_height);
                set_fill(&mut content, *colour);
                content.rect(x, y, w, h).fill_nonzero();
            }
            DrawOp::StrokeRect {
                rect,
                colour,
                line_width,
            } => {
                let (x, y, w, h) = flipped(*rect, page_height);
                content
                    .set_stroke_rgb(colour.r, colour.g, colour.b)
                    .set_line_width(*line_width)
                    .rect(x, y, w, h)
                    .stroke();
            }
            DrawOp::Image { rect, image } => {
                let name = image_name(image);
                let (x, y, w, h) = flipped(*rect, page_height);
                content
                    .save_state()
                    .transform([w, 0.0, 0.0, h, x, y])
                    .x_object(Name(name.as_bytes()))
                    .restore_state();
            }
            DrawOp::BeginClip { rect } => {
                let (x, y, w, h) = flipped(*rect, page_height);
                content
                    .save_state()
                    .rect(x, y, w, h)
                    .clip_nonzero()
                    .end_path();
            }
            DrawOp::EndClip => {
                content.restore_state();
            }
        }
    }
    Ok(content.finish())
}
