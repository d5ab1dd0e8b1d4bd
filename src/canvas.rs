//! A backend-neutral display list.
//!
//! Blocks paint themselves into a [`Canvas`]; the PDF sink later turns each
//! [`DrawOp`] into content-stream operators. Keeping the list around also lets
//! tests look at exactly what ended up on a page.

use crate::fonts::FontId;
use crate::raster::RasterImage;
use crate::style::{Colour, Rect};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum DrawOp {
    /// A single line of text; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        font: FontId,
        size: f32,
        colour: Colour,
        text: String,
    },
    FillRect {
        rect: Rect,
        colour: Colour,
    },
    StrokeRect {
        rect: Rect,
        colour: Colour,
        line_width: f32,
    },
    Image {
        rect: Rect,
        image: Arc<RasterImage>,
    },
    /// Restrict everything up to the matching [`DrawOp::EndClip`] to `rect`.
    BeginClip {
        rect: Rect,
    },
    EndClip,
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new() -> Canvas {
        Canvas::default()
    }

    pub fn text<S: Into<String>>(
        &mut self,
        x: f32,
        y: f32,
        font: FontId,
        size: f32,
        colour: Colour,
        text: S,
    ) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            font,
            size,
            colour,
            text: text.into(),
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        self.ops.push(DrawOp::FillRect { rect, colour });
    }

    pub fn stroke_rect(&mut self, rect: Rect, colour: Colour, line_width: f32) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            colour,
            line_width,
        });
    }

    pub fn image(&mut self, rect: Rect, image: Arc<RasterImage>) {
        self.ops.push(DrawOp::Image { rect, image });
    }

    pub fn begin_clip(&mut self, rect: Rect) {
        self.ops.push(DrawOp::BeginClip { rect });
    }

    pub fn end_clip(&mut self) {
        self.ops.push(DrawOp::EndClip);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Every text run on the canvas, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
