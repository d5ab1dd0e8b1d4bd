//! Style and geometry primitives.
//!
//! All lengths are PDF points (1/72 inch). Layout works in a top-down
//! coordinate space: `y = 0` is the top edge of the page and grows downward.
//! The PDF sink flips coordinates when serializing.

use crate::fonts::FontId;

/// An RGB colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour { r, g, b }
    }

    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub const fn new_grey(g: f32) -> Colour {
        Colour { r: g, g, b: g }
    }

    /// The colour as 8-bit channels, used when rasterizing.
    pub fn to_rgb_bytes(self) -> [u8; 3] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

pub mod colours {
    use super::Colour;

    pub const BLACK: Colour = Colour::new_grey(0.0);
    pub const WHITE: Colour = Colour::new_grey(1.0);
}

/// Spacing around a box, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn trbl(top: f32, right: f32, bottom: f32, left: f32) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn all(value: f32) -> Margins {
        Margins::trbl(value, value, value, value)
    }

    pub const fn none() -> Margins {
        Margins::all(0.0)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink the rectangle by `margins` on every side.
    pub fn inset(&self, margins: Margins) -> Rect {
        Rect {
            x: self.x + margins.left,
            y: self.y + margins.top,
            width: (self.width - margins.horizontal()).max(0.0),
            height: (self.height - margins.vertical()).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Centre,
    Right,
    /// Stretch word spacing so every line but the last fills the width.
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Centre,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// The immutable look of a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontId,
    pub size: f32,
    pub colour: Colour,
}

impl TextStyle {
    pub const fn new(font: FontId, size: f32) -> TextStyle {
        TextStyle {
            font,
            size,
            colour: colours::BLACK,
        }
    }

    pub fn with_colour(self, colour: Colour) -> TextStyle {
        TextStyle { colour, ..self }
    }

    pub fn with_size(self, size: f32) -> TextStyle {
        TextStyle { size, ..self }
    }

    pub fn with_font(self, font: FontId) -> TextStyle {
        TextStyle { font, ..self }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle::new(FontId::Helvetica, 10.0)
    }
}
