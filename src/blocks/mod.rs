//! Content blocks: the measurable, drawable units a document is made of.
//!
//! Every [`Block`] is a frame (margins and an optional absolute position)
//! around one kind of content. Measuring a block at a given width is pure, so
//! the assembler can measure in the first pass and the sink can paint in the
//! second and both see the same geometry.
//!
//! Blocks are assembled with consuming `with_*` methods and are immutable once
//! added to a document; rasters inside image blocks are shared through `Arc`,
//! so cloning a block (for example a logo drawn on every page) is cheap.

mod image;
mod paragraph;
mod table;

pub use self::image::*;
pub use paragraph::*;
pub use table::*;

use crate::canvas::Canvas;
use crate::error::Result;
use crate::fonts::FontMetrics;
use crate::style::{Margins, Point, Rect};

/// Behaviour shared by the leaf content kinds.
pub(crate) trait Drawable {
    /// Height of the content when laid out `width` points wide.
    fn height(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32>;

    /// Width the content actually occupies when given `width` points.
    fn natural_width(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32>;

    /// Paint the content into `frame`, whose height is the measured height.
    fn paint(&self, canvas: &mut Canvas, frame: Rect, fonts: &dyn FontMetrics) -> Result<()>;
}

#[derive(Debug, Clone)]
pub enum BlockKind {
    Paragraph(Paragraph),
    Image(ImageBlock),
    Table(Table),
    /// Children stacked top to bottom; absolutely positioned children are
    /// placed relative to the group's top-left corner instead.
    Group(Vec<Block>),
}

#[derive(Debug, Clone)]
pub struct Block {
    kind: BlockKind,
    margins: Margins,
    position: Option<Point>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Block {
        Block {
            kind,
            margins: Margins::none(),
            position: None,
        }
    }

    pub fn group(children: Vec<Block>) -> Block {
        Block::new(BlockKind::Group(children))
    }

    pub fn with_margins(self, margins: Margins) -> Block {
        Block { margins, ..self }
    }

    /// Take the block out of the flow and pin it at `(x, y)` relative to the
    /// region it is drawn into.
    pub fn at(self, x: f32, y: f32) -> Block {
        Block {
            position: Some(Point::new(x, y)),
            ..self
        }
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn is_positioned(&self) -> bool {
        self.position.is_some()
    }

    /// Height of the content alone, given the width inside the margins.
    pub fn content_height(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32> {
        match &self.kind {
            BlockKind::Paragraph(p) => p.height(width, fonts),
            BlockKind::Image(i) => Drawable::height(i, width, fonts),
            BlockKind::Table(t) => t.height(width, fonts),
            BlockKind::Group(children) => {
                let mut height = 0.0;
                for child in children.iter().filter(|c| !c.is_positioned()) {
                    height += child.outer_height(width, fonts)?;
                }
                Ok(height)
            }
        }
    }

    /// Height including vertical margins when the block is `width` points wide
    /// including its horizontal margins.
    pub fn outer_height(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32> {
        let inner = (width - self.margins.horizontal()).max(0.0);
        Ok(self.margins.vertical() + self.content_height(inner, fonts)?)
    }

    /// Width actually used, including horizontal margins.
    pub fn natural_width(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32> {
        let inner = (width - self.margins.horizontal()).max(0.0);
        let content = match &self.kind {
            BlockKind::Paragraph(p) => p.natural_width(inner, fonts)?,
            BlockKind::Image(i) => Drawable::natural_width(i, inner, fonts)?,
            BlockKind::Table(t) => t.natural_width(inner, fonts)?,
            BlockKind::Group(children) => {
                let mut widest: f32 = 0.0;
                for child in children.iter().filter(|c| !c.is_positioned()) {
                    widest = widest.max(child.natural_width(inner, fonts)?);
                }
                widest
            }
        };
        Ok(self.margins.horizontal() + content)
    }

    /// Paint the block with its margin box's top-left corner at `(x, y)`.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        x: f32,
        y: f32,
        width: f32,
        fonts: &dyn FontMetrics,
    ) -> Result<()> {
        let inner_width = (width - self.margins.horizontal()).max(0.0);
        let height = self.content_height(inner_width, fonts)?;
        let frame = Rect::new(
            x + self.margins.left,
            y + self.margins.top,
            inner_width,
            height,
        );

        match &self.kind {
            BlockKind::Paragraph(p) => p.paint(canvas, frame, fonts),
            BlockKind::Image(i) => i.paint(canvas, frame, fonts),
            BlockKind::Table(t) => t.paint(canvas, frame, fonts),
            BlockKind::Group(children) => {
                let mut cursor = frame.y;
                for child in children {
                    match child.position {
                        Some(at) => child.draw(
                            canvas,
                            frame.x + at.x,
                            frame.y + at.y,
                            (frame.width - at.x).max(0.0),
                            fonts,
                        )?,
                        None => {
                            child.draw(canvas, frame.x, cursor, frame.width, fonts)?;
                            cursor += child.outer_height(frame.width, fonts)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl From<Paragraph> for Block {
    fn from(paragraph: Paragraph) -> Self {
        Block::new(BlockKind::Paragraph(paragraph))
    }
}

impl From<ImageBlock> for Block {
    fn from(image: ImageBlock) -> Self {
        Block::new(BlockKind::Image(image))
    }
}

impl From<Table> for Block {
    fn from(table: Table) -> Self {
        Block::new(BlockKind::Table(table))
    }
}
