use crate::blocks::Block;
use crate::canvas::Canvas;
use crate::error::Result;
use crate::fonts::FontMetrics;
use crate::style::{Margins, Rect};

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    /// US Letter, 8.5 × 11 in.
    pub const fn letter() -> PageGeometry {
        PageGeometry {
            width: 612.0,
            height: 792.0,
            margins: Margins::trbl(72.0, 50.0, 72.0, 50.0),
        }
    }

    /// ISO A4, 210 × 297 mm.
    pub const fn a4() -> PageGeometry {
        PageGeometry {
            width: 595.28,
            height: 841.89,
            margins: Margins::trbl(72.0, 50.0, 72.0, 50.0),
        }
    }

    pub fn with_margins(self, margins: Margins) -> PageGeometry {
        PageGeometry { margins, ..self }
    }

    pub fn page_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Where flowing content goes.
    pub fn content_area(&self) -> Rect {
        self.page_rect().inset(self.margins)
    }

    /// The strip above the content area.
    pub fn header_band(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.margins.top)
    }

    /// The strip below the content area.
    pub fn footer_band(&self) -> Rect {
        Rect::new(
            0.0,
            self.height - self.margins.bottom,
            self.width,
            self.margins.bottom,
        )
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::letter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Front,
    TableOfContents,
    Content,
}

/// A block with its final position on a page.
#[derive(Debug, Clone)]
pub struct PlacedBlock {
    pub block: Block,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// A header or footer: one block drawn inside a clipped band.
///
/// Flowed blocks start at `origin`; blocks with an explicit position are placed
/// relative to the top-left corner of the band.
#[derive(Debug, Clone)]
pub struct Band {
    pub clip: Rect,
    pub origin: (f32, f32),
    pub width: f32,
    pub block: Block,
}

impl Band {
    pub(crate) fn new(clip: Rect, margins: Margins, block: Block) -> Band {
        Band {
            clip,
            origin: (clip.x + margins.left, clip.y),
            width: (clip.width - margins.horizontal()).max(0.0),
            block,
        }
    }

    fn paint(&self, canvas: &mut Canvas, fonts: &dyn FontMetrics) -> Result<()> {
        canvas.begin_clip(self.clip);
        match self.block.position() {
            Some(at) => self.block.draw(
                canvas,
                self.clip.x + at.x,
                self.clip.y + at.y,
                (self.clip.width - at.x).max(0.0),
                fonts,
            )?,
            None => self
                .block
                .draw(canvas, self.origin.0, self.origin.1, self.width, fonts)?,
        }
        canvas.end_clip();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based position in the document.
    pub index: usize,
    pub kind: PageKind,
    pub content_area: Rect,
    pub blocks: Vec<PlacedBlock>,
    pub header: Option<Band>,
    pub footer: Option<Band>,
    /// Whether any flowing (not absolutely positioned) block is on the page.
    pub(crate) has_flow: bool,
}

impl Page {
    pub(crate) fn new(index: usize, kind: PageKind, content_area: Rect) -> Page {
        Page {
            index,
            kind,
            content_area,
            blocks: Vec::new(),
            header: None,
            footer: None,
            has_flow: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Paint content, then header and footer, into a fresh display list.
    pub fn paint(&self, fonts: &dyn FontMetrics) -> Result<Canvas> {
        let mut canvas = Canvas::new();
        for placed in &self.blocks {
            placed
                .block
                .draw(&mut canvas, placed.x, placed.y, placed.width, fonts)?;
        }
        if let Some(header) = &self.header {
            header.paint(&mut canvas, fonts)?;
        }
        if let Some(footer) = &self.footer {
            footer.paint(&mut canvas, fonts)?;
        }
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Paragraph;
    use crate::canvas::DrawOp;
    use crate::fonts::{FontId, StandardFonts};
    use crate::style::TextStyle;

    #[test]
    fn bands_sit_in_the_margins() {
        let geometry = PageGeometry::letter();
        assert_eq!(geometry.content_area(), Rect::new(50.0, 72.0, 512.0, 648.0));
        assert_eq!(geometry.header_band(), Rect::new(0.0, 0.0, 612.0, 72.0));
        assert_eq!(geometry.footer_band(), Rect::new(0.0, 720.0, 612.0, 72.0));
    }

    #[test]
    fn footers_are_clipped_to_their_band() {
        let geometry = PageGeometry::letter();
        let mut page = Page::new(1, PageKind::Content, geometry.content_area());
        let footer = Block::from(Paragraph::new("Page 1 of 1", TextStyle::new(FontId::Courier, 8.0)));
        page.footer = Some(Band::new(geometry.footer_band(), geometry.margins, footer));

        let canvas = page.paint(&StandardFonts).unwrap();
        let ops = canvas.ops();
        assert!(matches!(ops[0], DrawOp::BeginClip { rect } if rect == geometry.footer_band()));
        match &ops[1] {
            DrawOp::Text { x, text, .. } => {
                assert_eq!(*x, 50.0);
                assert_eq!(text, "Page 1 of 1");
            }
            other => panic!("expected text, got {other:?}"),
        }
        assert!(matches!(ops[2], DrawOp::EndClip));
    }
}
