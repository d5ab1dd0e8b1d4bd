//! First pass: flow content into fixed-size pages.
//!
//! Units are placed top to bottom at a cursor. A unit that does not fit below
//! the cursor moves to a new page, unless the page has no flowing content yet,
//! in which case it is placed anyway and allowed to overflow. Nothing is ever
//! split across pages.

use super::chapter::{Chapter, ChapterItem, Heading};
use super::deferred::TocEntry;
use super::page::{Page, PageGeometry, PageKind, PlacedBlock};
use crate::blocks::{Block, ImageBlock, Paragraph, Table};
use crate::error::Result;
use crate::fonts::FontMetrics;

const FIT_TOLERANCE: f32 = 1e-3;

/// One item of a document's flow.
#[derive(Debug, Clone)]
pub enum Content {
    Block(Block),
    Chapter(Chapter),
    /// Continue on a new page, unless the current one is still empty.
    PageBreak,
}

impl From<Block> for Content {
    fn from(block: Block) -> Self {
        Content::Block(block)
    }
}

impl From<Paragraph> for Content {
    fn from(paragraph: Paragraph) -> Self {
        Content::Block(paragraph.into())
    }
}

impl From<ImageBlock> for Content {
    fn from(image: ImageBlock) -> Self {
        Content::Block(image.into())
    }
}

impl From<Table> for Content {
    fn from(table: Table) -> Self {
        Content::Block(table.into())
    }
}

impl From<Chapter> for Content {
    fn from(chapter: Chapter) -> Self {
        Content::Chapter(chapter)
    }
}

/// The result of flowing content: pages numbered from 1 and the chapter
/// ledger with page numbers relative to these pages.
#[derive(Debug, Clone)]
pub struct LaidOut {
    pub pages: Vec<Page>,
    pub ledger: Vec<TocEntry>,
}

/// Flow `content` into pages of `kind`. Always produces at least one page.
pub fn layout(
    content: &[Content],
    geometry: &PageGeometry,
    kind: PageKind,
    fonts: &dyn FontMetrics,
) -> Result<LaidOut> {
    let mut assembler = Assembler::new(*geometry, kind, fonts);
    for item in content {
        match item {
            Content::Block(block) => assembler.place(block)?,
            Content::Chapter(chapter) => assembler.place_chapter(chapter)?,
            Content::PageBreak => assembler.break_if_not_empty(),
        }
    }
    Ok(assembler.finish())
}

struct Assembler<'f> {
    geometry: PageGeometry,
    kind: PageKind,
    fonts: &'f dyn FontMetrics,
    done: Vec<Page>,
    page: Page,
    cursor: f32,
    ledger: Vec<TocEntry>,
}

impl<'f> Assembler<'f> {
    fn new(geometry: PageGeometry, kind: PageKind, fonts: &'f dyn FontMetrics) -> Assembler<'f> {
        let area = geometry.content_area();
        Assembler {
            geometry,
            kind,
            fonts,
            done: Vec::new(),
            page: Page::new(1, kind, area),
            cursor: area.y,
            ledger: Vec::new(),
        }
    }

    fn new_page(&mut self) {
        let area = self.geometry.content_area();
        let next = Page::new(self.page.index + 1, self.kind, area);
        let finished = std::mem::replace(&mut self.page, next);
        log::debug!(
            "{:?} page {} full with {} blocks",
            self.kind,
            finished.index,
            finished.blocks.len()
        );
        self.done.push(finished);
        self.cursor = area.y;
    }

    fn break_if_not_empty(&mut self) {
        if self.page.has_flow {
            self.new_page();
        }
    }

    fn place(&mut self, block: &Block) -> Result<()> {
        let area = self.geometry.content_area();

        if let Some(at) = block.position() {
            self.page.blocks.push(PlacedBlock {
                block: block.clone(),
                x: at.x,
                y: at.y,
                width: (self.geometry.width - at.x).max(0.0),
            });
            return Ok(());
        }

        let margins = block.margins();
        let content_height =
            block.content_height((area.width - margins.horizontal()).max(0.0), self.fonts)?;
        let outer_height = margins.vertical() + content_height;

        if self.cursor + margins.top + content_height > area.bottom() + FIT_TOLERANCE
            && self.page.has_flow
        {
            self.new_page();
        }
        if outer_height > area.height + FIT_TOLERANCE {
            log::warn!(
                "block is {outer_height:.1}pt tall but pages only hold {:.1}pt; it will overflow page {}",
                area.height,
                self.page.index
            );
        }

        log::debug!(
            "placing block at y={:.1} on page {} ({outer_height:.1}pt)",
            self.cursor,
            self.page.index
        );
        self.page.blocks.push(PlacedBlock {
            block: block.clone(),
            x: area.x,
            y: self.cursor,
            width: area.width,
        });
        self.page.has_flow = true;
        self.cursor += outer_height;
        Ok(())
    }

    fn place_heading(&mut self, heading: &Heading) -> Result<()> {
        self.place(&heading.block())?;
        if heading.include_in_toc {
            self.ledger.push(TocEntry {
                chapter: heading.chapter,
                subchapter: heading.subchapter,
                title: heading.title.clone(),
                page: self.page.index,
            });
        }
        Ok(())
    }

    fn place_chapter(&mut self, chapter: &Chapter) -> Result<()> {
        if chapter.starts_on_new_page() {
            self.break_if_not_empty();
        }
        self.place_heading(chapter.heading())?;
        for item in chapter.items() {
            match item {
                ChapterItem::Block(block) => self.place(block)?,
                ChapterItem::Subchapter(sub) => {
                    self.place_heading(sub.heading())?;
                    for block in sub.blocks() {
                        self.place(block)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> LaidOut {
        self.done.push(self.page);
        log::info!("laid out {} {:?} pages", self.done.len(), self.kind);
        LaidOut {
            pages: self.done,
            ledger: self.ledger,
        }
    }
}
