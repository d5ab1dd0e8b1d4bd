use crate::blocks::{Block, Paragraph};
use crate::fonts::FontId;
use crate::style::{Margins, TextStyle};
use std::collections::HashMap;

/// Hierarchical chapter/subchapter counters.
///
/// Chapter numbers never reset. Subchapters are counted per parent chapter,
/// starting at 1, regardless of the order chapters and subchapters are
/// created in. Each [`crate::Document`] owns its own counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Numbering {
    chapter: u32,
    subchapters: HashMap<u32, u32>,
}

impl Numbering {
    pub fn next_chapter(&mut self) -> u32 {
        self.chapter += 1;
        self.chapter
    }

    /// The next subchapter number under `chapter`.
    pub fn next_subchapter(&mut self, chapter: u32) -> u32 {
        let count = self.subchapters.entry(chapter).or_insert(0);
        *count += 1;
        *count
    }
}

/// `"3. Title"` for chapters, `"3.2. Title"` for subchapters.
pub fn heading_label(chapter: u32, subchapter: u32, title: &str) -> String {
    if subchapter == 0 {
        format!("{chapter}. {title}")
    } else {
        format!("{chapter}.{subchapter}. {title}")
    }
}

fn chapter_heading_style() -> TextStyle {
    TextStyle::new(FontId::HelveticaBold, 16.0)
}

fn subchapter_heading_style() -> TextStyle {
    TextStyle::new(FontId::HelveticaBold, 13.0)
}

/// What a chapter or subchapter looks like when its heading is placed.
#[derive(Debug, Clone)]
pub struct Heading {
    pub chapter: u32,
    pub subchapter: u32,
    pub title: String,
    pub style: TextStyle,
    pub margins: Margins,
    pub include_in_toc: bool,
}

impl Heading {
    pub fn label(&self) -> String {
        heading_label(self.chapter, self.subchapter, &self.title)
    }

    pub fn block(&self) -> Block {
        Block::from(Paragraph::new(self.label(), self.style)).with_margins(self.margins)
    }
}

#[derive(Debug, Clone)]
pub struct Subchapter {
    heading: Heading,
    blocks: Vec<Block>,
}

impl Subchapter {
    pub(crate) fn new(chapter: u32, number: u32, title: String) -> Subchapter {
        Subchapter {
            heading: Heading {
                chapter,
                subchapter: number,
                title,
                style: subchapter_heading_style(),
                margins: Margins::trbl(8.0, 0.0, 4.0, 0.0),
                include_in_toc: true,
            },
            blocks: Vec::new(),
        }
    }

    pub fn heading(&self) -> &Heading {
        &self.heading
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn add<B: Into<Block>>(&mut self, block: B) {
        self.blocks.push(block.into());
    }

    pub fn with<B: Into<Block>>(mut self, block: B) -> Subchapter {
        self.add(block);
        self
    }

    pub fn with_heading_style(mut self, style: TextStyle) -> Subchapter {
        self.heading.style = style;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Subchapter {
        self.heading.margins = margins;
        self
    }

    pub fn include_in_toc(mut self, include: bool) -> Subchapter {
        self.heading.include_in_toc = include;
        self
    }
}

#[derive(Debug, Clone)]
pub enum ChapterItem {
    Block(Block),
    Subchapter(Subchapter),
}

#[derive(Debug, Clone)]
pub struct Chapter {
    heading: Heading,
    new_page: bool,
    items: Vec<ChapterItem>,
}

impl Chapter {
    pub(crate) fn new(number: u32, title: String) -> Chapter {
        Chapter {
            heading: Heading {
                chapter: number,
                subchapter: 0,
                title,
                style: chapter_heading_style(),
                margins: Margins::trbl(0.0, 0.0, 10.0, 0.0),
                include_in_toc: true,
            },
            new_page: false,
            items: Vec::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.heading.chapter
    }

    pub fn heading(&self) -> &Heading {
        &self.heading
    }

    pub fn items(&self) -> &[ChapterItem] {
        &self.items
    }

    pub fn starts_on_new_page(&self) -> bool {
        self.new_page
    }

    pub fn add<B: Into<Block>>(&mut self, block: B) {
        self.items.push(ChapterItem::Block(block.into()));
    }

    pub fn with<B: Into<Block>>(mut self, block: B) -> Chapter {
        self.add(block);
        self
    }

    pub fn add_subchapter(&mut self, subchapter: Subchapter) {
        self.items.push(ChapterItem::Subchapter(subchapter));
    }

    pub fn with_subchapter(mut self, subchapter: Subchapter) -> Chapter {
        self.add_subchapter(subchapter);
        self
    }

    /// Start this chapter at the top of a fresh page.
    pub fn on_new_page(mut self, new_page: bool) -> Chapter {
        self.new_page = new_page;
        self
    }

    pub fn with_heading_style(mut self, style: TextStyle) -> Chapter {
        self.heading.style = style;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Chapter {
        self.heading.margins = margins;
        self
    }

    pub fn include_in_toc(mut self, include: bool) -> Chapter {
        self.heading.include_in_toc = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_numbers_increase_and_subchapters_restart() {
        let mut numbering = Numbering::default();
        assert_eq!(numbering.next_chapter(), 1);
        assert_eq!(numbering.next_subchapter(1), 1);
        assert_eq!(numbering.next_subchapter(1), 2);
        assert_eq!(numbering.next_chapter(), 2);
        assert_eq!(numbering.next_subchapter(2), 1);
    }

    #[test]
    fn subchapters_count_per_parent_when_interleaved() {
        let mut numbering = Numbering::default();
        let a = numbering.next_chapter();
        let b = numbering.next_chapter();
        assert_eq!(numbering.next_subchapter(a), 1);
        assert_eq!(numbering.next_subchapter(b), 1);
        assert_eq!(numbering.next_subchapter(a), 2);
        assert_eq!(numbering.next_subchapter(b), 2);
    }

    #[test]
    fn labels_include_the_full_number() {
        assert_eq!(heading_label(2, 0, "Overview"), "2. Overview");
        assert_eq!(heading_label(2, 3, "Tables"), "2.3. Tables");
        let sub = Subchapter::new(4, 1, "QR codes".to_string());
        assert_eq!(sub.heading().label(), "4.1. QR codes");
    }

    #[test]
    fn chapters_keep_items_in_order() {
        let chapter = Chapter::new(1, "Intro".to_string())
            .with(Paragraph::new("first", TextStyle::default()))
            .with_subchapter(Subchapter::new(1, 1, "Details".to_string()))
            .with(Paragraph::new("last", TextStyle::default()));
        assert!(matches!(chapter.items()[0], ChapterItem::Block(_)));
        assert!(matches!(chapter.items()[1], ChapterItem::Subchapter(_)));
        assert!(matches!(chapter.items()[2], ChapterItem::Block(_)));
    }
}
