//! Second pass: content that depends on the finished layout.
//!
//! The front page, the table of contents and the running headers and footers
//! are produced by a [`DeferredContentProvider`] once the main flow has been
//! laid out. They are resolved in a fixed order:
//!
//! 1. the front page, laid out ahead of everything else;
//! 2. the table of contents, given the ledger with final page numbers, laid out
//!    between the front page and the main content;
//! 3. headers and footers, once per decorated page, given the final total.

use super::assembler::{layout, Content, LaidOut};
use super::chapter::heading_label;
use super::page::{Band, Page, PageGeometry, PageKind};
use crate::blocks::Block;
use crate::error::{Error, Result};
use crate::fonts::FontMetrics;

/// How many times the table of contents may be rebuilt while its own length
/// settles.
const MAX_TOC_PASSES: usize = 4;

/// Where a header or footer is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    /// 1-based index of the page in the final document.
    pub page: usize,
    /// Number of pages in the final document.
    pub total: usize,
    pub kind: PageKind,
}

/// A chapter or subchapter heading and the page it was placed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub chapter: u32,
    /// 0 for a chapter heading.
    pub subchapter: u32,
    pub title: String,
    pub page: usize,
}

impl TocEntry {
    pub fn is_subchapter(&self) -> bool {
        self.subchapter != 0
    }

    pub fn label(&self) -> String {
        heading_label(self.chapter, self.subchapter, &self.title)
    }
}

/// Produces the content that can only be built after layout.
///
/// Every method defaults to producing nothing. Providers must be pure: the
/// table of contents may be requested more than once while its page count
/// settles, and must give the same answer for the same ledger.
pub trait DeferredContentProvider {
    fn front(&self) -> Result<Option<Block>> {
        Ok(None)
    }

    fn header(&self, _page: &PageContext) -> Result<Option<Block>> {
        Ok(None)
    }

    fn footer(&self, _page: &PageContext) -> Result<Option<Block>> {
        Ok(None)
    }

    fn toc(&self, _ledger: &[TocEntry]) -> Result<Option<Vec<Block>>> {
        Ok(None)
    }
}

type FrontBuilder = Box<dyn Fn() -> Result<Block> + Send>;
type BandBuilder = Box<dyn Fn(&PageContext) -> Result<Block> + Send>;
type TocBuilder = Box<dyn Fn(&[TocEntry]) -> Result<Vec<Block>> + Send>;

/// A provider assembled from closures, one per kind of deferred content.
#[derive(Default)]
pub struct DeferredRegistry {
    front: Option<FrontBuilder>,
    header: Option<BandBuilder>,
    footer: Option<BandBuilder>,
    toc: Option<TocBuilder>,
}

impl DeferredRegistry {
    pub fn new() -> DeferredRegistry {
        DeferredRegistry::default()
    }

    pub fn register_front_page<F>(&mut self, builder: F)
    where
        F: Fn() -> Result<Block> + Send + 'static,
    {
        self.front = Some(Box::new(builder));
    }

    pub fn register_header<F>(&mut self, builder: F)
    where
        F: Fn(&PageContext) -> Result<Block> + Send + 'static,
    {
        self.header = Some(Box::new(builder));
    }

    pub fn register_footer<F>(&mut self, builder: F)
    where
        F: Fn(&PageContext) -> Result<Block> + Send + 'static,
    {
        self.footer = Some(Box::new(builder));
    }

    pub fn register_toc<F>(&mut self, builder: F)
    where
        F: Fn(&[TocEntry]) -> Result<Vec<Block>> + Send + 'static,
    {
        self.toc = Some(Box::new(builder));
    }
}

impl DeferredContentProvider for DeferredRegistry {
    fn front(&self) -> Result<Option<Block>> {
        self.front.as_ref().map(|f| f()).transpose()
    }

    fn header(&self, page: &PageContext) -> Result<Option<Block>> {
        self.header.as_ref().map(|f| f(page)).transpose()
    }

    fn footer(&self, page: &PageContext) -> Result<Option<Block>> {
        self.footer.as_ref().map(|f| f(page)).transpose()
    }

    fn toc(&self, ledger: &[TocEntry]) -> Result<Option<Vec<Block>>> {
        self.toc.as_ref().map(|f| f(ledger)).transpose()
    }
}

impl std::fmt::Debug for DeferredRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredRegistry")
            .field("front", &self.front.is_some())
            .field("header", &self.header.is_some())
            .field("footer", &self.footer.is_some())
            .field("toc", &self.toc.is_some())
            .finish()
    }
}

/// Which kinds of page receive headers and footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decorations {
    pub front_page: bool,
    pub toc_pages: bool,
    pub content_pages: bool,
}

impl Decorations {
    pub const fn all() -> Decorations {
        Decorations {
            front_page: true,
            toc_pages: true,
            content_pages: true,
        }
    }

    pub const fn content_only() -> Decorations {
        Decorations {
            front_page: false,
            toc_pages: false,
            content_pages: true,
        }
    }

    pub fn applies_to(&self, kind: PageKind) -> bool {
        match kind {
            PageKind::Front => self.front_page,
            PageKind::TableOfContents => self.toc_pages,
            PageKind::Content => self.content_pages,
        }
    }
}

/// Every page in final order along with the ledger in final page numbers.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub pages: Vec<Page>,
    pub ledger: Vec<TocEntry>,
    pub front_pages: usize,
    pub toc_pages: usize,
}

fn shifted(ledger: &[TocEntry], offset: usize) -> Vec<TocEntry> {
    ledger
        .iter()
        .map(|entry| TocEntry {
            page: entry.page + offset,
            ..entry.clone()
        })
        .collect()
}

fn layout_blocks(
    blocks: Vec<Block>,
    geometry: &PageGeometry,
    kind: PageKind,
    fonts: &dyn FontMetrics,
) -> Result<Vec<Page>> {
    let content: Vec<Content> = blocks.into_iter().map(Content::Block).collect();
    Ok(layout(&content, geometry, kind, fonts)?.pages)
}

/// Lay out the table of contents, rebuilding it until the number of pages it
/// occupies matches the number of pages its entries were offset by.
fn resolve_toc(
    provider: &dyn DeferredContentProvider,
    ledger: &[TocEntry],
    front_pages: usize,
    geometry: &PageGeometry,
    fonts: &dyn FontMetrics,
) -> Result<(Vec<Page>, Vec<TocEntry>)> {
    let mut guess = 1;
    for pass in 1..=MAX_TOC_PASSES {
        let entries = shifted(ledger, front_pages + guess);
        let blocks = match provider.toc(&entries)? {
            Some(blocks) if !blocks.is_empty() => blocks,
            _ => return Ok((Vec::new(), shifted(ledger, front_pages))),
        };

        let pages = layout_blocks(blocks, geometry, PageKind::TableOfContents, fonts)?;
        if pages.len() == guess {
            log::debug!("table of contents settled at {guess} pages after {pass} passes");
            return Ok((pages, entries));
        }
        log::debug!(
            "table of contents took {} pages, expected {guess}; rebuilding",
            pages.len()
        );
        guess = pages.len();
    }

    Err(Error::LayoutConstraint(format!(
        "table of contents length did not settle after {MAX_TOC_PASSES} passes"
    )))
}

/// Run the second pass over the laid-out main content.
pub fn resolve(
    provider: &dyn DeferredContentProvider,
    decorations: Decorations,
    geometry: &PageGeometry,
    content: LaidOut,
    fonts: &dyn FontMetrics,
) -> Result<Resolved> {
    let front = match provider.front()? {
        Some(block) => layout_blocks(vec![block], geometry, PageKind::Front, fonts)?,
        None => Vec::new(),
    };
    let front_pages = front.len();

    let (toc, ledger) = resolve_toc(provider, &content.ledger, front_pages, geometry, fonts)?;
    let toc_pages = toc.len();

    let mut pages: Vec<Page> = front
        .into_iter()
        .chain(toc)
        .chain(content.pages)
        .collect();
    let total = pages.len();
    log::info!(
        "resolving {total} pages ({front_pages} front, {toc_pages} contents, {} body)",
        total - front_pages - toc_pages
    );

    for (i, page) in pages.iter_mut().enumerate() {
        page.index = i + 1;
        if !decorations.applies_to(page.kind) {
            continue;
        }

        let context = PageContext {
            page: page.index,
            total,
            kind: page.kind,
        };
        page.header = provider
            .header(&context)?
            .map(|block| Band::new(geometry.header_band(), geometry.margins, block));
        page.footer = provider
            .footer(&context)?
            .map(|block| Band::new(geometry.footer_band(), geometry.margins, block));
    }

    Ok(Resolved {
        pages,
        ledger,
        front_pages,
        toc_pages,
    })
}
