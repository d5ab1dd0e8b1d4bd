use super::assembler::{layout, Content};
use super::chapter::{Chapter, Numbering, Subchapter};
use super::deferred::{resolve, Decorations, DeferredContentProvider, DeferredRegistry, TocEntry};
use super::page::{Page, PageGeometry, PageKind};
use crate::error::{Error, Result};
use crate::fonts::FontMetrics;
use chrono::{DateTime, Local, NaiveDate};
use derive_builder::Builder;
use std::path::Path;

/// Facts about the build that produced a document, shown in its document
/// history and written to the PDF info dictionary.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct BuildMetadata {
    #[builder(default = "\"folio\".to_string()")]
    pub producer: String,
    #[builder(default = "env!(\"CARGO_PKG_VERSION\").to_string()")]
    pub version: String,
    pub release_date: NaiveDate,
    #[builder(default = "Local::now()")]
    pub generated: DateTime<Local>,
    #[builder(default)]
    pub title: String,
    #[builder(default)]
    pub author: String,
}

/// A document under construction.
///
/// Content is appended in order; nothing is laid out until [`Document::build`].
pub struct Document {
    geometry: PageGeometry,
    metadata: BuildMetadata,
    numbering: Numbering,
    content: Vec<Content>,
    provider: Box<dyn DeferredContentProvider + Send>,
    decorations: Decorations,
}

impl Document {
    pub fn new(geometry: PageGeometry, metadata: BuildMetadata) -> Document {
        Document {
            geometry,
            metadata,
            numbering: Numbering::default(),
            content: Vec::new(),
            provider: Box::new(DeferredRegistry::new()),
            decorations: Decorations::content_only(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn metadata(&self) -> &BuildMetadata {
        &self.metadata
    }

    /// Start the next chapter. The chapter is not part of the document until
    /// it is passed to [`Document::add`].
    pub fn new_chapter<S: Into<String>>(&mut self, title: S) -> Chapter {
        Chapter::new(self.numbering.next_chapter(), title.into())
    }

    /// Start the next subchapter of `parent`.
    pub fn new_subchapter<S: Into<String>>(&mut self, parent: &Chapter, title: S) -> Subchapter {
        let number = self.numbering.next_subchapter(parent.number());
        Subchapter::new(parent.number(), number, title.into())
    }

    pub fn add<C: Into<Content>>(&mut self, content: C) {
        self.content.push(content.into());
    }

    pub fn new_page(&mut self) {
        self.content.push(Content::PageBreak);
    }

    pub fn set_deferred<P: DeferredContentProvider + Send + 'static>(&mut self, provider: P) {
        self.provider = Box::new(provider);
    }

    /// Choose which pages get headers and footers. Until this is called only
    /// content pages do.
    pub fn set_decorations(&mut self, decorations: Decorations) {
        self.decorations = decorations;
    }

    /// Lay out the main flow, then resolve the deferred content against it.
    pub fn build(self, fonts: &dyn FontMetrics) -> Result<FinalDocument> {
        log::info!("laying out {} content items", self.content.len());
        let laid_out = layout(&self.content, &self.geometry, PageKind::Content, fonts)?;
        let layout_ledger = laid_out.ledger.clone();

        let resolved = resolve(
            self.provider.as_ref(),
            self.decorations,
            &self.geometry,
            laid_out,
            fonts,
        )?;

        Ok(FinalDocument {
            pages: resolved.pages,
            ledger: resolved.ledger,
            layout_ledger,
            front_pages: resolved.front_pages,
            toc_pages: resolved.toc_pages,
            geometry: self.geometry,
            metadata: self.metadata,
        })
    }
}

/// A fully laid-out document. Nothing about it changes any more.
#[derive(Debug, Clone)]
pub struct FinalDocument {
    pub pages: Vec<Page>,
    /// Chapter headings with their final page numbers.
    pub ledger: Vec<TocEntry>,
    /// Chapter headings with page numbers counted from the first content page.
    pub layout_ledger: Vec<TocEntry>,
    pub front_pages: usize,
    pub toc_pages: usize,
    pub geometry: PageGeometry,
    pub metadata: BuildMetadata,
}

impl FinalDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn content_pages(&self) -> usize {
        self.pages.len() - self.front_pages - self.toc_pages
    }

    pub fn to_pdf(&self, fonts: &dyn FontMetrics) -> Result<Vec<u8>> {
        crate::sinks::pdf::render(self, fonts)
    }

    /// Serialize the whole document, then write it to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P, fonts: &dyn FontMetrics) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.to_pdf(fonts)?;
        std::fs::write(path, &bytes)
            .map_err(|e| Error::Serialization(format!("failed to write {}: {e}", path.display())))?;
        log::info!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Block, Paragraph};
    use crate::composer::deferred::PageContext;
    use crate::fonts::{FontId, StandardFonts};
    use crate::style::TextStyle;

    fn metadata() -> BuildMetadata {
        BuildMetadataBuilder::default()
            .title("Report")
            .release_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .build()
            .unwrap()
    }

    fn text(s: &str) -> Paragraph {
        Paragraph::new(s, TextStyle::new(FontId::Helvetica, 10.0))
    }

    #[test]
    fn metadata_builder_fills_defaults() {
        let metadata = metadata();
        assert_eq!(metadata.producer, "folio");
        assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
        assert!(metadata.author.is_empty());
        assert!(BuildMetadataBuilder::default().build().is_err());
    }

    #[test]
    fn numbering_is_per_document() {
        let mut first = Document::new(PageGeometry::letter(), metadata());
        let a = first.new_chapter("A");
        let a1 = first.new_subchapter(&a, "A1");
        let a2 = first.new_subchapter(&a, "A2");
        let b = first.new_chapter("B");
        let b1 = first.new_subchapter(&b, "B1");
        assert_eq!(a.number(), 1);
        assert_eq!(b.number(), 2);
        assert_eq!(a1.heading().label(), "1.1. A1");
        assert_eq!(a2.heading().label(), "1.2. A2");
        assert_eq!(b1.heading().label(), "2.1. B1");

        let mut second = Document::new(PageGeometry::letter(), metadata());
        assert_eq!(second.new_chapter("Fresh").number(), 1);
    }

    #[test]
    fn subchapters_of_chapters_created_together_start_at_one() {
        let mut document = Document::new(PageGeometry::letter(), metadata());
        let a = document.new_chapter("A");
        let b = document.new_chapter("B");
        let a1 = document.new_subchapter(&a, "A1");
        let b1 = document.new_subchapter(&b, "B1");
        let a2 = document.new_subchapter(&a, "A2");
        assert_eq!(a1.heading().label(), "1.1. A1");
        assert_eq!(b1.heading().label(), "2.1. B1");
        assert_eq!(a2.heading().label(), "1.2. A2");
    }

    struct Report;

    impl DeferredContentProvider for Report {
        fn front(&self) -> Result<Option<Block>> {
            Ok(Some(text("Front page").into()))
        }

        fn footer(&self, page: &PageContext) -> Result<Option<Block>> {
            Ok(Some(text(&format!("Page {} of {}", page.page, page.total)).into()))
        }

        fn toc(&self, ledger: &[TocEntry]) -> Result<Option<Vec<Block>>> {
            Ok(Some(
                ledger
                    .iter()
                    .map(|e| text(&format!("{} ... {}", e.label(), e.page)).into())
                    .collect(),
            ))
        }
    }

    #[test]
    fn builds_front_toc_and_content_with_page_footers() {
        let mut document = Document::new(PageGeometry::letter(), metadata());
        let mut chapter = document.new_chapter("Overview").on_new_page(true);
        let first = document
            .new_subchapter(&chapter, "First")
            .with(text("short paragraph one"));
        let second = document
            .new_subchapter(&chapter, "Second")
            .with(text("short paragraph two"));
        chapter.add_subchapter(first);
        chapter.add_subchapter(second);
        document.add(chapter);
        document.set_deferred(Report);
        document.set_decorations(Decorations::all());

        let built = document.build(&StandardFonts).unwrap();
        assert_eq!(built.front_pages, 1);
        assert_eq!(built.toc_pages, 1);
        assert_eq!(built.content_pages(), 1);
        assert_eq!(built.page_count(), 3);

        let subchapters: Vec<(String, usize)> = built
            .ledger
            .iter()
            .filter(|e| e.is_subchapter())
            .map(|e| (e.label(), e.page))
            .collect();
        assert_eq!(
            subchapters,
            vec![("1.1. First".to_string(), 3), ("1.2. Second".to_string(), 3)]
        );
        assert!(built.layout_ledger.iter().all(|e| e.page == 1));

        let toc = built.pages[1].paint(&StandardFonts).unwrap();
        let toc_lines: Vec<&str> = toc.texts().collect();
        assert!(toc_lines.contains(&"1.1. First ... 3"));
        assert!(toc_lines.contains(&"1.2. Second ... 3"));

        for (k, page) in built.pages.iter().enumerate() {
            let canvas = page.paint(&StandardFonts).unwrap();
            let expected = format!("Page {} of 3", k + 1);
            assert_eq!(canvas.texts().last(), Some(expected.as_str()));
        }
    }

    #[test]
    fn documents_build_on_other_threads() {
        let mut document = Document::new(PageGeometry::letter(), metadata());
        document.add(text("built elsewhere"));
        document.set_deferred(Report);
        document.set_decorations(Decorations::all());

        let built = std::thread::spawn(move || document.build(&StandardFonts))
            .join()
            .unwrap()
            .unwrap();
        assert_eq!(built.front_pages, 1);
        assert_eq!(built.toc_pages, 0);
        assert_eq!(built.page_count(), 2);
    }

    #[test]
    fn saves_only_complete_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let mut document = Document::new(PageGeometry::letter(), metadata());
        document.add(text("hello"));
        let built = document.build(&StandardFonts).unwrap();
        let written = built.save(&path, &StandardFonts).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), written);
        assert!(bytes.starts_with(b"%PDF-"));

        let mut broken = Document::new(PageGeometry::letter(), metadata());
        broken.add(text("snowman ☃"));
        let err = broken.build(&StandardFonts).unwrap_err();
        assert!(matches!(err, Error::Measurement { .. }));
    }
}
