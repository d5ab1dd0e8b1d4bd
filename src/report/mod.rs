//! The example report: document control and feature overview chapters, a
//! front page, a generated table of contents and page headers and footers.

pub mod config;
mod document_control;
mod feature_overview;
pub mod header_footer;
mod table_of_contents;
mod title_page;

pub use config::{Issuer, PageNumberStyle, PageSize, RenderStats, ReportConfig};

use crate::blocks::Block;
use crate::composer::{
    BuildMetadata, BuildMetadataBuilder, DeferredContentProvider, Document, PageContext, TocEntry,
};
use crate::error::Result;
use crate::fonts::FontId;
use crate::raster::RasterImage;
use crate::style::{Colour, TextStyle};
use anyhow::Context;
use indicatif::ProgressBar;
use std::sync::Arc;

/// Slate grey used for headings and body text alike.
pub(crate) fn text_colour() -> Colour {
    Colour::new_rgb_bytes(72, 86, 95)
}

pub(crate) fn heading_style(config: &ReportConfig) -> TextStyle {
    TextStyle::new(FontId::Helvetica, config.font_size_heading_pt).with_colour(text_colour())
}

pub(crate) fn body_style(config: &ReportConfig) -> TextStyle {
    TextStyle::new(FontId::Helvetica, config.font_size_body_pt).with_colour(text_colour())
}

/// Everything the report draws after layout.
pub struct ReportDecorations {
    config: ReportConfig,
    metadata: BuildMetadata,
    logo: Option<Arc<RasterImage>>,
}

impl DeferredContentProvider for ReportDecorations {
    fn front(&self) -> Result<Option<Block>> {
        Ok(Some(title_page::build(&self.config, &self.metadata)))
    }

    fn header(&self, page: &PageContext) -> Result<Option<Block>> {
        Ok(header_footer::header(&self.config, self.logo.as_ref(), page))
    }

    fn footer(&self, page: &PageContext) -> Result<Option<Block>> {
        Ok(header_footer::footer(&self.config, page))
    }

    fn toc(&self, ledger: &[TocEntry]) -> Result<Option<Vec<Block>>> {
        table_of_contents::build(&self.config, ledger).map(Some)
    }
}

/// Assemble the report without laying it out.
pub fn build(config: &ReportConfig, metadata: BuildMetadata) -> Result<Document> {
    let logo = match &config.logo {
        Some(path) => Some(Arc::new(RasterImage::open(path)?)),
        None => None,
    };

    let mut document = Document::new(config.geometry(), metadata.clone());
    document_control::add(&mut document, config)?;
    feature_overview::add(&mut document, config, logo.as_ref())?;

    document.set_deferred(ReportDecorations {
        config: config.clone(),
        metadata,
        logo,
    });
    document.set_decorations(config.decorations());
    Ok(document)
}

/// Build, lay out and write the report to `config.outfile`.
pub fn render(config: &ReportConfig, progress: &ProgressBar) -> anyhow::Result<RenderStats> {
    let metadata = BuildMetadataBuilder::default()
        .title(config.title.clone())
        .author(config.issuer.author.clone())
        .release_date(config.release_date)
        .build()
        .with_context(|| "Failed to collect build metadata")?;

    let fonts = config.fonts().with_context(|| "Failed to load fonts")?;

    progress.set_message("Assembling report...");
    let document = build(config, metadata).with_context(|| "Failed to assemble report")?;

    progress.set_message("Laying out pages...");
    let document = document
        .build(&fonts)
        .with_context(|| "Failed to lay out report")?;

    progress.set_message("Writing PDF...");
    let bytes = document
        .save(&config.outfile, &fonts)
        .with_context(|| format!("Failed to write {}", config.outfile.display()))?;

    Ok(RenderStats {
        page_count: document.page_count(),
        front_pages: document.front_pages,
        toc_pages: document.toc_pages,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fonts::StandardFonts;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn metadata() -> BuildMetadata {
        BuildMetadataBuilder::default()
            .release_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn report_has_front_contents_and_two_chapters() {
        let config = ReportConfig::default();
        let built = build(&config, metadata())
            .unwrap()
            .build(&StandardFonts)
            .unwrap();

        assert_eq!(built.front_pages, 1);
        assert_eq!(built.toc_pages, 1);

        let chapters: Vec<(String, usize)> = built
            .ledger
            .iter()
            .filter(|e| !e.is_subchapter())
            .map(|e| (e.label(), e.page))
            .collect();
        assert_eq!(
            chapters,
            vec![
                ("1. Document control".to_string(), 3),
                ("2. Feature overview".to_string(), 4)
            ]
        );
        assert_eq!(built.ledger.len(), 11);

        let contents = built.pages[1].paint(&StandardFonts).unwrap();
        let texts: Vec<&str> = contents.texts().collect();
        assert!(texts.contains(&"Table of contents"));
        assert!(texts.contains(&"2.3. Images"));

        // the front page is left undecorated by default
        assert!(built.pages[0].footer.is_none());
        let total = built.page_count();
        for page in &built.pages[1..] {
            let canvas = page.paint(&StandardFonts).unwrap();
            let expected = format!("Page {} of {total}", page.index);
            assert_eq!(canvas.texts().last(), Some(expected.as_str()));
        }
    }

    #[test]
    fn missing_logo_is_a_resource_error() {
        let config = ReportConfig {
            logo: Some(PathBuf::from("/nonexistent/logo.png")),
            ..ReportConfig::default()
        };
        let err = build(&config, metadata()).err().unwrap();
        assert!(matches!(err, Error::ResourceLoad { .. }));
    }

    #[test]
    fn render_writes_the_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig {
            outfile: dir.path().join("report.pdf"),
            ..ReportConfig::default()
        };
        let stats = render(&config, &ProgressBar::hidden()).unwrap();
        let bytes = std::fs::read(&config.outfile).unwrap();
        assert_eq!(bytes.len(), stats.bytes);
        assert!(stats.page_count >= 4);
        assert_eq!(stats.front_pages, 1);
    }

    #[test]
    fn render_fails_on_a_missing_font_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig {
            outfile: dir.path().join("report.pdf"),
            font_regular: Some(dir.path().join("Roboto-Regular.ttf")),
            ..ReportConfig::default()
        };
        let err = render(&config, &ProgressBar::hidden()).unwrap_err();
        assert!(format!("{err:#}").contains("Roboto-Regular.ttf"));
        assert!(!config.outfile.exists());
    }
}
