use super::config::ReportConfig;
use super::text_colour;
use crate::blocks::{Block, Cell, Paragraph, Table};
use crate::composer::TocEntry;
use crate::error::Result;
use crate::fonts::FontId;
use crate::style::{HorizontalAlignment, Margins, TextStyle};

/// Indent applied to subchapter entries.
const SUBCHAPTER_INDENT: f32 = 32.0;
const HEADING_SIZE: f32 = 28.0;

/// The contents page: a heading followed by one two-column row per entry,
/// title in the wide column and page number in the narrow one.
///
/// Every row is its own table so a long list breaks between entries.
pub fn build(config: &ReportConfig, entries: &[TocEntry]) -> Result<Vec<Block>> {
    let heading = Paragraph::new(
        "Table of contents",
        TextStyle::new(FontId::Helvetica, HEADING_SIZE).with_colour(text_colour()),
    );
    let mut blocks = vec![Block::from(heading).with_margins(Margins::trbl(0.0, 0.0, 30.0, 0.0))];

    let style = TextStyle::new(FontId::Helvetica, config.font_size_toc_pt);
    for entry in entries {
        let indent = if entry.is_subchapter() { SUBCHAPTER_INDENT } else { 0.0 };
        let title = Block::from(Paragraph::new(entry.label(), style))
            .with_margins(Margins::trbl(0.0, 0.0, 0.0, indent));
        let page = Paragraph::new(entry.page.to_string(), style);

        let row = Table::with_column_widths(2, &[0.9, 0.1])?
            .with_cell(Cell::new(title))
            .with_cell(Cell::new(page).with_horizontal_alignment(HorizontalAlignment::Right));
        blocks.push(row.into());
    }
    log::debug!("table of contents lists {} entries", entries.len());
    Ok(blocks)
}
