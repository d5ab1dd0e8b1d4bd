use super::config::ReportConfig;
use super::{heading_style, text_colour};
use crate::blocks::{Block, Cell, Paragraph, Table};
use crate::composer::Document;
use crate::error::Result;
use crate::fonts::FontId;
use crate::style::{colours, Colour, HorizontalAlignment, Margins, TextStyle, VerticalAlignment};

fn header_background() -> Colour {
    Colour::new_rgb_bytes(56, 68, 67)
}

/// White bold text on the dark header background.
fn label_cell(config: &ReportConfig, text: &str) -> Cell {
    let style = TextStyle::new(FontId::HelveticaBold, config.font_size_body_pt).with_colour(colours::WHITE);
    Cell::new(Paragraph::new(text, style))
        .with_background(header_background())
        .with_border(1.0)
}

fn value_cell(config: &ReportConfig, text: &str) -> Cell {
    let style = TextStyle::new(FontId::Helvetica, config.font_size_body_pt).with_colour(text_colour());
    Cell::new(Paragraph::new(text, style)).with_border(1.0)
}

fn issuer_table(config: &ReportConfig) -> Result<Table> {
    let issuer = &config.issuer;
    let rows = [
        ("Issuer", issuer.name.as_str()),
        ("Address", issuer.address.as_str()),
        ("Email", issuer.email.as_str()),
        ("Web", issuer.web.as_str()),
        ("Author", issuer.author.as_str()),
    ];

    let mut table = Table::new(2)?;
    for (label, value) in rows {
        table.add_cell(label_cell(config, label));
        table.add_cell(value_cell(config, value));
    }
    Ok(table)
}

fn centred(cell: Cell) -> Cell {
    cell.with_horizontal_alignment(HorizontalAlignment::Centre)
        .with_vertical_alignment(VerticalAlignment::Middle)
}

fn history_table(config: &ReportConfig, producer: &str, version: &str) -> Result<Table> {
    let mut table = Table::new(3)?;
    let version_heading = format!("{producer} Version");
    for heading in ["Date Issued", version_heading.as_str(), "Type/Change"] {
        table.add_cell(centred(label_cell(config, heading)));
    }

    let released = config.release_date.format("%-d %b, %Y").to_string();
    for value in [released.as_str(), version, "First issue"] {
        table.add_cell(centred(value_cell(config, value)));
    }
    Ok(table)
}

/// Append the document control chapter: who issued the report and its
/// release history.
pub fn add(document: &mut Document, config: &ReportConfig) -> Result<()> {
    let producer = document.metadata().producer.clone();
    let version = document.metadata().version.clone();

    let mut chapter = document
        .new_chapter("Document control")
        .with_heading_style(heading_style(config))
        .with_margins(Margins::trbl(40.0, 0.0, 10.0, 0.0));

    let issuer = document
        .new_subchapter(&chapter, "Issuer details")
        .with_heading_style(heading_style(config))
        .with(Block::from(issuer_table(config)?).with_margins(Margins::trbl(30.0, 0.0, 0.0, 0.0)));
    chapter.add_subchapter(issuer);

    let history = document
        .new_subchapter(&chapter, "Document History")
        .with_heading_style(heading_style(config))
        .with_margins(Margins::trbl(5.0, 0.0, 4.0, 0.0))
        .with(
            Block::from(history_table(config, &producer, &version)?)
                .with_margins(Margins::trbl(30.0, 0.0, 50.0, 0.0)),
        );
    chapter.add_subchapter(history);

    document.add(chapter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::canvas::Canvas;
    use crate::fonts::StandardFonts;
    use chrono::NaiveDate;

    fn texts(table: Table) -> Vec<String> {
        let mut canvas = Canvas::new();
        Block::from(table)
            .draw(&mut canvas, 0.0, 0.0, 512.0, &StandardFonts)
            .unwrap();
        canvas.texts().map(str::to_string).collect()
    }

    #[test]
    fn issuer_table_pairs_labels_with_values() {
        let table = issuer_table(&ReportConfig::default()).unwrap();
        assert_eq!(table.rows().count(), 5);
        let texts = texts(table);
        assert_eq!(texts[0], "Issuer");
        assert_eq!(texts[1], "Folio");
        assert_eq!(texts[8], "Author");
    }

    #[test]
    fn history_lists_the_release() {
        let config = ReportConfig {
            release_date: NaiveDate::from_ymd_opt(2023, 11, 9).unwrap(),
            ..ReportConfig::default()
        };
        let table = history_table(&config, "folio", "1.2.3").unwrap();
        let BlockKind::Paragraph(date) = table.cells()[3].content().kind() else {
            panic!("expected a paragraph");
        };
        assert_eq!(date.text(), "9 Nov, 2023");
        let texts = texts(table);
        assert_eq!(
            texts,
            vec![
                "Date Issued",
                "folio Version",
                "Type/Change",
                "9 Nov, 2023",
                "1.2.3",
                "First issue"
            ]
        );
    }
}
