use super::config::ReportConfig;
use super::{body_style, heading_style};
use crate::blocks::{Block, Cell, ImageBlock, Paragraph, Table};
use crate::composer::{Chapter, Document, Subchapter};
use crate::error::Result;
use crate::fonts::FontId;
use crate::raster::chart::{slice_colour, ChartValue, PieChart};
use crate::raster::{qr, RasterImage};
use crate::style::{colours, Colour, Margins, TextAlignment, TextStyle, VerticalAlignment};
use image::{Rgb, RgbImage};
use std::sync::Arc;

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
    incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation \
    ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor in reprehenderit \
    in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat \
    cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.";

const PRIORITIES: [(&str, &str); 3] = [("High", "52/80"), ("Medium", "32/100"), ("Low", "10/90")];

fn text(config: &ReportConfig, text: &str) -> Block {
    Block::from(Paragraph::new(text, body_style(config))).with_margins(Margins::trbl(5.0, 0.0, 0.0, 0.0))
}

fn section(document: &mut Document, chapter: &Chapter, config: &ReportConfig, title: &str) -> Subchapter {
    document
        .new_subchapter(chapter, title)
        .with_heading_style(heading_style(config))
        .with_margins(Margins::trbl(20.0, 0.0, 4.0, 0.0))
}

fn paragraphs(document: &mut Document, chapter: &Chapter, config: &ReportConfig) -> Subchapter {
    let mut sub = section(document, chapter, config, "Paragraphs").with(text(
        config,
        "Paragraphs are used to represent text, as little as a single character, a word or \
         multiple words forming multiple sentences. Folio wraps them across lines and pages \
         automatically. They can also be left, centre, right aligned or justified as \
         illustrated below:",
    ));
    let alignments = [
        TextAlignment::Left,
        TextAlignment::Centre,
        TextAlignment::Right,
        TextAlignment::Justify,
    ];
    for alignment in alignments {
        let paragraph = Paragraph::new(LOREM, body_style(config)).with_alignment(alignment);
        sub.add(Block::from(paragraph).with_margins(Margins::trbl(10.0, 0.0, 10.0, 20.0)));
    }
    sub
}

fn priority_table(config: &ReportConfig) -> Result<Table> {
    let style = TextStyle::new(FontId::HelveticaBold, config.font_size_body_pt).with_colour(colours::WHITE);
    let background = Colour::new_rgb_bytes(56, 68, 67);
    let cell = |text: &str| {
        Cell::new(Paragraph::new(text, style))
            .with_background(background)
            .with_border(1.0)
    };

    let mut table = Table::new(2)?;
    table.add_cell(cell("Priority"));
    table.add_cell(cell("Items fulfilled / available"));
    for (priority, items) in PRIORITIES {
        table.add_cell(cell(priority));
        table.add_cell(cell(items));
    }
    Ok(table)
}

/// Horizontal bands in the chart palette, shown when no logo is configured.
fn swatch() -> RasterImage {
    let bands = 6;
    RasterImage::from_rgb(RgbImage::from_fn(240, 50, |x, _| {
        let index = (x * bands / 240) as usize;
        Rgb(slice_colour(index).to_rgb_bytes())
    }))
}

fn images(
    document: &mut Document,
    chapter: &Chapter,
    config: &ReportConfig,
    logo: Option<&Arc<RasterImage>>,
) -> Subchapter {
    let sub = section(document, chapter, config, "Images");
    match logo {
        Some(logo) => sub
            .with(text(
                config,
                "Images can be loaded from PNG files, for example the configured logo:",
            ))
            .with(ImageBlock::new(logo.clone()).scale_to_height(50.0)),
        None => sub
            .with(text(
                config,
                "Images can be loaded from PNG files or built from raw pixels, for example \
                 this generated swatch:",
            ))
            .with(ImageBlock::new(Arc::new(swatch())).scale_to_height(50.0)),
    }
}

fn chart_values() -> Vec<ChartValue> {
    vec![
        ChartValue::new(70.0, "Compliant"),
        ChartValue::new(30.0, "Non-Compliant"),
    ]
}

/// One row per slice: a colour swatch and the label with its share.
fn legend(config: &ReportConfig, chart: &PieChart) -> Result<Table> {
    let mut table = Table::with_column_widths(2, &[0.15, 0.85])?;
    for (i, (value, fraction)) in chart.values.iter().zip(chart.fractions()?).enumerate() {
        let swatch = Cell::new(Paragraph::new("", body_style(config))).with_background(slice_colour(i));
        let label = format!("{} ({:.0}%)", value.label, fraction * 100.0);
        table.add_cell(swatch);
        table.add_cell(Cell::new(Paragraph::new(label, body_style(config))));
    }
    Ok(table)
}

fn charts(document: &mut Document, chapter: &Chapter, config: &ReportConfig) -> Result<Subchapter> {
    let chart = PieChart {
        width: 200,
        height: 200,
        values: chart_values(),
    };
    let image = ImageBlock::new(Arc::new(chart.render()?));

    let layout = Table::with_column_widths(2, &[0.5, 0.5])?
        .with_cell(Cell::new(image))
        .with_cell(Cell::new(legend(config, &chart)?).with_vertical_alignment(VerticalAlignment::Middle));

    Ok(section(document, chapter, config, "Graphing / Charts")
        .with(text(
            config,
            "Charts are rasterized from a declarative description, as illustrated in the \
             following plot:",
        ))
        .with(Block::from(layout).with_margins(Margins::trbl(10.0, 0.0, 0.0, 0.0))))
}

/// Append the feature overview chapter, starting on a new page.
pub fn add(document: &mut Document, config: &ReportConfig, logo: Option<&Arc<RasterImage>>) -> Result<()> {
    let mut chapter = document
        .new_chapter("Feature overview")
        .on_new_page(true)
        .with_heading_style(heading_style(config))
        .with(text(
            config,
            "This chapter demonstrates a few of the features of Folio that can be used for \
             report generation.",
        ));

    let sub = paragraphs(document, &chapter, config);
    chapter.add_subchapter(sub);

    let sub = section(document, &chapter, config, "Tables")
        .with(Block::from(priority_table(config)?).with_margins(Margins::trbl(10.0, 40.0, 0.0, 40.0)));
    chapter.add_subchapter(sub);

    let sub = images(document, &chapter, config, logo);
    chapter.add_subchapter(sub);

    let sub = section(document, &chapter, config, "QR Codes / Barcodes")
        .with(text(config, "Example of a QR code rendered at five pixels per point:"))
        .with(Block::from(qr::qr_code_image("HELLO", 40.0, 5)?).with_margins(Margins::trbl(5.0, 0.0, 0.0, 0.0)));
    chapter.add_subchapter(sub);

    let sub = charts(document, &chapter, config)?;
    chapter.add_subchapter(sub);

    let sub = section(document, &chapter, config, "Headers and footers").with(text(
        config,
        "Headers and footers are built once the layout is final, so every page knows its \
         own number and the total page count. Which kinds of page receive them can be chosen \
         separately for the front page, the table of contents and the content pages.",
    ));
    chapter.add_subchapter(sub);

    let sub = section(document, &chapter, config, "Table of contents generation").with(text(
        config,
        "The table of contents is generated from the chapter and subchapter headings after \
         the main content has been laid out, and page numbers account for the pages the \
         table itself takes up.",
    ));
    chapter.add_subchapter(sub);

    document.add(chapter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::canvas::Canvas;
    use crate::fonts::StandardFonts;

    #[test]
    fn priority_table_has_a_header_row() {
        let table = priority_table(&ReportConfig::default()).unwrap();
        assert_eq!(table.rows().count(), 4);
        let mut canvas = Canvas::new();
        Block::from(table)
            .draw(&mut canvas, 0.0, 0.0, 432.0, &StandardFonts)
            .unwrap();
        let texts: Vec<&str> = canvas.texts().collect();
        assert_eq!(texts[..2], ["Priority", "Items fulfilled / available"]);
        assert_eq!(texts[6..], ["Low", "10/90"]);
    }

    #[test]
    fn legend_shows_each_share() {
        let chart = PieChart {
            width: 20,
            height: 20,
            values: chart_values(),
        };
        let table = legend(&ReportConfig::default(), &chart).unwrap();
        let labels: Vec<String> = table
            .cells()
            .iter()
            .skip(1)
            .step_by(2)
            .filter_map(|cell| match cell.content().kind() {
                BlockKind::Paragraph(p) => Some(p.text().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Compliant (70%)", "Non-Compliant (30%)"]);
    }

    #[test]
    fn swatch_cycles_through_the_palette() {
        let swatch = swatch();
        assert_eq!((swatch.width(), swatch.height()), (240, 50));
        assert_eq!(&swatch.pixels()[..3], &slice_colour(0).to_rgb_bytes());
    }
}
