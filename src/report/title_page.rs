use super::config::ReportConfig;
use crate::blocks::{Block, Paragraph};
use crate::composer::BuildMetadata;
use crate::fonts::FontId;
use crate::style::{Colour, Margins, TextStyle};

/// The front page: issuer name, report title and generation time, stacked
/// down the left of the page.
pub fn build(config: &ReportConfig, metadata: &BuildMetadata) -> Block {
    let slate = Colour::new_rgb_bytes(56, 68, 77);
    let blue = Colour::new_rgb_bytes(45, 148, 215);

    let brand = Paragraph::new(
        config.issuer.name.as_str(),
        TextStyle::new(FontId::Helvetica, config.font_size_brand_pt).with_colour(slate),
    );
    let title = Paragraph::new(
        config.title.as_str(),
        TextStyle::new(FontId::HelveticaBold, config.font_size_title_pt).with_colour(blue),
    );
    let generated = Paragraph::new(
        metadata.generated.format("%-d %b, %Y %H:%M").to_string(),
        TextStyle::new(FontId::HelveticaBold, 12.0).with_colour(slate),
    );

    Block::group(vec![
        Block::from(brand).with_margins(Margins::trbl(150.0, 0.0, 0.0, 85.0)),
        Block::from(title).with_margins(Margins::trbl(0.0, 0.0, 0.0, 85.0)),
        Block::from(generated).with_margins(Margins::trbl(5.0, 0.0, 0.0, 90.0)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::composer::BuildMetadataBuilder;
    use crate::fonts::StandardFonts;
    use chrono::{Local, NaiveDate, TimeZone};

    #[test]
    fn shows_issuer_title_and_generation_time() {
        let metadata = BuildMetadataBuilder::default()
            .release_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .generated(Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap())
            .build()
            .unwrap();
        let block = build(&ReportConfig::default(), &metadata);

        let mut canvas = Canvas::new();
        block.draw(&mut canvas, 0.0, 0.0, 512.0, &StandardFonts).unwrap();
        let texts: Vec<&str> = canvas.texts().collect();
        assert_eq!(texts, vec!["Folio", "Example Report", "5 Mar, 2024 14:07"]);

        // three lines at 1.2 spacing below their top margins
        let height = block.outer_height(512.0, &StandardFonts).unwrap();
        let expected = 150.0 + 48.0 * 1.2 + 30.0 * 1.2 + 5.0 + 12.0 * 1.2;
        assert!((height - expected).abs() < 1e-3);
    }
}
