//! Header and footer bands with customisable templates.
//!
//! Templates support placeholders:
//! - `{title}` - report title
//! - `{n}` - page number (formatted per page_number_style)
//! - `{total}` - total page count
//!
//! Numbers count every page of the final document, front page included.

use super::config::{PageNumberStyle, ReportConfig};
use crate::blocks::{Block, ImageBlock, Paragraph};
use crate::composer::PageContext;
use crate::fonts::FontId;
use crate::raster::RasterImage;
use crate::style::{Colour, Margins, TextAlignment, TextStyle};
use std::sync::Arc;

/// Distance from the top of a band to its text or logo.
const BAND_INSET: f32 = 20.0;
const LOGO_HEIGHT: f32 = 25.0;

fn band_colour() -> Colour {
    Colour::new_rgb_bytes(63, 68, 76)
}

/// Convert a number to Roman numerals.
fn to_roman(mut n: i32) -> String {
    if n <= 0 {
        // handle zero/negative by returning arabic
        return n.to_string();
    }

    let numerals = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut result = String::new();
    for (value, numeral) in numerals {
        while n >= value {
            result.push_str(numeral);
            n -= value;
        }
    }
    result
}

/// Format a page number according to the specified style.
pub fn format_page_number(n: i32, style: PageNumberStyle) -> String {
    match style {
        PageNumberStyle::Arabic => n.to_string(),
        PageNumberStyle::RomanLower => to_roman(n),
        PageNumberStyle::RomanUpper => to_roman(n).to_uppercase(),
    }
}

/// Expand a template string with the placeholder values for `page`.
pub fn expand_template(
    template: &str,
    title: &str,
    page: &PageContext,
    style: PageNumberStyle,
) -> String {
    let page_str = format_page_number(page.page as i32, style);
    let total_str = format_page_number(page.total as i32, style);

    template
        .replace("{title}", title)
        .replace("{n}", &page_str)
        .replace("{total}", &total_str)
}

fn band_text(config: &ReportConfig, text: String) -> Paragraph {
    Paragraph::new(
        text,
        TextStyle::new(FontId::Helvetica, config.font_size_small_pt).with_colour(band_colour()),
    )
}

/// The logo at the left margin and the header template against the right
/// margin, or `None` when neither is configured.
pub fn header(
    config: &ReportConfig,
    logo: Option<&Arc<RasterImage>>,
    page: &PageContext,
) -> Option<Block> {
    let mut items: Vec<Block> = Vec::new();
    if let Some(logo) = logo {
        let image = ImageBlock::new(logo.clone()).scale_to_height(LOGO_HEIGHT);
        items.push(Block::from(image).at(config.margin_left_pt + 8.0, BAND_INSET));
    }

    let text = expand_template(&config.header_template, &config.title, page, config.page_number_style);
    if !text.trim().is_empty() {
        let paragraph = band_text(config, text).with_alignment(TextAlignment::Right);
        items.push(
            Block::from(paragraph)
                .with_margins(Margins::trbl(0.0, config.margin_right_pt, 0.0, 0.0))
                .at(0.0, BAND_INSET + LOGO_HEIGHT / 2.0),
        );
    }

    if items.is_empty() {
        None
    } else {
        Some(Block::group(items).at(0.0, 0.0))
    }
}

/// The left footer template at the left margin and the page template centred
/// on the page.
pub fn footer(config: &ReportConfig, page: &PageContext) -> Option<Block> {
    let style = config.page_number_style;
    let left = expand_template(&config.footer_left_template, &config.title, page, style);
    let centre = expand_template(&config.footer_template, &config.title, page, style);

    let mut items: Vec<Block> = Vec::new();
    if !left.trim().is_empty() {
        items.push(Block::from(band_text(config, left)).at(config.margin_left_pt, BAND_INSET));
    }
    if !centre.trim().is_empty() {
        let paragraph = band_text(config, centre).with_alignment(TextAlignment::Centre);
        items.push(Block::from(paragraph).at(0.0, BAND_INSET));
    }

    if items.is_empty() {
        None
    } else {
        Some(Block::group(items).at(0.0, 0.0))
    }
}
