use crate::composer::{Decorations, PageGeometry};
use crate::fonts::{FontId, FontSet};
use crate::style::Margins;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug, Default)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Letter => write!(f, "US Letter"),
            PageSize::A4 => write!(f, "A4"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug, Default)]
pub enum PageNumberStyle {
    #[default]
    Arabic,
    RomanLower,
    RomanUpper,
}

/// Who issued the report, shown in the document control chapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issuer {
    pub name: String,
    pub address: String,
    pub email: String,
    pub web: String,
    pub author: String,
}

impl Default for Issuer {
    fn default() -> Self {
        Issuer {
            name: "Folio".to_string(),
            address: "Klapparstig 16, 101 Reykjavik, Iceland".to_string(),
            email: "reports@folio.example".to_string(),
            web: "folio.example".to_string(),
            author: "Folio report generator".to_string(),
        }
    }
}

/// Report output configuration.
///
/// Every field has a default so a partial `folio.toml` is enough; margins are
/// in points and leave a deeper top band for the header logo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title, shown on the front page and available to templates as `{title}`
    #[serde(default = "default_title")]
    pub title: String,
    /// Output PDF file path
    #[serde(default = "default_outfile")]
    pub outfile: PathBuf,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default = "default_margin_top")]
    pub margin_top_pt: f32,
    #[serde(default = "default_margin_side")]
    pub margin_right_pt: f32,
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom_pt: f32,
    #[serde(default = "default_margin_side")]
    pub margin_left_pt: f32,
    #[serde(default = "default_font_size_brand")]
    pub font_size_brand_pt: f32,
    #[serde(default = "default_font_size_title")]
    pub font_size_title_pt: f32,
    #[serde(default = "default_font_size_heading")]
    pub font_size_heading_pt: f32,
    #[serde(default = "default_font_size_toc")]
    pub font_size_toc_pt: f32,
    #[serde(default = "default_font_size_body")]
    pub font_size_body_pt: f32,
    #[serde(default = "default_font_size_small")]
    pub font_size_small_pt: f32,
    /// TrueType file replacing Helvetica (if None, the viewer's Helvetica is used)
    #[serde(default)]
    pub font_regular: Option<PathBuf>,
    /// TrueType file replacing Helvetica-Bold
    #[serde(default)]
    pub font_bold: Option<PathBuf>,
    /// Header text; empty for none. Placeholders: `{title}`, `{n}`, `{total}`
    #[serde(default)]
    pub header_template: String,
    /// Footer text drawn on the left of the footer band
    #[serde(default = "default_footer_left_template")]
    pub footer_left_template: String,
    /// Footer text drawn mid-page
    #[serde(default = "default_footer_template")]
    pub footer_template: String,
    #[serde(default)]
    pub page_number_style: PageNumberStyle,
    #[serde(default)]
    pub decorate_front_page: bool,
    #[serde(default = "default_true")]
    pub decorate_toc_pages: bool,
    #[serde(default = "default_true")]
    pub decorate_content_pages: bool,
    /// PNG drawn in every header and in the images section (if None, a
    /// generated swatch is shown in the images section instead)
    #[serde(default)]
    pub logo: Option<PathBuf>,
    /// Release date listed in the document history
    #[serde(default = "default_release_date")]
    pub release_date: NaiveDate,
    #[serde(default)]
    pub issuer: Issuer,
}

fn default_title() -> String {
    "Example Report".to_string()
}
fn default_outfile() -> PathBuf {
    PathBuf::from("folio-report.pdf")
}
fn default_margin_top() -> f32 {
    100.0
}
fn default_margin_side() -> f32 {
    50.0
}
fn default_margin_bottom() -> f32 {
    70.0
}
fn default_font_size_brand() -> f32 {
    48.0
}
fn default_font_size_title() -> f32 {
    30.0
}
fn default_font_size_heading() -> f32 {
    18.0
}
fn default_font_size_toc() -> f32 {
    14.0
}
fn default_font_size_body() -> f32 {
    10.0
}
fn default_font_size_small() -> f32 {
    8.0
}
fn default_footer_left_template() -> String {
    "{title}".to_string()
}
fn default_footer_template() -> String {
    "Page {n} of {total}".to_string()
}
fn default_true() -> bool {
    true
}
fn default_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: default_title(),
            outfile: default_outfile(),
            page_size: PageSize::default(),
            margin_top_pt: default_margin_top(),
            margin_right_pt: default_margin_side(),
            margin_bottom_pt: default_margin_bottom(),
            margin_left_pt: default_margin_side(),
            font_size_brand_pt: default_font_size_brand(),
            font_size_title_pt: default_font_size_title(),
            font_size_heading_pt: default_font_size_heading(),
            font_size_toc_pt: default_font_size_toc(),
            font_size_body_pt: default_font_size_body(),
            font_size_small_pt: default_font_size_small(),
            font_regular: None,
            font_bold: None,
            header_template: String::new(),
            footer_left_template: default_footer_left_template(),
            footer_template: default_footer_template(),
            page_number_style: PageNumberStyle::default(),
            decorate_front_page: false,
            decorate_toc_pages: true,
            decorate_content_pages: true,
            logo: None,
            release_date: default_release_date(),
            issuer: Issuer::default(),
        }
    }
}

impl ReportConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ReportConfig> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn geometry(&self) -> PageGeometry {
        let page = match self.page_size {
            PageSize::Letter => PageGeometry::letter(),
            PageSize::A4 => PageGeometry::a4(),
        };
        page.with_margins(Margins::trbl(
            self.margin_top_pt,
            self.margin_right_pt,
            self.margin_bottom_pt,
            self.margin_left_pt,
        ))
    }

    /// The fonts to measure and embed with. Fails if a configured font file
    /// is missing or cannot be parsed.
    pub fn fonts(&self) -> crate::error::Result<FontSet> {
        let files = [
            (FontId::Helvetica, self.font_regular.as_deref()),
            (FontId::HelveticaBold, self.font_bold.as_deref()),
        ];
        FontSet::load(files.into_iter().filter_map(|(font, path)| Some((font, path?))))
    }

    pub fn decorations(&self) -> Decorations {
        Decorations {
            front_page: self.decorate_front_page,
            toc_pages: self.decorate_toc_pages,
            content_pages: self.decorate_content_pages,
        }
    }
}

/// Statistics from rendering a report, used for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of pages in the final PDF
    pub page_count: usize,
    pub front_pages: usize,
    pub toc_pages: usize,
    /// Size of the written file in bytes
    pub bytes: usize,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fonts::FontMetrics;

    #[test]
    fn can_serialize_config() {
        let config = ReportConfig::default();
        toml::to_string(&config).expect("can serialize config to TOML");
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let config: ReportConfig = toml::from_str(
            r#"
            title = "Audit"
            page_size = "A4"
            page_number_style = "RomanUpper"
            release_date = "2023-06-30"
            "#,
        )
        .expect("can parse partial config");
        assert_eq!(config.title, "Audit");
        assert_eq!(config.page_size, PageSize::A4);
        assert_eq!(config.page_number_style, PageNumberStyle::RomanUpper);
        assert_eq!(config.release_date, NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
        assert_eq!(config.outfile, PathBuf::from("folio-report.pdf"));
        assert_eq!(config.issuer, Issuer::default());
        assert!(config.decorate_toc_pages);
        assert!(!config.decorate_front_page);
    }

    #[test]
    fn geometry_uses_configured_margins() {
        let config = ReportConfig {
            margin_left_pt: 20.0,
            ..ReportConfig::default()
        };
        let geometry = config.geometry();
        assert_eq!(geometry.width, 612.0);
        assert_eq!(geometry.content_area().x, 20.0);
        assert_eq!(geometry.content_area().y, 100.0);
        assert_eq!(geometry.footer_band().height, 70.0);
    }

    #[test]
    fn load_reports_the_failing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = ReportConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.toml"));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "title = [").unwrap();
        let err = ReportConfig::load(&bad).unwrap_err();
        assert!(format!("{err}").contains("bad.toml"));
    }

    #[test]
    fn missing_font_file_fails_to_load() {
        let config = ReportConfig {
            font_bold: Some(PathBuf::from("/nonexistent/Roboto-Bold.ttf")),
            ..ReportConfig::default()
        };
        let err = config.fonts().unwrap_err();
        assert!(matches!(err, crate::error::Error::ResourceLoad { .. }));
        assert!(err.to_string().contains("Roboto-Bold.ttf"));
    }

    #[test]
    fn no_font_files_means_standard_fonts() {
        let fonts = ReportConfig::default().fonts().unwrap();
        assert!(fonts.embedded(FontId::Helvetica).is_none());
        assert!(fonts.embedded(FontId::HelveticaBold).is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ReportConfig {
            logo: Some(PathBuf::from("logo.png")),
            ..ReportConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: ReportConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.logo, config.logo);
        assert_eq!(back.release_date, config.release_date);
    }
}
