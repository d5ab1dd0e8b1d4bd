//! Declarative charts rendered to a raster.
//!
//! Only pie charts are supported. Slices run clockwise from twelve o'clock in
//! the order the values were given, each filled from a fixed palette so a
//! legend drawn elsewhere can use [`slice_colour`] to match.

use crate::error::{Error, Result};
use crate::raster::RasterImage;
use crate::style::{colours, Colour};
use image::{Rgb, RgbImage};
use std::f64::consts::TAU;

const PALETTE: [(u8, u8, u8); 6] = [
    (0, 116, 217),
    (0, 217, 101),
    (217, 101, 0),
    (217, 0, 116),
    (101, 0, 217),
    (116, 217, 0),
];

/// Fill colour of the slice at `index`.
pub fn slice_colour(index: usize) -> Colour {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    Colour::new_rgb_bytes(r, g, b)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartValue {
    pub value: f64,
    pub label: String,
}

impl ChartValue {
    pub fn new<S: Into<String>>(value: f64, label: S) -> ChartValue {
        ChartValue {
            value,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pub values: Vec<ChartValue>,
}

impl PieChart {
    pub fn render(&self) -> Result<RasterImage> {
        let fractions = self.fractions()?;

        let (w, h) = (self.width as f64, self.height as f64);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let radius = (w.min(h) / 2.0 - 1.0).max(0.0);
        let background = colours::WHITE.to_rgb_bytes();

        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy > radius * radius {
                return Rgb(background);
            }

            // angle measured clockwise from straight up
            let angle = dx.atan2(-dy).rem_euclid(TAU) / TAU;
            let mut cumulative = 0.0;
            for (i, fraction) in fractions.iter().enumerate() {
                cumulative += fraction;
                if angle < cumulative {
                    return Rgb(slice_colour(i).to_rgb_bytes());
                }
            }
            Rgb(slice_colour(fractions.len() - 1).to_rgb_bytes())
        });

        Ok(RasterImage::from_rgb(image))
    }

    /// Share of the whole each value represents.
    pub fn fractions(&self) -> Result<Vec<f64>> {
        let what = "pie chart";
        if self.width == 0 || self.height == 0 {
            return Err(Error::measurement(
                what,
                format!("invalid size {}x{}", self.width, self.height),
            ));
        }
        if self.values.is_empty() {
            return Err(Error::measurement(what, "no values to plot"));
        }
        if let Some(bad) = self
            .values
            .iter()
            .find(|v| !v.value.is_finite() || v.value < 0.0)
        {
            return Err(Error::measurement(
                what,
                format!("value {} for `{}` is not a non-negative number", bad.value, bad.label),
            ));
        }

        let total: f64 = self.values.iter().map(|v| v.value).sum();
        if total <= 0.0 {
            return Err(Error::measurement(what, "values sum to zero"));
        }
        Ok(self.values.iter().map(|v| v.value / total).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compliance() -> PieChart {
        PieChart {
            width: 200,
            height: 200,
            values: vec![
                ChartValue::new(70.0, "Compliant"),
                ChartValue::new(30.0, "Non-Compliant"),
            ],
        }
    }

    #[test]
    fn renders_at_the_requested_size() {
        let raster = compliance().render().unwrap();
        assert_eq!((raster.width(), raster.height()), (200, 200));
    }

    #[test]
    fn slices_run_clockwise_from_the_top() {
        let raster = compliance().render().unwrap();
        let at = |x: u32, y: u32| {
            let i = ((y * 200 + x) * 3) as usize;
            [raster.pixels()[i], raster.pixels()[i + 1], raster.pixels()[i + 2]]
        };
        // right of centre is 25% of the way round: first slice
        assert_eq!(at(150, 100), slice_colour(0).to_rgb_bytes());
        // left of centre is 75% of the way round: second slice
        assert_eq!(at(50, 100), slice_colour(1).to_rgb_bytes());
        // corners are outside the pie
        assert_eq!(at(0, 0), [255, 255, 255]);
    }

    #[test]
    fn malformed_values_are_measurement_errors() {
        let mut chart = compliance();
        chart.values[0].value = -1.0;
        assert!(matches!(chart.render(), Err(Error::Measurement { .. })));

        chart.values.clear();
        assert!(matches!(chart.render(), Err(Error::Measurement { .. })));

        let zeros = PieChart {
            width: 10,
            height: 10,
            values: vec![ChartValue::new(0.0, "nothing")],
        };
        assert!(zeros.render().is_err());
    }
}
