//! QR symbols rendered to a raster at a chosen oversampling.
//!
//! The symbol is encoded at error-correction level M (the encoder picks the
//! most compact numeric/alphanumeric/byte segmentation by itself), then
//! scaled up by the largest whole factor that fits in
//! `oversampling × ceil(width)` pixels and centred on a white square. The
//! resulting image is placed at `width × width` points, so the viewer
//! downsamples it and the module edges stay crisp.

use crate::blocks::ImageBlock;
use crate::error::{Error, Result};
use crate::raster::RasterImage;
use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::sync::Arc;

/// Largest raster side produced, in pixels.
const MAX_PIXEL_WIDTH: u32 = 16_384;

/// Render `text` as a QR code image block `width` points square.
pub fn qr_code_image(text: &str, width: f32, oversampling: u32) -> Result<ImageBlock> {
    let raster = qr_code_raster(text, width, oversampling)?;
    Ok(ImageBlock::new(Arc::new(raster)).with_size(width, width))
}

/// Render `text` as a square greyscale raster of `oversampling × ceil(width)` pixels.
pub fn qr_code_raster(text: &str, width: f32, oversampling: u32) -> Result<RasterImage> {
    let what = || format!("QR code for `{text}`");
    if oversampling == 0 {
        return Err(Error::measurement(what(), "oversampling must be at least 1"));
    }
    if !width.is_finite() || width <= 0.0 {
        return Err(Error::measurement(what(), format!("invalid width {width}")));
    }
    let pixel_width = Some(width.ceil())
        .filter(|w| *w <= u32::MAX as f32)
        .and_then(|w| (w as u32).checked_mul(oversampling))
        .filter(|w| *w <= MAX_PIXEL_WIDTH)
        .ok_or_else(|| {
            Error::measurement(
                what(),
                format!("{width}pt at {oversampling}x exceeds {MAX_PIXEL_WIDTH} pixels"),
            )
        })?;

    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)
        .map_err(|e| Error::measurement(what(), e))?;
    let modules = code.width() as u32;
    let colours = code.to_colors();

    let scale = pixel_width / modules;
    if scale == 0 {
        return Err(Error::measurement(
            what(),
            format!("cannot fit {modules} modules into {pixel_width} pixels"),
        ));
    }
    let offset = (pixel_width - modules * scale) / 2;

    let image = GrayImage::from_fn(pixel_width, pixel_width, |x, y| {
        let inside = x >= offset
            && y >= offset
            && x < offset + modules * scale
            && y < offset + modules * scale;
        if !inside {
            return Luma([255]);
        }
        let mx = (x - offset) / scale;
        let my = (y - offset) / scale;
        match colours[(my * modules + mx) as usize] {
            Color::Dark => Luma([0]),
            Color::Light => Luma([255]),
        }
    });

    Ok(RasterImage::from_grey(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelFormat;

    #[test]
    fn oversampled_raster_has_the_requested_pixel_size() {
        let raster = qr_code_raster("HELLO", 40.0, 5).unwrap();
        assert_eq!(raster.width(), 200);
        assert_eq!(raster.height(), 200);
        assert_eq!(raster.format(), PixelFormat::Grey8);
    }

    #[test]
    fn qr_block_is_placed_at_point_size() {
        let block = qr_code_image("HELLO", 40.0, 5).unwrap();
        assert_eq!(block.width(), 40.0);
        assert_eq!(block.height(), 40.0);
        assert_eq!(block.raster().width(), 200);
    }

    #[test]
    fn fractional_widths_round_up_before_oversampling() {
        let raster = qr_code_raster("HELLO", 39.2, 2).unwrap();
        assert_eq!(raster.width(), 80);
    }

    #[test]
    fn symbol_is_centred_with_a_light_border() {
        let raster = qr_code_raster("HELLO", 40.0, 5).unwrap();
        // 21 modules scale by 9 into 189 pixels, leaving a 5 pixel border
        assert_eq!(raster.pixels()[0], 255);
        // the top-left finder pattern starts dark just inside the border
        let at = |x: usize, y: usize| raster.pixels()[y * 200 + x];
        assert_eq!(at(5, 5), 0);
        assert_eq!(at(4, 4), 255);
    }

    #[test]
    fn too_few_pixels_is_a_measurement_error() {
        let err = qr_code_raster("HELLO", 10.0, 1).unwrap_err();
        assert!(matches!(err, Error::Measurement { .. }));
    }

    #[test]
    fn oversized_rasters_are_measurement_errors() {
        let err = qr_code_raster("HELLO", 1.0e9, 5).unwrap_err();
        assert!(matches!(err, Error::Measurement { .. }));
        let err = qr_code_raster("HELLO", 4000.0, u32::MAX).unwrap_err();
        assert!(matches!(err, Error::Measurement { .. }));
        assert!(qr_code_image("HELLO", 5000.0, 5).is_err());
    }

    #[test]
    fn zero_oversampling_is_rejected() {
        assert!(qr_code_raster("HELLO", 40.0, 0).is_err());
    }
}
