//! Fixed-size raster images and the collaborators that produce them.
//!
//! Decoding, QR rendering and chart rendering all end in a [`RasterImage`]:
//! 8-bit pixels with no alpha, ready to be embedded as-is. Transparent
//! sources are flattened over white when they are decoded.

pub mod chart;
pub mod qr;

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Grey8,
    Rgb8,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Grey8 => 1,
            PixelFormat::Rgb8 => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Decode an image file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<RasterImage> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| Error::resource(path.display(), e))?;
        log::debug!(
            "decoded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(RasterImage::from_dynamic(image))
    }

    /// Decode an image held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<RasterImage> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| Error::resource(format!("<{} byte buffer>", bytes.len()), e))?;
        Ok(RasterImage::from_dynamic(image))
    }

    pub fn from_dynamic(image: DynamicImage) -> RasterImage {
        match image {
            DynamicImage::ImageLuma8(grey) => RasterImage::from_grey(grey),
            DynamicImage::ImageRgb8(rgb) => RasterImage::from_rgb(rgb),
            other => {
                // flatten alpha over a white background
                let rgba = other.to_rgba8();
                let (width, height) = rgba.dimensions();
                let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
                for pixel in rgba.pixels() {
                    let [r, g, b, a] = pixel.0;
                    let alpha = a as u32;
                    for channel in [r, g, b] {
                        let blended = (channel as u32 * alpha + 255 * (255 - alpha)) / 255;
                        pixels.push(blended as u8);
                    }
                }
                RasterImage {
                    width,
                    height,
                    format: PixelFormat::Rgb8,
                    pixels,
                }
            }
        }
    }

    pub fn from_grey(image: GrayImage) -> RasterImage {
        let (width, height) = image.dimensions();
        RasterImage {
            width,
            height,
            format: PixelFormat::Grey8,
            pixels: image.into_raw(),
        }
    }

    pub fn from_rgb(image: RgbImage) -> RasterImage {
        let (width, height) = image.dimensions();
        RasterImage {
            width,
            height,
            format: PixelFormat::Rgb8,
            pixels: image.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn missing_files_are_resource_errors() {
        let err = RasterImage::open("./definitely-not-here.png").unwrap_err();
        assert!(matches!(err, Error::ResourceLoad { .. }));
    }

    #[test]
    fn garbage_bytes_are_resource_errors() {
        let err = RasterImage::from_bytes(b"not a png").unwrap_err();
        assert!(matches!(err, Error::ResourceLoad { .. }));
    }

    #[test]
    fn transparent_pixels_are_flattened_over_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let raster = RasterImage::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(raster.format(), PixelFormat::Rgb8);
        assert_eq!(raster.pixels(), &[255, 255, 255, 10, 20, 30]);
    }

    #[test]
    fn greyscale_images_stay_greyscale() {
        let grey = GrayImage::from_pixel(3, 2, image::Luma([128]));
        let raster = RasterImage::from_dynamic(DynamicImage::ImageLuma8(grey));
        assert_eq!(raster.format(), PixelFormat::Grey8);
        assert_eq!(raster.pixels().len(), 6);
        assert!((raster.aspect_ratio() - 1.5).abs() < 1e-6);
    }
}
