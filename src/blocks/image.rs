use super::Drawable;
use crate::canvas::Canvas;
use crate::error::Result;
use crate::fonts::FontMetrics;
use crate::raster::RasterImage;
use crate::style::Rect;
use std::path::Path;
use std::sync::Arc;

/// A raster placed at an explicit size in points.
///
/// The size defaults to one point per pixel. The raster is shared, so the same
/// decoded logo can appear on every page and is embedded once.
#[derive(Debug, Clone)]
pub struct ImageBlock {
    raster: Arc<RasterImage>,
    width: f32,
    height: f32,
}

impl ImageBlock {
    pub fn new(raster: Arc<RasterImage>) -> ImageBlock {
        let (width, height) = (raster.width() as f32, raster.height() as f32);
        ImageBlock {
            raster,
            width,
            height,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<ImageBlock> {
        Ok(ImageBlock::new(Arc::new(RasterImage::open(path)?)))
    }

    /// Scale to `height` points, keeping the aspect ratio.
    pub fn scale_to_height(self, height: f32) -> ImageBlock {
        let width = height * self.raster.aspect_ratio();
        ImageBlock {
            width,
            height,
            ..self
        }
    }

    /// Scale to `width` points, keeping the aspect ratio.
    pub fn scale_to_width(self, width: f32) -> ImageBlock {
        let height = width / self.raster.aspect_ratio();
        ImageBlock {
            width,
            height,
            ..self
        }
    }

    pub fn with_size(self, width: f32, height: f32) -> ImageBlock {
        ImageBlock {
            width,
            height,
            ..self
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn raster(&self) -> &Arc<RasterImage> {
        &self.raster
    }
}

impl Drawable for ImageBlock {
    fn height(&self, _width: f32, _fonts: &dyn FontMetrics) -> Result<f32> {
        Ok(self.height)
    }

    fn natural_width(&self, _width: f32, _fonts: &dyn FontMetrics) -> Result<f32> {
        Ok(self.width)
    }

    fn paint(&self, canvas: &mut Canvas, frame: Rect, _fonts: &dyn FontMetrics) -> Result<()> {
        canvas.image(
            Rect::new(frame.x, frame.y, self.width, self.height),
            Arc::clone(&self.raster),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawOp;
    use crate::fonts::StandardFonts;

    fn raster(width: u32, height: u32) -> Arc<RasterImage> {
        Arc::new(RasterImage::from_rgb(::image::RgbImage::new(width, height)))
    }

    #[test]
    fn defaults_to_one_point_per_pixel() {
        let block = ImageBlock::new(raster(120, 60));
        assert_eq!((block.width(), block.height()), (120.0, 60.0));
    }

    #[test]
    fn scaling_keeps_the_aspect_ratio() {
        let tall = ImageBlock::new(raster(200, 100)).scale_to_height(50.0);
        assert!((tall.width() - 100.0).abs() < 1e-4);
        let wide = ImageBlock::new(raster(200, 100)).scale_to_width(50.0);
        assert!((wide.height() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn height_does_not_depend_on_the_available_width() {
        let block = ImageBlock::new(raster(10, 10)).with_size(40.0, 30.0);
        assert_eq!(Drawable::height(&block, 5.0, &StandardFonts).unwrap(), 30.0);
        assert_eq!(Drawable::height(&block, 500.0, &StandardFonts).unwrap(), 30.0);
    }

    #[test]
    fn paints_at_its_own_size() {
        let block = ImageBlock::new(raster(10, 10)).with_size(40.0, 30.0);
        let mut canvas = Canvas::new();
        block
            .paint(&mut canvas, Rect::new(5.0, 6.0, 300.0, 30.0), &StandardFonts)
            .unwrap();
        match &canvas.ops()[0] {
            DrawOp::Image { rect, .. } => assert_eq!(*rect, Rect::new(5.0, 6.0, 40.0, 30.0)),
            other => panic!("expected image, got {other:?}"),
        }
    }
}
