//! Image drawing and raw pixel access.

use super::Canvas2dContext;
use crate::canvas::ImmediateCanvas;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::CanvasRect;
use crate::image::{CanvasImage, ImageData};
use crate::paint::{self, DerivedPaint, PaintKind, ShaderSpec};
use tiny_skia::{BlendMode, Color, FilterQuality};

impl<C: ImmediateCanvas> Canvas2dContext<C> {
    /// Draw an image, dispatching on the coordinate count like the
    /// variadic DOM entry point: 2 (position), 4 (destination rectangle) or
    /// 8 (source and destination rectangles). Any other count is a fault
    /// naming the received argument count.
    pub fn draw_image(&mut self, image: &CanvasImage, coords: &[f32]) -> Canvas2dResult<()> {
        let (src, dst) = match *coords {
            [dx, dy] => (
                CanvasRect::new(0.0, 0.0, image.width() as f32, image.height() as f32),
                CanvasRect::new(dx, dy, image.width() as f32, image.height() as f32),
            ),
            [dx, dy, dw, dh] => (
                CanvasRect::new(0.0, 0.0, image.width() as f32, image.height() as f32),
                CanvasRect::new(dx, dy, dw, dh),
            ),
            [sx, sy, sw, sh, dx, dy, dw, dh] => {
                (CanvasRect::new(sx, sy, sw, sh), CanvasRect::new(dx, dy, dw, dh))
            }
            _ => {
                return Err(Canvas2dError::InvalidArgumentCount {
                    method: "drawImage",
                    got: coords.len() + 1,
                })
            }
        };
        if !src.is_finite() || !dst.is_finite() {
            return Ok(());
        }
        log::debug!(
            target: "canvas",
            "draw image {}x{} into {}x{} at ({}, {})",
            src.width, src.height, dst.width, dst.height, dst.x, dst.y
        );
        let base = paint::image_paint(
            &self.state,
            self.tracker.current(),
            self.canvas.width(),
            self.canvas.height(),
        );
        self.with_shadow(&base, |canvas, paint| {
            canvas.draw_image(image, src, dst, paint)
        });
        Ok(())
    }

    /// Draw an image at a position, unscaled.
    pub fn draw_image_at(&mut self, image: &CanvasImage, dx: f32, dy: f32) -> Canvas2dResult<()> {
        self.draw_image(image, &[dx, dy])
    }

    /// Draw an image scaled into a destination rectangle.
    pub fn draw_image_scaled(
        &mut self,
        image: &CanvasImage,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) -> Canvas2dResult<()> {
        self.draw_image(image, &[dx, dy, dw, dh])
    }

    /// Draw a cropped region of an image into a destination rectangle.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_image_cropped(
        &mut self,
        image: &CanvasImage,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) -> Canvas2dResult<()> {
        self.draw_image(image, &[sx, sy, sw, sh, dx, dy, dw, dh])
    }

    /// Transparent-black image data of the given size.
    pub fn create_image_data(&self, width: u32, height: u32) -> Canvas2dResult<ImageData> {
        ImageData::new(width, height)
    }

    /// Transparent-black image data matching another buffer's size.
    pub fn create_image_data_like(&self, other: &ImageData) -> Canvas2dResult<ImageData> {
        ImageData::new(other.width(), other.height())
    }

    /// Read a device-space rectangle of pixels.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Canvas2dResult<ImageData> {
        let data = self
            .canvas
            .read_pixels(x, y, width, height)
            .ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        ImageData::from_rgba(data, width, height)
    }

    /// Write pixels at a device-space position, bypassing the transform,
    /// clip and compositing state.
    pub fn put_image_data(&mut self, data: &ImageData, x: i32, y: i32) {
        self.canvas
            .write_pixels(data.data(), data.width(), data.height(), x, y);
    }

    /// Write only a dirty sub-rectangle of the pixels. The dirty rectangle
    /// is normalized and clamped to the buffer; the write composites as a
    /// source-over image draw in device space.
    pub fn put_image_data_dirty(
        &mut self,
        data: &ImageData,
        x: f32,
        y: f32,
        dirty: CanvasRect,
    ) -> Canvas2dResult<()> {
        if !x.is_finite() || !y.is_finite() || !dirty.is_finite() {
            return Ok(());
        }
        let dirty = dirty.normalized();
        let clamped_x = dirty.x.max(0.0);
        let clamped_y = dirty.y.max(0.0);
        let clamped_w = (dirty.x + dirty.width).min(data.width() as f32) - clamped_x;
        let clamped_h = (dirty.y + dirty.height).min(data.height() as f32) - clamped_y;
        if clamped_w <= 0.0 || clamped_h <= 0.0 {
            return Ok(());
        }
        let src = CanvasRect::new(clamped_x, clamped_y, clamped_w, clamped_h);
        let dst = CanvasRect::new(x + clamped_x, y + clamped_y, clamped_w, clamped_h);

        let image = CanvasImage::from_rgba(data.data(), data.width(), data.height())?;
        let paint = DerivedPaint {
            shader: ShaderSpec::Solid(Color::BLACK),
            kind: PaintKind::Fill,
            blend_mode: BlendMode::SourceOver,
            anti_alias: false,
            is_shadow: false,
            blur_sigma: None,
            filter_quality: FilterQuality::Nearest,
            text_size: self.state.text_size,
        };

        // Device-space write: neutralize the transform for this draw only.
        let Some(inverse) = self.tracker.current().invert() else {
            return Ok(());
        };
        self.canvas.save();
        self.canvas.concat(inverse);
        self.canvas.draw_image(&image, src, dst, &paint);
        self.canvas.restore();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixmapCanvas;

    fn context() -> Canvas2dContext<PixmapCanvas> {
        Canvas2dContext::new(PixmapCanvas::new(20, 20).unwrap())
    }

    fn red_image(w: u32, h: u32) -> CanvasImage {
        let mut data = Vec::with_capacity((w * h * 4) as usize);
        for _ in 0..w * h {
            data.extend_from_slice(&[255, 0, 0, 255]);
        }
        CanvasImage::from_rgba(&data, w, h).unwrap()
    }

    #[test]
    fn test_draw_image_rejects_bad_arity() {
        let mut ctx = context();
        let image = red_image(2, 2);
        let err = ctx.draw_image(&image, &[1.0, 2.0, 3.0]).unwrap_err();
        match err {
            Canvas2dError::InvalidArgumentCount { method, got } => {
                assert_eq!(method, "drawImage");
                assert_eq!(got, 4);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_draw_image_at_position() {
        let mut ctx = context();
        let image = red_image(4, 4);
        ctx.draw_image_at(&image, 10.0, 10.0).unwrap();
        assert_eq!(ctx.canvas().pixmap().pixel(11, 11).unwrap().red(), 255);
        assert_eq!(ctx.canvas().pixmap().pixel(5, 5).unwrap().alpha(), 0);
    }

    #[test]
    fn test_draw_image_scaled() {
        let mut ctx = context();
        let image = red_image(2, 2);
        ctx.draw_image_scaled(&image, 0.0, 0.0, 16.0, 16.0).unwrap();
        assert_eq!(ctx.canvas().pixmap().pixel(12, 12).unwrap().red(), 255);
    }

    #[test]
    fn test_put_get_image_data_round_trip() {
        let mut ctx = context();
        let mut data = ImageData::new(2, 2).unwrap();
        data.data_mut().copy_from_slice(&[
            1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255,
        ]);
        ctx.put_image_data(&data, 3, 3);
        let read = ctx.get_image_data(3, 3, 2, 2).unwrap();
        assert_eq!(read.data(), data.data());
    }

    #[test]
    fn test_put_image_data_ignores_transform() {
        let mut ctx = context();
        ctx.translate(10.0, 10.0);
        let mut data = ImageData::new(1, 1).unwrap();
        data.data_mut().copy_from_slice(&[9, 9, 9, 255]);
        ctx.put_image_data(&data, 0, 0);
        let read = ctx.get_image_data(0, 0, 1, 1).unwrap();
        assert_eq!(read.data(), &[9, 9, 9, 255]);
    }

    #[test]
    fn test_put_image_data_dirty_writes_subrect() {
        let mut ctx = context();
        let mut data = ImageData::new(4, 4).unwrap();
        for pixel in data.data_mut().chunks_mut(4) {
            pixel.copy_from_slice(&[0, 255, 0, 255]);
        }
        ctx.put_image_data_dirty(&data, 0.0, 0.0, CanvasRect::new(1.0, 1.0, 2.0, 2.0))
            .unwrap();
        assert!(ctx.canvas().pixmap().pixel(2, 2).unwrap().green() > 0);
        assert_eq!(ctx.canvas().pixmap().pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn test_create_image_data_like() {
        let ctx = context();
        let base = ctx.create_image_data(3, 5).unwrap();
        let like = ctx.create_image_data_like(&base).unwrap();
        assert_eq!((like.width(), like.height()), (3, 5));
    }
}
