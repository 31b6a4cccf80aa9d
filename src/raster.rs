//! `tiny-skia` backed immediate canvas.
//!
//! Geometry arrives in user space; it is mapped to device space here and
//! rendered with an identity transform so shader transforms stay in control
//! of their own mapping. Stroke widths and dash intervals are scaled by the
//! average axis scale of the current matrix.

use crate::canvas::ImmediateCanvas;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::CanvasRect;
use crate::image::{demultiply_rgba, premultiply_rgba, CanvasImage};
use crate::paint::{DerivedPaint, ShaderSpec};
use crate::style::CanvasFillRule;
use tiny_skia::{
    BlendMode, IntRect, Mask, Path, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8,
    Transform,
};

/// Average of the horizontal and vertical axis scales of a matrix.
pub(crate) fn average_scale(t: Transform) -> f32 {
    let sx = (t.sx * t.sx + t.ky * t.ky).sqrt();
    let sy = (t.kx * t.kx + t.sy * t.sy).sqrt();
    (sx + sy) / 2.0
}

/// Separable Gaussian blur over premultiplied pixels, clamping at the edges.
pub(crate) fn gaussian_blur(pixmap: &mut Pixmap, sigma: f32) {
    let radius = (sigma.abs() * 3.0).ceil() as usize;
    if radius == 0 {
        return;
    }

    let mut kernel = Vec::with_capacity(radius * 2 + 1);
    let sigma_sq = sigma * sigma;
    let mut sum = 0.0;
    for i in 0..=radius * 2 {
        let x = i as f32 - radius as f32;
        let value = (-x * x / (2.0 * sigma_sq)).exp();
        kernel.push(value);
        sum += value;
    }
    for k in &mut kernel {
        *k /= sum;
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let src: Vec<[f32; 4]> = pixmap
        .pixels()
        .iter()
        .map(|p| {
            [
                p.red() as f32,
                p.green() as f32,
                p.blue() as f32,
                p.alpha() as f32,
            ]
        })
        .collect();

    let pass = |input: &[[f32; 4]], output: &mut [[f32; 4]], horizontal: bool| {
        for y in 0..height {
            for x in 0..width {
                let mut accum = [0.0f32; 4];
                for (i, weight) in kernel.iter().enumerate() {
                    let offset = i as isize - radius as isize;
                    let idx = if horizontal {
                        let cx = (x as isize + offset).clamp(0, width as isize - 1) as usize;
                        y * width + cx
                    } else {
                        let cy = (y as isize + offset).clamp(0, height as isize - 1) as usize;
                        cy * width + x
                    };
                    let sample = input[idx];
                    for c in 0..4 {
                        accum[c] += sample[c] * weight;
                    }
                }
                output[y * width + x] = accum;
            }
        }
    };

    let mut temp = vec![[0.0f32; 4]; src.len()];
    let mut dst = vec![[0.0f32; 4]; src.len()];
    pass(&src, &mut temp, true);
    pass(&temp, &mut dst, false);

    for (pixel, vals) in pixmap.pixels_mut().iter_mut().zip(dst.iter()) {
        let a = vals[3].round().clamp(0.0, 255.0) as u8;
        // Premultiplied channels can never exceed alpha.
        let r = (vals[0].round().clamp(0.0, 255.0) as u8).min(a);
        let g = (vals[1].round().clamp(0.0, 255.0) as u8).min(a);
        let b = (vals[2].round().clamp(0.0, 255.0) as u8).min(a);
        *pixel = PremultipliedColorU8::from_rgba(r, g, b, a)
            .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }
}

fn raster_into(
    target: &mut Pixmap,
    clip: Option<&Mask>,
    device_path: &Path,
    paint: &DerivedPaint,
    fill_rule: CanvasFillRule,
    stroke_scale: f32,
) {
    let skia_paint = paint.to_paint();
    match paint.stroke_with_scale(stroke_scale) {
        Some(stroke) => {
            target.stroke_path(device_path, &skia_paint, &stroke, Transform::identity(), clip);
        }
        None => {
            target.fill_path(
                device_path,
                &skia_paint,
                fill_rule.into(),
                Transform::identity(),
                clip,
            );
        }
    }
}

/// An [`ImmediateCanvas`] rendering into a premultiplied RGBA pixmap.
#[derive(Clone)]
pub struct PixmapCanvas {
    pixmap: Pixmap,
    matrix: Transform,
    clip: Option<Mask>,
    stack: Vec<(Transform, Option<Mask>)>,
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        Ok(Self {
            pixmap,
            matrix: Transform::identity(),
            clip: None,
            stack: Vec::new(),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encode the canvas contents as a PNG, converting back to straight alpha.
    pub fn to_png(&self) -> Canvas2dResult<Vec<u8>> {
        let mut rgba = Vec::with_capacity(self.pixmap.pixels().len() * 4);
        for pixel in self.pixmap.pixels() {
            rgba.extend_from_slice(&demultiply_rgba(*pixel));
        }

        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.pixmap.width(), self.pixmap.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&rgba)?;
        }
        Ok(out)
    }

    fn draw_device_path(&mut self, device_path: &Path, paint: &DerivedPaint, rule: CanvasFillRule) {
        let scale = average_scale(self.matrix);
        match paint.blur_sigma {
            Some(sigma) => {
                let Some(mut layer) = Pixmap::new(self.pixmap.width(), self.pixmap.height())
                else {
                    return;
                };
                let mut layer_paint = paint.clone();
                layer_paint.blend_mode = BlendMode::SourceOver;
                raster_into(&mut layer, None, device_path, &layer_paint, rule, scale);
                gaussian_blur(&mut layer, sigma);
                self.composite_layer(&layer, paint.blend_mode);
            }
            None => {
                raster_into(
                    &mut self.pixmap,
                    self.clip.as_ref(),
                    device_path,
                    paint,
                    rule,
                    scale,
                );
            }
        }
    }

    fn composite_layer(&mut self, layer: &Pixmap, blend_mode: BlendMode) {
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint {
                opacity: 1.0,
                blend_mode,
                quality: tiny_skia::FilterQuality::Nearest,
            },
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    /// Crop the source rectangle out of an image, tinting it for shadow
    /// passes.
    fn cropped_source(
        image: &CanvasImage,
        src: CanvasRect,
        paint: &DerivedPaint,
    ) -> Option<Pixmap> {
        let rect = IntRect::from_ltrb(
            src.x.round() as i32,
            src.y.round() as i32,
            (src.x + src.width).round() as i32,
            (src.y + src.height).round() as i32,
        )?;
        let mut cropped = image.pixmap().clone_rect(rect)?;
        if paint.is_shadow {
            if let ShaderSpec::Solid(color) = &paint.shader {
                let tint = color.premultiply().to_color_u8();
                for pixel in cropped.pixels_mut() {
                    let coverage = pixel.alpha() as u16;
                    *pixel = PremultipliedColorU8::from_rgba(
                        ((tint.red() as u16 * coverage + 127) / 255) as u8,
                        ((tint.green() as u16 * coverage + 127) / 255) as u8,
                        ((tint.blue() as u16 * coverage + 127) / 255) as u8,
                        ((tint.alpha() as u16 * coverage + 127) / 255) as u8,
                    )
                    .unwrap_or(PremultipliedColorU8::TRANSPARENT);
                }
            }
        }
        Some(cropped)
    }
}

impl ImmediateCanvas for PixmapCanvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn save(&mut self) {
        self.stack.push((self.matrix, self.clip.clone()));
    }

    fn restore(&mut self) {
        if let Some((matrix, clip)) = self.stack.pop() {
            self.matrix = matrix;
            self.clip = clip;
        }
    }

    fn concat(&mut self, delta: Transform) {
        self.matrix = self.matrix.pre_concat(delta);
    }

    fn total_matrix(&self) -> Transform {
        self.matrix
    }

    fn draw_path(&mut self, path: &Path, paint: &DerivedPaint, fill_rule: CanvasFillRule) {
        let Some(device_path) = path.clone().transform(self.matrix) else {
            return;
        };
        self.draw_device_path(&device_path, paint, fill_rule);
    }

    fn draw_rect(&mut self, rect: CanvasRect, paint: &DerivedPaint) {
        let rect = rect.normalized();
        if rect.width == 0.0 || rect.height == 0.0 || !rect.is_finite() {
            return;
        }
        let mut builder = PathBuilder::new();
        builder.move_to(rect.x, rect.y);
        builder.line_to(rect.x + rect.width, rect.y);
        builder.line_to(rect.x + rect.width, rect.y + rect.height);
        builder.line_to(rect.x, rect.y + rect.height);
        builder.close();
        let Some(path) = builder.finish() else {
            return;
        };
        self.draw_path(&path, paint, CanvasFillRule::Nonzero);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, _paint: &DerivedPaint) {
        // Text shaping is out of scope for this backend.
        log::warn!(
            target: "canvas",
            "skipping text draw at ({}, {}): no shaping support ({} chars)",
            x,
            y,
            text.len()
        );
    }

    fn draw_image(
        &mut self,
        image: &CanvasImage,
        src: CanvasRect,
        dst: CanvasRect,
        paint: &DerivedPaint,
    ) {
        let src = src.normalized();
        let dst = dst.normalized();
        if !src.is_finite() || !dst.is_finite() || src.width == 0.0 || src.height == 0.0 {
            return;
        }
        let Some(cropped) = Self::cropped_source(image, src, paint) else {
            return;
        };

        let opacity = match &paint.shader {
            ShaderSpec::Solid(c) if !paint.is_shadow => c.alpha(),
            _ => 1.0,
        };
        let placement = self
            .matrix
            .pre_concat(Transform::from_translate(dst.x, dst.y))
            .pre_concat(Transform::from_scale(
                dst.width / src.width,
                dst.height / src.height,
            ));
        let pixmap_paint = PixmapPaint {
            opacity,
            blend_mode: paint.blend_mode,
            quality: paint.filter_quality,
        };

        match paint.blur_sigma {
            Some(sigma) => {
                let Some(mut layer) = Pixmap::new(self.pixmap.width(), self.pixmap.height())
                else {
                    return;
                };
                let layer_paint = PixmapPaint {
                    blend_mode: BlendMode::SourceOver,
                    ..pixmap_paint
                };
                layer.draw_pixmap(0, 0, cropped.as_ref(), &layer_paint, placement, None);
                gaussian_blur(&mut layer, sigma);
                self.composite_layer(&layer, paint.blend_mode);
            }
            None => {
                self.pixmap.draw_pixmap(
                    0,
                    0,
                    cropped.as_ref(),
                    &pixmap_paint,
                    placement,
                    self.clip.as_ref(),
                );
            }
        }
    }

    fn clip_path(&mut self, path: &Path, fill_rule: CanvasFillRule) {
        let Some(device_path) = path.clone().transform(self.matrix) else {
            return;
        };
        match &mut self.clip {
            Some(mask) => {
                mask.intersect_path(&device_path, fill_rule.into(), true, Transform::identity());
            }
            None => {
                let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
                    return;
                };
                mask.fill_path(&device_path, fill_rule.into(), true, Transform::identity());
                self.clip = Some(mask);
            }
        }
    }

    fn read_pixels(&self, x: i32, y: i32, width: u32, height: u32) -> Option<Vec<u8>> {
        if width == 0 || height == 0 {
            return None;
        }
        let mut out = vec![0u8; (width as usize) * (height as usize) * 4];
        for row in 0..height as i32 {
            let sy = y + row;
            if sy < 0 || sy >= self.pixmap.height() as i32 {
                continue;
            }
            for col in 0..width as i32 {
                let sx = x + col;
                if sx < 0 || sx >= self.pixmap.width() as i32 {
                    continue;
                }
                let pixel = self.pixmap.pixel(sx as u32, sy as u32)?;
                let offset = ((row as usize) * (width as usize) + col as usize) * 4;
                out[offset..offset + 4].copy_from_slice(&demultiply_rgba(pixel));
            }
        }
        Some(out)
    }

    fn write_pixels(&mut self, data: &[u8], width: u32, height: u32, x: i32, y: i32) {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() < expected {
            return;
        }
        let canvas_width = self.pixmap.width() as i32;
        let canvas_height = self.pixmap.height() as i32;
        let pixels = self.pixmap.pixels_mut();
        for row in 0..height as i32 {
            let dy = y + row;
            if dy < 0 || dy >= canvas_height {
                continue;
            }
            for col in 0..width as i32 {
                let dx = x + col;
                if dx < 0 || dx >= canvas_width {
                    continue;
                }
                let src = ((row as usize) * (width as usize) + col as usize) * 4;
                pixels[(dy * canvas_width + dx) as usize] =
                    premultiply_rgba(data[src], data[src + 1], data[src + 2], data[src + 3]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{fill_paint, stroke_paint};
    use crate::state::ContextState;
    use tiny_skia::Color;

    fn red_state() -> ContextState {
        ContextState {
            fill_style: crate::style::FillStyle::Color(Color::from_rgba8(255, 0, 0, 255)),
            ..Default::default()
        }
    }

    #[test]
    fn test_fill_rect_writes_pixels() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        let paint = fill_paint(&red_state(), Transform::identity(), 10, 10);
        canvas.draw_rect(CanvasRect::new(2.0, 2.0, 4.0, 4.0), &paint);
        let pixel = canvas.pixmap().pixel(3, 3).unwrap();
        assert_eq!(pixel.red(), 255);
        assert_eq!(canvas.pixmap().pixel(8, 8).unwrap().alpha(), 0);
    }

    #[test]
    fn test_concat_moves_geometry() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        canvas.concat(Transform::from_translate(5.0, 5.0));
        let paint = fill_paint(&red_state(), canvas.total_matrix(), 10, 10);
        canvas.draw_rect(CanvasRect::new(0.0, 0.0, 2.0, 2.0), &paint);
        assert_eq!(canvas.pixmap().pixel(6, 6).unwrap().red(), 255);
        assert_eq!(canvas.pixmap().pixel(1, 1).unwrap().alpha(), 0);
    }

    #[test]
    fn test_stroke_width_scales_with_matrix() {
        let mut canvas = PixmapCanvas::new(40, 40).unwrap();
        canvas.concat(Transform::from_scale(4.0, 4.0));
        let mut state = red_state();
        state.stroke_style = crate::style::FillStyle::Color(Color::from_rgba8(255, 0, 0, 255));
        state.line_width = 2.0;
        let paint = stroke_paint(&state, canvas.total_matrix(), 40, 40);
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 5.0);
        builder.line_to(10.0, 5.0);
        let path = builder.finish().unwrap();
        canvas.draw_path(&path, &paint, CanvasFillRule::Nonzero);
        // A 2-unit line under 4x scale covers 8 device pixels vertically.
        assert!(canvas.pixmap().pixel(20, 17).unwrap().alpha() > 0);
        assert!(canvas.pixmap().pixel(20, 30).unwrap().alpha() == 0);
    }

    #[test]
    fn test_clip_limits_fill() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(5.0, 0.0);
        builder.line_to(5.0, 5.0);
        builder.line_to(0.0, 5.0);
        builder.close();
        canvas.clip_path(&builder.finish().unwrap(), CanvasFillRule::Nonzero);

        let paint = fill_paint(&red_state(), Transform::identity(), 10, 10);
        canvas.draw_rect(CanvasRect::new(0.0, 0.0, 10.0, 10.0), &paint);
        assert_eq!(canvas.pixmap().pixel(2, 2).unwrap().red(), 255);
        assert_eq!(canvas.pixmap().pixel(8, 8).unwrap().alpha(), 0);
    }

    #[test]
    fn test_save_restore_restores_clip_and_matrix() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        canvas.save();
        canvas.concat(Transform::from_translate(3.0, 0.0));
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(2.0, 0.0);
        builder.line_to(2.0, 2.0);
        builder.close();
        canvas.clip_path(&builder.finish().unwrap(), CanvasFillRule::Nonzero);
        canvas.restore();
        assert_eq!(canvas.total_matrix(), Transform::identity());

        let paint = fill_paint(&red_state(), Transform::identity(), 10, 10);
        canvas.draw_rect(CanvasRect::new(0.0, 0.0, 10.0, 10.0), &paint);
        assert_eq!(canvas.pixmap().pixel(9, 9).unwrap().red(), 255);
    }

    #[test]
    fn test_read_write_pixels_round_trip() {
        let mut canvas = PixmapCanvas::new(4, 4).unwrap();
        let data = vec![
            10, 20, 30, 255, 40, 50, 60, 255, 70, 80, 90, 255, 100, 110, 120, 255,
        ];
        canvas.write_pixels(&data, 2, 2, 1, 1);
        let read = canvas.read_pixels(1, 1, 2, 2).unwrap();
        assert_eq!(read, data);
    }

    #[test]
    fn test_gaussian_blur_spreads_alpha() {
        let mut pixmap = Pixmap::new(9, 9).unwrap();
        pixmap.pixels_mut()[4 * 9 + 4] =
            PremultipliedColorU8::from_rgba(255, 255, 255, 255).unwrap();
        gaussian_blur(&mut pixmap, 1.5);
        assert!(pixmap.pixel(4, 4).unwrap().alpha() < 255);
        assert!(pixmap.pixel(3, 4).unwrap().alpha() > 0);
    }

    #[test]
    fn test_to_png_has_signature() {
        let canvas = PixmapCanvas::new(4, 4).unwrap();
        let png = canvas.to_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }
}
