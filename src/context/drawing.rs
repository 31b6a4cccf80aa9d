//! Fill, stroke, text, clip and rectangle operations.

use super::Canvas2dContext;
use crate::canvas::ImmediateCanvas;
use crate::geometry::CanvasRect;
use crate::paint::{self, DerivedPaint, PaintKind, ShaderSpec};
use crate::path::Path2D;
use crate::style::CanvasFillRule;
use tiny_skia::{BlendMode, Color, FilterQuality, Transform};

impl<C: ImmediateCanvas> Canvas2dContext<C> {
    /// Translation applied before a shadow pass, expressed in the current
    /// user frame so the offsets stay device-relative.
    fn shadow_offset_matrix(&self) -> Transform {
        let ctm = self.tracker.current();
        let ox = self.state.shadow_offset_x / ctm.sx;
        let oy = self.state.shadow_offset_y / ctm.sy;
        if !ox.is_finite() || !oy.is_finite() {
            return Transform::identity();
        }
        Transform::from_translate(ox, oy)
    }

    /// Run a draw closure twice when a shadow is active: first offset and in
    /// the shadow paint, then in the base paint.
    pub(super) fn with_shadow<F>(&mut self, base: &DerivedPaint, draw: F)
    where
        F: Fn(&mut C, &DerivedPaint),
    {
        if let Some(shadow) = paint::shadow_paint(&self.state, base) {
            let offset = self.shadow_offset_matrix();
            self.canvas.save();
            self.canvas.concat(offset);
            draw(&mut self.canvas, &shadow);
            self.canvas.restore();
        }
        draw(&mut self.canvas, base);
    }

    fn derive_fill(&self) -> DerivedPaint {
        paint::fill_paint(
            &self.state,
            self.tracker.current(),
            self.canvas.width(),
            self.canvas.height(),
        )
    }

    fn derive_stroke(&self) -> DerivedPaint {
        paint::stroke_paint(
            &self.state,
            self.tracker.current(),
            self.canvas.width(),
            self.canvas.height(),
        )
    }

    /// Fill the current path with the nonzero rule.
    pub fn fill(&mut self) {
        self.fill_with_rule(CanvasFillRule::Nonzero);
    }

    pub fn fill_with_rule(&mut self, rule: CanvasFillRule) {
        let Some(path) = self.path.to_path() else {
            return;
        };
        log::debug!(target: "canvas", "fill path ({} commands)", self.path.commands().len());
        let base = self.derive_fill();
        self.with_shadow(&base, |canvas, paint| canvas.draw_path(&path, paint, rule));
    }

    /// Stroke the current path with the current line attributes.
    pub fn stroke(&mut self) {
        let Some(path) = self.path.to_path() else {
            return;
        };
        log::debug!(target: "canvas", "stroke path ({} commands)", self.path.commands().len());
        let base = self.derive_stroke();
        self.with_shadow(&base, |canvas, paint| {
            canvas.draw_path(&path, paint, CanvasFillRule::Nonzero)
        });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = CanvasRect::new(x, y, width, height);
        if !rect.is_finite() {
            return;
        }
        let base = self.derive_fill();
        self.with_shadow(&base, |canvas, paint| canvas.draw_rect(rect, paint));
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = CanvasRect::new(x, y, width, height);
        if !rect.is_finite() {
            return;
        }
        let base = self.derive_stroke();
        self.with_shadow(&base, |canvas, paint| canvas.draw_rect(rect, paint));
    }

    /// Erase a rectangle to transparent black, regardless of the configured
    /// composite operation, styles and shadow.
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = CanvasRect::new(x, y, width, height);
        if !rect.is_finite() {
            return;
        }
        log::debug!(target: "canvas", "clear rect {}x{} at ({}, {})", width, height, x, y);
        let paint = DerivedPaint {
            shader: ShaderSpec::Solid(Color::BLACK),
            kind: PaintKind::Fill,
            blend_mode: BlendMode::Clear,
            anti_alias: true,
            is_shadow: false,
            blur_sigma: None,
            filter_quality: FilterQuality::Nearest,
            text_size: self.state.text_size,
        };
        self.canvas.draw_rect(rect, &paint);
    }

    /// Draw filled text at a baseline position.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        if let Some(mw) = max_width {
            if !mw.is_finite() || mw <= 0.0 {
                return;
            }
        }
        let base = self.derive_fill();
        self.with_shadow(&base, |canvas, paint| canvas.draw_text(text, x, y, paint));
    }

    /// Draw stroked text at a baseline position.
    pub fn stroke_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        if let Some(mw) = max_width {
            if !mw.is_finite() || mw <= 0.0 {
                return;
            }
        }
        let base = self.derive_stroke();
        self.with_shadow(&base, |canvas, paint| canvas.draw_text(text, x, y, paint));
    }

    /// Intersect the clip region with the current path (nonzero rule).
    pub fn clip(&mut self) {
        self.clip_with_rule(CanvasFillRule::Nonzero);
    }

    /// Intersect the clip region with a copy of the current path. The path
    /// itself is left untouched.
    pub fn clip_with_rule(&mut self, rule: CanvasFillRule) {
        let Some(path) = self.path.to_path() else {
            return;
        };
        self.canvas.clip_path(&path, rule);
    }

    /// Intersect the clip region with a supplied path.
    pub fn clip_path2d_with_rule(&mut self, path: &Path2D, rule: CanvasFillRule) {
        let Some(path) = path.to_path() else {
            return;
        };
        self.canvas.clip_path(&path, rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixmapCanvas;

    fn context() -> Canvas2dContext<PixmapCanvas> {
        Canvas2dContext::new(PixmapCanvas::new(20, 20).unwrap())
    }

    #[test]
    fn test_fill_rect_paints() {
        let mut ctx = context();
        ctx.set_fill_color("red");
        ctx.fill_rect(5.0, 5.0, 10.0, 10.0);
        let pixel = ctx.canvas().pixmap().pixel(10, 10).unwrap();
        assert_eq!(pixel.red(), 255);
    }

    #[test]
    fn test_clear_rect_erases_regardless_of_composite_mode() {
        let mut ctx = context();
        ctx.set_fill_color("red");
        ctx.fill_rect(0.0, 0.0, 20.0, 20.0);
        ctx.set_global_composite_operation("destination-over").unwrap();
        ctx.clear_rect(5.0, 5.0, 5.0, 5.0);
        assert_eq!(ctx.canvas().pixmap().pixel(7, 7).unwrap().alpha(), 0);
        assert_eq!(ctx.canvas().pixmap().pixel(2, 2).unwrap().red(), 255);
        // The configured mode survives.
        assert_eq!(ctx.global_composite_operation(), "destination-over");
    }

    #[test]
    fn test_fill_ignores_empty_path() {
        let mut ctx = context();
        ctx.set_fill_color("red");
        ctx.fill();
        assert_eq!(ctx.canvas().pixmap().pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn test_clip_does_not_consume_path() {
        let mut ctx = context();
        ctx.rect(0.0, 0.0, 5.0, 5.0);
        ctx.clip();
        assert!(!ctx.current_path().is_empty());
    }

    #[test]
    fn test_fill_respects_clip() {
        let mut ctx = context();
        ctx.rect(0.0, 0.0, 5.0, 5.0);
        ctx.clip();
        ctx.set_fill_color("blue");
        ctx.fill_rect(0.0, 0.0, 20.0, 20.0);
        assert!(ctx.canvas().pixmap().pixel(2, 2).unwrap().blue() > 0);
        assert_eq!(ctx.canvas().pixmap().pixel(10, 10).unwrap().alpha(), 0);
    }

    #[test]
    fn test_shadow_draws_offset_copy() {
        let mut ctx = context();
        ctx.set_fill_color("red");
        ctx.set_shadow_color("blue");
        ctx.set_shadow_offset_x(6.0);
        ctx.set_shadow_offset_y(6.0);
        ctx.fill_rect(2.0, 2.0, 4.0, 4.0);
        // Primary geometry.
        assert_eq!(ctx.canvas().pixmap().pixel(3, 3).unwrap().red(), 255);
        // Offset shadow, outside the primary rect.
        assert!(ctx.canvas().pixmap().pixel(10, 10).unwrap().blue() > 0);
    }
}
