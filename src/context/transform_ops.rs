//! Transform operations, all routed through the transform tracker.

use super::Canvas2dContext;
use crate::canvas::ImmediateCanvas;
use crate::dom_matrix::DomMatrix;

impl<C: ImmediateCanvas> Canvas2dContext<C> {
    pub fn translate(&mut self, tx: f32, ty: f32) {
        log::debug!(target: "canvas", "translate {} {}", tx, ty);
        self.tracker
            .translate(&mut self.canvas, &mut self.path, tx, ty);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        log::debug!(target: "canvas", "scale {} {}", sx, sy);
        self.tracker.scale(&mut self.canvas, &mut self.path, sx, sy);
    }

    /// Rotate the user frame by an angle in radians.
    pub fn rotate(&mut self, radians: f32) {
        log::debug!(target: "canvas", "rotate {}", radians);
        self.tracker
            .rotate(&mut self.canvas, &mut self.path, radians);
    }

    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.tracker
            .transform(&mut self.canvas, &mut self.path, a, b, c, d, e, f);
    }

    pub fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.tracker
            .set_transform(&mut self.canvas, &mut self.path, a, b, c, d, e, f);
    }

    pub fn set_transform_matrix(&mut self, matrix: DomMatrix) {
        self.set_transform(
            matrix.a as f32,
            matrix.b as f32,
            matrix.c as f32,
            matrix.d as f32,
            matrix.e as f32,
            matrix.f as f32,
        );
    }

    pub fn reset_transform(&mut self) {
        self.tracker.reset_transform(&mut self.canvas, &mut self.path);
    }

    /// The current cumulative transform.
    pub fn current_transform(&self) -> DomMatrix {
        self.tracker.current().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixmapCanvas;

    fn context() -> Canvas2dContext<PixmapCanvas> {
        Canvas2dContext::new(PixmapCanvas::new(100, 100).unwrap())
    }

    #[test]
    fn test_transform_composition_order() {
        let mut ctx = context();
        ctx.translate(10.0, 0.0);
        ctx.scale(2.0, 2.0);
        let m = ctx.current_transform();
        // Scale applies in the translated frame.
        assert_eq!(m.a, 2.0);
        assert_eq!(m.e, 10.0);
    }

    #[test]
    fn test_set_transform_is_absolute() {
        let mut ctx = context();
        ctx.translate(50.0, 50.0);
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 5.0, 6.0);
        let m = ctx.current_transform();
        assert_eq!((m.e, m.f), (5.0, 6.0));
    }

    #[test]
    fn test_reset_transform_returns_to_identity() {
        let mut ctx = context();
        ctx.rotate(1.0);
        ctx.translate(4.0, 4.0);
        ctx.reset_transform();
        assert_eq!(ctx.current_transform(), DomMatrix::identity());
    }

    #[test]
    fn test_tracker_matches_canvas_total_matrix() {
        let mut ctx = context();
        ctx.translate(3.0, 4.0);
        ctx.rotate(0.5);
        ctx.scale(2.0, 1.0);
        let cached: DomMatrix = ctx.current_transform();
        let canvas: DomMatrix = ctx.canvas().total_matrix().into();
        assert_eq!(cached, canvas);
    }
}
