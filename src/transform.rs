//! Transform tracking with retroactive path re-baking.
//!
//! The recorded path lives in the active user frame. Every transform change
//! therefore counter-transforms the recorded coordinates by the inverse of
//! the delta before the delta reaches the canvas, so already-recorded
//! segments keep their device-space positions while later segments pick up
//! the new mapping.
//!
//! The cached transform is private; every mutation flows through the tracked
//! operations below, each of which re-reads the canvas total matrix after
//! forwarding the delta.

use crate::canvas::ImmediateCanvas;
use crate::path::Path2D;
use tiny_skia::Transform;

#[derive(Debug, Clone)]
pub struct TransformTracker {
    current: Transform,
}

impl TransformTracker {
    pub fn new(initial: Transform) -> Self {
        Self { current: initial }
    }

    /// The cached cumulative transform.
    pub fn current(&self) -> Transform {
        self.current
    }

    fn apply_delta<C: ImmediateCanvas>(&mut self, canvas: &mut C, path: &mut Path2D, delta: Transform) {
        if let Some(inverse) = delta.invert() {
            path.transform_in_place(inverse);
        }
        canvas.concat(delta);
        self.current = canvas.total_matrix();
    }

    pub fn translate<C: ImmediateCanvas>(
        &mut self,
        canvas: &mut C,
        path: &mut Path2D,
        tx: f32,
        ty: f32,
    ) {
        if !tx.is_finite() || !ty.is_finite() {
            return;
        }
        self.apply_delta(canvas, path, Transform::from_translate(tx, ty));
    }

    pub fn scale<C: ImmediateCanvas>(
        &mut self,
        canvas: &mut C,
        path: &mut Path2D,
        sx: f32,
        sy: f32,
    ) {
        if !sx.is_finite() || !sy.is_finite() {
            return;
        }
        self.apply_delta(canvas, path, Transform::from_scale(sx, sy));
    }

    /// Rotate by an angle in radians.
    pub fn rotate<C: ImmediateCanvas>(&mut self, canvas: &mut C, path: &mut Path2D, radians: f32) {
        if !radians.is_finite() {
            return;
        }
        let cos = radians.cos();
        let sin = radians.sin();
        self.apply_delta(canvas, path, Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0));
    }

    /// Concatenate an arbitrary matrix delta.
    #[allow(clippy::too_many_arguments)]
    pub fn transform<C: ImmediateCanvas>(
        &mut self,
        canvas: &mut C,
        path: &mut Path2D,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    ) {
        let delta = Transform::from_row(a, b, c, d, e, f);
        if !all_finite(delta) {
            return;
        }
        self.apply_delta(canvas, path, delta);
    }

    /// Replace the transform outright.
    #[allow(clippy::too_many_arguments)]
    pub fn set_transform<C: ImmediateCanvas>(
        &mut self,
        canvas: &mut C,
        path: &mut Path2D,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    ) {
        if !all_finite(Transform::from_row(a, b, c, d, e, f)) {
            return;
        }
        self.reset_transform(canvas, path);
        self.transform(canvas, path, a, b, c, d, e, f);
    }

    /// Return to the identity transform.
    pub fn reset_transform<C: ImmediateCanvas>(&mut self, canvas: &mut C, path: &mut Path2D) {
        let Some(inverse) = self.current.invert() else {
            return;
        };
        path.transform_in_place(self.current);
        canvas.concat(inverse);
        self.current = canvas.total_matrix();
    }

    /// Re-express the path in the frame of a previously saved transform.
    ///
    /// Called on `restore()`, after the snapshot is popped and before the
    /// canvas's own restore: the product `inverse(saved) . current` maps
    /// current-frame coordinates back into the saved frame.
    pub fn restore_to<C: ImmediateCanvas>(
        &mut self,
        canvas: &mut C,
        path: &mut Path2D,
        saved: Transform,
    ) {
        if let Some(saved_inverse) = saved.invert() {
            path.transform_in_place(saved_inverse.pre_concat(self.current));
        }
        canvas.restore();
        self.current = canvas.total_matrix();
    }
}

fn all_finite(t: Transform) -> bool {
    t.sx.is_finite()
        && t.ky.is_finite()
        && t.kx.is_finite()
        && t.sy.is_finite()
        && t.tx.is_finite()
        && t.ty.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CanvasRect;
    use crate::image::CanvasImage;
    use crate::paint::DerivedPaint;
    use crate::path::PathCmd;
    use crate::style::CanvasFillRule;
    use tiny_skia::Point;

    /// Minimal matrix-only canvas for tracker tests.
    struct MatrixCanvas {
        matrix: Transform,
        stack: Vec<Transform>,
    }

    impl MatrixCanvas {
        fn new() -> Self {
            Self {
                matrix: Transform::identity(),
                stack: Vec::new(),
            }
        }
    }

    impl ImmediateCanvas for MatrixCanvas {
        fn width(&self) -> u32 {
            100
        }
        fn height(&self) -> u32 {
            100
        }
        fn save(&mut self) {
            self.stack.push(self.matrix);
        }
        fn restore(&mut self) {
            if let Some(m) = self.stack.pop() {
                self.matrix = m;
            }
        }
        fn concat(&mut self, delta: Transform) {
            self.matrix = self.matrix.pre_concat(delta);
        }
        fn total_matrix(&self) -> Transform {
            self.matrix
        }
        fn draw_path(&mut self, _: &tiny_skia::Path, _: &DerivedPaint, _: CanvasFillRule) {}
        fn draw_rect(&mut self, _: CanvasRect, _: &DerivedPaint) {}
        fn draw_text(&mut self, _: &str, _: f32, _: f32, _: &DerivedPaint) {}
        fn draw_image(&mut self, _: &CanvasImage, _: CanvasRect, _: CanvasRect, _: &DerivedPaint) {}
        fn clip_path(&mut self, _: &tiny_skia::Path, _: CanvasFillRule) {}
        fn read_pixels(&self, _: i32, _: i32, _: u32, _: u32) -> Option<Vec<u8>> {
            None
        }
        fn write_pixels(&mut self, _: &[u8], _: u32, _: u32, _: i32, _: i32) {}
    }

    fn assert_point(p: Point, x: f32, y: f32) {
        assert!((p.x - x).abs() < 1e-4 && (p.y - y).abs() < 1e-4, "{:?}", p);
    }

    fn device_points(path: &Path2D, matrix: Transform) -> Vec<Point> {
        path.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                PathCmd::MoveTo(p) | PathCmd::LineTo(p) => {
                    Some(crate::path::map_point(matrix, *p))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_translate_rebakes_existing_segments() {
        let mut canvas = MatrixCanvas::new();
        let mut tracker = TransformTracker::new(canvas.total_matrix());
        let mut path = Path2D::new();

        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        tracker.translate(&mut canvas, &mut path, 5.0, 5.0);
        path.line_to(10.0, 10.0);

        let device = device_points(&path, tracker.current());
        assert_point(device[0], 0.0, 0.0);
        assert_point(device[1], 10.0, 0.0);
        assert_point(device[2], 15.0, 15.0);
    }

    #[test]
    fn test_rotation_between_segments() {
        let mut canvas = MatrixCanvas::new();
        let mut tracker = TransformTracker::new(canvas.total_matrix());
        let mut path = Path2D::new();

        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        tracker.rotate(&mut canvas, &mut path, std::f32::consts::FRAC_PI_2);
        path.line_to(10.0, 10.0);

        let device = device_points(&path, tracker.current());
        // Pre-rotation geometry keeps its device position.
        assert_point(device[0], 0.0, 0.0);
        assert_point(device[1], 10.0, 0.0);
        // The new segment goes through the rotated frame.
        assert_point(device[2], -10.0, 10.0);
    }

    #[test]
    fn test_non_finite_arguments_are_ignored() {
        let mut canvas = MatrixCanvas::new();
        let mut tracker = TransformTracker::new(canvas.total_matrix());
        let mut path = Path2D::new();
        path.move_to(1.0, 1.0);

        tracker.translate(&mut canvas, &mut path, f32::NAN, 0.0);
        tracker.scale(&mut canvas, &mut path, f32::INFINITY, 1.0);
        tracker.rotate(&mut canvas, &mut path, f32::NAN);
        tracker.set_transform(&mut canvas, &mut path, 1.0, 0.0, f32::NAN, 1.0, 0.0, 0.0);

        assert_eq!(tracker.current(), Transform::identity());
        assert_eq!(path.last_point(), Some(Point::from_xy(1.0, 1.0)));
    }

    #[test]
    fn test_reset_transform_commits_frame_into_path() {
        let mut canvas = MatrixCanvas::new();
        let mut tracker = TransformTracker::new(canvas.total_matrix());
        let mut path = Path2D::new();

        tracker.scale(&mut canvas, &mut path, 2.0, 2.0);
        path.move_to(5.0, 5.0);
        let before = device_points(&path, tracker.current());

        tracker.reset_transform(&mut canvas, &mut path);
        assert_eq!(tracker.current(), Transform::identity());
        let after = device_points(&path, tracker.current());
        assert_point(after[0], before[0].x, before[0].y);
    }

    #[test]
    fn test_set_transform_replaces_matrix() {
        let mut canvas = MatrixCanvas::new();
        let mut tracker = TransformTracker::new(canvas.total_matrix());
        let mut path = Path2D::new();

        tracker.translate(&mut canvas, &mut path, 100.0, 0.0);
        tracker.set_transform(&mut canvas, &mut path, 2.0, 0.0, 0.0, 2.0, 3.0, 4.0);
        assert_eq!(
            tracker.current(),
            Transform::from_row(2.0, 0.0, 0.0, 2.0, 3.0, 4.0)
        );
    }

    #[test]
    fn test_restore_to_reverses_interleaved_deltas() {
        let mut canvas = MatrixCanvas::new();
        let mut tracker = TransformTracker::new(canvas.total_matrix());
        let mut path = Path2D::new();

        tracker.rotate(&mut canvas, &mut path, std::f32::consts::FRAC_PI_2);
        let saved = tracker.current();
        canvas.save();

        path.move_to(3.0, 4.0);
        let before = device_points(&path, tracker.current());

        tracker.translate(&mut canvas, &mut path, 7.0, -2.0);
        tracker.scale(&mut canvas, &mut path, 3.0, 0.5);
        tracker.restore_to(&mut canvas, &mut path, saved);

        assert_eq!(tracker.current(), saved);
        let after = device_points(&path, tracker.current());
        assert_point(after[0], before[0].x, before[0].y);
    }
}
