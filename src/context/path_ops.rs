//! Path building and hit testing.

use super::Canvas2dContext;
use crate::arc;
use crate::canvas::ImmediateCanvas;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::hit_test::path_contains;
use crate::path::{map_point, Path2D};
use crate::style::CanvasFillRule;
use tiny_skia::{PathStroker, Point, Stroke};

fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl<C: ImmediateCanvas> Canvas2dContext<C> {
    /// Discard the current path and start a new one.
    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    /// Read access to the current path.
    pub fn current_path(&self) -> &Path2D {
        &self.path
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if !all_finite(&[x, y]) {
            return;
        }
        self.path.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if !all_finite(&[x, y]) {
            return;
        }
        self.path.line_to(x, y);
    }

    pub fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        if !all_finite(&[c1x, c1y, c2x, c2y, x, y]) {
            return;
        }
        self.path.cubic_to(c1x, c1y, c2x, c2y, x, y);
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        if !all_finite(&[cx, cy, x, y]) {
            return;
        }
        self.path.quad_to(cx, cy, x, y);
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if !all_finite(&[x, y, width, height]) {
            return;
        }
        self.path.rect(x, y, width, height);
    }

    /// Append a circular arc. Negative radii are a fault.
    pub fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) -> Canvas2dResult<()> {
        if !all_finite(&[x, y, radius, start_angle, end_angle]) {
            return Ok(());
        }
        if radius < 0.0 {
            return Err(Canvas2dError::NegativeRadius);
        }
        arc::arc(
            &mut self.path,
            x,
            y,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        );
        Ok(())
    }

    /// Append an elliptical arc. Negative radii are a fault.
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    ) -> Canvas2dResult<()> {
        if !all_finite(&[x, y, radius_x, radius_y, rotation, start_angle, end_angle]) {
            return Ok(());
        }
        if radius_x < 0.0 || radius_y < 0.0 {
            return Err(Canvas2dError::NegativeRadius);
        }
        arc::ellipse(
            &mut self.path,
            x,
            y,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
            anticlockwise,
        );
        Ok(())
    }

    /// Append an arc between two tangent lines. Negative radii are a fault.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) -> Canvas2dResult<()> {
        if !all_finite(&[x1, y1, x2, y2, radius]) {
            return Ok(());
        }
        if radius < 0.0 {
            return Err(Canvas2dError::NegativeRadius);
        }
        arc::arc_to(&mut self.path, x1, y1, x2, y2, radius);
        Ok(())
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    /// Map a device-space probe point into the current user frame.
    fn probe_point(&self, x: f32, y: f32) -> Option<Point> {
        if !all_finite(&[x, y]) {
            return None;
        }
        let inverse = self.tracker.current().invert()?;
        Some(map_point(inverse, Point::from_xy(x, y)))
    }

    /// Whether the filled region of the current path contains the point.
    /// The probe coordinates are device-space, unaffected by the transform.
    pub fn is_point_in_path(&self, x: f32, y: f32, rule: CanvasFillRule) -> bool {
        let Some(probe) = self.probe_point(x, y) else {
            return false;
        };
        let Some(path) = self.path.to_path() else {
            return false;
        };
        path_contains(&path, probe.x, probe.y, rule)
    }

    /// Whether the stroked outline of the current path contains the point,
    /// under the current line attributes.
    pub fn is_point_in_stroke(&self, x: f32, y: f32) -> bool {
        let Some(probe) = self.probe_point(x, y) else {
            return false;
        };
        let Some(path) = self.path.to_path() else {
            return false;
        };
        let stroke = Stroke {
            width: self.state.line_width,
            miter_limit: self.state.miter_limit,
            line_cap: self.state.line_cap.into(),
            line_join: self.state.line_join.into(),
            dash: None,
        };
        let Some(outline) = PathStroker::new().stroke(&path, &stroke, 1.0) else {
            return false;
        };
        path_contains(&outline, probe.x, probe.y, CanvasFillRule::Nonzero)
    }
}
