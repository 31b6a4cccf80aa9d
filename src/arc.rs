//! Arc segments via cubic bezier approximation.
//!
//! The backing path types have no arc primitive, so sweeps are split into
//! segments of at most a quarter turn and each segment becomes one cubic.

use crate::path::Path2D;
use std::f32::consts::PI;

const TWO_PI: f32 = 2.0 * PI;

/// Wrap the start angle into [0, 2pi), shifting the end angle by the same
/// amount so the sweep is preserved.
pub(crate) fn canonicalize_angles(start_angle: f32, end_angle: f32) -> (f32, f32) {
    let mut new_start = start_angle % TWO_PI;
    if new_start < 0.0 {
        new_start += TWO_PI;
    }
    (new_start, end_angle + (new_start - start_angle))
}

/// Clamp the end angle so the sweep covers at most one full turn in the
/// requested direction, and always moves in that direction.
pub(crate) fn adjust_end_angle(start_angle: f32, end_angle: f32, anticlockwise: bool) -> f32 {
    if !anticlockwise && end_angle - start_angle >= TWO_PI {
        start_angle + TWO_PI
    } else if anticlockwise && start_angle - end_angle >= TWO_PI {
        start_angle - TWO_PI
    } else if !anticlockwise && start_angle > end_angle {
        start_angle + (TWO_PI - (start_angle - end_angle) % TWO_PI)
    } else if anticlockwise && start_angle < end_angle {
        start_angle - (TWO_PI - (end_angle - start_angle) % TWO_PI)
    } else {
        end_angle
    }
}

/// Append a circular arc. A current point connects to the arc start with a
/// straight line, per the Canvas path model.
pub fn arc(
    path: &mut Path2D,
    x: f32,
    y: f32,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    anticlockwise: bool,
) {
    ellipse(
        path,
        x,
        y,
        radius,
        radius,
        0.0,
        start_angle,
        end_angle,
        anticlockwise,
    );
}

/// Append an elliptical arc.
#[allow(clippy::too_many_arguments)]
pub fn ellipse(
    path: &mut Path2D,
    x: f32,
    y: f32,
    radius_x: f32,
    radius_y: f32,
    rotation: f32,
    start_angle: f32,
    end_angle: f32,
    anticlockwise: bool,
) {
    let (start, end) = canonicalize_angles(start_angle, end_angle);
    let end = adjust_end_angle(start, end, anticlockwise);
    let sweep = end - start;

    let cos_rot = rotation.cos();
    let sin_rot = rotation.sin();

    let point_at = |angle: f32| -> (f32, f32) {
        let px = radius_x * angle.cos();
        let py = radius_y * angle.sin();
        (
            x + px * cos_rot - py * sin_rot,
            y + px * sin_rot + py * cos_rot,
        )
    };

    let (start_x, start_y) = point_at(start);
    if path.last_point().is_some() {
        path.line_to(start_x, start_y);
    } else {
        path.move_to(start_x, start_y);
    }

    if sweep == 0.0 || radius_x == 0.0 || radius_y == 0.0 {
        return;
    }

    let num_segments = ((sweep.abs() / (PI / 2.0)).ceil() as usize).max(1);
    let segment_angle = sweep / num_segments as f32;

    for i in 0..num_segments {
        let angle1 = start + i as f32 * segment_angle;
        let angle2 = start + (i + 1) as f32 * segment_angle;
        arc_segment(
            path, x, y, radius_x, radius_y, cos_rot, sin_rot, angle1, angle2,
        );
    }
}

/// One arc segment as a cubic bezier. The sweep may be negative.
#[allow(clippy::too_many_arguments)]
fn arc_segment(
    path: &mut Path2D,
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    cos_rot: f32,
    sin_rot: f32,
    angle1: f32,
    angle2: f32,
) {
    let k = 4.0 / 3.0 * ((angle2 - angle1) / 4.0).tan();

    let x1 = angle1.cos();
    let y1 = angle1.sin();
    let x2 = angle2.cos();
    let y2 = angle2.sin();

    let cp1x = x1 - k * y1;
    let cp1y = y1 + k * x1;
    let cp2x = x2 + k * y2;
    let cp2y = y2 - k * x2;

    let transform_point = |px: f32, py: f32| -> (f32, f32) {
        let tx = rx * px;
        let ty = ry * py;
        (
            cx + tx * cos_rot - ty * sin_rot,
            cy + tx * sin_rot + ty * cos_rot,
        )
    };

    let (c1x, c1y) = transform_point(cp1x, cp1y);
    let (c2x, c2y) = transform_point(cp2x, cp2y);
    let (ex, ey) = transform_point(x2, y2);

    path.cubic_to(c1x, c1y, c2x, c2y, ex, ey);
}

/// Append an arc connecting the current point toward (x1, y1) then (x2, y2)
/// with the given radius. With no current point this only establishes one at
/// (x1, y1).
pub fn arc_to(path: &mut Path2D, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
    let Some(start) = path.last_point() else {
        path.move_to(x1, y1);
        return;
    };
    let (x0, y0) = (start.x, start.y);

    if radius == 0.0 {
        path.line_to(x1, y1);
        return;
    }

    let v1x = x0 - x1;
    let v1y = y0 - y1;
    let v2x = x2 - x1;
    let v2y = y2 - y1;

    let len1 = (v1x * v1x + v1y * v1y).sqrt();
    let len2 = (v2x * v2x + v2y * v2y).sqrt();
    if len1 < 1e-6 || len2 < 1e-6 {
        path.line_to(x1, y1);
        return;
    }

    let v1x = v1x / len1;
    let v1y = v1y / len1;
    let v2x = v2x / len2;
    let v2y = v2y / len2;

    let cross = v1x * v2y - v1y * v2x;
    let dot = v1x * v2x + v1y * v2y;
    let angle = cross.atan2(dot);
    if angle.abs() < 1e-6 {
        path.line_to(x1, y1);
        return;
    }

    let tan_half = (angle / 2.0).tan().abs();
    let seg_len = radius / tan_half;

    let start_x = x1 + v1x * seg_len;
    let start_y = y1 + v1y * seg_len;
    let end_x = x1 + v2x * seg_len;
    let end_y = y1 + v2y * seg_len;

    let sign = if cross < 0.0 { -1.0 } else { 1.0 };
    let nx = -v1y * sign;
    let ny = v1x * sign;
    let cx = start_x + nx * radius;
    let cy = start_y + ny * radius;

    let start_angle = (start_y - cy).atan2(start_x - cx);
    let end_angle = (end_y - cy).atan2(end_x - cx);

    path.line_to(start_x, start_y);
    arc(path, cx, cy, radius, start_angle, end_angle, cross > 0.0);
}
