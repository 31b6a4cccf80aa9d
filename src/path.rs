//! Path construction and in-place transformation.
//!
//! The context keeps its current path in the active user frame, which means
//! every transform change has to re-express the recorded coordinates. A
//! command list supports that rewrite without losing trailing move-to
//! commands the way a finished path would.

use tiny_skia::{Path, PathBuilder, Point, Transform};

/// A single recorded path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// Map a point through an affine transform.
pub(crate) fn map_point(t: Transform, p: Point) -> Point {
    Point::from_xy(
        t.sx * p.x + t.kx * p.y + t.tx,
        t.ky * p.x + t.sy * p.y + t.ty,
    )
}

/// Incrementally built path with in-place matrix transform support.
#[derive(Debug, Clone, Default)]
pub struct Path2D {
    cmds: Vec<PathCmd>,
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl Path2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
        self.current = None;
        self.subpath_start = None;
    }

    /// Current point, if any command has established one.
    pub fn last_point(&self) -> Option<Point> {
        self.current
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = Point::from_xy(x, y);
        self.cmds.push(PathCmd::MoveTo(p));
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    /// Line to (x, y). With no current point this starts a new subpath there.
    pub fn line_to(&mut self, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        let p = Point::from_xy(x, y);
        self.cmds.push(PathCmd::LineTo(p));
        self.current = Some(p);
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_to(cx, cy);
        }
        let p = Point::from_xy(x, y);
        self.cmds.push(PathCmd::QuadTo(Point::from_xy(cx, cy), p));
        self.current = Some(p);
    }

    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_to(c1x, c1y);
        }
        let p = Point::from_xy(x, y);
        self.cmds.push(PathCmd::CubicTo(
            Point::from_xy(c1x, c1y),
            Point::from_xy(c2x, c2y),
            p,
        ));
        self.current = Some(p);
    }

    /// Close the current subpath. Empty paths are left untouched.
    pub fn close(&mut self) {
        if self.cmds.is_empty() {
            return;
        }
        self.cmds.push(PathCmd::Close);
        self.current = self.subpath_start;
    }

    /// Append a closed rectangle subpath.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close();
    }

    /// Re-express every recorded coordinate through the given transform.
    pub fn transform_in_place(&mut self, t: Transform) {
        for cmd in &mut self.cmds {
            match cmd {
                PathCmd::MoveTo(p) | PathCmd::LineTo(p) => *p = map_point(t, *p),
                PathCmd::QuadTo(c, p) => {
                    *c = map_point(t, *c);
                    *p = map_point(t, *p);
                }
                PathCmd::CubicTo(c1, c2, p) => {
                    *c1 = map_point(t, *c1);
                    *c2 = map_point(t, *c2);
                    *p = map_point(t, *p);
                }
                PathCmd::Close => {}
            }
        }
        self.current = self.current.map(|p| map_point(t, p));
        self.subpath_start = self.subpath_start.map(|p| map_point(t, p));
    }

    /// Materialize as a renderable path. `None` when there is nothing to draw.
    pub fn to_path(&self) -> Option<Path> {
        let mut builder = PathBuilder::new();
        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => builder.move_to(p.x, p.y),
                PathCmd::LineTo(p) => builder.line_to(p.x, p.y),
                PathCmd::QuadTo(c, p) => builder.quad_to(c.x, c.y, p.x, p.y),
                PathCmd::CubicTo(c1, c2, p) => builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathCmd::Close => builder.close(),
            }
        }
        builder.finish()
    }
}
