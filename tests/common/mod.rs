//! A recording canvas double: applies matrix state like a real backend but
//! records every call for sequencing assertions.

use html_canvas2d::{
    CanvasFillRule, CanvasImage, CanvasRect, DerivedPaint, ImmediateCanvas, PaintKind,
};
use tiny_skia::{BlendMode, Path, PathSegment, Transform};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Save,
    Restore,
    Concat(Transform),
    DrawPath {
        /// Endpoint coordinates mapped to device space at submission time.
        device_points: Vec<(f32, f32)>,
        stroked: bool,
        shadow: bool,
        blurred: bool,
        blend_mode: BlendMode,
    },
    DrawRect {
        rect: CanvasRect,
        shadow: bool,
        blend_mode: BlendMode,
    },
    DrawText {
        text: String,
        shadow: bool,
        blurred: bool,
    },
    DrawImage {
        dst: CanvasRect,
        shadow: bool,
    },
    Clip {
        rule: CanvasFillRule,
    },
}

pub struct RecordingCanvas {
    matrix: Transform,
    stack: Vec<Transform>,
    pub calls: Vec<Call>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            matrix: Transform::identity(),
            stack: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn draw_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::DrawPath { .. }
                        | Call::DrawRect { .. }
                        | Call::DrawText { .. }
                        | Call::DrawImage { .. }
                )
            })
            .collect()
    }

    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        let t = self.matrix;
        (t.sx * x + t.kx * y + t.tx, t.ky * x + t.sy * y + t.ty)
    }
}

impl ImmediateCanvas for RecordingCanvas {
    fn width(&self) -> u32 {
        200
    }

    fn height(&self) -> u32 {
        200
    }

    fn save(&mut self) {
        self.stack.push(self.matrix);
        self.calls.push(Call::Save);
    }

    fn restore(&mut self) {
        if let Some(m) = self.stack.pop() {
            self.matrix = m;
        }
        self.calls.push(Call::Restore);
    }

    fn concat(&mut self, delta: Transform) {
        self.matrix = self.matrix.pre_concat(delta);
        self.calls.push(Call::Concat(delta));
    }

    fn total_matrix(&self) -> Transform {
        self.matrix
    }

    fn draw_path(&mut self, path: &Path, paint: &DerivedPaint, _fill_rule: CanvasFillRule) {
        let device_points = path
            .segments()
            .filter_map(|segment| match segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => Some(self.map(p.x, p.y)),
                _ => None,
            })
            .collect();
        self.calls.push(Call::DrawPath {
            device_points,
            stroked: matches!(paint.kind, PaintKind::Stroke(_)),
            shadow: paint.is_shadow,
            blurred: paint.blur_sigma.is_some(),
            blend_mode: paint.blend_mode,
        });
    }

    fn draw_rect(&mut self, rect: CanvasRect, paint: &DerivedPaint) {
        self.calls.push(Call::DrawRect {
            rect,
            shadow: paint.is_shadow,
            blend_mode: paint.blend_mode,
        });
    }

    fn draw_text(&mut self, text: &str, _x: f32, _y: f32, paint: &DerivedPaint) {
        self.calls.push(Call::DrawText {
            text: text.to_string(),
            shadow: paint.is_shadow,
            blurred: paint.blur_sigma.is_some(),
        });
    }

    fn draw_image(
        &mut self,
        _image: &CanvasImage,
        _src: CanvasRect,
        dst: CanvasRect,
        paint: &DerivedPaint,
    ) {
        self.calls.push(Call::DrawImage {
            dst,
            shadow: paint.is_shadow,
        });
    }

    fn clip_path(&mut self, _path: &Path, rule: CanvasFillRule) {
        self.calls.push(Call::Clip { rule });
    }

    fn read_pixels(&self, _x: i32, _y: i32, width: u32, height: u32) -> Option<Vec<u8>> {
        Some(vec![0; (width as usize) * (height as usize) * 4])
    }

    fn write_pixels(&mut self, _data: &[u8], _width: u32, _height: u32, _x: i32, _y: i32) {}
}
