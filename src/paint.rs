//! Ephemeral paint derivation from context state.
//!
//! A [`DerivedPaint`] is built per draw call and owns everything it samples
//! from, so releasing it is just `Drop`. Backends materialize a
//! `tiny_skia::Paint` from it at submission time.

use crate::state::ContextState;
use crate::style::{FillStyle, ImageSmoothingQuality};
use std::rc::Rc;
use tiny_skia::{
    BlendMode, Color, FilterQuality, Paint, Pixmap, Shader, SpreadMode, Stroke, StrokeDash,
    Transform,
};

/// Fully owned shader description.
#[derive(Debug, Clone)]
pub enum ShaderSpec {
    Solid(Color),
    Gradient(Shader<'static>),
    Pattern {
        pixmap: Rc<Pixmap>,
        spread: SpreadMode,
        transform: Transform,
        quality: FilterQuality,
        opacity: f32,
    },
}

/// Stroke geometry parameters carried by stroke paints.
#[derive(Debug, Clone)]
pub struct StrokeParams {
    pub width: f32,
    pub cap: tiny_skia::LineCap,
    pub join: tiny_skia::LineJoin,
    pub miter_limit: f32,
    pub dash: Option<(Vec<f32>, f32)>,
}

/// Whether a paint fills or strokes.
#[derive(Debug, Clone)]
pub enum PaintKind {
    Fill,
    Stroke(StrokeParams),
}

/// A paint derived from the context state for a single draw call.
#[derive(Debug, Clone)]
pub struct DerivedPaint {
    pub shader: ShaderSpec,
    pub kind: PaintKind,
    pub blend_mode: BlendMode,
    pub anti_alias: bool,
    /// True for paints produced by shadow derivation; image draws use this
    /// to render a tinted silhouette instead of the image pixels.
    pub is_shadow: bool,
    /// Gaussian sigma for shadow paints.
    pub blur_sigma: Option<f32>,
    /// Sampling quality for image draws.
    pub filter_quality: FilterQuality,
    /// Text size for text draws.
    pub text_size: f32,
}

impl DerivedPaint {
    /// Materialize a `tiny_skia::Paint` borrowing from this derived paint.
    pub fn to_paint(&self) -> Paint<'_> {
        let shader = match &self.shader {
            ShaderSpec::Solid(color) => Shader::SolidColor(*color),
            ShaderSpec::Gradient(shader) => shader.clone(),
            ShaderSpec::Pattern {
                pixmap,
                spread,
                transform,
                quality,
                opacity,
            } => tiny_skia::Pattern::new(pixmap.as_ref().as_ref(), *spread, *quality, *opacity, *transform),
        };
        Paint {
            shader,
            blend_mode: self.blend_mode,
            anti_alias: self.anti_alias,
            ..Paint::default()
        }
    }

    /// Build the stroke description, with widths and dash intervals scaled by
    /// the given factor. Returns `None` for fill paints.
    pub fn stroke_with_scale(&self, scale: f32) -> Option<Stroke> {
        let PaintKind::Stroke(params) = &self.kind else {
            return None;
        };
        let dash = params.dash.as_ref().and_then(|(intervals, offset)| {
            let scaled: Vec<f32> = intervals.iter().map(|v| v * scale).collect();
            StrokeDash::new(scaled, offset * scale)
        });
        Some(Stroke {
            width: params.width * scale,
            miter_limit: params.miter_limit,
            line_cap: params.cap,
            line_join: params.join,
            dash,
        })
    }
}

fn quality_for(state: &ContextState) -> FilterQuality {
    if !state.image_smoothing_enabled {
        return FilterQuality::Nearest;
    }
    match state.image_smoothing_quality {
        ImageSmoothingQuality::Low | ImageSmoothingQuality::Medium => FilterQuality::Bilinear,
        ImageSmoothingQuality::High => FilterQuality::Bicubic,
    }
}

fn shader_for_style(
    style: &FillStyle,
    state: &ContextState,
    transform: Transform,
    canvas_width: u32,
    canvas_height: u32,
) -> ShaderSpec {
    match style {
        FillStyle::Color(color) => {
            let mut c = *color;
            c.set_alpha((c.alpha() * state.global_alpha).clamp(0.0, 1.0));
            ShaderSpec::Solid(c)
        }
        FillStyle::Gradient(gradient) => {
            match gradient.borrow().shader(transform, state.global_alpha) {
                Some(shader) => ShaderSpec::Gradient(shader),
                None => ShaderSpec::Solid(Color::TRANSPARENT),
            }
        }
        FillStyle::Pattern(pattern) => {
            let pattern = pattern.borrow();
            match pattern.backing_pixmap(canvas_width, canvas_height) {
                // Pattern placement follows the pattern's own transform, not
                // the context transform.
                Some(pixmap) => ShaderSpec::Pattern {
                    pixmap: Rc::new(pixmap),
                    spread: pattern.spread_mode(),
                    transform: pattern.raw_transform(),
                    quality: quality_for(state),
                    opacity: state.global_alpha,
                },
                None => ShaderSpec::Solid(Color::TRANSPARENT),
            }
        }
    }
}

/// Derive the fill paint.
pub fn fill_paint(
    state: &ContextState,
    transform: Transform,
    canvas_width: u32,
    canvas_height: u32,
) -> DerivedPaint {
    DerivedPaint {
        shader: shader_for_style(
            &state.fill_style,
            state,
            transform,
            canvas_width,
            canvas_height,
        ),
        kind: PaintKind::Fill,
        blend_mode: state.composite_operation,
        anti_alias: true,
        is_shadow: false,
        blur_sigma: None,
        filter_quality: quality_for(state),
        text_size: state.text_size,
    }
}

/// Derive the stroke paint: the fill paint plus line geometry and dashes.
pub fn stroke_paint(
    state: &ContextState,
    transform: Transform,
    canvas_width: u32,
    canvas_height: u32,
) -> DerivedPaint {
    let dash = if state.line_dash.is_empty() {
        None
    } else {
        Some((state.line_dash.clone(), state.line_dash_offset))
    };
    DerivedPaint {
        shader: shader_for_style(
            &state.stroke_style,
            state,
            transform,
            canvas_width,
            canvas_height,
        ),
        kind: PaintKind::Stroke(StrokeParams {
            width: state.line_width,
            cap: state.line_cap.into(),
            join: state.line_join.into(),
            miter_limit: state.miter_limit,
            dash,
        }),
        blend_mode: state.composite_operation,
        anti_alias: true,
        is_shadow: false,
        blur_sigma: None,
        filter_quality: quality_for(state),
        text_size: state.text_size,
    }
}

/// Derive the shadow paint for a base paint, or `None` when the current
/// shadow state produces no visible shadow.
pub fn shadow_paint(state: &ContextState, base: &DerivedPaint) -> Option<DerivedPaint> {
    let mut color = state.shadow_color;
    color.set_alpha((color.alpha() * state.global_alpha).clamp(0.0, 1.0));
    if color.alpha() == 0.0 {
        return None;
    }
    if state.shadow_blur == 0.0 && state.shadow_offset_x == 0.0 && state.shadow_offset_y == 0.0 {
        return None;
    }
    let mut paint = base.clone();
    paint.shader = ShaderSpec::Solid(color);
    paint.is_shadow = true;
    if state.shadow_blur > 0.0 {
        paint.blur_sigma = Some((state.shadow_blur / 2.0).max(1.0));
    }
    Some(paint)
}

/// Derive the paint used for image draws.
pub fn image_paint(
    state: &ContextState,
    transform: Transform,
    canvas_width: u32,
    canvas_height: u32,
) -> DerivedPaint {
    let mut paint = fill_paint(state, transform, canvas_width, canvas_height);
    // Image draws modulate by global alpha directly rather than by fill color.
    paint.shader = ShaderSpec::Solid(Color::from_rgba(0.0, 0.0, 0.0, state.global_alpha).unwrap_or(Color::BLACK));
    paint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ContextState {
        ContextState::default()
    }

    #[test]
    fn test_fill_paint_applies_global_alpha() {
        let mut s = state();
        s.global_alpha = 0.5;
        let paint = fill_paint(&s, Transform::identity(), 100, 100);
        match paint.shader {
            ShaderSpec::Solid(c) => assert!((c.alpha() - 0.5).abs() < 1e-6),
            other => panic!("unexpected shader: {:?}", other),
        }
    }

    #[test]
    fn test_stroke_paint_without_dash() {
        let s = state();
        let paint = stroke_paint(&s, Transform::identity(), 100, 100);
        let stroke = paint.stroke_with_scale(1.0).unwrap();
        assert_eq!(stroke.width, 1.0);
        assert!(stroke.dash.is_none());
    }

    #[test]
    fn test_stroke_scale_applies_to_width_and_dash() {
        let mut s = state();
        s.line_width = 2.0;
        s.line_dash = vec![4.0, 2.0];
        let paint = stroke_paint(&s, Transform::identity(), 100, 100);
        let stroke = paint.stroke_with_scale(3.0).unwrap();
        assert_eq!(stroke.width, 6.0);
        assert!(stroke.dash.is_some());
    }

    #[test]
    fn test_shadow_paint_none_when_transparent() {
        let mut s = state();
        s.shadow_blur = 5.0;
        let base = fill_paint(&s, Transform::identity(), 100, 100);
        assert!(shadow_paint(&s, &base).is_none());
    }

    #[test]
    fn test_shadow_paint_none_when_no_blur_or_offset() {
        let mut s = state();
        s.shadow_color = Color::from_rgba8(0, 0, 0, 255);
        let base = fill_paint(&s, Transform::identity(), 100, 100);
        assert!(shadow_paint(&s, &base).is_none());
    }

    #[test]
    fn test_shadow_paint_sigma_floor() {
        let mut s = state();
        s.shadow_color = Color::from_rgba8(0, 0, 0, 255);
        s.shadow_blur = 1.0;
        let base = fill_paint(&s, Transform::identity(), 100, 100);
        let shadow = shadow_paint(&s, &base).unwrap();
        assert_eq!(shadow.blur_sigma, Some(1.0));
    }

    #[test]
    fn test_shadow_paint_with_offset_only_has_no_blur() {
        let mut s = state();
        s.shadow_color = Color::from_rgba8(0, 0, 0, 255);
        s.shadow_offset_x = 4.0;
        let base = fill_paint(&s, Transform::identity(), 100, 100);
        let shadow = shadow_paint(&s, &base).unwrap();
        assert_eq!(shadow.blur_sigma, None);
    }

    #[test]
    fn test_nearest_quality_when_smoothing_disabled() {
        let mut s = state();
        s.image_smoothing_enabled = false;
        let paint = image_paint(&s, Transform::identity(), 100, 100);
        assert_eq!(paint.filter_quality, FilterQuality::Nearest);
    }
}
