//! The Canvas 2D context: state, attribute validation, save/restore.

mod drawing;
mod image_ops;
mod path_ops;
mod transform_ops;

use crate::canvas::ImmediateCanvas;
use crate::composite::{blend_mode_for_name, name_for_blend_mode};
use crate::error::Canvas2dResult;
use crate::font::parse_font_size;
use crate::geometry::RadialGradientParams;
use crate::gradient::CanvasGradient;
use crate::image::CanvasImage;
use crate::path::Path2D;
use crate::pattern::{CanvasPattern, Repetition};
use crate::state::{ContextState, RegisteredStyle, StateSnapshot};
use crate::style::{
    parse_color, serialize_color, FillStyle, GradientHandle, ImageSmoothingQuality, LineCap,
    LineJoin, PatternHandle,
};
use crate::transform::TransformTracker;
use std::cell::RefCell;
use std::rc::Rc;

/// A stateful Canvas 2D context drawing through an immediate-mode canvas.
///
/// Invalid attribute values (NaN, infinities, out-of-range numbers, unknown
/// composite names) are silently ignored, matching Canvas 2D semantics.
pub struct Canvas2dContext<C: ImmediateCanvas> {
    canvas: C,
    state: ContextState,
    stack: Vec<StateSnapshot>,
    tracker: TransformTracker,
    path: Path2D,
    // Styles manufactured by this context (and clones made on save), held
    // until disposal.
    cleanup: Vec<RegisteredStyle>,
}

impl<C: ImmediateCanvas> Canvas2dContext<C> {
    pub fn new(canvas: C) -> Self {
        let tracker = TransformTracker::new(canvas.total_matrix());
        Self {
            canvas,
            state: ContextState::default(),
            stack: Vec::new(),
            tracker,
            path: Path2D::new(),
            cleanup: Vec::new(),
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    // --- state stack ---

    /// Snapshot all attributes and the transform, and push the canvas's own
    /// matrix/clip state.
    pub fn save(&mut self) {
        let (state, registered) = self.state.deep_clone();
        self.cleanup.extend(registered);
        self.stack.push(StateSnapshot {
            state,
            transform: self.tracker.current(),
        });
        self.canvas.save();
    }

    /// Pop the most recent snapshot, re-baking the current path into the
    /// restored frame. A restore with an empty stack is a no-op.
    pub fn restore(&mut self) {
        let Some(snapshot) = self.stack.pop() else {
            return;
        };
        self.tracker
            .restore_to(&mut self.canvas, &mut self.path, snapshot.transform);
        self.state = snapshot.state;
    }

    /// Depth of the save stack.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    // --- compositing and alpha ---

    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return;
        }
        self.state.global_alpha = alpha;
    }

    pub fn global_composite_operation(&self) -> &'static str {
        name_for_blend_mode(self.state.composite_operation)
    }

    /// Set the composite operation by name. Unknown names are ignored;
    /// `plus-darker` is a fault.
    pub fn set_global_composite_operation(&mut self, name: &str) -> Canvas2dResult<()> {
        if let Some(mode) = blend_mode_for_name(name)? {
            self.state.composite_operation = mode;
        }
        Ok(())
    }

    // --- line attributes ---

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    pub fn set_line_width(&mut self, width: f32) {
        if !width.is_finite() || width <= 0.0 {
            return;
        }
        self.state.line_width = width;
    }

    pub fn line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn line_join(&self) -> LineJoin {
        self.state.line_join
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn miter_limit(&self) -> f32 {
        self.state.miter_limit
    }

    pub fn set_miter_limit(&mut self, limit: f32) {
        if !limit.is_finite() || limit <= 0.0 {
            return;
        }
        self.state.miter_limit = limit;
    }

    /// Set the dash pattern. Lists with negative or non-finite entries are
    /// ignored; odd-length lists are doubled.
    pub fn set_line_dash(&mut self, segments: &[f32]) {
        if segments.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return;
        }
        let mut dash = segments.to_vec();
        if dash.len() % 2 == 1 {
            dash.extend_from_slice(segments);
        }
        self.state.line_dash = dash;
    }

    pub fn line_dash(&self) -> &[f32] {
        &self.state.line_dash
    }

    pub fn line_dash_offset(&self) -> f32 {
        self.state.line_dash_offset
    }

    pub fn set_line_dash_offset(&mut self, offset: f32) {
        if !offset.is_finite() {
            return;
        }
        self.state.line_dash_offset = offset;
    }

    // --- shadow attributes ---

    pub fn shadow_blur(&self) -> f32 {
        self.state.shadow_blur
    }

    pub fn set_shadow_blur(&mut self, blur: f32) {
        if !blur.is_finite() || blur < 0.0 {
            return;
        }
        self.state.shadow_blur = blur;
    }

    pub fn shadow_color(&self) -> String {
        serialize_color(self.state.shadow_color)
    }

    /// Set the shadow color from a CSS string. Unparseable strings are
    /// ignored.
    pub fn set_shadow_color(&mut self, color: &str) {
        if let Ok(c) = parse_color(color) {
            self.state.shadow_color = c;
        }
    }

    pub fn shadow_offset_x(&self) -> f32 {
        self.state.shadow_offset_x
    }

    pub fn set_shadow_offset_x(&mut self, offset: f32) {
        if !offset.is_finite() {
            return;
        }
        self.state.shadow_offset_x = offset;
    }

    pub fn shadow_offset_y(&self) -> f32 {
        self.state.shadow_offset_y
    }

    pub fn set_shadow_offset_y(&mut self, offset: f32) {
        if !offset.is_finite() {
            return;
        }
        self.state.shadow_offset_y = offset;
    }

    // --- fill and stroke styles ---

    pub fn fill_style(&self) -> &FillStyle {
        &self.state.fill_style
    }

    /// Current fill style as a CSS color string, when it is a color.
    pub fn fill_style_css(&self) -> Option<String> {
        match &self.state.fill_style {
            FillStyle::Color(c) => Some(serialize_color(*c)),
            _ => None,
        }
    }

    /// Set the fill style from a CSS color string. Unparseable strings are
    /// ignored.
    pub fn set_fill_color(&mut self, color: &str) {
        if let Ok(c) = parse_color(color) {
            self.state.fill_style = FillStyle::Color(c);
        }
    }

    pub fn set_fill_gradient(&mut self, gradient: GradientHandle) {
        self.state.fill_style = FillStyle::Gradient(gradient);
    }

    pub fn set_fill_pattern(&mut self, pattern: PatternHandle) {
        self.state.fill_style = FillStyle::Pattern(pattern);
    }

    pub fn stroke_style(&self) -> &FillStyle {
        &self.state.stroke_style
    }

    pub fn stroke_style_css(&self) -> Option<String> {
        match &self.state.stroke_style {
            FillStyle::Color(c) => Some(serialize_color(*c)),
            _ => None,
        }
    }

    pub fn set_stroke_color(&mut self, color: &str) {
        if let Ok(c) = parse_color(color) {
            self.state.stroke_style = FillStyle::Color(c);
        }
    }

    pub fn set_stroke_gradient(&mut self, gradient: GradientHandle) {
        self.state.stroke_style = FillStyle::Gradient(gradient);
    }

    pub fn set_stroke_pattern(&mut self, pattern: PatternHandle) {
        self.state.stroke_style = FillStyle::Pattern(pattern);
    }

    // --- image smoothing ---

    pub fn image_smoothing_enabled(&self) -> bool {
        self.state.image_smoothing_enabled
    }

    pub fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.state.image_smoothing_enabled = enabled;
    }

    pub fn image_smoothing_quality(&self) -> ImageSmoothingQuality {
        self.state.image_smoothing_quality
    }

    pub fn set_image_smoothing_quality(&mut self, quality: ImageSmoothingQuality) {
        self.state.image_smoothing_quality = quality;
    }

    // --- font ---

    pub fn font(&self) -> &str {
        &self.state.font
    }

    /// Set the font shorthand. Strings without a parseable size are ignored.
    pub fn set_font(&mut self, font: &str) {
        if let Ok(size) = parse_font_size(font) {
            self.state.font = font.to_string();
            self.state.text_size = size;
        }
    }

    // --- style object factories ---

    /// Create a linear gradient. Non-finite coordinates yield `None`.
    pub fn create_linear_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    ) -> Option<GradientHandle> {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let handle = Rc::new(RefCell::new(CanvasGradient::new_linear(x0, y0, x1, y1)));
        self.cleanup.push(RegisteredStyle::Gradient(handle.clone()));
        Some(handle)
    }

    /// Create a radial gradient. Non-finite parameters yield `None`.
    pub fn create_radial_gradient(&mut self, params: RadialGradientParams) -> Option<GradientHandle> {
        if !params.is_finite() {
            return None;
        }
        let handle = Rc::new(RefCell::new(CanvasGradient::new_radial(params)));
        self.cleanup.push(RegisteredStyle::Gradient(handle.clone()));
        Some(handle)
    }

    /// Create a pattern from an image. Unknown repetition names are a fault.
    pub fn create_pattern(
        &mut self,
        image: &CanvasImage,
        repetition: &str,
    ) -> Canvas2dResult<PatternHandle> {
        let repetition: Repetition = repetition.parse()?;
        let pattern = CanvasPattern::from_image(image, repetition)?;
        let handle = Rc::new(RefCell::new(pattern));
        self.cleanup.push(RegisteredStyle::Pattern(handle.clone()));
        Ok(handle)
    }

    /// Release every style object this context manufactured. Dropping the
    /// context releases them as well; this only makes the release early and
    /// explicit.
    pub fn dispose(&mut self) {
        self.cleanup.clear();
    }
}
