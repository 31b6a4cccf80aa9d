//! Context drawing state and save/restore snapshots.

use crate::style::{
    FillStyle, GradientHandle, ImageSmoothingQuality, LineCap, LineJoin, PatternHandle,
};
use std::cell::RefCell;
use std::rc::Rc;
use tiny_skia::{BlendMode, Color, Transform};

/// A style object manufactured by the context, kept alive until disposal.
#[derive(Debug, Clone)]
pub enum RegisteredStyle {
    Gradient(GradientHandle),
    Pattern(PatternHandle),
}

/// Everything `save`/`restore` snapshots except the transform, which lives in
/// the transform tracker and is captured alongside.
#[derive(Debug, Clone)]
pub struct ContextState {
    pub fill_style: FillStyle,
    pub stroke_style: FillStyle,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub line_dash: Vec<f32>,
    pub line_dash_offset: f32,
    pub shadow_blur: f32,
    pub shadow_color: Color,
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
    pub global_alpha: f32,
    pub composite_operation: BlendMode,
    pub image_smoothing_enabled: bool,
    pub image_smoothing_quality: ImageSmoothingQuality,
    pub font: String,
    pub text_size: f32,
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            fill_style: FillStyle::Color(Color::BLACK),
            stroke_style: FillStyle::Color(Color::BLACK),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            shadow_blur: 0.0,
            shadow_color: Color::TRANSPARENT,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            global_alpha: 1.0,
            composite_operation: BlendMode::SourceOver,
            image_smoothing_enabled: true,
            image_smoothing_quality: ImageSmoothingQuality::Low,
            font: "10px sans-serif".to_string(),
            text_size: 10.0,
        }
    }
}

impl ContextState {
    /// Deep copy for `save`: scalars and the dash list clone directly, while
    /// gradient and pattern styles are cloned into fresh handles so later
    /// mutation of the live object cannot leak into the snapshot. Freshly
    /// created handles are returned for the cleanup registry.
    pub fn deep_clone(&self) -> (Self, Vec<RegisteredStyle>) {
        let mut registered = Vec::new();
        let mut snapshot = self.clone();
        snapshot.fill_style = deep_clone_style(&self.fill_style, &mut registered);
        snapshot.stroke_style = deep_clone_style(&self.stroke_style, &mut registered);
        (snapshot, registered)
    }
}

fn deep_clone_style(style: &FillStyle, registered: &mut Vec<RegisteredStyle>) -> FillStyle {
    match style {
        FillStyle::Color(c) => FillStyle::Color(*c),
        FillStyle::Gradient(g) => {
            let clone: GradientHandle = Rc::new(RefCell::new(g.borrow().clone()));
            registered.push(RegisteredStyle::Gradient(clone.clone()));
            FillStyle::Gradient(clone)
        }
        FillStyle::Pattern(p) => {
            let clone: PatternHandle = Rc::new(RefCell::new(p.borrow().clone()));
            registered.push(RegisteredStyle::Pattern(clone.clone()));
            FillStyle::Pattern(clone)
        }
    }
}

/// One entry on the save stack.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub state: ContextState,
    pub transform: Transform,
}
