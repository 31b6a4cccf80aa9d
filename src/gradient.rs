//! Gradient style objects.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::RadialGradientParams;
use tiny_skia::{
    Color, GradientStop, LinearGradient, Point, RadialGradient, Shader, SpreadMode, Transform,
};

/// A color stop in a gradient.
#[derive(Debug, Clone)]
pub struct ColorStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: Color,
}

/// Gradient geometry.
#[derive(Debug, Clone)]
pub enum GradientGeometry {
    /// Linear gradient from (x0, y0) to (x1, y1).
    Linear { x0: f32, y0: f32, x1: f32, y1: f32 },
    /// Radial gradient from inner circle to outer circle.
    Radial(RadialGradientParams),
}

/// Canvas gradient (linear or radial).
#[derive(Debug, Clone)]
pub struct CanvasGradient {
    geometry: GradientGeometry,
    stops: Vec<ColorStop>,
}

impl CanvasGradient {
    pub fn new_linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            geometry: GradientGeometry::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    pub fn new_radial(params: RadialGradientParams) -> Self {
        Self {
            geometry: GradientGeometry::Radial(params),
            stops: Vec::new(),
        }
    }

    /// Add a color stop at the given offset.
    ///
    /// Offsets must be finite and within [0, 1]. Adding a stop at an offset
    /// that already exists replaces its color. Stops are kept sorted.
    pub fn add_color_stop(&mut self, offset: f64, color: Color) -> Canvas2dResult<()> {
        if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
            return Err(Canvas2dError::InvalidArgument(format!(
                "Invalid color stop offset: {}",
                offset
            )));
        }
        if let Some(existing) = self.stops.iter_mut().find(|s| s.offset == offset) {
            existing.color = color;
            return Ok(());
        }
        let index = self
            .stops
            .iter()
            .position(|s| s.offset > offset)
            .unwrap_or(self.stops.len());
        self.stops.insert(index, ColorStop { offset, color });
        Ok(())
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn geometry(&self) -> &GradientGeometry {
        &self.geometry
    }

    /// Build a shader for this gradient under the given transform.
    ///
    /// The global alpha is folded into the stop colors; the backend applies
    /// the shader without further alpha modulation. Returns `None` for
    /// degenerate geometry or an empty stop list.
    pub fn shader(&self, transform: Transform, global_alpha: f32) -> Option<Shader<'static>> {
        if self.stops.is_empty() {
            return None;
        }
        let stops: Vec<GradientStop> = self
            .stops
            .iter()
            .map(|s| {
                let mut color = s.color;
                color.set_alpha((color.alpha() * global_alpha).clamp(0.0, 1.0));
                GradientStop::new(s.offset as f32, color)
            })
            .collect();

        match self.geometry {
            GradientGeometry::Linear { x0, y0, x1, y1 } => LinearGradient::new(
                Point::from_xy(x0, y0),
                Point::from_xy(x1, y1),
                stops,
                SpreadMode::Pad,
                transform,
            ),
            GradientGeometry::Radial(params) => RadialGradient::new(
                Point::from_xy(params.x0, params.y0),
                Point::from_xy(params.x1, params.y1),
                params.r1,
                stops,
                SpreadMode::Pad,
                transform,
            ),
        }
    }
}
