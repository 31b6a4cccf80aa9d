//! Small geometry parameter types shared across the API surface.

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Flip negative extents so width and height are non-negative.
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Geometry of a radial gradient: inner circle to outer circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradientParams {
    pub x0: f32,
    pub y0: f32,
    pub r0: f32,
    pub x1: f32,
    pub y1: f32,
    pub r1: f32,
}

impl RadialGradientParams {
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite()
            && self.y0.is_finite()
            && self.r0.is_finite()
            && self.x1.is_finite()
            && self.y1.is_finite()
            && self.r1.is_finite()
    }
}
