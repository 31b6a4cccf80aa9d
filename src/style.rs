//! Style types and CSS color handling for the Canvas 2D state.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::gradient::CanvasGradient;
use crate::pattern::CanvasPattern;
use std::cell::RefCell;
use std::rc::Rc;
use tiny_skia::Color;

/// Shared handle to a gradient style object.
pub type GradientHandle = Rc<RefCell<CanvasGradient>>;
/// Shared handle to a pattern style object.
pub type PatternHandle = Rc<RefCell<CanvasPattern>>;

/// Fill or stroke style, resolved at assignment time.
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// Solid color.
    Color(Color),
    /// Gradient shader source.
    Gradient(GradientHandle),
    /// Pattern shader source.
    Pattern(PatternHandle),
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle::Color(Color::BLACK)
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl std::str::FromStr for LineCap {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid line cap: '{}'",
                s
            ))),
        }
    }
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl std::str::FromStr for LineJoin {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid line join: '{}'",
                s
            ))),
        }
    }
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Fill rule for fill, clip and hit-test operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasFillRule {
    #[default]
    Nonzero,
    Evenodd,
}

impl std::str::FromStr for CanvasFillRule {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nonzero" => Ok(CanvasFillRule::Nonzero),
            "evenodd" => Ok(CanvasFillRule::Evenodd),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "invalid fill rule: '{}'",
                s
            ))),
        }
    }
}

impl From<CanvasFillRule> for tiny_skia::FillRule {
    fn from(rule: CanvasFillRule) -> Self {
        match rule {
            CanvasFillRule::Nonzero => tiny_skia::FillRule::Winding,
            CanvasFillRule::Evenodd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// Image smoothing quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSmoothingQuality {
    #[default]
    Low,
    Medium,
    High,
}

impl std::str::FromStr for ImageSmoothingQuality {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(ImageSmoothingQuality::Low),
            "medium" => Ok(ImageSmoothingQuality::Medium),
            "high" => Ok(ImageSmoothingQuality::High),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid smoothing quality: '{}'",
                s
            ))),
        }
    }
}

/// Parse a CSS color string.
pub fn parse_color(s: &str) -> Canvas2dResult<Color> {
    let parsed =
        csscolorparser::parse(s).map_err(|_| Canvas2dError::ColorParse(s.to_string()))?;
    let [r, g, b, a] = parsed.to_array();
    Color::from_rgba(r, g, b, a).ok_or_else(|| Canvas2dError::ColorParse(s.to_string()))
}

/// Serialize a color the way the Canvas 2D getters do: `#rrggbb` for opaque
/// colors, `rgba(r, g, b, a)` otherwise.
pub fn serialize_color(color: Color) -> String {
    let c = color.to_color_u8();
    if c.alpha() == 255 {
        format!("#{:02x}{:02x}{:02x}", c.red(), c.green(), c.blue())
    } else {
        let a = c.alpha() as f32 / 255.0;
        // Trim to at most three decimals, dropping trailing zeros.
        let mut alpha = format!("{:.3}", a);
        while alpha.ends_with('0') {
            alpha.pop();
        }
        if alpha.ends_with('.') {
            alpha.pop();
        }
        format!("rgba({}, {}, {}, {})", c.red(), c.green(), c.blue(), alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("red", "#ff0000")]
    #[case("#00ff00", "#00ff00")]
    #[case("rgb(0, 0, 255)", "#0000ff")]
    fn test_parse_serialize_opaque(#[case] input: &str, #[case] expected: &str) {
        let color = parse_color(input).unwrap();
        assert_eq!(serialize_color(color), expected);
    }

    #[test]
    fn test_serialize_translucent() {
        let color = parse_color("rgba(255, 0, 0, 0.5)").unwrap();
        let s = serialize_color(color);
        assert!(s.starts_with("rgba(255, 0, 0, 0.5"), "got {}", s);
    }

    #[test]
    fn test_parse_invalid_color() {
        assert!(parse_color("not-a-color").is_err());
        assert!(parse_color("").is_err());
    }

    #[test]
    fn test_fill_rule_parse() {
        assert_eq!(
            "nonzero".parse::<CanvasFillRule>().unwrap(),
            CanvasFillRule::Nonzero
        );
        assert_eq!(
            "evenodd".parse::<CanvasFillRule>().unwrap(),
            CanvasFillRule::Evenodd
        );
        assert!("winding".parse::<CanvasFillRule>().is_err());
    }
}
