//! Mapping between Canvas 2D composite operation names and blend modes.

use crate::error::{Canvas2dError, Canvas2dResult};
use tiny_skia::BlendMode;

/// Map a `globalCompositeOperation` name to a blend mode.
///
/// Returns `Ok(None)` for names that are not recognized; the caller is
/// expected to leave the current mode unchanged in that case. `plus-darker`
/// is recognized but unsupported by the backend and raises an error.
pub fn blend_mode_for_name(name: &str) -> Canvas2dResult<Option<BlendMode>> {
    let mode = match name {
        "source-over" => BlendMode::SourceOver,
        "destination-over" => BlendMode::DestinationOver,
        "copy" => BlendMode::Source,
        "destination" => BlendMode::Destination,
        "clear" => BlendMode::Clear,
        "source-in" => BlendMode::SourceIn,
        "destination-in" => BlendMode::DestinationIn,
        "source-out" => BlendMode::SourceOut,
        "destination-out" => BlendMode::DestinationOut,
        "source-atop" => BlendMode::SourceAtop,
        "destination-atop" => BlendMode::DestinationAtop,
        "xor" => BlendMode::Xor,
        "lighter" | "plus-lighter" => BlendMode::Plus,
        "multiply" => BlendMode::Multiply,
        "screen" => BlendMode::Screen,
        "overlay" => BlendMode::Overlay,
        "darken" => BlendMode::Darken,
        "lighten" => BlendMode::Lighten,
        "color-dodge" => BlendMode::ColorDodge,
        "color-burn" => BlendMode::ColorBurn,
        "hard-light" => BlendMode::HardLight,
        "soft-light" => BlendMode::SoftLight,
        "difference" => BlendMode::Difference,
        "exclusion" => BlendMode::Exclusion,
        "hue" => BlendMode::Hue,
        "saturation" => BlendMode::Saturation,
        "color" => BlendMode::Color,
        "luminosity" => BlendMode::Luminosity,
        "plus-darker" => {
            return Err(Canvas2dError::UnsupportedCompositeOperation(
                name.to_string(),
            ))
        }
        _ => return Ok(None),
    };
    Ok(Some(mode))
}

/// Map a blend mode back to its canonical composite operation name.
///
/// `Plus` maps to `lighter`; it is the canonical name for that mode even when
/// it was set through the `plus-lighter` alias.
pub fn name_for_blend_mode(mode: BlendMode) -> &'static str {
    match mode {
        BlendMode::SourceOver => "source-over",
        BlendMode::DestinationOver => "destination-over",
        BlendMode::Source => "copy",
        BlendMode::Destination => "destination",
        BlendMode::Clear => "clear",
        BlendMode::SourceIn => "source-in",
        BlendMode::DestinationIn => "destination-in",
        BlendMode::SourceOut => "source-out",
        BlendMode::DestinationOut => "destination-out",
        BlendMode::SourceAtop => "source-atop",
        BlendMode::DestinationAtop => "destination-atop",
        BlendMode::Xor => "xor",
        BlendMode::Plus => "lighter",
        BlendMode::Multiply => "multiply",
        BlendMode::Screen => "screen",
        BlendMode::Overlay => "overlay",
        BlendMode::Darken => "darken",
        BlendMode::Lighten => "lighten",
        BlendMode::ColorDodge => "color-dodge",
        BlendMode::ColorBurn => "color-burn",
        BlendMode::HardLight => "hard-light",
        BlendMode::SoftLight => "soft-light",
        BlendMode::Difference => "difference",
        BlendMode::Exclusion => "exclusion",
        BlendMode::Hue => "hue",
        BlendMode::Saturation => "saturation",
        BlendMode::Color => "color",
        BlendMode::Luminosity => "luminosity",
        BlendMode::Modulate => "multiply",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("source-over", BlendMode::SourceOver)]
    #[case("copy", BlendMode::Source)]
    #[case("destination", BlendMode::Destination)]
    #[case("clear", BlendMode::Clear)]
    #[case("xor", BlendMode::Xor)]
    #[case("hue", BlendMode::Hue)]
    #[case("luminosity", BlendMode::Luminosity)]
    fn test_name_round_trip(#[case] name: &str, #[case] mode: BlendMode) {
        assert_eq!(blend_mode_for_name(name).unwrap(), Some(mode));
        assert_eq!(name_for_blend_mode(mode), name);
    }

    #[test]
    fn test_lighter_aliases() {
        assert_eq!(
            blend_mode_for_name("lighter").unwrap(),
            Some(BlendMode::Plus)
        );
        assert_eq!(
            blend_mode_for_name("plus-lighter").unwrap(),
            Some(BlendMode::Plus)
        );
        assert_eq!(name_for_blend_mode(BlendMode::Plus), "lighter");
    }

    #[test]
    fn test_plus_darker_is_an_error() {
        assert!(matches!(
            blend_mode_for_name("plus-darker"),
            Err(Canvas2dError::UnsupportedCompositeOperation(_))
        ));
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(blend_mode_for_name("frobnicate").unwrap(), None);
        assert_eq!(blend_mode_for_name("").unwrap(), None);
    }
}
