//! Minimal CSS font shorthand handling.
//!
//! Only the size matters here: text layout is delegated, but the derived
//! paint carries the resolved pixel size. The parser accepts the common
//! absolute and font-relative units, resolving relative ones against the
//! default 16px em.

use crate::error::{Canvas2dError, Canvas2dResult};

const DEFAULT_EM: f32 = 16.0;

fn unit_multiplier(unit: &str) -> Option<f32> {
    Some(match unit {
        "px" => 1.0,
        "pt" => 4.0 / 3.0,
        "pc" => 16.0,
        "in" => 96.0,
        "cm" => 96.0 / 2.54,
        "mm" => 96.0 / 25.4,
        "q" => 96.0 / 101.6,
        "em" | "rem" => DEFAULT_EM,
        "%" => DEFAULT_EM / 100.0,
        _ => return None,
    })
}

/// Extract the size in pixels from a CSS font shorthand string.
///
/// The size is the first `<number><unit>` token, per the shorthand grammar
/// (style and weight keywords precede it, family names follow).
pub fn parse_font_size(font: &str) -> Canvas2dResult<f32> {
    for token in font.split_whitespace() {
        // A size token may carry a line-height suffix ("12px/14px").
        let token = token.split('/').next().unwrap_or(token);
        let digits = token
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .count();
        if digits == 0 {
            continue;
        }
        let (number, unit) = token.split_at(digits);
        let Ok(value) = number.parse::<f32>() else {
            continue;
        };
        if let Some(multiplier) = unit_multiplier(&unit.to_ascii_lowercase()) {
            return Ok(value * multiplier);
        }
    }
    Err(Canvas2dError::FontParse(font.to_string()))
}
