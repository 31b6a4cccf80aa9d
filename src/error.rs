//! Error types for Canvas 2D operations.

use thiserror::Error;

/// Errors raised by Canvas 2D operations.
///
/// Most invalid inputs on the Canvas 2D API are silently ignored rather than
/// reported; the variants here cover the cases the API specifies as faults.
#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// Canvas or image dimensions are invalid.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A CSS color string failed to parse.
    #[error("Invalid color: {0}")]
    ColorParse(String),

    /// A composite operation name the backend cannot express.
    #[error("Unsupported composite operation: {0}")]
    UnsupportedCompositeOperation(String),

    /// A variadic-style entry point received an unexpected argument count.
    #[error("Invalid number of arguments ({got}) to {method}")]
    InvalidArgumentCount { method: &'static str, got: usize },

    /// An arc radius was negative.
    #[error("Radii cannot be negative")]
    NegativeRadius,

    /// A generic invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A font shorthand string failed to parse.
    #[error("Invalid font: {0}")]
    FontParse(String),

    /// PNG encoding failed.
    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] png::EncodingError),
}

/// Result type for Canvas 2D operations.
pub type Canvas2dResult<T> = Result<T, Canvas2dError>;
