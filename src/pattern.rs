//! Pattern style objects.

use crate::dom_matrix::DomMatrix;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::image::{pixmap_from_rgba, CanvasImage};
use tiny_skia::{Pixmap, SpreadMode, Transform};

/// Maximum pattern size (4096x4096).
const MAX_PATTERN_SIZE: u32 = 4096;

/// Pattern repetition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repetition {
    /// Repeat in both directions (default).
    #[default]
    Repeat,
    /// Repeat only horizontally.
    RepeatX,
    /// Repeat only vertically.
    RepeatY,
    /// No repetition (single instance).
    NoRepeat,
}

impl std::str::FromStr for Repetition {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat" | "" => Ok(Repetition::Repeat),
            "repeat-x" => Ok(Repetition::RepeatX),
            "repeat-y" => Ok(Repetition::RepeatY),
            "no-repeat" => Ok(Repetition::NoRepeat),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid repetition mode: '{}'",
                s
            ))),
        }
    }
}

/// Canvas pattern for fill/stroke operations.
///
/// The pattern transform is its own; the context transform does not affect
/// pattern placement.
#[derive(Debug, Clone)]
pub struct CanvasPattern {
    pixmap: Pixmap,
    repetition: Repetition,
    transform: Transform,
}

impl CanvasPattern {
    /// Create a pattern from straight-alpha RGBA pixel data.
    pub fn new(data: &[u8], width: u32, height: u32, repetition: Repetition) -> Canvas2dResult<Self> {
        if width > MAX_PATTERN_SIZE || height > MAX_PATTERN_SIZE {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixmap: pixmap_from_rgba(data, width, height)?,
            repetition,
            transform: Transform::identity(),
        })
    }

    /// Create a pattern from a decoded image.
    pub fn from_image(image: &CanvasImage, repetition: Repetition) -> Canvas2dResult<Self> {
        let pixmap = image.pixmap().to_owned();
        if pixmap.width() > MAX_PATTERN_SIZE || pixmap.height() > MAX_PATTERN_SIZE {
            return Err(Canvas2dError::InvalidDimensions {
                width: pixmap.width(),
                height: pixmap.height(),
            });
        }
        Ok(Self {
            pixmap,
            repetition,
            transform: Transform::identity(),
        })
    }

    /// Set the pattern transform. Non-finite matrices are ignored.
    pub fn set_transform(&mut self, matrix: DomMatrix) {
        if !matrix.is_finite() {
            return;
        }
        self.transform = matrix.into();
    }

    pub fn transform(&self) -> DomMatrix {
        self.transform.into()
    }

    pub(crate) fn raw_transform(&self) -> Transform {
        self.transform
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// Spread mode for the backing pixmap produced by [`Self::backing_pixmap`].
    ///
    /// Full repeat tiles natively; the partial modes bake their tiling into an
    /// extended pixmap whose transparent padding the Pad spread extends.
    pub(crate) fn spread_mode(&self) -> SpreadMode {
        if self.repetition == Repetition::Repeat {
            SpreadMode::Repeat
        } else {
            SpreadMode::Pad
        }
    }

    /// Build the pixmap the shader samples from, for a canvas of the given
    /// size. Repeat mode uses the base pattern as-is; the other modes extend
    /// it with transparent padding (and pre-tiled rows/columns for repeat-x
    /// and repeat-y).
    pub(crate) fn backing_pixmap(&self, canvas_width: u32, canvas_height: u32) -> Option<Pixmap> {
        match self.repetition {
            Repetition::Repeat => Some(self.pixmap.clone()),
            Repetition::NoRepeat => self.extended_pixmap(canvas_width, canvas_height, false, false),
            Repetition::RepeatX => self.extended_pixmap(canvas_width, canvas_height, true, false),
            Repetition::RepeatY => self.extended_pixmap(canvas_width, canvas_height, false, true),
        }
    }

    fn extended_pixmap(
        &self,
        canvas_width: u32,
        canvas_height: u32,
        tile_x: bool,
        tile_y: bool,
    ) -> Option<Pixmap> {
        let pw = self.pixmap.width();
        let ph = self.pixmap.height();

        let ext_width = if tile_x {
            (pw * (canvas_width / pw + 2)).min(MAX_PATTERN_SIZE * 2)
        } else {
            (pw + canvas_width).min(MAX_PATTERN_SIZE * 2)
        };
        let ext_height = if tile_y {
            (ph * (canvas_height / ph + 2)).min(MAX_PATTERN_SIZE * 2)
        } else {
            (ph + canvas_height).min(MAX_PATTERN_SIZE * 2)
        };

        // Starts out fully transparent.
        let mut extended = Pixmap::new(ext_width, ext_height)?;

        let tiles_x = if tile_x { ext_width.div_ceil(pw) } else { 1 };
        let tiles_y = if tile_y { ext_height.div_ceil(ph) } else { 1 };

        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let x_offset = tx * pw;
                let y_offset = ty * ph;
                for y in 0..ph {
                    let dst_y = y_offset + y;
                    if dst_y >= ext_height {
                        break;
                    }
                    for x in 0..pw {
                        let dst_x = x_offset + x;
                        if dst_x >= ext_width {
                            break;
                        }
                        let src_pixel = self.pixmap.pixel(x, y)?;
                        extended.pixels_mut()[(dst_y * ext_width + dst_x) as usize] = src_pixel;
                    }
                }
            }
        }

        Some(extended)
    }
}
