//! Image value types: decoded images and raw pixel buffers.

use crate::error::{Canvas2dError, Canvas2dResult};
use tiny_skia::{Pixmap, PixmapRef, PremultipliedColorU8};

/// Largest accepted image dimension.
const MAX_IMAGE_SIZE: u32 = 4096;

/// Premultiply a straight-alpha RGBA pixel using integer math.
pub(crate) fn premultiply_rgba(r: u8, g: u8, b: u8, a: u8) -> PremultipliedColorU8 {
    let (pr, pg, pb) = if a == 255 {
        (r, g, b)
    } else if a == 0 {
        (0, 0, 0)
    } else {
        let a16 = a as u16;
        (
            ((r as u16 * a16 + 127) / 255) as u8,
            ((g as u16 * a16 + 127) / 255) as u8,
            ((b as u16 * a16 + 127) / 255) as u8,
        )
    };
    PremultipliedColorU8::from_rgba(pr, pg, pb, a).unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

/// Convert one premultiplied pixel back to straight-alpha RGBA bytes.
pub(crate) fn demultiply_rgba(pixel: PremultipliedColorU8) -> [u8; 4] {
    let a = pixel.alpha();
    if a == 0 {
        [0, 0, 0, 0]
    } else if a == 255 {
        [pixel.red(), pixel.green(), pixel.blue(), 255]
    } else {
        let a16 = a as u16;
        [
            ((pixel.red() as u16 * 255 + a16 / 2) / a16).min(255) as u8,
            ((pixel.green() as u16 * 255 + a16 / 2) / a16).min(255) as u8,
            ((pixel.blue() as u16 * 255 + a16 / 2) / a16).min(255) as u8,
            a,
        ]
    }
}

/// Build a premultiplied pixmap from straight-alpha RGBA bytes.
pub(crate) fn pixmap_from_rgba(data: &[u8], width: u32, height: u32) -> Canvas2dResult<Pixmap> {
    if width == 0 || height == 0 || width > MAX_IMAGE_SIZE || height > MAX_IMAGE_SIZE {
        return Err(Canvas2dError::InvalidDimensions { width, height });
    }
    let expected = (width as usize) * (height as usize) * 4;
    if data.len() != expected {
        return Err(Canvas2dError::InvalidArgument(format!(
            "Data length {} does not match expected {} for {}x{} RGBA image",
            data.len(),
            expected,
            width,
            height
        )));
    }
    let mut pixmap = Pixmap::new(width, height)
        .ok_or(Canvas2dError::InvalidDimensions { width, height })?;
    for (i, pixel) in pixmap.pixels_mut().iter_mut().enumerate() {
        let o = i * 4;
        *pixel = premultiply_rgba(data[o], data[o + 1], data[o + 2], data[o + 3]);
    }
    Ok(pixmap)
}

/// A decoded image usable with `draw_image` and `create_pattern`.
///
/// Pixels are stored premultiplied. Decoding file formats is the caller's
/// concern; construction takes raw straight-alpha RGBA.
#[derive(Debug, Clone)]
pub struct CanvasImage {
    pixmap: Pixmap,
}

impl CanvasImage {
    /// Create an image from straight-alpha RGBA bytes (4 bytes per pixel).
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> Canvas2dResult<Self> {
        Ok(Self {
            pixmap: pixmap_from_rgba(data, width, height)?,
        })
    }

    /// Create an image from an existing premultiplied pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

/// Raw pixel rectangle in straight-alpha RGBA, as returned by
/// `get_image_data` and consumed by `put_image_data`.
#[derive(Debug, Clone)]
pub struct ImageData {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageData {
    /// Create transparent-black image data of the given size.
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 || width > MAX_IMAGE_SIZE || height > MAX_IMAGE_SIZE {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data: vec![0; (width as usize) * (height as usize) * 4],
            width,
            height,
        })
    }

    /// Wrap existing straight-alpha RGBA bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(Canvas2dError::InvalidArgument(format!(
                "Data length {} does not match expected {} for {}x{} image data",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
