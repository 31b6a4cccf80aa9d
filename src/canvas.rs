//! The immediate-mode canvas abstraction the context draws through.

use crate::geometry::CanvasRect;
use crate::image::CanvasImage;
use crate::paint::DerivedPaint;
use crate::style::CanvasFillRule;
use tiny_skia::{Path, Transform};

/// An immediate-mode canvas: it applies submitted geometry under its current
/// total matrix and clip, and keeps no memory of path history.
///
/// Matrix and clip state are stacked by `save`/`restore`. `total_matrix` is
/// the single source of truth the context re-reads after every transform
/// mutation.
pub trait ImmediateCanvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Push the current matrix and clip.
    fn save(&mut self);
    /// Pop the matrix and clip pushed by the matching `save`.
    fn restore(&mut self);
    /// Concatenate a transform delta onto the current matrix.
    fn concat(&mut self, delta: Transform);
    /// The current cumulative transform.
    fn total_matrix(&self) -> Transform;

    /// Fill or stroke a path given in the current user frame.
    fn draw_path(&mut self, path: &Path, paint: &DerivedPaint, fill_rule: CanvasFillRule);
    /// Fill or stroke an axis-aligned rectangle in the current user frame.
    fn draw_rect(&mut self, rect: CanvasRect, paint: &DerivedPaint);
    /// Draw text at a baseline position. Backends without text support may
    /// skip rasterization but must honor the call for sequencing.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &DerivedPaint);
    /// Draw the `src` region of an image into the `dst` rectangle.
    fn draw_image(
        &mut self,
        image: &CanvasImage,
        src: CanvasRect,
        dst: CanvasRect,
        paint: &DerivedPaint,
    );

    /// Intersect the clip with a path given in the current user frame.
    fn clip_path(&mut self, path: &Path, fill_rule: CanvasFillRule);

    /// Read a device-space rectangle as straight-alpha RGBA bytes.
    fn read_pixels(&self, x: i32, y: i32, width: u32, height: u32) -> Option<Vec<u8>>;
    /// Write straight-alpha RGBA bytes at a device-space position, bypassing
    /// the transform, clip and compositing state.
    fn write_pixels(&mut self, data: &[u8], width: u32, height: u32, x: i32, y: i32);
}
