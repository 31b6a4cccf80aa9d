//! HTML Canvas2D emulation over an immediate-mode canvas.
//!
//! [`Canvas2dContext`] reproduces Canvas 2D semantics (attribute validation,
//! save/restore snapshotting, shadow compositing, composite-operation
//! mapping, and retroactive path re-baking across interleaved transform
//! changes) while delegating rendering to an [`ImmediateCanvas`]. The
//! bundled [`PixmapCanvas`] renders into a `tiny-skia` pixmap.
//!
//! ```
//! use html_canvas2d::{Canvas2dContext, PixmapCanvas};
//!
//! let mut ctx = Canvas2dContext::new(PixmapCanvas::new(100, 100).unwrap());
//! ctx.set_fill_color("rebeccapurple");
//! ctx.begin_path();
//! ctx.move_to(10.0, 10.0);
//! ctx.line_to(90.0, 10.0);
//! ctx.rotate(std::f32::consts::FRAC_PI_4);
//! ctx.line_to(90.0, 90.0);
//! ctx.close_path();
//! ctx.fill();
//! let png = ctx.canvas().to_png().unwrap();
//! assert!(!png.is_empty());
//! ```

mod arc;
mod canvas;
mod composite;
mod context;
mod dom_matrix;
mod error;
mod font;
mod geometry;
mod gradient;
mod image;
mod paint;
mod path;
mod pattern;
mod raster;
mod state;
mod style;
mod transform;

pub use canvas::ImmediateCanvas;
pub use composite::{blend_mode_for_name, name_for_blend_mode};
pub use context::Canvas2dContext;
pub use dom_matrix::DomMatrix;
pub use error::{Canvas2dError, Canvas2dResult};
pub use geometry::{CanvasRect, RadialGradientParams};
pub use gradient::{CanvasGradient, ColorStop, GradientGeometry};
pub use image::{CanvasImage, ImageData};
pub use paint::{DerivedPaint, PaintKind, ShaderSpec, StrokeParams};
pub use path::{Path2D, PathCmd};
pub use pattern::{CanvasPattern, Repetition};
pub use raster::PixmapCanvas;
pub use state::{ContextState, RegisteredStyle, StateSnapshot};
pub use style::{
    CanvasFillRule, FillStyle, GradientHandle, ImageSmoothingQuality, LineCap, LineJoin,
    PatternHandle,
};
pub use transform::TransformTracker;
