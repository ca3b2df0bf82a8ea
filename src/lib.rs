//! Freehand stroke capture, history, and compositing engine.
//!
//! Raw pointer samples become smoothed quadratic paths, committed strokes go
//! into an undoable history, and a background render loop composites the
//! whole history onto a display surface and a persistent off-screen cache.

pub mod compositor;
pub mod engine;
pub mod error;
pub mod history;
pub mod path;
pub mod raster;
pub mod render_loop;
pub mod stroke;
pub mod surface;

pub use compositor::Compositor;
pub use engine::Engine;
pub use error::SurfaceError;
pub use history::HistoryStack;
pub use path::{Path, PathBuilder, Segment};
pub use raster::{Bitmap, Blend, CoverageMask};
pub use render_loop::{RenderLoop, RenderSignal};
pub use stroke::{BrushMode, CapStyle, LiveStroke, Stroke, StrokeStyle};
pub use surface::SurfaceHolder;
