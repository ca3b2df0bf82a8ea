use crate::compositor::Compositor;
use crate::history::HistoryStack;
use crate::raster::Bitmap;
use crate::render_loop::RenderLoop;
use crate::stroke::{BrushMode, LiveStroke, Stroke, StrokeStyle};
use crate::surface::SurfaceHolder;
use macroquad::math::vec2;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Everything the render thread reads and the input thread mutates. One lock
/// guards both lists and the in-progress stroke; the render pass holds it for
/// the duration of a composite, mutations hold it only for the change.
#[derive(Debug, Default)]
struct Document {
    history: HistoryStack,
    live: Option<LiveStroke>,
}

/// The drawing engine façade. Owns all per-canvas state, so several engines
/// can run side by side.
///
/// Pointer gestures drive a background render loop; history operations while
/// no gesture is active trigger one synchronous composite instead.
pub struct Engine {
    doc: Arc<Mutex<Document>>,
    surface: Arc<SurfaceHolder>,
    render_loop: RenderLoop,
    /// Scratch for synchronous passes outside a gesture; the render thread
    /// carries its own.
    compositor: Compositor,
    mode: BrushMode,
    color: u32,
    paint_width: f32,
    eraser_width: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        let style = StrokeStyle::default();
        let doc = Document {
            history: HistoryStack::new(),
            live: Some(LiveStroke::new(BrushMode::Paint, style)),
        };
        Self {
            doc: Arc::new(Mutex::new(doc)),
            surface: Arc::new(SurfaceHolder::new()),
            render_loop: RenderLoop::new(),
            compositor: Compositor::new(),
            mode: BrushMode::Paint,
            color: style.color,
            paint_width: style.width,
            eraser_width: style.width,
        }
    }

    /// Start a gesture: take a fresh style snapshot, anchor the geometry and
    /// spin up the render loop.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        {
            let mut doc = lock(&self.doc);
            let mut live = LiveStroke::new(self.mode, self.style_snapshot());
            live.builder.begin(vec2(x, y));
            doc.live = Some(live);
        }
        let doc = Arc::clone(&self.doc);
        let surface = Arc::clone(&self.surface);
        let mut compositor = Compositor::new();
        self.render_loop
            .start(move || composite_pass(&doc, &surface, &mut compositor));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        {
            let mut doc = lock(&self.doc);
            if let Some(live) = doc.live.as_mut() {
                live.builder.extend(vec2(x, y));
            }
        }
        self.render_loop.signal().notify();
    }

    /// End the gesture: commit the in-progress stroke, stop the render loop
    /// and leave a fresh placeholder stroke for tool changes between
    /// gestures.
    pub fn pointer_up(&mut self) {
        {
            let mut doc = lock(&self.doc);
            if let Some(live) = doc.live.take() {
                doc.history.commit(live.finish());
            }
            doc.live = Some(LiveStroke::new(self.mode, self.style_snapshot()));
        }
        self.render_loop.stop();
        self.render_once();
    }

    /// Switch brush mode. Also applies to the in-progress stroke, never to
    /// committed ones.
    pub fn set_mode(&mut self, mode: BrushMode) {
        self.mode = mode;
        let mut doc = lock(&self.doc);
        if let Some(live) = doc.live.as_mut() {
            live.mode = mode;
        }
        drop(doc);
        if self.render_loop.is_running() {
            self.render_loop.signal().notify();
        }
    }

    /// Paint color for the next stroke's snapshot (ARGB).
    pub fn set_color(&mut self, argb: u32) {
        self.color = argb;
    }

    pub fn set_paint_width(&mut self, width: f32) {
        self.paint_width = width;
    }

    pub fn set_eraser_width(&mut self, width: f32) {
        self.eraser_width = width;
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn undo(&mut self) -> bool {
        let moved = lock(&self.doc).history.undo();
        self.render_once();
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = lock(&self.doc).history.redo();
        self.render_once();
        moved
    }

    pub fn clear(&mut self) {
        {
            let mut doc = lock(&self.doc);
            doc.history.clear();
            doc.live = Some(LiveStroke::new(self.mode, self.style_snapshot()));
        }
        self.render_once();
    }

    pub fn surface_created(&mut self, width: u32, height: u32) {
        if let Err(err) = self.surface.surface_created(width, height) {
            warn!(%err, "surface not ready");
            return;
        }
        self.render_once();
    }

    pub fn surface_changed(&mut self, width: u32, height: u32) {
        if let Err(err) = self.surface.surface_changed(width, height) {
            warn!(%err, "surface not ready");
            return;
        }
        self.render_once();
    }

    pub fn surface_destroyed(&mut self) {
        self.render_loop.stop();
        self.surface.surface_destroyed();
    }

    /// Clone of the persistent cache surface, for export. None until a valid
    /// surface was created.
    pub fn snapshot(&self) -> Option<Bitmap> {
        self.surface.snapshot()
    }

    /// Committed strokes in paint order, for host-side persistence.
    pub fn strokes(&self) -> Vec<Stroke> {
        lock(&self.doc).history.committed().to_vec()
    }

    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) {
        lock(&self.doc).history.replace(strokes);
        self.render_once();
    }

    pub fn can_undo(&self) -> bool {
        !lock(&self.doc).history.committed().is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !lock(&self.doc).history.redoable().is_empty()
    }

    fn style_snapshot(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            width: match self.mode {
                BrushMode::Paint => self.paint_width,
                BrushMode::Erase => self.eraser_width,
            },
            ..StrokeStyle::default()
        }
    }

    fn render_once(&mut self) {
        composite_pass(&self.doc, &self.surface, &mut self.compositor);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.render_loop.stop();
    }
}

/// One full composite: draw the history plus the live stroke into the cache,
/// then blit the cache to the display surface when one is bound. A missing
/// surface skips the frame.
fn composite_pass(doc: &Mutex<Document>, surface: &SurfaceHolder, compositor: &mut Compositor) {
    let doc = lock(doc);
    let result = surface.with_frame(|cache, display| {
        compositor.render(cache, &doc.history, doc.live.as_ref());
        if let Some(display) = display {
            display.copy_from(cache);
        }
    });
    if let Err(err) = result {
        debug!(%err, "skipping frame");
    }
}

fn lock(doc: &Mutex<Document>) -> MutexGuard<'_, Document> {
    doc.lock().unwrap_or_else(PoisonError::into_inner)
}
