use crate::history::HistoryStack;
use crate::path::Path;
use crate::raster::{Bitmap, Blend, CoverageMask};
use crate::stroke::{BrushMode, LiveStroke, StrokeStyle};

/// Redraws the full stroke history onto a target each pass. A full redraw is
/// what makes erase strokes punch through everything composited before them
/// in the same pass, no matter the commit order.
#[derive(Debug, Default)]
pub struct Compositor {
    mask: CoverageMask,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear `target` to transparent, then draw every committed stroke in
    /// paint order followed by the in-progress stroke, if any.
    pub fn render(&mut self, target: &mut Bitmap, history: &HistoryStack, live: Option<&LiveStroke>) {
        self.mask.resize(target.width(), target.height());
        target.clear();
        for stroke in history.committed() {
            self.draw_stroke(target, stroke.mode, stroke.style, &stroke.path);
        }
        if let Some(live) = live {
            self.draw_stroke(target, live.mode, live.style, live.path());
        }
    }

    fn draw_stroke(&mut self, target: &mut Bitmap, mode: BrushMode, style: StrokeStyle, path: &Path) {
        if path.is_empty() {
            return;
        }
        let radius = style.width * 0.5;
        let points = path.flatten();
        if let [point] = points.as_slice() {
            // a tap renders as a dot of the stroke width
            self.mask.stamp_disc(*point, radius);
        } else {
            for pair in points.windows(2) {
                self.mask.stamp_capsule(pair[0], pair[1], radius, style.cap);
            }
        }
        let blend = match mode {
            BrushMode::Paint => Blend::SourceOver(style.color),
            BrushMode::Erase => Blend::DestinationOut,
        };
        self.mask.composite(target, blend);
    }
}
