use crate::path::{Path, PathBuilder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushMode {
    Paint,
    Erase,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapStyle {
    #[default]
    Round,
    Flat,
}

/// Style snapshot taken when a gesture starts. Stored by value inside each
/// stroke, so later tool changes never alter committed strokes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// ARGB, ignored by the eraser.
    pub color: u32,
    pub width: f32,
    pub cap: CapStyle,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: 0xFF00_0000,
            width: 20.0,
            cap: CapStyle::Round,
        }
    }
}

/// A committed gesture. Immutable once it enters the history.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub mode: BrushMode,
    pub style: StrokeStyle,
    pub path: Path,
}

/// The single mutable stroke owned by the active gesture. The mode can still
/// be flipped mid-gesture; the style snapshot cannot.
#[derive(Clone, Debug)]
pub struct LiveStroke {
    pub mode: BrushMode,
    pub style: StrokeStyle,
    pub builder: PathBuilder,
}

impl LiveStroke {
    pub fn new(mode: BrushMode, style: StrokeStyle) -> Self {
        Self {
            mode,
            style,
            builder: PathBuilder::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.builder.path()
    }

    pub fn finish(self) -> Stroke {
        Stroke {
            mode: self.mode,
            style: self.style,
            path: self.builder.finalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    #[test]
    fn finish_freezes_mode_and_style() {
        let style = StrokeStyle {
            color: 0xFFFF_0000,
            width: 8.0,
            cap: CapStyle::Round,
        };
        let mut live = LiveStroke::new(BrushMode::Paint, style);
        live.builder.begin(vec2(1.0, 1.0));
        live.builder.extend(vec2(2.0, 2.0));
        live.mode = BrushMode::Erase;
        let stroke = live.finish();
        assert_eq!(stroke.mode, BrushMode::Erase);
        assert_eq!(stroke.style, style);
        assert_eq!(stroke.path.segments().len(), 2);
    }
}
