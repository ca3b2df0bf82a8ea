use macroquad::math::Vec2;

/// One entry of a stroke outline. Backend-independent: the compositor only
/// ever sees the flattened polyline, so the same path could feed a vector
/// recorder instead of the raster target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
}

/// Sample count per quadratic segment when flattening.
const QUAD_STEPS: usize = 8;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// A path that never moved past its anchor point. Rendered as a dot so
    /// taps stay visible.
    pub fn is_dot(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::MoveTo(_)])
    }

    /// Sample the path into a polyline for the rasterizer.
    pub fn flatten(&self) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(self.segments.len() * QUAD_STEPS);
        let mut cursor = Vec2::ZERO;
        for segment in &self.segments {
            match *segment {
                Segment::MoveTo(p) => {
                    points.push(p);
                    cursor = p;
                }
                Segment::LineTo(p) => {
                    points.push(p);
                    cursor = p;
                }
                Segment::QuadTo { ctrl, to } => {
                    for s in 1..=QUAD_STEPS {
                        let t = s as f32 / QUAD_STEPS as f32;
                        points.push(quad_point(cursor, ctrl, to, t));
                    }
                    cursor = to;
                }
            }
        }
        points
    }
}

fn quad_point(p0: Vec2, ctrl: Vec2, p1: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    u * u * p0 + 2.0 * u * t * ctrl + t * t * p1
}

/// Builds smoothed stroke geometry from raw pointer samples with the
/// running-midpoint scheme: each new raw point C emits a quadratic curve
/// whose control point is the previous raw point P and whose endpoint is the
/// midpoint of P and C. No buffering of the whole gesture is needed.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    path: Path,
    prev: Option<Vec2>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, p: Vec2) {
        self.path.segments.clear();
        self.path.segments.push(Segment::MoveTo(p));
        self.prev = Some(p);
    }

    pub fn extend(&mut self, c: Vec2) {
        let Some(p) = self.prev else {
            self.begin(c);
            return;
        };
        let mid = (p + c) * 0.5;
        self.path.segments.push(Segment::QuadTo { ctrl: p, to: mid });
        self.prev = Some(c);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn finalize(self) -> Path {
        self.path
    }
}
