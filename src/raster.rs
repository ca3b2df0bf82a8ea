use crate::stroke::CapStyle;
use macroquad::math::Vec2;

/// CPU-side ARGB8888 pixel buffer. Pixel (x, y) sits at integer coordinates;
/// 0x00000000 is fully transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Clear to fully transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Blit another bitmap of the same dimensions over this one.
    pub fn copy_from(&mut self, src: &Bitmap) {
        debug_assert_eq!((self.width, self.height), (src.width, src.height));
        self.pixels.copy_from_slice(&src.pixels);
    }
}

/// Per-stroke blend rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Normal alpha blend of the given ARGB color.
    SourceOver(u32),
    /// Existing pixels become transparent wherever the shape covers them.
    DestinationOut,
}

/// Scratch coverage buffer for rasterizing one stroke at a time. Segments of
/// the same stroke are stamped with max-coverage so overlapping capsules do
/// not double-blend, then the whole mask is composited in one pass.
#[derive(Debug, Default)]
pub struct CoverageMask {
    width: u32,
    height: u32,
    values: Vec<f32>,
    // inclusive dirty rect, None while nothing is stamped
    bounds: Option<(u32, u32, u32, u32)>,
}

impl CoverageMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.values = vec![0.0; width as usize * height as usize];
            self.bounds = None;
        }
    }

    pub fn stamp_disc(&mut self, center: Vec2, radius: f32) {
        let Some((x0, y0, x1, y1)) = self.clip_rect(center, center, radius) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = center.distance(Vec2::new(x as f32, y as f32));
                self.accumulate(x, y, coverage(d, radius));
            }
        }
        self.grow_bounds(x0, y0, x1, y1);
    }

    pub fn stamp_capsule(&mut self, a: Vec2, b: Vec2, radius: f32, cap: CapStyle) {
        let Some((x0, y0, x1, y1)) = self.clip_rect(a, b, radius) else {
            return;
        };
        let ab = b - a;
        let len_sq = ab.length_squared();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32, y as f32);
                let t = if len_sq == 0.0 {
                    0.0
                } else {
                    (p - a).dot(ab) / len_sq
                };
                if cap == CapStyle::Flat && !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let closest = a + ab * t.clamp(0.0, 1.0);
                self.accumulate(x, y, coverage(p.distance(closest), radius));
            }
        }
        self.grow_bounds(x0, y0, x1, y1);
    }

    /// Apply the stamped coverage to `target` under the given blend rule and
    /// reset the mask for the next stroke.
    pub fn composite(&mut self, target: &mut Bitmap, blend: Blend) {
        debug_assert_eq!((self.width, self.height), (target.width, target.height));
        let Some((x0, y0, x1, y1)) = self.bounds.take() else {
            return;
        };
        for y in y0..=y1 {
            let row = y as usize * self.width as usize;
            for x in x0..=x1 {
                let idx = row + x as usize;
                let c = self.values[idx];
                if c > 0.0 {
                    self.values[idx] = 0.0;
                    let dst = target.pixels[idx];
                    target.pixels[idx] = match blend {
                        Blend::SourceOver(color) => source_over(dst, color, c),
                        Blend::DestinationOut => destination_out(dst, c),
                    };
                }
            }
        }
    }

    fn accumulate(&mut self, x: u32, y: u32, c: f32) {
        let idx = y as usize * self.width as usize + x as usize;
        if c > self.values[idx] {
            self.values[idx] = c;
        }
    }

    /// Bounding rect of a capsule, clipped to the buffer. None when the shape
    /// misses the buffer entirely or the buffer is empty.
    fn clip_rect(&self, a: Vec2, b: Vec2, radius: f32) -> Option<(u32, u32, u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let pad = radius + 1.0;
        let min_x = (a.x.min(b.x) - pad).floor();
        let min_y = (a.y.min(b.y) - pad).floor();
        let max_x = (a.x.max(b.x) + pad).ceil();
        let max_y = (a.y.max(b.y) + pad).ceil();
        if max_x < 0.0 || max_y < 0.0 || min_x >= self.width as f32 || min_y >= self.height as f32 {
            return None;
        }
        Some((
            min_x.max(0.0) as u32,
            min_y.max(0.0) as u32,
            (max_x as u32).min(self.width - 1),
            (max_y as u32).min(self.height - 1),
        ))
    }

    fn grow_bounds(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        self.bounds = Some(match self.bounds {
            Some((bx0, by0, bx1, by1)) => {
                (bx0.min(x0), by0.min(y0), bx1.max(x1), by1.max(y1))
            }
            None => (x0, y0, x1, y1),
        });
    }
}

/// Edge coverage with a one-pixel falloff.
fn coverage(distance: f32, radius: f32) -> f32 {
    (radius + 0.5 - distance).clamp(0.0, 1.0)
}

fn source_over(dst: u32, src: u32, cov: f32) -> u32 {
    let sa = alpha(src) * cov;
    if sa <= 0.0 {
        return dst;
    }
    let da = alpha(dst);
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 {
        return 0;
    }
    let blend = |s: u32, d: u32| -> u32 {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / oa;
        c.round().clamp(0.0, 255.0) as u32
    };
    let r = blend(src >> 16 & 0xFF, dst >> 16 & 0xFF);
    let g = blend(src >> 8 & 0xFF, dst >> 8 & 0xFF);
    let b = blend(src & 0xFF, dst & 0xFF);
    pack(oa, r, g, b)
}

fn destination_out(dst: u32, cov: f32) -> u32 {
    let oa = alpha(dst) * (1.0 - cov);
    pack(oa, dst >> 16 & 0xFF, dst >> 8 & 0xFF, dst & 0xFF)
}

fn alpha(argb: u32) -> f32 {
    (argb >> 24) as f32 / 255.0
}

fn pack(a: f32, r: u32, g: u32, b: u32) -> u32 {
    let a = (a * 255.0).round().clamp(0.0, 255.0) as u32;
    a << 24 | r << 16 | g << 8 | b
}
