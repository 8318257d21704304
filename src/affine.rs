//! Affine fallback for rotations that are not a pixel permutation.
//!
//! Matrices follow the canvas convention: y points down, positive angles
//! rotate clockwise, and `post_*` operations apply after the existing
//! transform.

use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use num_traits::Float;
use tracing::warn;

use crate::frame::{Frame, PixelFormat};

/// Sine/cosine results this close to 0 or ±1 are snapped to the exact value.
const SNAP_EPSILON: f64 = 1e-12;

/// Sampling filter for [`warp`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Resample {
    /// Copy the source pixel under each output pixel centre.
    Nearest,
    /// Blend the four nearest source pixels.
    #[default]
    Bilinear,
}

/// Axis-aligned bounds in floating-point coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// 2D affine transform:
///
/// ```text
/// x' = a·x + b·y + tx
/// y' = c·x + d·y + ty
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Rotate clockwise by `degrees` about the origin, after `self`.
    pub fn post_rotate(self, degrees: i32) -> Self {
        let (sin, cos) = snapped_sin_cos(degrees);
        self.post_concat(Self {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        })
    }

    /// Scale about the origin, after `self`.
    pub fn post_scale(self, sx: f64, sy: f64) -> Self {
        self.post_concat(Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        })
    }

    pub fn post_translate(self, dx: f64, dy: f64) -> Self {
        Self {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..self
        }
    }

    /// `other ∘ self`: the result applies `self` first.
    pub fn post_concat(self, other: Self) -> Self {
        Self {
            a: other.a * self.a + other.b * self.c,
            b: other.a * self.b + other.b * self.d,
            c: other.c * self.a + other.d * self.c,
            d: other.c * self.b + other.d * self.d,
            tx: other.a * self.tx + other.b * self.ty + other.tx,
            ty: other.c * self.tx + other.d * self.ty + other.ty,
        }
    }

    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }

    /// `None` when the matrix is singular or not finite.
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let (a, b, c, d) = (self.d * inv, -self.b * inv, -self.c * inv, self.a * inv);
        Some(Self {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + b * self.ty),
            ty: -(c * self.tx + d * self.ty),
        })
    }

    /// Bounds of the `w × h` rectangle at the origin after mapping.
    pub fn map_bounds(&self, w: u32, h: u32) -> Bounds {
        let (w, h) = (f64::from(w), f64::from(h));
        let corners = [
            self.map_point(0.0, 0.0),
            self.map_point(w, 0.0),
            self.map_point(0.0, h),
            self.map_point(w, h),
        ];
        let mut bounds = Bounds {
            left: f64::INFINITY,
            top: f64::INFINITY,
            right: f64::NEG_INFINITY,
            bottom: f64::NEG_INFINITY,
        };
        for (x, y) in corners {
            bounds.left = bounds.left.min(x);
            bounds.top = bounds.top.min(y);
            bounds.right = bounds.right.max(x);
            bounds.bottom = bounds.bottom.max(y);
        }
        bounds
    }
}

fn snapped_sin_cos(degrees: i32) -> (f64, f64) {
    let radians = f64::from(degrees.rem_euclid(360)).to_radians();
    let (sin, cos) = radians.sin_cos();
    (snap(sin), snap(cos))
}

fn snap(v: f64) -> f64 {
    if v.abs() < SNAP_EPSILON {
        0.0
    } else if (v.abs() - 1.0).abs() < SNAP_EPSILON {
        v.signum()
    } else {
        v
    }
}

/// Round half up, like `Math.round`.
fn round_extent(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Resample `src` through `m` onto a canvas sized to the mapped bounds.
///
/// The output is translated so the bounds start at (0, 0). Pixels that map
/// outside the source are transparent zero. Returns `None` for non-packed
/// frames, for empty or non-finite output extents, and when the output
/// buffer cannot be allocated. Memory grows with the scale factors, so
/// callers should keep them bounded.
pub fn warp(src: &Frame, m: &Affine, resample: Resample) -> Option<Frame> {
    if src.format() != PixelFormat::Argb8888 {
        return None;
    }
    let bounds = m.map_bounds(src.width(), src.height());
    let (ow, oh) = (round_extent(bounds.width()), round_extent(bounds.height()));
    if !(ow >= 1.0 && oh >= 1.0 && ow <= f64::from(u32::MAX) && oh <= f64::from(u32::MAX)) {
        return None;
    }
    let (ow, oh) = (ow as u32, oh as u32);
    let inv = m.post_translate(-bounds.left, -bounds.top).invert()?;

    let out_row = (ow as usize).checked_mul(4)?;
    let len = out_row.checked_mul(oh as usize)?;
    let mut data = Vec::new();
    if data.try_reserve_exact(len).is_err() {
        warn!(width = ow, height = oh, "warp output cannot be allocated");
        return None;
    }
    data.resize(len, 0u8);
    for (dy, row) in data.chunks_exact_mut(out_row).enumerate() {
        for (dx, px) in row.chunks_exact_mut(4).enumerate() {
            let (x, y) = inv.map_point(dx as f64 + 0.5, dy as f64 + 0.5);
            let sample = match resample {
                Resample::Nearest => texel(src, x.floor(), y.floor()),
                Resample::Bilinear => bilinear(src, x - 0.5, y - 0.5),
            };
            px.copy_from_slice(&sample);
        }
    }
    Frame::argb(ow, oh, data).ok()
}

fn texel(src: &Frame, x: f64, y: f64) -> [u8; 4] {
    if x < 0.0 || y < 0.0 || x >= f64::from(src.width()) || y >= f64::from(src.height()) {
        return [0; 4];
    }
    let at = y as usize * src.stride() + x as usize * 4;
    let mut px = [0u8; 4];
    px.copy_from_slice(&src.data()[at..at + 4]);
    px
}

fn bilinear(src: &Frame, x: f64, y: f64) -> [u8; 4] {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let p00 = texel(src, x0, y0);
    let p10 = texel(src, x0 + 1.0, y0);
    let p01 = texel(src, x0, y0 + 1.0);
    let p11 = texel(src, x0 + 1.0, y0 + 1.0);

    let mut out = [0u8; 4];
    for (c, v) in out.iter_mut().enumerate() {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        *v = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
