//! Orientation normalization of decoded frames.
//!
//! [`select_path`] decides how a frame is reoriented; [`transform`] runs that
//! decision against an [`ImageConverter`].
//!
//! ```text
//!   classify(rotation, mirror)
//!       │
//!       ├── IDENTITY ───────────────► frame returned as-is
//!       ├── Some(o), unit mirror ───► ImageConverter::rotate_or_flip(o)
//!       └── otherwise ──────────────► affine warp: rotate, then scale x
//! ```

use tracing::{debug, trace, warn};

use crate::adapter::packed_pixels;
use crate::affine::{Affine, Resample, warp};
use crate::frame::{Frame, PixelFormat};
use crate::orientation::{Mirror, Orientation, classify};
use crate::permute;

/// Pixel operations implemented outside this crate, typically by a native
/// library behind an FFI boundary.
///
/// Implementations must be reentrant: calls are never serialized here.
pub trait ImageConverter {
    /// Decode an NV21 buffer (luma plane then VU plane) into an
    /// [`PixelFormat::Argb8888`] frame of `width × height`.
    ///
    /// Returns `None` when `nv21` does not match the dimensions.
    fn color_convert(&self, nv21: &[u8], width: u32, height: u32) -> Option<Frame>;

    /// Reorient packed 4-byte pixels by index permutation.
    ///
    /// `stride` is the source row length in bytes. Never called with
    /// [`Orientation::IDENTITY`]. The result must measure
    /// `o.transform_dimensions(width, height)`.
    ///
    /// The provided implementation is the portable [`permute::rotate_or_flip`].
    fn rotate_or_flip(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        stride: usize,
        o: Orientation,
    ) -> Option<Frame> {
        let data = permute::rotate_or_flip(pixels, width, height, stride, 4, o)?;
        let out = o.transform_dimensions(width, height);
        Frame::argb(out.width, out.height, data).ok()
    }
}

impl<C: ImageConverter + ?Sized> ImageConverter for &C {
    fn color_convert(&self, nv21: &[u8], width: u32, height: u32) -> Option<Frame> {
        (**self).color_convert(nv21, width, height)
    }

    fn rotate_or_flip(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        stride: usize,
        o: Orientation,
    ) -> Option<Frame> {
        (**self).rotate_or_flip(pixels, width, height, stride, o)
    }
}

/// How a frame gets reoriented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransformPath {
    /// No rotation and no mirror.
    Identity,
    /// Axis-aligned rotate/flip with this orientation (EXIF 2-8).
    Permute(Orientation),
    /// General affine resampling.
    Affine,
}

/// Pick the transform path for a rotation and an x scale.
///
/// The permutation path needs a 90° multiple, a mirror scale of exactly
/// ±1, and a rotation the classifier recognises. Anything else, such as
/// 45° or a 0.5 scale, resamples.
pub fn select_path(rotation_degrees: i32, mirror_scale: f32) -> TransformPath {
    let mirror = Mirror::from_scale(mirror_scale);
    let code = mirror.and_then(|m| classify(rotation_degrees, m));
    match code {
        Some(o) if o.is_identity() => TransformPath::Identity,
        Some(o) if rotation_degrees % 90 == 0 => TransformPath::Permute(o),
        _ => TransformPath::Affine,
    }
}

/// Reorient `frame` for display.
///
/// Consumes the frame; the identity path hands it back without copying.
/// Returns `None` when the frame is not packed pixels, when the converter
/// fails, or when the affine extent is empty.
pub fn transform<C: ImageConverter + ?Sized>(
    converter: &C,
    frame: Frame,
    rotation_degrees: i32,
    mirror_scale: f32,
    resample: Resample,
) -> Option<Frame> {
    if frame.format() != PixelFormat::Argb8888 {
        warn!(format = ?frame.format(), "transform expects packed pixels");
        return None;
    }

    match select_path(rotation_degrees, mirror_scale) {
        TransformPath::Identity => Some(frame),
        TransformPath::Permute(o) => {
            trace!(exif = o.to_exif(), "permutation path");
            let (w, h) = (frame.width(), frame.height());
            let pixels = packed_pixels(&frame);
            let out = converter.rotate_or_flip(&pixels, w, h, frame.stride(), o);
            let expected = o.transform_dimensions(w, h);
            match out {
                Some(f) if f.size() == expected => Some(f),
                Some(f) => {
                    warn!(
                        exif = o.to_exif(),
                        got_width = f.width(),
                        got_height = f.height(),
                        want_width = expected.width,
                        want_height = expected.height,
                        "rotate_or_flip returned wrong dimensions"
                    );
                    None
                }
                None => {
                    warn!(exif = o.to_exif(), "rotate_or_flip failed");
                    None
                }
            }
        }
        TransformPath::Affine => {
            debug!(rotation_degrees, mirror_scale, "affine fallback");
            let m = Affine::IDENTITY
                .post_rotate(rotation_degrees)
                .post_scale(f64::from(mirror_scale), 1.0);
            warp(&frame, &m, resample)
        }
    }
}
