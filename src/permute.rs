//! Axis-aligned rotate/flip as a pure index permutation.
//!
//! No interpolation: every output pixel is a byte-exact copy of one source
//! pixel, chosen by [`Orientation::source_pixel`].

use alloc::vec;
use alloc::vec::Vec;

use crate::frame::{Frame, PixelFormat};
use crate::orientation::Orientation;

/// Reorient a packed buffer of `bytes_per_pixel`-sized pixels.
///
/// `stride` is the source row length in bytes. The result is tightly packed
/// with dimensions `o.transform_dimensions(width, height)`. Returns `None`
/// if the geometry is empty, its byte length overflows, or `src` is too
/// short for it.
pub fn rotate_or_flip(
    src: &[u8],
    width: u32,
    height: u32,
    stride: usize,
    bytes_per_pixel: usize,
    o: Orientation,
) -> Option<Vec<u8>> {
    if width == 0 || height == 0 || bytes_per_pixel == 0 {
        return None;
    }
    let row_bytes = (width as usize).checked_mul(bytes_per_pixel)?;
    let needed = stride
        .checked_mul(height as usize - 1)?
        .checked_add(row_bytes)?;
    if stride < row_bytes || src.len() < needed {
        return None;
    }

    let out = o.transform_dimensions(width, height);
    let out_row = out.width as usize * bytes_per_pixel;
    let mut dst = vec![0u8; out_row * out.height as usize];
    for (dy, row) in dst.chunks_exact_mut(out_row).enumerate() {
        for (dx, px) in row.chunks_exact_mut(bytes_per_pixel).enumerate() {
            let (sx, sy) = o.source_pixel(dx as u32, dy as u32, width, height);
            let at = sy as usize * stride + sx as usize * bytes_per_pixel;
            px.copy_from_slice(&src[at..at + bytes_per_pixel]);
        }
    }
    Some(dst)
}

/// Reorient an NV21 frame without converting it.
///
/// Luma is permuted per byte; chroma is permuted per VU pair at half
/// resolution, so the output stays valid NV21.
pub fn rotate_nv21(frame: &Frame, o: Orientation) -> Option<Frame> {
    if frame.format() != PixelFormat::Nv21 {
        return None;
    }
    let (w, h, stride) = (frame.width(), frame.height(), frame.stride());
    let (luma, chroma) = frame.data().split_at(stride * h as usize);

    let mut data = rotate_or_flip(luma, w, h, stride, 1, o)?;
    data.extend(rotate_or_flip(chroma, w / 2, h / 2, stride, 2, o)?);

    let out = o.transform_dimensions(w, h);
    Frame::new(out.width, out.height, out.width as usize, PixelFormat::Nv21, data).ok()
}
