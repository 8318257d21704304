//! Byte-buffer extraction at the collaborator boundary.

use alloc::vec::Vec;

use crate::frame::{CaptureFrame, Frame};

/// Concatenate the luma plane and the VU chroma plane into one NV21 buffer.
///
/// Output length is `luma.len() + chroma.len()`. Returns `None` for a
/// capture with zero width or height.
pub fn planar_to_packed(capture: &CaptureFrame<'_>) -> Option<Vec<u8>> {
    if capture.is_empty() {
        return None;
    }
    let mut packed = Vec::with_capacity(capture.luma.len() + capture.chroma.len());
    packed.extend_from_slice(capture.luma);
    packed.extend_from_slice(capture.chroma);
    Some(packed)
}

/// Copy exactly `stride × rows` bytes of `frame`, keeping row padding.
pub fn packed_pixels(frame: &Frame) -> Vec<u8> {
    let len = frame.stride() * frame.format().rows(frame.height());
    frame.data()[..len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;
    use alloc::vec;

    #[test]
    fn luma_then_chroma() {
        let luma: Vec<u8> = (0..10).collect();
        let chroma: Vec<u8> = (100..105).collect();
        let capture = CaptureFrame::new(4, 2, &luma, &chroma);
        let packed = planar_to_packed(&capture).unwrap();
        assert_eq!(packed.len(), 15);
        assert_eq!(&packed[..10], &luma[..]);
        assert_eq!(&packed[10..], &chroma[..]);
    }

    #[test]
    fn empty_capture_is_absent() {
        let capture = CaptureFrame::new(0, 0, &[], &[]);
        assert_eq!(planar_to_packed(&capture), None);
        let capture = CaptureFrame::new(640, 0, &[1, 2], &[3]);
        assert_eq!(planar_to_packed(&capture), None);
    }

    #[test]
    fn packed_pixels_keeps_stride_drops_tail() {
        // 2x2 frame, 12-byte rows, 4 spare bytes past the last row.
        let data: Vec<u8> = (0..28).collect();
        let f = Frame::new(2, 2, 12, PixelFormat::Argb8888, data).unwrap();
        let bytes = packed_pixels(&f);
        assert_eq!(bytes.len(), 24);
        assert_eq!(bytes, (0..24).collect::<Vec<u8>>());
    }

    #[test]
    fn packed_pixels_nv21_covers_both_planes() {
        let f = Frame::new(2, 2, 2, PixelFormat::Nv21, vec![9; 6]).unwrap();
        assert_eq!(packed_pixels(&f), vec![9; 6]);
    }
}
