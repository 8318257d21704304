//! Step-by-step pixel simulation vs the frame pipeline.
//!
//! Every luma byte of the capture is its own pixel index, and the test
//! converter copies luma into the first channel, so each output pixel says
//! exactly which source pixel it came from.
//!
//! "Step mode" rotates a grid one quarter turn at a time, then mirrors it,
//! the way the capture rotation is described. The pipeline has to produce
//! the same grid through a single classified permutation.

use std::cell::{Cell, RefCell};

use zenframe::*;

// ---- Pixel simulation ----

#[derive(Clone, Debug, PartialEq, Eq)]
struct Grid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl Grid {
    fn source(w: u32, h: u32) -> Self {
        Self {
            width: w,
            height: h,
            cells: (0..w * h).map(|i| i as u8).collect(),
        }
    }

    fn get(&self, x: u32, y: u32) -> u8 {
        self.cells[(y * self.width + x) as usize]
    }

    /// One quarter turn clockwise.
    fn rotate_cw(&self) -> Self {
        let (w, h) = (self.height, self.width);
        let mut cells = vec![0; (w * h) as usize];
        for y in 0..self.height {
            for x in 0..self.width {
                let (nx, ny) = (self.height - 1 - y, x);
                cells[(ny * w + nx) as usize] = self.get(x, y);
            }
        }
        Self {
            width: w,
            height: h,
            cells,
        }
    }

    fn mirror(&self) -> Self {
        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                out.cells[(y * self.width + self.width - 1 - x) as usize] = self.get(x, y);
            }
        }
        out
    }

    fn from_frame(f: &Frame) -> Self {
        let cells = (0..f.height())
            .flat_map(|y| f.row(y).chunks(4).map(|px| px[0]).collect::<Vec<_>>())
            .collect();
        Self {
            width: f.width(),
            height: f.height(),
            cells,
        }
    }
}

// ---- Converters ----

/// Grayscale decode; relies on the provided permutation.
#[derive(Default)]
struct Luma {
    converts: Cell<u32>,
}

impl ImageConverter for Luma {
    fn color_convert(&self, nv21: &[u8], w: u32, h: u32) -> Option<Frame> {
        self.converts.set(self.converts.get() + 1);
        let luma = nv21.get(..(w * h) as usize)?;
        Frame::argb(w, h, luma.iter().flat_map(|&l| [l, l, l, 255]).collect()).ok()
    }
}

/// Records every orientation handed to the permutation primitive.
#[derive(Default)]
struct Recording {
    inner: Luma,
    seen: RefCell<Vec<u8>>,
}

impl ImageConverter for Recording {
    fn color_convert(&self, nv21: &[u8], w: u32, h: u32) -> Option<Frame> {
        self.inner.color_convert(nv21, w, h)
    }

    fn rotate_or_flip(
        &self,
        pixels: &[u8],
        w: u32,
        h: u32,
        stride: usize,
        o: Orientation,
    ) -> Option<Frame> {
        self.seen.borrow_mut().push(o.to_exif());
        self.inner.rotate_or_flip(pixels, w, h, stride, o)
    }
}

fn capture_bytes(w: u32, h: u32) -> (Vec<u8>, Vec<u8>) {
    let luma = (0..w * h).map(|i| i as u8).collect();
    let chroma = vec![128; (w * h / 2) as usize];
    (luma, chroma)
}

// ---- Tests ----

#[test]
fn step_mode_matches_pipeline_for_all_eight() {
    let (w, h) = (6, 4);
    let (luma, chroma) = capture_bytes(w, h);
    let capture = CaptureFrame::new(w, h, &luma, &chroma);
    let processor = FrameProcessor::new(Recording::default());

    for quarter in 0..4 {
        for mirror in [Mirror::Normal, Mirror::Horizontal] {
            let deg = quarter * 90;
            let mut expected = Grid::source(w, h);
            for _ in 0..quarter {
                expected = expected.rotate_cw();
            }
            if mirror == Mirror::Horizontal {
                expected = expected.mirror();
            }

            let frame = processor
                .process_frame(Some(&capture), deg, mirror.scale())
                .unwrap();
            assert_eq!(Grid::from_frame(&frame), expected, "{deg}° {mirror:?}");
        }
    }

    // Identity never reaches the permutation primitive.
    assert_eq!(*processor.converter().seen.borrow(), vec![2, 6, 5, 3, 4, 8, 7]);
}

#[test]
fn identity_law() {
    let f = Frame::argb(3, 1, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap();
    let out = transform(&Luma::default(), f.clone(), 0, 1.0, Resample::Bilinear);
    assert_eq!(out, Some(f));
}

#[test]
fn quarter_turn_swaps_dimensions_on_fast_path() {
    let (luma, chroma) = capture_bytes(8, 2);
    let capture = CaptureFrame::new(8, 2, &luma, &chroma);
    let processor = FrameProcessor::new(Recording::default());
    let f = processor.process_frame(Some(&capture), 90, 1.0).unwrap();
    assert_eq!((f.width(), f.height()), (2, 8));
    assert_eq!(*processor.converter().seen.borrow(), vec![6]);
}

#[test]
fn odd_angles_and_scales_skip_fast_path() {
    let (luma, chroma) = capture_bytes(4, 4);
    let capture = CaptureFrame::new(4, 4, &luma, &chroma);
    let processor = FrameProcessor::new(Recording::default());

    let f = processor.process_frame(Some(&capture), 45, 1.0).unwrap();
    assert_eq!((f.width(), f.height()), (6, 6));
    let f = processor.process_frame(Some(&capture), 45, -1.0).unwrap();
    assert_eq!((f.width(), f.height()), (6, 6));
    let f = processor.process_frame(Some(&capture), 90, 0.5).unwrap();
    assert_eq!((f.width(), f.height()), (2, 4));

    assert!(processor.converter().seen.borrow().is_empty());
}

#[test]
fn arbitrary_rotation_keeps_the_centre() {
    let (luma, chroma) = capture_bytes(5, 5);
    let capture = CaptureFrame::new(5, 5, &luma, &chroma);
    let processor = FrameProcessor::new(Luma::default()).resample(Resample::Nearest);
    let centre = luma[12];

    for deg in [30, 45, 60, 135, 210, 315] {
        let f = processor.process_frame(Some(&capture), deg, 1.0).unwrap();
        assert_eq!((f.width(), f.height()), (7, 7), "{deg}°");
        assert_eq!(Grid::from_frame(&f).get(3, 3), centre, "{deg}°");
    }
}

#[test]
fn absent_input_never_converts() {
    let processor = FrameProcessor::new(Luma::default());
    assert!(processor.process_frame(None, 0, 1.0).is_none());
    assert!(processor.process(None, 270).is_none());
    let empty = CaptureFrame::new(640, 0, &[], &[]);
    assert!(processor.process_frame(Some(&empty), 90, -1.0).is_none());
    assert_eq!(processor.converter().converts.get(), 0);
}

#[test]
fn front_lens_uses_mirrored_codes() {
    let (luma, chroma) = capture_bytes(4, 2);
    let capture = CaptureFrame::from_planes(4, 2, [&luma[..], &[], &chroma[..]]);
    let processor = FrameProcessor::new(Recording::default()).lens_facing(LensFacing::Front);
    for deg in [0, 90, 180, 270] {
        processor.process(Some(&capture), deg).unwrap();
    }
    assert_eq!(*processor.converter().seen.borrow(), vec![2, 5, 4, 7]);
}

#[test]
fn nv21_rotation_matches_packed_rotation() {
    let (w, h) = (4u32, 4u32);
    let (luma, chroma) = capture_bytes(w, h);
    let nv21 = planar_to_packed(&CaptureFrame::new(w, h, &luma, &chroma)).unwrap();
    let frame = Frame::new(w, h, w as usize, PixelFormat::Nv21, nv21).unwrap();
    for o in Orientation::ALL {
        let rotated = zenframe::permute::rotate_nv21(&frame, o).unwrap();
        let d = o.transform_dimensions(w, h);
        let luma_only =
            zenframe::permute::rotate_or_flip(&luma, w, h, w as usize, 1, o).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (d.width, d.height));
        assert_eq!(&rotated.data()[..16], &luma_only[..], "{o:?}");
        assert!(rotated.data()[16..].iter().all(|&c| c == 128));
    }
}
