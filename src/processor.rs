//! Per-frame pipeline: capture planes in, upright packed frame out.

use tracing::{trace, warn};

use crate::adapter::planar_to_packed;
use crate::affine::Resample;
use crate::frame::{CaptureFrame, Frame};
use crate::orientation::LensFacing;
use crate::transform::{ImageConverter, transform};

/// Turns raw camera captures into upright, optionally mirrored frames.
///
/// Holds no per-frame state, so one processor can serve every frame of a
/// capture session.
///
/// # Example
///
/// ```
/// use zenframe::{Frame, FrameProcessor, ImageConverter, LensFacing, CaptureFrame};
///
/// struct Gray;
///
/// impl ImageConverter for Gray {
///     fn color_convert(&self, nv21: &[u8], w: u32, h: u32) -> Option<Frame> {
///         let luma = nv21.get(..(w * h) as usize)?;
///         let argb = luma.iter().flat_map(|&l| [l, l, l, 255]).collect();
///         Frame::argb(w, h, argb).ok()
///     }
/// }
///
/// let processor = FrameProcessor::new(Gray).lens_facing(LensFacing::Front);
/// let (luma, chroma) = ([10u8, 20, 30, 40], [128u8, 128]);
/// let capture = CaptureFrame::new(2, 2, &luma, &chroma);
///
/// let frame = processor.process(Some(&capture), 90).unwrap();
/// assert_eq!((frame.width(), frame.height()), (2, 2));
/// ```
#[derive(Clone, Debug)]
pub struct FrameProcessor<C> {
    converter: C,
    lens_facing: LensFacing,
    resample: Resample,
}

impl<C: ImageConverter> FrameProcessor<C> {
    /// Back camera, bilinear fallback resampling.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            lens_facing: LensFacing::Back,
            resample: Resample::Bilinear,
        }
    }

    /// Set the camera facing; front cameras are mirrored horizontally.
    pub fn lens_facing(mut self, lens_facing: LensFacing) -> Self {
        self.lens_facing = lens_facing;
        self
    }

    /// Set the filter for rotations that are not a multiple of 90°.
    pub fn resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Process a capture, mirroring according to the configured lens facing.
    pub fn process(
        &self,
        capture: Option<&CaptureFrame<'_>>,
        rotation_degrees: i32,
    ) -> Option<Frame> {
        let mirror = self.lens_facing.mirror().scale();
        self.process_frame(capture, rotation_degrees, mirror)
    }

    /// Convert and reorient one capture.
    ///
    /// A missing capture, or one with zero width or height, yields `None`
    /// without touching the converter. Converter failures also yield `None`.
    pub fn process_frame(
        &self,
        capture: Option<&CaptureFrame<'_>>,
        rotation_degrees: i32,
        mirror_scale: f32,
    ) -> Option<Frame> {
        let capture = capture.filter(|c| !c.is_empty())?;
        let nv21 = planar_to_packed(capture)?;
        trace!(
            width = capture.width,
            height = capture.height,
            bytes = nv21.len(),
            "converting capture"
        );
        let Some(decoded) = self
            .converter
            .color_convert(&nv21, capture.width, capture.height)
        else {
            warn!(
                width = capture.width,
                height = capture.height,
                bytes = nv21.len(),
                "color conversion failed"
            );
            return None;
        };
        transform(
            &self.converter,
            decoded,
            rotation_degrees,
            mirror_scale,
            self.resample,
        )
    }
}
