//! Frame buffers: decoded packed pixels, semi-planar captures, and their invariants.

use alloc::vec::Vec;
use core::fmt;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Memory layout of a [`Frame`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// YUV 4:2:0 semi-planar: a full-resolution luma plane followed by a
    /// half-resolution plane of interleaved V, U pairs. `stride` applies to
    /// both planes.
    Nv21,
    /// Packed 32-bit pixels, 4 bytes each (Android `ARGB_8888`).
    Argb8888,
}

impl PixelFormat {
    /// Bytes per pixel in the first (or only) plane.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Nv21 => 1,
            Self::Argb8888 => 4,
        }
    }

    /// Number of `stride`-byte rows the buffer must hold for `height` lines.
    pub const fn rows(self, height: u32) -> usize {
        let h = height as usize;
        match self {
            Self::Nv21 => h + h / 2,
            Self::Argb8888 => h,
        }
    }
}

/// Why a [`Frame`] could not be constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Width or height is zero.
    ZeroDimension,
    /// Row stride is shorter than one row of pixels.
    StrideTooSmall { stride: usize, min: usize },
    /// Pixel buffer is shorter than `stride × rows`.
    BufferTooShort { len: usize, needed: usize },
    /// NV21 chroma subsampling needs even width and height.
    OddChromaDimension,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => f.write_str("frame has zero width or height"),
            Self::StrideTooSmall { stride, min } => {
                write!(f, "row stride {stride} is below the minimum {min}")
            }
            Self::BufferTooShort { len, needed } => {
                write!(f, "pixel buffer holds {len} bytes, {needed} needed")
            }
            Self::OddChromaDimension => f.write_str("NV21 frames need even dimensions"),
        }
    }
}

impl core::error::Error for FrameError {}

/// An immutable image buffer.
///
/// Construction validates dimensions, stride and length, so every `Frame`
/// has a non-zero area and enough bytes behind it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Frame {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap `data` as a frame. `stride` is the byte distance between rows.
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroDimension);
        }
        if format == PixelFormat::Nv21 && (width % 2 != 0 || height % 2 != 0) {
            return Err(FrameError::OddChromaDimension);
        }
        let min = (width as usize)
            .checked_mul(format.bytes_per_pixel())
            .unwrap_or(usize::MAX);
        if stride < min {
            return Err(FrameError::StrideTooSmall { stride, min });
        }
        let needed = stride
            .checked_mul(format.rows(height))
            .unwrap_or(usize::MAX);
        if data.len() < needed {
            return Err(FrameError::BufferTooShort {
                len: data.len(),
                needed,
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Tightly packed `Argb8888` frame (`stride == width * 4`).
    pub fn argb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FrameError> {
        Self::new(width, height, width as usize * 4, PixelFormat::Argb8888, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bytes per row, including padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The whole backing buffer, which may extend past the last row.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of one row without trailing padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= self.height()`.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * self.format.bytes_per_pixel()]
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// A raw camera capture as delivered by the capture collaborator.
///
/// Borrows the luma plane and the interleaved chroma plane (V first, then
/// U). Planes are assumed tightly packed; no stride correction is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaptureFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub luma: &'a [u8],
    pub chroma: &'a [u8],
}

impl<'a> CaptureFrame<'a> {
    pub fn new(width: u32, height: u32, luma: &'a [u8], chroma: &'a [u8]) -> Self {
        Self {
            width,
            height,
            luma,
            chroma,
        }
    }

    /// Build from `[Y, U, V]` planes of a YUV_420_888 image.
    ///
    /// On devices that interleave chroma, the V plane's buffer already spans
    /// the whole VU sequence, so plane 2 is used as the chroma plane and
    /// plane 1 is ignored.
    pub fn from_planes(width: u32, height: u32, planes: [&'a [u8]; 3]) -> Self {
        Self::new(width, height, planes[0], planes[2])
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
