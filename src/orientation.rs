//! Capture orientation: D4 group, EXIF codes, and the rotation/mirror classifier.

use crate::frame::Size;

/// Image orientation as an element of the D4 dihedral group.
///
/// A clockwise rotation (0, 90, 180, 270 degrees) optionally followed by a
/// horizontal flip. This is the order a capture pipeline applies them in:
/// rotate the sensor image upright, then mirror it for a front camera.
///
/// ```text
///     EXIF orientations and their transforms:
///
///     1: Identity    2: FlipH       3: Rotate180   4: FlipV
///     ┌───┐          ┌───┐          ┌───┐          ┌───┐
///     │ F │          │ Ꟊ │          │   │          │   │
///     │   │          │   │          │ Ꟊ │          │ F │
///     └───┘          └───┘          └───┘          └───┘
///
///     5: Transpose   6: Rotate90    7: Transverse  8: Rotate270
///     ┌────┐         ┌────┐         ┌────┐         ┌────┐
///     │ F  │         │  F │         │  Ꟊ │         │ Ꟊ  │
///     └────┘         └────┘         └────┘         └────┘
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Orientation {
    /// Rotation in 90-degree increments (0-3). 0=0°, 1=90°, 2=180°, 3=270°.
    /// Larger values are read modulo 4.
    pub rotation: u8,
    /// Horizontal flip applied after rotation.
    pub flip: bool,
}

impl Orientation {
    /// Identity. EXIF 1.
    pub const IDENTITY: Self = Self::new(0, false);
    /// Horizontal flip. EXIF 2.
    pub const FLIP_H: Self = Self::new(0, true);
    /// 180° rotation. EXIF 3.
    pub const ROTATE_180: Self = Self::new(2, false);
    /// Vertical flip (180° then horizontal flip). EXIF 4.
    pub const FLIP_V: Self = Self::new(2, true);
    /// Transpose (90° then horizontal flip). EXIF 5.
    pub const TRANSPOSE: Self = Self::new(1, true);
    /// 90° clockwise rotation. EXIF 6.
    pub const ROTATE_90: Self = Self::new(1, false);
    /// Transverse (270° then horizontal flip). EXIF 7.
    pub const TRANSVERSE: Self = Self::new(3, true);
    /// 270° clockwise rotation. EXIF 8.
    pub const ROTATE_270: Self = Self::new(3, false);

    /// All 8 group elements, indexed by EXIF value - 1.
    pub const ALL: [Self; 8] = [
        Self::IDENTITY,
        Self::FLIP_H,
        Self::ROTATE_180,
        Self::FLIP_V,
        Self::TRANSPOSE,
        Self::ROTATE_90,
        Self::TRANSVERSE,
        Self::ROTATE_270,
    ];

    const fn new(rotation: u8, flip: bool) -> Self {
        Self { rotation, flip }
    }

    /// Create from an EXIF orientation code (1-8). `None` for anything else.
    pub fn from_exif(value: u8) -> Option<Self> {
        match value {
            1..=8 => Some(Self::ALL[(value - 1) as usize]),
            _ => None,
        }
    }

    /// EXIF orientation code (1-8).
    pub fn to_exif(self) -> u8 {
        match (self.rotation & 3, self.flip) {
            (0, false) => 1,
            (0, true) => 2,
            (2, false) => 3,
            (2, true) => 4,
            (1, true) => 5,
            (1, false) => 6,
            (3, true) => 7,
            _ => 8,
        }
    }

    pub fn is_identity(self) -> bool {
        self.rotation & 3 == 0 && !self.flip
    }

    /// Whether this orientation swaps width and height (EXIF 5-8).
    pub fn swaps_axes(self) -> bool {
        self.rotation & 1 == 1
    }

    /// Compose two orientations: apply `self` first, then `other`.
    pub fn compose(self, other: Self) -> Self {
        if !self.flip {
            Self::new(((self.rotation & 3) + (other.rotation & 3)) & 3, other.flip)
        } else {
            Self::new(self.rotation.wrapping_sub(other.rotation) & 3, !other.flip)
        }
    }

    /// The inverse orientation: `self.compose(self.inverse()) == IDENTITY`.
    pub fn inverse(self) -> Self {
        if self.flip {
            // Every rotate-then-flip element is a reflection.
            self
        } else {
            Self::new((4 - (self.rotation & 3)) & 3, false)
        }
    }

    /// Output dimensions for a source of `w × h`.
    pub fn transform_dimensions(self, w: u32, h: u32) -> Size {
        if self.swaps_axes() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Map a source pixel to its position in the oriented output.
    ///
    /// `w`/`h` are the source dimensions. Inputs must be in bounds.
    pub fn display_pixel(self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        match (self.rotation & 3, self.flip) {
            (0, false) => (x, y),
            (0, true) => (w - 1 - x, y),
            (1, false) => (h - 1 - y, x),
            (1, true) => (y, x),
            (2, false) => (w - 1 - x, h - 1 - y),
            (2, true) => (x, h - 1 - y),
            (3, false) => (y, w - 1 - x),
            _ => (h - 1 - y, w - 1 - x),
        }
    }

    /// Map an output pixel back to the source pixel it came from.
    ///
    /// `w`/`h` are the source dimensions; `(x, y)` is in output space.
    pub fn source_pixel(self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        match (self.rotation & 3, self.flip) {
            (0, false) => (x, y),
            (0, true) => (w - 1 - x, y),
            (1, false) => (y, h - 1 - x),
            (1, true) => (y, x),
            (2, false) => (w - 1 - x, h - 1 - y),
            (2, true) => (x, h - 1 - y),
            (3, false) => (w - 1 - y, x),
            _ => (w - 1 - y, h - 1 - x),
        }
    }
}

/// Horizontal mirroring applied after rotation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mirror {
    /// Scale x by +1.
    #[default]
    Normal,
    /// Scale x by -1.
    Horizontal,
}

impl Mirror {
    /// Parse an x scale factor. Only exactly `1.0` and `-1.0` are mirror signs.
    pub fn from_scale(sx: f32) -> Option<Self> {
        if sx == 1.0 {
            Some(Self::Normal)
        } else if sx == -1.0 {
            Some(Self::Horizontal)
        } else {
            None
        }
    }

    pub fn scale(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Horizontal => -1.0,
        }
    }
}

/// Which way the capturing camera faces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LensFacing {
    #[default]
    Back,
    /// Selfie camera; its preview is mirrored.
    Front,
}

impl LensFacing {
    pub fn mirror(self) -> Mirror {
        match self {
            Self::Back => Mirror::Normal,
            Self::Front => Mirror::Horizontal,
        }
    }
}

/// Classify a capture rotation and mirror into an orientation.
///
/// Returns `None` for anything outside the eight axis-aligned cases,
/// including negative angles and angles of 360 or more.
pub fn classify(rotation_degrees: i32, mirror: Mirror) -> Option<Orientation> {
    use Mirror::{Horizontal, Normal};
    match (rotation_degrees, mirror) {
        (0, Normal) => Some(Orientation::IDENTITY),
        (0, Horizontal) => Some(Orientation::FLIP_H),
        (180, Normal) => Some(Orientation::ROTATE_180),
        (180, Horizontal) => Some(Orientation::FLIP_V),
        (90, Horizontal) => Some(Orientation::TRANSPOSE),
        (90, Normal) => Some(Orientation::ROTATE_90),
        (270, Horizontal) => Some(Orientation::TRANSVERSE),
        (270, Normal) => Some(Orientation::ROTATE_270),
        _ => None,
    }
}
