//! Camera frame orientation normalization.
//!
//! Turns a capture rotation and a mirror flag into one of the eight EXIF
//! orientations, then reorients decoded frames either by a byte-exact pixel
//! permutation or, for anything that is not axis-aligned, by affine
//! resampling. Pixel format conversion is delegated to an [`ImageConverter`].
//!
//! # Modules
//!
//! - [`orientation`] — D4 orientation, EXIF codes, rotation/mirror classifier
//! - [`frame`] — Frame buffers and capture planes
//! - [`adapter`] — Byte-buffer extraction for the converter boundary
//! - [`permute`] — Axis-aligned rotate/flip of packed and NV21 buffers
//! - [`affine`] — Affine matrices and resampling fallback
//! - [`transform`] — Path selection and the converter trait
//! - [`processor`] — Per-frame pipeline

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod adapter;
pub mod affine;
pub mod frame;
pub mod orientation;
pub mod permute;
pub mod processor;
pub mod transform;

pub use adapter::{packed_pixels, planar_to_packed};
pub use affine::{Affine, Resample};
pub use frame::{CaptureFrame, Frame, FrameError, PixelFormat, Size};
pub use orientation::{LensFacing, Mirror, Orientation, classify};
pub use processor::FrameProcessor;
pub use transform::{ImageConverter, TransformPath, select_path, transform};
