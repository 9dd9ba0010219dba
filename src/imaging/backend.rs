//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three codec-facing operations the
//! transform pipeline needs: decode (with metadata capture), ICC → sRGB
//! conversion, and JPEG encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built entirely on
//! pure Rust crates.

use super::color::ColorError;
use super::params::EncodeParams;
use image::{DynamicImage, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Decode(String),
    #[error("Color profile conversion failed: {0}")]
    Color(#[from] ColorError),
    #[error("{0}")]
    Encode(String),
}

/// Width and height of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    pub fn of_rgb(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A fully decoded source image with the metadata captured before any
/// transform touched it.
///
/// Owned by exactly one worker and dropped once the output is written or the
/// item fails.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub pixels: DynamicImage,
    pub icc_profile: Option<Vec<u8>>,
    pub exif: Option<Vec<u8>>,
}

/// Trait for image codec backends.
///
/// Every backend must implement all three operations so the pipeline in
/// [`operations`](super::operations) stays backend-agnostic.
pub trait ImageBackend: Sync {
    /// Open and fully decode a source file, capturing embedded ICC and EXIF.
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError>;

    /// Convert 8-bit RGB pixels in place from `icc_profile` to sRGB.
    ///
    /// On error the pixels must be left as they were.
    fn to_srgb(&self, image: &mut RgbImage, icc_profile: &[u8]) -> Result<(), BackendError>;

    /// Encode 8-bit RGB pixels as a baseline JPEG.
    fn encode(&self, image: &RgbImage, params: &EncodeParams<'_>) -> Result<Vec<u8>, BackendError>;
}
