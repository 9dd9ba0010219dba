//! Image transform worker, pure Rust with no system libraries.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Decode** JPEG (strict) + ICC/EXIF capture | `zune_jpeg::JpegDecoder` |
//! | **Decode** PNG, GIF, BMP + ICC/EXIF capture | `image::ImageReader` → `ImageDecoder` |
//! | **Mode normalization** | `DynamicImage::to_rgb8` (alpha dropped, not blended) |
//! | **Color normalization** | `qcms` ICC → sRGB, relative colorimetric |
//! | **Resize** | `image::imageops::resize` with `Lanczos3` |
//! | **Encode** | `jpeg-encoder` (optimized Huffman tables, APP1 EXIF, APP2 ICC) |
//! | **Write** | temp file + rename |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing an encode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Color**: ICC profile → sRGB conversion
//! - **Operations**: The per-item pipeline, mapping every step to an [`Outcome`](crate::types::Outcome)

pub mod backend;
mod calculations;
pub mod color;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, SourceImage};
pub use calculations::calculate_fit_dimensions;
pub use operations::{
    ColorStatus, TransformError, TransformReport, normalize_mode, resize_to_fit, run_transform,
    transform, write_atomic,
};
pub use params::{EncodeParams, Quality};
pub use rust_backend::RustBackend;
