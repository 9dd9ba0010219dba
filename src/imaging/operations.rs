//! The per-item transform pipeline.
//!
//! ```text
//! decode → mode normalization → color normalization → resize → encode → write
//! ```
//!
//! Each step returns an explicit result. Decode, encode and write failures
//! short-circuit into a [`TransformError`]; a failed ICC conversion is only a
//! warning and the pipeline continues with the unconverted pixels.
//! [`transform`] is the worker boundary: whatever happens inside, including a
//! codec panic, comes out as exactly one [`Outcome`].
//!
//! ## Known quirks
//!
//! - Alpha is dropped, not blended. Transparent regions keep whatever color
//!   the decoder stored under them.
//! - When a profile was converted to sRGB, the *original* profile is still
//!   embedded in the output. Color-managed viewers will reinterpret the sRGB
//!   pixels through it.
//! - Gray and CMYK profiles are dropped with a warning: the output is always
//!   3-component RGB, which such a profile cannot describe.

use super::backend::{BackendError, Dimensions, ImageBackend, SourceImage};
use super::calculations::calculate_fit_dimensions;
use super::color;
use super::params::{EncodeParams, Quality};
use crate::config::ResizeConfig;
use crate::types::{Outcome, WorkItem};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::fs;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("decode failed: {0}")]
    Decode(#[source] BackendError),
    #[error("encode failed: {0}")]
    Encode(#[source] BackendError),
    #[error("write to {} failed: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to the embedded color profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorStatus {
    /// The source carried no ICC profile.
    NoProfile,
    /// Color handling is switched off in the config.
    Disabled,
    /// Pixels were converted to sRGB.
    Converted,
    /// Conversion failed; pixels kept as decoded.
    Unconverted(String),
    /// The profile is not an RGB profile (data color space given); it is
    /// neither applied nor embedded.
    Incompatible(String),
}

impl ColorStatus {
    /// Whether the source profile should travel with the encoded output.
    fn embeds_profile(&self) -> bool {
        matches!(self, ColorStatus::Converted | ColorStatus::Unconverted(_))
    }
}

/// Details of a successful transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformReport {
    pub source: Dimensions,
    pub output: Dimensions,
    pub color: ColorStatus,
    pub bytes_written: usize,
}

/// Run the whole pipeline for one item and map the result to an [`Outcome`].
///
/// Never panics and never returns an error: failures are logged with the
/// offending path and become [`Outcome::Error`].
pub fn transform(backend: &impl ImageBackend, item: &WorkItem, config: &ResizeConfig) -> Outcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| run_transform(backend, item, config)));

    match result {
        Ok(Ok(report)) => {
            log::debug!(
                "{} → {} ({} → {}, {} bytes)",
                item.input.display(),
                item.output.display(),
                report.source,
                report.output,
                report.bytes_written
            );
            Outcome::Processed
        }
        Ok(Err(err)) => {
            log::error!("Error processing {}: {err}", item.input.display());
            Outcome::Error(err.to_string())
        }
        Err(payload) => {
            let reason = format!("worker panicked: {}", panic_message(payload.as_ref()));
            log::error!("Error processing {}: {reason}", item.input.display());
            Outcome::Error(reason)
        }
    }
}

/// Run the pipeline for one item, returning the first fatal step error.
pub fn run_transform(
    backend: &impl ImageBackend,
    item: &WorkItem,
    config: &ResizeConfig,
) -> Result<TransformReport, TransformError> {
    let SourceImage {
        pixels,
        icc_profile,
        exif,
    } = backend.decode(&item.input).map_err(TransformError::Decode)?;
    let source = Dimensions::of(&pixels);

    let mut rgb = normalize_mode(pixels);
    let color = normalize_color(backend, &mut rgb, icc_profile.as_deref(), config, &item.input);
    let rgb = resize_to_fit(rgb, config.max_edge);

    let params = EncodeParams {
        quality: Quality::new(config.quality),
        icc_profile: icc_profile.as_deref().filter(|_| color.embeds_profile()),
        exif: exif.as_deref().filter(|_| config.preserve_exif),
    };
    let bytes = backend
        .encode(&rgb, &params)
        .map_err(TransformError::Encode)?;

    write_atomic(&item.output, &bytes).map_err(|source| TransformError::Write {
        path: item.output.clone(),
        source,
    })?;

    Ok(TransformReport {
        source,
        output: Dimensions::of_rgb(&rgb),
        color,
        bytes_written: bytes.len(),
    })
}

/// Flatten any decoded color mode to 8-bit RGB.
///
/// Alpha channels are discarded without compositing; palette, grayscale and
/// 16-bit sources are expanded/truncated to 8-bit RGB.
pub fn normalize_mode(pixels: DynamicImage) -> RgbImage {
    match pixels {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

fn normalize_color(
    backend: &impl ImageBackend,
    rgb: &mut RgbImage,
    icc_profile: Option<&[u8]>,
    config: &ResizeConfig,
    path: &Path,
) -> ColorStatus {
    if !config.preserve_color_profile {
        return ColorStatus::Disabled;
    }
    let Some(profile) = icc_profile else {
        return ColorStatus::NoProfile;
    };
    if !color::is_rgb_profile(profile) {
        let space = color::profile_color_space(profile)
            .unwrap_or("unknown")
            .trim_end()
            .to_string();
        log::warn!(
            "Dropping {space} color profile from {}: output is RGB",
            path.display()
        );
        return ColorStatus::Incompatible(space);
    }

    match backend.to_srgb(rgb, profile) {
        Ok(()) => ColorStatus::Converted,
        Err(e) => {
            log::warn!("Color profile conversion warning for {}: {e}", path.display());
            ColorStatus::Unconverted(e.to_string())
        }
    }
}

/// Downscale so the longer edge is at most `max_edge`, using Lanczos3.
///
/// Images that already fit are returned untouched.
pub fn resize_to_fit(image: RgbImage, max_edge: u32) -> RgbImage {
    match calculate_fit_dimensions((image.width(), image.height()), max_edge) {
        Some((width, height)) => imageops::resize(&image, width, height, FilterType::Lanczos3),
        None => image,
    }
}

/// Write `bytes` to `path` so that a reader never sees a partial file.
///
/// Missing parent directories are created (already existing ones are fine).
/// The data goes to a uniquely named temp file in the same directory, which
/// is then renamed over `path`, replacing any previous output. Concurrent
/// writers to the same `path` never share a temp file; the last rename wins.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // Dropping the temp file on an early return deletes it.
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
