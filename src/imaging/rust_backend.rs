//! Pure Rust codec backend.
//!
//! No system libraries: every codec is a Rust crate statically linked into
//! the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode JPEG | `zune-jpeg` in strict mode (truncated scans are errors) |
//! | Decode PNG, GIF, BMP | `image` crate (pure Rust decoders) |
//! | ICC / EXIF capture | `JpegDecoder::icc_profile` / `exif`, `ImageDecoder::icc_profile` / `exif_metadata` |
//! | ICC → sRGB | `qcms` via [`color::convert_to_srgb`] |
//! | Encode → JPEG | `jpeg_encoder::Encoder` with optimized Huffman tables |
//! | EXIF out | APP1 segment, `Exif\0\0` + TIFF block |
//! | ICC out | APP2 `ICC_PROFILE` chunks |
//!
//! GIF input decodes the first frame only.

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::color;
use super::params::EncodeParams;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use zune_core::bytestream::ZCursor;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Identifier that opens an EXIF APP1 segment.
const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Largest payload a single JPEG APP segment can carry.
const MAX_APP_SEGMENT_LEN: usize = 65533;

/// Pure Rust backend using the `image`, `zune-jpeg`, `qcms` and `jpeg-encoder` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
}

/// Load and decode an image from disk, keeping its ICC and EXIF blocks.
///
/// The format is sniffed from the content, falling back to the extension.
fn load_source(path: &Path) -> Result<SourceImage, BackendError> {
    let bytes = fs::read(path)?;
    let format = image::guess_format(&bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|e| decode_error(path, e))?;

    match format {
        ImageFormat::Jpeg => load_jpeg_strict(path, &bytes),
        other => load_with_image(path, &bytes, other),
    }
}

/// Decode a JPEG with `zune-jpeg` in strict mode.
///
/// The lenient decoder behind `image` pads a truncated scan with gray and
/// reports success; strict mode turns a premature end of data, or a marker
/// inside the entropy-coded stream, into an error.
fn load_jpeg_strict(path: &Path, bytes: &[u8]) -> Result<SourceImage, BackendError> {
    let options = DecoderOptions::default()
        .set_strict_mode(true)
        .jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(ZCursor::new(bytes), options);

    let raw = decoder.decode().map_err(|e| decode_error(path, e))?;
    let info = decoder
        .info()
        .ok_or_else(|| decode_error(path, "missing frame header"))?;
    let rgb = RgbImage::from_raw(u32::from(info.width), u32::from(info.height), raw)
        .ok_or_else(|| decode_error(path, "pixel buffer does not match the frame size"))?;

    Ok(SourceImage {
        pixels: DynamicImage::ImageRgb8(rgb),
        icc_profile: decoder.icc_profile().filter(|p| !p.is_empty()),
        exif: decoder.exif().filter(|e| !e.is_empty()).cloned(),
    })
}

/// Decode PNG, GIF and BMP through the `image` crate.
fn load_with_image(
    path: &Path,
    bytes: &[u8],
    format: ImageFormat,
) -> Result<SourceImage, BackendError> {
    let reader = ImageReader::with_format(Cursor::new(bytes), format);
    let mut decoder = reader.into_decoder().map_err(|e| decode_error(path, e))?;

    // Metadata has to be pulled before the decoder is consumed by the pixel read.
    let icc_profile = decoder
        .icc_profile()
        .unwrap_or_else(|e| {
            log::debug!("Ignoring unreadable ICC profile in {}: {e}", path.display());
            None
        })
        .filter(|p| !p.is_empty());
    let exif = decoder
        .exif_metadata()
        .unwrap_or_else(|e| {
            log::debug!("Ignoring unreadable EXIF in {}: {e}", path.display());
            None
        })
        .filter(|e| !e.is_empty());

    let pixels = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;

    Ok(SourceImage {
        pixels,
        icc_profile,
        exif,
    })
}

/// Build an APP1 payload from a captured EXIF block.
///
/// Decoders hand out EXIF either as the bare TIFF structure or with the
/// `Exif\0\0` identifier still attached; both are accepted. Returns `None`
/// for empty blocks and for blocks that do not fit in one segment.
fn exif_segment(exif: &[u8]) -> Option<Vec<u8>> {
    if exif.is_empty() {
        return None;
    }
    let segment = if exif.starts_with(EXIF_HEADER) {
        exif.to_vec()
    } else {
        [EXIF_HEADER, exif].concat()
    };
    (segment.len() <= MAX_APP_SEGMENT_LEN).then_some(segment)
}

fn encode_error(e: jpeg_encoder::EncodingError) -> BackendError {
    BackendError::Encode(e.to_string())
}

/// Encode RGB pixels as a baseline JPEG with the requested metadata.
fn encode_jpeg(image: &RgbImage, params: &EncodeParams<'_>) -> Result<Vec<u8>, BackendError> {
    let too_large = |edge: u32| {
        BackendError::Encode(format!("{edge}px exceeds the JPEG dimension limit of 65535"))
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large(image.width()))?;
    let height = u16::try_from(image.height()).map_err(|_| too_large(image.height()))?;

    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf, params.quality.as_u8());
    encoder.set_optimized_huffman_tables(true);

    if let Some(exif) = params.exif {
        match exif_segment(exif) {
            Some(segment) => encoder.add_app_segment(1, &segment).map_err(encode_error)?,
            None => log::warn!(
                "EXIF block of {} bytes does not fit in an APP1 segment, dropping it",
                exif.len()
            ),
        }
    }

    if let Some(icc) = params.icc_profile {
        if let Err(e) = encoder.add_icc_profile(icc) {
            log::warn!("ICC profile of {} bytes not embedded: {e}", icc.len());
        }
    }

    encoder
        .encode(image.as_raw(), width, height, ColorType::Rgb)
        .map_err(encode_error)?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError> {
        load_source(path)
    }

    fn to_srgb(&self, image: &mut RgbImage, icc_profile: &[u8]) -> Result<(), BackendError> {
        color::convert_to_srgb(image, icc_profile)?;
        Ok(())
    }

    fn encode(&self, image: &RgbImage, params: &EncodeParams<'_>) -> Result<Vec<u8>, BackendError> {
        encode_jpeg(image, params)
    }
}
