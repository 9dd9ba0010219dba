//! Shared test utilities for the photo-shrink test suite.
//!
//! Synthetic image writers and a hand-built ICC profile, so codec tests never
//! depend on fixture files or external tools.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("a/photo.jpg"), 300, 200);
//! write_jpeg_with_metadata(&path, 64, 48, Some(&rgb_icc_profile(2.2)), Some(TIFF_EXIF));
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Smallest valid little-endian TIFF block: header plus one empty IFD.
pub const TIFF_EXIF: &[u8] = b"II*\0\x08\0\0\0\0\0\0\0\0\0";

// =========================================================================
// Pixel sources
// =========================================================================

/// A deterministic RGB gradient with enough detail to compress non-trivially.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

// =========================================================================
// File writers
// =========================================================================

/// Write a plain baseline JPEG (no ICC, no EXIF).
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    create_parent(path);
    let img = gradient(width, height);
    let writer = BufWriter::new(File::create(path).unwrap());
    JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write an RGBA PNG whose left half is fully transparent.
///
/// Always PNG regardless of the extension in `path`.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32) {
    create_parent(path);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 200, alpha])
    });
    let writer = BufWriter::new(File::create(path).unwrap());
    PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}

/// Write a JPEG that carries the given ICC profile (APP2) and EXIF (APP1).
pub fn write_jpeg_with_metadata(
    path: &Path,
    width: u32,
    height: u32,
    icc: Option<&[u8]>,
    exif: Option<&[u8]>,
) {
    create_parent(path);
    let img = gradient(width, height);
    let mut encoder = jpeg_encoder::Encoder::new_file(path, 90).unwrap();
    if let Some(exif) = exif {
        let segment = [b"Exif\0\0".as_slice(), exif].concat();
        encoder.add_app_segment(1, &segment).unwrap();
    }
    if let Some(icc) = icc {
        encoder.add_icc_profile(icc).unwrap();
    }
    encoder
        .encode(
            img.as_raw(),
            width as u16,
            height as u16,
            jpeg_encoder::ColorType::Rgb,
        )
        .unwrap();
}

/// Write a single-channel JPEG tagged with the given ICC profile.
pub fn write_gray_jpeg_with_icc(path: &Path, width: u32, height: u32, icc: &[u8]) {
    create_parent(path);
    let luma: Vec<u8> = gradient(width, height).pixels().map(|p| p.0[0]).collect();
    let mut encoder = jpeg_encoder::Encoder::new_file(path, 90).unwrap();
    encoder.add_icc_profile(icc).unwrap();
    encoder
        .encode(
            &luma,
            width as u16,
            height as u16,
            jpeg_encoder::ColorType::Luma,
        )
        .unwrap();
}

/// Write an RGB gradient PNG with an embedded ICC profile (`iCCP` chunk).
pub fn write_png_with_icc(path: &Path, width: u32, height: u32, icc: &[u8]) {
    create_parent(path);
    let img = gradient(width, height);
    let writer = BufWriter::new(File::create(path).unwrap());
    let mut encoder = PngEncoder::new(writer);
    encoder.set_icc_profile(icc.to_vec()).unwrap();
    encoder
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

// =========================================================================
// ICC
// =========================================================================

fn s15_fixed16(value: f64) -> [u8; 4] {
    ((value * 65536.0).round() as i32).to_be_bytes()
}

fn xyz_tag(x: f64, y: f64, z: f64) -> Vec<u8> {
    let mut tag = b"XYZ \0\0\0\0".to_vec();
    for v in [x, y, z] {
        tag.extend_from_slice(&s15_fixed16(v));
    }
    tag
}

fn gamma_tag(gamma: f64) -> Vec<u8> {
    let mut tag = b"curv\0\0\0\0".to_vec();
    tag.extend_from_slice(&1u32.to_be_bytes());
    tag.extend_from_slice(&((gamma * 256.0).round() as u16).to_be_bytes());
    tag.extend_from_slice(&[0, 0]);
    tag
}

/// Assemble a v2 display profile: 128-byte header, tag table, tag data.
fn build_profile(color_space: &[u8; 4], tags: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let table_len = 4 + 12 * tags.len();
    let mut table = (tags.len() as u32).to_be_bytes().to_vec();
    let mut data = Vec::new();
    for (sig, body) in tags {
        let offset = 128 + table_len + data.len();
        table.extend_from_slice(*sig);
        table.extend_from_slice(&(offset as u32).to_be_bytes());
        table.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(body);
        // Tag data starts on 4-byte boundaries.
        data.resize(data.len().next_multiple_of(4), 0);
    }

    let total = 128 + table.len() + data.len();
    let mut header = vec![0u8; 128];
    header[0..4].copy_from_slice(&(total as u32).to_be_bytes());
    header[8..12].copy_from_slice(&0x0210_0000u32.to_be_bytes());
    header[12..16].copy_from_slice(b"mntr");
    header[16..20].copy_from_slice(color_space);
    header[20..24].copy_from_slice(b"XYZ ");
    header[36..40].copy_from_slice(b"acsp");
    header[68..72].copy_from_slice(&s15_fixed16(0.9642));
    header[72..76].copy_from_slice(&s15_fixed16(1.0));
    header[76..80].copy_from_slice(&s15_fixed16(0.8249));

    [header, table, data].concat()
}

/// Build a v2 RGB display profile with sRGB primaries and a pure power-law
/// transfer curve.
///
/// With `gamma` near 2.2 the result is close to sRGB, so converting through
/// it should barely move colors.
pub fn rgb_icc_profile(gamma: f64) -> Vec<u8> {
    build_profile(
        b"RGB ",
        &[
            (b"wtpt", xyz_tag(0.9642, 1.0, 0.8249)),
            (b"rXYZ", xyz_tag(0.4361, 0.2225, 0.0139)),
            (b"gXYZ", xyz_tag(0.3851, 0.7169, 0.0971)),
            (b"bXYZ", xyz_tag(0.1431, 0.0606, 0.7141)),
            (b"rTRC", gamma_tag(gamma)),
            (b"gTRC", gamma_tag(gamma)),
            (b"bTRC", gamma_tag(gamma)),
        ],
    )
}

/// Build a v2 grayscale profile (white point plus one gray curve).
pub fn gray_icc_profile(gamma: f64) -> Vec<u8> {
    build_profile(
        b"GRAY",
        &[
            (b"wtpt", xyz_tag(0.9642, 1.0, 0.8249)),
            (b"kTRC", gamma_tag(gamma)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icc_profile_size_matches_header() {
        let profile = rgb_icc_profile(2.2);
        let declared = u32::from_be_bytes(profile[0..4].try_into().unwrap());
        assert_eq!(declared as usize, profile.len());
        assert_eq!(&profile[36..40], b"acsp");
    }

    #[test]
    fn gray_profile_is_tagged_gray() {
        let profile = gray_icc_profile(2.2);
        let declared = u32::from_be_bytes(profile[0..4].try_into().unwrap());
        assert_eq!(declared as usize, profile.len());
        assert_eq!(&profile[16..20], b"GRAY");
    }

    #[test]
    fn test_jpeg_is_readable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested/a.jpg");
        create_test_jpeg(&path, 20, 10);
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (20, 10));
    }
}
