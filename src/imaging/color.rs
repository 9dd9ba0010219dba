//! ICC profile → sRGB conversion.
//!
//! Pixels are converted with a relative colorimetric intent: in-gamut colors
//! are kept, out-of-gamut colors are clipped, and the white point is mapped
//! without rescaling.
//!
//! Only RGB profiles can be applied, because conversion runs after the image
//! has been flattened to 8-bit RGB. [`is_rgb_profile`] lets the worker skip
//! gray and CMYK profiles up front; those are neither converted nor embedded,
//! since a 3-component JPEG tagged with them is invalid. Anything qcms cannot
//! parse comes back as a [`ColorError`], which the worker downgrades to a
//! warning.

use image::RgbImage;
use qcms::{DataType, Intent, Profile, Transform};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("embedded ICC profile could not be parsed")]
    InvalidProfile,
    #[error("no RGB transform from the embedded ICC profile to sRGB")]
    UnsupportedTransform,
}

/// Byte range of the data color space signature in an ICC header.
const COLOR_SPACE_FIELD: std::ops::Range<usize> = 16..20;

/// The four-character data color space of an ICC profile (`RGB `, `GRAY`,
/// `CMYK`, ...), or `None` if the header is too short.
pub fn profile_color_space(icc_profile: &[u8]) -> Option<&str> {
    icc_profile
        .get(COLOR_SPACE_FIELD)
        .and_then(|sig| std::str::from_utf8(sig).ok())
}

/// Whether the profile describes RGB data and so can travel with RGB pixels.
pub fn is_rgb_profile(icc_profile: &[u8]) -> bool {
    profile_color_space(icc_profile) == Some("RGB ")
}

/// Convert `image` in place from `icc_profile` to sRGB.
///
/// Leaves the pixels untouched on error.
pub fn convert_to_srgb(image: &mut RgbImage, icc_profile: &[u8]) -> Result<(), ColorError> {
    let input = Profile::new_from_slice(icc_profile, false).ok_or(ColorError::InvalidProfile)?;
    let srgb = Profile::new_sRGB();
    let transform = Transform::new(&input, &srgb, DataType::RGB8, Intent::RelativeColorimetric)
        .ok_or(ColorError::UnsupportedTransform)?;

    let pixels: &mut [u8] = image;
    transform.apply(pixels);
    Ok(())
}
