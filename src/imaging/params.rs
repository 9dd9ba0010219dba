//! Parameter types for encoding.
//!
//! These structs describe *what* to write, not *how*. They are the interface
//! between the [`operations`](super::operations) pipeline (which decides what
//! metadata survives) and the [`backend`](super::backend) (which produces the
//! JPEG bytes). A mock backend can record them without encoding anything.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1-100, default 85). Clamped on construction.
//! - [`EncodeParams`]: quality plus the metadata blocks to embed.

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality as the `u8` JPEG encoders expect.
    pub fn as_u8(self) -> u8 {
        self.0.clamp(1, 100) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// What to embed alongside the pixels of one output JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeParams<'a> {
    pub quality: Quality,
    /// ICC profile bytes for APP2. This is the source profile even when the
    /// pixels were converted to sRGB.
    pub icc_profile: Option<&'a [u8]>,
    /// EXIF block for APP1, with or without the `Exif\0\0` prefix.
    pub exif: Option<&'a [u8]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn quality_as_u8() {
        assert_eq!(Quality::new(40).as_u8(), 40);
        assert_eq!(Quality(300).as_u8(), 100);
    }
}
