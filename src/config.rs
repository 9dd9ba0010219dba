//! Run configuration.
//!
//! There is no configuration file: every setting comes from the command line
//! and falls back to the documented defaults below.
//!
//! ## Defaults
//!
//! ```text
//! max_edge = 1350                # Longest output edge in pixels
//! quality = 85                   # JPEG quality (1-100)
//! preserve_color_profile = true  # Convert to sRGB and re-embed the source ICC
//! preserve_exif = true           # Re-attach the source EXIF block
//! threads = <cores>              # Parallel workers (4 if cores are unknown)
//! ```
//!
//! ## Deployment Profiles
//!
//! A [`Profile`] bundles an edge size and quality that have been used for a
//! particular destination. Explicit `--max-edge` / `--quality` flags win over
//! the profile.
//!
//! | Profile | Max edge | Quality |
//! |---|---|---|
//! | `instagram` | 1350 | 85 |
//! | `web` | 1920 | 60 |
//! | `compact` | 1920 | 40 |

use thiserror::Error;

/// Worker count used when the host cannot report its parallelism.
pub const FALLBACK_THREADS: usize = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Deployment presets for edge size and quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    /// 1350px long edge, quality 85.
    #[default]
    Instagram,
    /// 1920px long edge, quality 60.
    Web,
    /// 1920px long edge, quality 40.
    Compact,
}

impl Profile {
    pub fn max_edge(self) -> u32 {
        match self {
            Profile::Instagram => 1350,
            Profile::Web | Profile::Compact => 1920,
        }
    }

    pub fn quality(self) -> u32 {
        match self {
            Profile::Instagram => 85,
            Profile::Web => 60,
            Profile::Compact => 40,
        }
    }
}

/// Per-image transform settings shared by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeConfig {
    /// Longest allowed output edge. Smaller images are never upscaled.
    pub max_edge: u32,
    /// JPEG quality, 1 (worst) to 100 (best).
    pub quality: u32,
    /// Convert embedded ICC profiles to sRGB and re-embed the original profile.
    pub preserve_color_profile: bool,
    /// Re-attach the captured EXIF block to the output.
    pub preserve_exif: bool,
}

impl ResizeConfig {
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            max_edge: profile.max_edge(),
            quality: profile.quality(),
            preserve_color_profile: true,
            preserve_exif: true,
        }
    }

    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_edge == 0 {
            return Err(ConfigError::Validation(
                "max_edge must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        Ok(())
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self::from_profile(Profile::default())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
///
/// Never returns 0.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_THREADS);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}
