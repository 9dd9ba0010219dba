//! # Photo Shrink
//!
//! Batch-resize a directory tree of photos into smaller, color-managed JPEG
//! copies. The output tree mirrors the input tree; every recognized image
//! (`.jpg`, `.jpeg`, `.png`, `.gif`, `.bmp`, any case) becomes a `.jpg` at the
//! same relative path.
//!
//! # Architecture: Scan → Transform → Aggregate
//!
//! ```text
//! 1. Scan        input/   →  Vec<WorkItem>     (sorted, output paths derived)
//! 2. Transform   WorkItem →  Outcome           (one rayon task per file)
//! 3. Aggregate   Outcome  →  RunSummary        (single channel consumer)
//! ```
//!
//! Each stage is testable on its own:
//!
//! - **Scan** is pure path logic over a directory walk.
//! - **Transform** talks to codecs only through the [`imaging::ImageBackend`]
//!   trait, so it runs against a recording mock in tests.
//! - **Aggregate** only sees outcomes, never images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the input root and derives output paths |
//! | [`imaging`] | Per-item pipeline: decode, flatten, sRGB, Lanczos3 resize, JPEG encode, atomic write |
//! | [`process`] | Runs the batch on the rayon pool and folds outcomes into a summary |
//! | [`config`] | Resize settings, deployment profiles, worker count |
//! | [`types`] | `WorkItem`, `Outcome`, `RunSummary`, root resolution |
//! | [`output`] | CLI progress and summary formatting |
//!
//! # Design Decisions
//!
//! ## Per-Item Isolation
//!
//! A corrupt or unwritable file costs exactly one error count. Decode, encode
//! and write failures become [`types::Outcome::Error`]; a failed color
//! conversion is only a warning; a panicking codec is caught at the worker
//! boundary. Only an unreadable input root stops the run.
//!
//! ## Color Handling
//!
//! Sources with an embedded ICC profile are converted to sRGB with a relative
//! colorimetric intent, then re-encoded with their *original* profile still
//! attached. See [`imaging::operations`] for what that means for viewers.
//!
//! ## Pure-Rust Codecs
//!
//! JPEG sources are decoded strictly with `zune-jpeg`, other formats and
//! resampling use the `image` crate, ICC transforms use `qcms`, and JPEG
//! output uses `jpeg-encoder`. No system libraries are required.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
