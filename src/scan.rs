//! Directory scanning and work-list generation.
//!
//! Walks the input root recursively and produces one [`WorkItem`] per
//! recognized image. The output path mirrors the file's position under the
//! input root, re-rooted at the output root, with the extension replaced by
//! `.jpg`:
//!
//! ```text
//! input/                      output/
//! ├── a/                      ├── a/
//! │   └── photo.png     →     │   └── photo.jpg
//! ├── b/                      └── b/
//! │   └── IMG_01.JPEG   →         └── IMG_01.jpg
//! └── notes.txt               (skipped)
//! ```
//!
//! ## Rules
//!
//! - Recognized extensions (case-insensitive): `jpg`, `jpeg`, `png`, `gif`, `bmp`
//! - Entries are visited in file-name order, so an unchanged tree always
//!   produces the same list in the same order
//! - If the output root lives inside the input root it is not descended into
//! - Symbolic links are followed; the output path comes from the link's own
//!   location. Broken links and link cycles are logged and skipped
//! - The scan is read-only; nothing is created here
//!
//! A missing or unreadable input root is fatal. An unreadable subdirectory is
//! logged and skipped.

use crate::types::WorkItem;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input root not found: {0}")]
    NotFound(PathBuf),
    #[error("Input root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot read input root {0}: {1}")]
    Unreadable(PathBuf, #[source] walkdir::Error),
}

/// Extensions accepted as input, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Extension every output file gets.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Enumerate every recognized image under `input_root`.
pub fn scan(input_root: &Path, output_root: &Path) -> Result<Vec<WorkItem>, ScanError> {
    if !input_root.exists() {
        return Err(ScanError::NotFound(input_root.to_path_buf()));
    }
    if !input_root.is_dir() {
        return Err(ScanError::NotADirectory(input_root.to_path_buf()));
    }

    let output_canonical = output_root.canonicalize().ok();
    let mut items = Vec::new();
    let mut seen_outputs = HashSet::new();

    let walker = WalkDir::new(input_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.depth() > 0
                && e.file_type().is_dir()
                && is_output_dir(e.path(), output_root, output_canonical.as_deref()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::Unreadable(input_root.to_path_buf(), err));
            }
            Err(err) => {
                log::warn!("Skipping unreadable entry: {err}");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }

        let output = output_path_for(input_root, output_root, entry.path());
        if !seen_outputs.insert(output.clone()) {
            log::warn!(
                "{} maps to an output path already claimed by another input: {}",
                entry.path().display(),
                output.display()
            );
        }
        items.push(WorkItem::new(entry.path(), output));
    }

    log::debug!(
        "Scanned {}: {} image(s) found",
        input_root.display(),
        items.len()
    );
    Ok(items)
}

/// Check whether a file's extension is one of [`IMAGE_EXTENSIONS`].
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Derive the output path for a file found under `input_root`.
///
/// Files outside `input_root` keep only their file name.
pub fn output_path_for(input_root: &Path, output_root: &Path, input: &Path) -> PathBuf {
    let relative = input
        .strip_prefix(input_root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| input.file_name().map(PathBuf::from).unwrap_or_default());
    output_root.join(relative).with_extension(OUTPUT_EXTENSION)
}

fn is_output_dir(dir: &Path, output_root: &Path, output_canonical: Option<&Path>) -> bool {
    if dir == output_root {
        return true;
    }
    match (output_canonical, dir.canonicalize()) {
        (Some(out), Ok(dir)) => dir == out,
        _ => false,
    }
}
