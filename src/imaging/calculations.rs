//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the output dimensions for a proportional resize bounded by
/// `max_edge` on the longer side.
///
/// Returns `None` when the image already fits (`max(w, h) <= max_edge`):
/// images are never upscaled. Otherwise the longer edge becomes exactly
/// `max_edge` and the shorter edge is scaled by the same ratio, rounded down
/// and kept at least 1px.
///
/// # Examples
/// ```
/// # use photo_shrink::imaging::calculate_fit_dimensions;
/// assert_eq!(calculate_fit_dimensions((3000, 2000), 1350), Some((1350, 900)));
/// assert_eq!(calculate_fit_dimensions((800, 600), 1350), None);
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), max_edge: u32) -> Option<(u32, u32)> {
    let (w, h) = source;
    let long = w.max(h);

    if long <= max_edge || long == 0 {
        return None;
    }

    // Integer math keeps floor(dim * max_edge / long) exact.
    let scale = |dim: u32| ((dim as u64 * max_edge as u64) / long as u64).max(1) as u32;
    Some((scale(w), scale(h)))
}
