//! Pure calculation functions for image dimensions and encoder settings.
//!
//! All functions here are pure and testable without any I/O or images.

/// Smallest edge the compressor will produce, in pixels.
pub const MIN_EDGE: u32 = 50;

/// Lowest and highest JPEG quality the rate can map to.
pub const QUALITY_FLOOR: u32 = 70;
pub const QUALITY_CEILING: u32 = 100;

/// Scale one edge by `rate`, never going below [`MIN_EDGE`].
fn scale_edge(edge: u32, rate: f64) -> u32 {
    let scaled = (edge as f64 * rate).round();
    // `as` saturates, so absurd inputs cannot wrap
    (scaled as u32).max(MIN_EDGE)
}

/// Output dimensions for a compression at `rate`.
///
/// Each axis is `max(50, round(original * rate))`.
///
/// # Examples
/// ```
/// # use cyber_zen::imaging::target_dimensions;
/// assert_eq!(target_dimensions((800, 600), 0.5), (400, 300));
/// // Tiny images are clamped up to the minimum edge
/// assert_eq!(target_dimensions((60, 40), 0.5), (50, 50));
/// ```
pub fn target_dimensions(original: (u32, u32), rate: f64) -> (u32, u32) {
    let (width, height) = original;
    (scale_edge(width, rate), scale_edge(height, rate))
}

/// JPEG quality derived from the size rate.
///
/// `round(85 + (rate - 0.5) * 30)` clamped to `[70, 100]`, so a smaller rate
/// never drags quality below the floor.
pub fn jpeg_quality(rate: f64) -> u32 {
    let raw = (85.0 + (rate - 0.5) * 30.0).round();
    (raw.max(0.0) as u32).clamp(QUALITY_FLOOR, QUALITY_CEILING)
}

/// Nearest-neighbor source coordinate for destination coordinate `dst`.
///
/// `floor(dst * src_len / dst_len)` in integer arithmetic, clamped to the
/// last valid source index.
pub fn source_coord(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    if dst_len == 0 || src_len == 0 {
        return 0;
    }
    let coord = u64::from(dst) * u64::from(src_len) / u64::from(dst_len);
    coord.min(u64::from(src_len - 1)) as u32
}
