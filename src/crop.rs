//! Aspect-ratio crop - finds the centered region of the source that matches the target grid.

use crate::TargetSize;

/// Crop region within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Whole-image rectangle.
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Compute the centered crop of a `src_w × src_h` image whose aspect ratio
/// matches `target_w : target_h`.
///
/// The source keeps its full height when it is relatively wider than the
/// target, and its full width when it is relatively taller. Rounding is
/// half away from zero. All four values must be positive.
pub fn compute_crop(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CropRect {
    debug_assert!(src_w > 0 && src_h > 0, "source dimensions must be positive");
    debug_assert!(target_w > 0 && target_h > 0, "target dimensions must be positive");

    // Cross-multiplied so that equal ratios compare exactly
    let src_cross = src_w as u64 * target_h as u64;
    let target_cross = target_w as u64 * src_h as u64;
    let target_aspect = target_w as f64 / target_h as f64;

    if src_cross > target_cross {
        // Source is wider: keep full height, trim the sides
        let width = round_side(src_h as f64 * target_aspect, src_w);
        let x = ((src_w - width) as f64 / 2.0).round() as u32;
        CropRect { x, y: 0, width, height: src_h }
    } else if src_cross < target_cross {
        // Source is taller: keep full width, trim top and bottom
        let height = round_side(src_w as f64 / target_aspect, src_h);
        let y = ((src_h - height) as f64 / 2.0).round() as u32;
        CropRect { x: 0, y, width: src_w, height }
    } else {
        CropRect::full(src_w, src_h)
    }
}

// Extreme ratios can round a side down to zero; that crop is kept as-is.
fn round_side(value: f64, limit: u32) -> u32 {
    (value.round() as u32).min(limit)
}

/// True when the target grid has more cells than the source has pixels along
/// either axis. Pixelation still proceeds; callers surface this as a warning.
pub fn exceeds_source(src_w: u32, src_h: u32, target: TargetSize) -> bool {
    target.width() > src_w || target.height() > src_h
}
