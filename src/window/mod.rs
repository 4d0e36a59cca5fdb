//! Window geometry, the scale/ratio grid and sliding-window enumeration.
//!
//! Windows use image pixel coordinates as `(row, col)` pairs. The upper-left
//! corner is inclusive and the lower-right corner exclusive, so a window
//! `[(r, c), (r + h, c + w)]` covers exactly `h * w` pixels.

mod grid;
mod sliding;

pub use grid::{GridPoint, ScaleGrid};
pub use sliding::{generate_windows, window_count, window_positions, SlidingWindows, WindowPositions};

use crate::util::{DetectError, DetectResult};

/// Axis-aligned rectangle given by its upper-left and lower-right corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    upper_left: (usize, usize),
    lower_right: (usize, usize),
}

impl Window {
    /// Creates a window from `(row, col)` corners.
    ///
    /// Fails when the lower-right corner lies above or left of the upper-left
    /// one. Zero-area windows are representable so that overlap arithmetic
    /// stays total, but the generator never produces them.
    pub fn new(upper_left: (usize, usize), lower_right: (usize, usize)) -> DetectResult<Self> {
        if lower_right.0 < upper_left.0 || lower_right.1 < upper_left.1 {
            return Err(DetectError::InvalidWindow {
                upper_left,
                lower_right,
            });
        }
        Ok(Self {
            upper_left,
            lower_right,
        })
    }

    /// Creates a window from its origin and size, `None` on overflow.
    pub fn from_origin(row: usize, col: usize, height: usize, width: usize) -> Option<Self> {
        Some(Self {
            upper_left: (row, col),
            lower_right: (row.checked_add(height)?, col.checked_add(width)?),
        })
    }

    /// Upper-left `(row, col)` corner.
    pub fn upper_left(&self) -> (usize, usize) {
        self.upper_left
    }

    /// Lower-right `(row, col)` corner (exclusive).
    pub fn lower_right(&self) -> (usize, usize) {
        self.lower_right
    }

    pub fn height(&self) -> usize {
        self.lower_right.0 - self.upper_left.0
    }

    pub fn width(&self) -> usize {
        self.lower_right.1 - self.upper_left.1
    }

    /// Covered pixel count.
    pub fn area(&self) -> u64 {
        self.height() as u64 * self.width() as u64
    }

    /// Returns `true` for zero-area windows.
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Returns `true` if the window lies fully inside an image of `(rows, cols)`.
    pub fn fits_within(&self, shape: (usize, usize)) -> bool {
        self.lower_right.0 <= shape.0 && self.lower_right.1 <= shape.1
    }

    /// Area shared with `other`; zero when they do not overlap.
    pub fn intersection_area(&self, other: &Window) -> u64 {
        let top = self.upper_left.0.max(other.upper_left.0);
        let left = self.upper_left.1.max(other.upper_left.1);
        let bottom = self.lower_right.0.min(other.lower_right.0);
        let right = self.lower_right.1.min(other.lower_right.1);
        let rows = bottom.saturating_sub(top) as u64;
        let cols = right.saturating_sub(left) as u64;
        rows * cols
    }

    /// Intersection over union with `other`, see [`iou`].
    pub fn iou(&self, other: &Window) -> f32 {
        iou(self, other)
    }
}

/// Computes the Intersection over Union of two windows.
///
/// The result lies in `[0, 1]`; disjoint windows give exactly 0 and a zero
/// union (two degenerate windows) is defined as 0.
pub fn iou(a: &Window, b: &Window) -> f32 {
    let inter = a.intersection_area(b);
    let union = a.area() + b.area() - inter;
    if union == 0 {
        return 0.0;
    }
    (inter as f64 / union as f64) as f32
}
