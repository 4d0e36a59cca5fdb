//! Sliding-window enumeration.
//!
//! Row starts form the sequence `0, row_step, 2 * row_step, ...` while
//! `start + height <= rows`; column starts are analogous. Windows come out
//! row-major (outer loop over rows), and downstream score arrays are indexed
//! in that order.

use crate::image::ImageView;
use crate::util::{DetectError, DetectResult};
use crate::window::Window;

/// Number of starts along one axis: `ceil((len - size + 1) / step)`.
fn axis_starts(len: usize, size: usize, step: usize) -> usize {
    if size == 0 || size > len {
        return 0;
    }
    (len - size) / step + 1
}

fn check_steps(row_step: usize, col_step: usize) -> DetectResult<()> {
    if row_step == 0 {
        return Err(DetectError::InvalidParameter {
            name: "row_step",
            reason: "must be > 0",
        });
    }
    if col_step == 0 {
        return Err(DetectError::InvalidParameter {
            name: "col_step",
            reason: "must be > 0",
        });
    }
    Ok(())
}

/// Returns how many windows [`window_positions`] yields for these arguments.
pub fn window_count(
    shape: (usize, usize),
    height: usize,
    width: usize,
    row_step: usize,
    col_step: usize,
) -> usize {
    if row_step == 0 || col_step == 0 {
        return 0;
    }
    axis_starts(shape.0, height, row_step) * axis_starts(shape.1, width, col_step)
}

/// Iterator over window placements inside an image of a given shape.
#[derive(Clone, Debug)]
pub struct WindowPositions {
    height: usize,
    width: usize,
    row_step: usize,
    col_step: usize,
    rows: usize,
    cols: usize,
    next: usize,
}

impl Iterator for WindowPositions {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.next >= self.rows * self.cols {
            return None;
        }
        let (r, c) = (self.next / self.cols, self.next % self.cols);
        self.next += 1;
        Window::from_origin(r * self.row_step, c * self.col_step, self.height, self.width)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.rows * self.cols - self.next.min(self.rows * self.cols);
        (left, Some(left))
    }
}

impl ExactSizeIterator for WindowPositions {}

/// Enumerates `height x width` windows over an image of `(rows, cols)`.
///
/// A window larger than the image, or with a zero side, yields nothing.
/// Zero strides are rejected.
pub fn window_positions(
    shape: (usize, usize),
    height: usize,
    width: usize,
    row_step: usize,
    col_step: usize,
) -> DetectResult<WindowPositions> {
    check_steps(row_step, col_step)?;
    Ok(WindowPositions {
        height,
        width,
        row_step,
        col_step,
        rows: axis_starts(shape.0, height, row_step),
        cols: axis_starts(shape.1, width, col_step),
        next: 0,
    })
}

/// Iterator yielding each window together with a zero-copy view of its pixels.
#[derive(Clone, Debug)]
pub struct SlidingWindows<'a> {
    image: ImageView<'a>,
    positions: WindowPositions,
}

impl<'a> Iterator for SlidingWindows<'a> {
    type Item = (ImageView<'a>, Window);

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.positions.next()?;
        // Positions are bounded by the image shape, so the crop cannot fail.
        let patch = self.image.crop(&window).ok()?;
        Some((patch, window))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for SlidingWindows<'_> {}

/// Sweeps a `height x width` window across `image` with the given strides.
pub fn generate_windows<'a>(
    image: ImageView<'a>,
    height: usize,
    width: usize,
    row_step: usize,
    col_step: usize,
) -> DetectResult<SlidingWindows<'a>> {
    let positions = window_positions(image.shape(), height, width, row_step, col_step)?;
    Ok(SlidingWindows { image, positions })
}

#[cfg(test)]
mod tests {
    use super::{axis_starts, window_positions};

    #[test]
    fn axis_starts_follows_arange_semantics() {
        assert_eq!(axis_starts(100, 60, 40), 2);
        assert_eq!(axis_starts(100, 100, 7), 1);
        assert_eq!(axis_starts(100, 101, 1), 0);
        assert_eq!(axis_starts(10, 3, 1), 8);
        assert_eq!(axis_starts(10, 0, 1), 0);
    }

    #[test]
    fn positions_are_row_major() {
        let corners: Vec<_> = window_positions((4, 4), 2, 2, 2, 2)
            .unwrap()
            .map(|w| w.upper_left())
            .collect();
        assert_eq!(corners, vec![(0, 0), (0, 2), (2, 0), (2, 2)]);
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert!(window_positions((4, 4), 2, 2, 0, 1).is_err());
        assert!(window_positions((4, 4), 2, 2, 1, 0).is_err());
    }
}
