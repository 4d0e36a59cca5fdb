//! Image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into an interleaved `u8` buffer with 1
//! (grayscale) or 3 (RGB) channels. The stride counts elements between the
//! starts of consecutive rows, so a stride larger than `width * channels`
//! represents padded rows. ROI views are zero-copy slices of the same backing
//! buffer and keep the parent stride.

use crate::util::{DetectError, DetectResult};
use crate::window::Window;

pub mod draw;
#[cfg(feature = "image-io")]
pub mod io;
mod owned;

pub use owned::OwnedImage;

/// Borrowed interleaved image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> DetectResult<Self> {
        let stride = width
            .checked_mul(channels)
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, channels, stride)
    }

    /// Creates a view with an explicit stride in elements.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> DetectResult<Self> {
        let needed = required_len(width, height, channels, stride)?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Returns the number of interleaved channels (1 or 3).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the channel values of the pixel at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = y
            .checked_mul(self.stride)?
            .checked_add(x.checked_mul(self.channels)?)?;
        self.data.get(start..start + self.channels)
    }

    /// Returns row `y` as `width * channels` interleaved values.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * self.channels)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(&self, x: usize, y: usize, width: usize, height: usize) -> DetectResult<ImageView<'a>> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }

        let out_of_bounds = DetectError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x * self.channels))
            .ok_or(DetectError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self.data.get(start..).ok_or(DetectError::BufferTooSmall {
            needed: start.saturating_add(1),
            got: self.data.len(),
        })?;

        ImageView::new(data, width, height, self.channels, self.stride)
    }

    /// Returns the pixels covered by `window`.
    pub fn crop(&self, window: &Window) -> DetectResult<ImageView<'a>> {
        let (row, col) = window.upper_left();
        self.roi(col, row, window.width(), window.height())
    }
}

fn required_len(width: usize, height: usize, channels: usize, stride: usize) -> DetectResult<usize> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidDimensions { width, height });
    }
    if channels != 1 && channels != 3 {
        return Err(DetectError::InvalidParameter {
            name: "channels",
            reason: "expected 1 or 3 interleaved channels",
        });
    }
    let row_len = width
        .checked_mul(channels)
        .ok_or(DetectError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(DetectError::InvalidStride {
            width: row_len,
            stride,
        });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(DetectError::InvalidDimensions { width, height })
}
