//! Error types for cupscan.

use thiserror::Error;

/// Result alias for cupscan operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Errors reported by the detection engine.
///
/// Geometry that simply does not fit an image is never an error; these
/// variants cover malformed inputs and broken collaborator contracts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectError {
    /// Image or patch dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row length.
    #[error("invalid stride {stride} for row length {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested region leaves the image.
    #[error("roi ({x}, {y}, {width}x{height}) outside image {img_width}x{img_height}")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Lower-right corner lies above or left of the upper-left corner.
    #[error("invalid window: upper-left {upper_left:?}, lower-right {lower_right:?}")]
    InvalidWindow {
        upper_left: (usize, usize),
        lower_right: (usize, usize),
    },
    /// Window and score sequences are not parallel.
    #[error("{windows} windows but {scores} scores")]
    LengthMismatch { windows: usize, scores: usize },
    /// A configuration parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// A classifier returned the wrong number of probabilities.
    #[error("classifier returned {got} scores for {expected} patches")]
    ScoreCountMismatch { expected: usize, got: usize },
    /// A target-shape record could not be parsed.
    #[error("invalid target shape: {reason}")]
    InvalidTargetShape { reason: String },
    /// Image decoding or encoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
