//! Scoring boundary: patch normalization, feature extraction and classifiers.
//!
//! The detector treats all three stages as injected collaborators. Closures
//! with matching signatures implement the traits, so callers can plug in a
//! trained model without wrapping it in a type.

mod normalize;
mod shape;

pub use normalize::PatchNormalizer;
pub use shape::TargetShape;

use crate::image::ImageView;
use crate::util::{DetectError, DetectResult};

/// Normalized single-channel patch with values in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl Patch {
    /// Wraps a row-major buffer of exactly `width * height` values.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> DetectResult<Self> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        let needed = width * height;
        if data.len() != needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixel values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

/// Maps a raw image region to a fixed-shape patch.
pub trait Normalize: Sync {
    fn normalize(&self, region: ImageView<'_>) -> DetectResult<Patch>;
}

impl<F> Normalize for F
where
    F: Fn(ImageView<'_>) -> DetectResult<Patch> + Sync,
{
    fn normalize(&self, region: ImageView<'_>) -> DetectResult<Patch> {
        self(region)
    }
}

/// Turns a normalized patch into a feature vector.
pub trait FeatureExtractor: Sync {
    fn extract(&self, patch: &Patch) -> Vec<f32>;
}

impl<F> FeatureExtractor for F
where
    F: Fn(&Patch) -> Vec<f32> + Sync,
{
    fn extract(&self, patch: &Patch) -> Vec<f32> {
        self(patch)
    }
}

/// Identity features: the patch pixels, row-major.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelFeatures;

impl FeatureExtractor for PixelFeatures {
    fn extract(&self, patch: &Patch) -> Vec<f32> {
        patch.data().to_vec()
    }
}

/// Batch scorer returning one positive-class probability per input.
///
/// Implementations must return probabilities in input order. The detector
/// only calls `predict_proba` with non-empty batches.
pub trait Classifier {
    fn predict_proba(&self, features: &[Vec<f32>]) -> DetectResult<Vec<f32>>;
}

impl<F> Classifier for F
where
    F: Fn(&[Vec<f32>]) -> DetectResult<Vec<f32>>,
{
    fn predict_proba(&self, features: &[Vec<f32>]) -> DetectResult<Vec<f32>> {
        self(features)
    }
}
