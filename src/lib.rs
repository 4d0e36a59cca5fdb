//! cupscan is a CPU sliding-window object detector engine.
//!
//! It enumerates candidate windows over a grid of scales and aspect ratios,
//! scores them with an injected classifier and reduces overlapping hits with
//! greedy IoU-based non-maximum suppression. Window sweeps can run in
//! parallel via the `rayon` feature; `tracing` adds spans around each stage
//! and `image-io` enables loading and saving images from disk.

pub mod candidate;
pub mod classify;
pub mod image;
pub mod search;
mod trace;
pub mod util;
pub mod window;

pub use candidate::nms::suppress;
pub use candidate::{CandidatePool, ScoredWindow};
pub use classify::{
    Classifier, FeatureExtractor, Normalize, Patch, PatchNormalizer, PixelFeatures, TargetShape,
};
pub use crate::image::draw::draw_windows;
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage};
pub use search::{detect, Detector, SearchConfig, SuppressConfig};
pub use util::{DetectError, DetectResult};
pub use window::{generate_windows, iou, window_count, GridPoint, ScaleGrid, Window};
