//! Multi-scale sliding-window detection.
//!
//! [`detect`] builds the scale/ratio grid, sweeps every window size in both
//! orientations, normalizes and featurizes every window, scores the pooled
//! batch with the classifier and keeps windows at or above the confidence
//! threshold. Suppression is a separate step: call
//! [`CandidatePool::suppress`] with the thresholds of your choice.

mod generate;

use crate::candidate::{CandidatePool, ScoredWindow};
use crate::classify::{Classifier, FeatureExtractor, Normalize};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult};
use crate::window::ScaleGrid;
use crate::ImageView;

/// Search parameters for [`detect`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Smallest sampled aspect ratio (width / height).
    pub min_ratio: f32,
    /// Largest sampled aspect ratio.
    pub max_ratio: f32,
    /// Number of linearly spaced ratios.
    pub ratios_nb: usize,
    /// Smallest sampled window height in pixels.
    pub min_scale: f32,
    /// Largest sampled window height in pixels.
    pub max_scale: f32,
    /// Number of linearly spaced scales.
    pub scales_nb: usize,
    /// Stride in pixels, shared by both axes.
    pub px_step: usize,
    /// Windows scoring below this probability are dropped.
    pub confidence_threshold: f32,
    /// Sweep window sizes in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Maximum windows per classifier call; `None` scores the pool at once.
    pub batch_size: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_ratio: 0.5,
            max_ratio: 1.0,
            ratios_nb: 3,
            min_scale: 60.0,
            max_scale: 180.0,
            scales_nb: 7,
            px_step: 20,
            confidence_threshold: 0.5,
            parallel: false,
            batch_size: None,
        }
    }
}

impl SearchConfig {
    /// Checks parameter ranges.
    pub fn validate(&self) -> DetectResult<()> {
        self.grid().map(|_| ())
    }

    /// Builds the scale/ratio grid after validating the remaining parameters.
    pub fn grid(&self) -> DetectResult<ScaleGrid> {
        if self.px_step == 0 {
            return Err(DetectError::InvalidParameter {
                name: "px_step",
                reason: "must be > 0",
            });
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DetectError::InvalidParameter {
                name: "confidence_threshold",
                reason: "must lie in [0, 1]",
            });
        }
        if self.batch_size == Some(0) {
            return Err(DetectError::InvalidParameter {
                name: "batch_size",
                reason: "must be > 0 when set",
            });
        }
        ScaleGrid::new(
            self.min_ratio,
            self.max_ratio,
            self.ratios_nb,
            self.min_scale,
            self.max_scale,
            self.scales_nb,
        )
    }
}

/// Runs the multi-scale sweep and returns every window passing the
/// confidence threshold, in generation order.
///
/// An image too small for every window size yields an empty pool.
pub fn detect<C, F, N>(
    image: ImageView<'_>,
    classifier: &C,
    extractor: &F,
    normalizer: &N,
    cfg: &SearchConfig,
) -> DetectResult<CandidatePool>
where
    C: Classifier + ?Sized,
    F: FeatureExtractor + ?Sized,
    N: Normalize + ?Sized,
{
    let grid = cfg.grid()?;
    let sizes = grid.window_sizes();

    let _span = trace_span!(
        "detect",
        width = image.width(),
        height = image.height(),
        grid_points = grid.len()
    )
    .entered();

    let candidates = sweep(image, &sizes, cfg, normalizer, extractor)?;
    if candidates.is_empty() {
        return Ok(CandidatePool::default());
    }

    let scores = score_batch(classifier, &candidates.features, cfg.batch_size)?;
    let pool: CandidatePool = candidates
        .windows
        .into_iter()
        .zip(scores)
        .filter(|&(_, score)| score >= cfg.confidence_threshold)
        .map(|(window, score)| ScoredWindow { window, score })
        .collect();

    trace_event!("confident_candidates", count = pool.len());
    Ok(pool)
}

fn sweep<F, N>(
    image: ImageView<'_>,
    sizes: &[(usize, usize)],
    cfg: &SearchConfig,
    normalizer: &N,
    extractor: &F,
) -> DetectResult<generate::Candidates>
where
    F: FeatureExtractor + ?Sized,
    N: Normalize + ?Sized,
{
    #[cfg(feature = "rayon")]
    if cfg.parallel {
        return generate::generate_candidates_par(image, sizes, cfg.px_step, normalizer, extractor);
    }
    generate::generate_candidates(image, sizes, cfg.px_step, normalizer, extractor)
}

/// Scores features in order, in one call or in chunks of `batch_size`.
fn score_batch<C>(
    classifier: &C,
    features: &[Vec<f32>],
    batch_size: Option<usize>,
) -> DetectResult<Vec<f32>>
where
    C: Classifier + ?Sized,
{
    let _span = trace_span!("score_batch", count = features.len()).entered();

    let chunk = batch_size.unwrap_or(features.len()).max(1);
    let mut scores = Vec::with_capacity(features.len());
    for batch in features.chunks(chunk) {
        let probs = classifier.predict_proba(batch)?;
        if probs.len() != batch.len() {
            return Err(DetectError::ScoreCountMismatch {
                expected: batch.len(),
                got: probs.len(),
            });
        }
        scores.extend(probs);
    }
    Ok(scores)
}

/// Detector bundling the scoring collaborators with a search configuration.
pub struct Detector<C, F, N> {
    classifier: C,
    extractor: F,
    normalizer: N,
    cfg: SearchConfig,
}

impl<C, F, N> Detector<C, F, N>
where
    C: Classifier,
    F: FeatureExtractor,
    N: Normalize,
{
    /// Creates a detector with the default search configuration.
    pub fn new(classifier: C, extractor: F, normalizer: N) -> Self {
        Self {
            classifier,
            extractor,
            normalizer,
            cfg: SearchConfig::default(),
        }
    }

    /// Replaces the search configuration.
    pub fn with_config(mut self, cfg: SearchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Returns the confident candidate pool for `image`, see [`detect`].
    pub fn detect(&self, image: ImageView<'_>) -> DetectResult<CandidatePool> {
        detect(
            image,
            &self.classifier,
            &self.extractor,
            &self.normalizer,
            &self.cfg,
        )
    }

    /// Detects and then suppresses overlapping windows.
    pub fn detect_suppressed(
        &self,
        image: ImageView<'_>,
        suppress: &SuppressConfig,
    ) -> DetectResult<CandidatePool> {
        self.detect(image)?
            .suppress(suppress.iou_threshold, suppress.score_threshold)
    }
}

/// Thresholds for the suppression step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuppressConfig {
    /// Windows overlapping a kept window at or above this IoU are discarded.
    pub iou_threshold: f32,
    /// Windows scoring below this value never enter suppression.
    pub score_threshold: f32,
}

impl Default for SuppressConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.5,
            score_threshold: 0.5,
        }
    }
}
