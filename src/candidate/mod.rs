//! Scored candidates and their reduction to final detections.

pub(crate) mod nms;

use crate::util::{DetectError, DetectResult};
use crate::window::Window;

/// A window paired with the classifier's positive-class probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredWindow {
    pub window: Window,
    pub score: f32,
}

/// Parallel window/score sequences produced by one detection run.
///
/// The pool is consumed by [`CandidatePool::suppress`], which hands back a
/// new pool holding only the kept detections in selection order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidatePool {
    windows: Vec<Window>,
    scores: Vec<f32>,
}

impl CandidatePool {
    /// Builds a pool from parallel sequences of equal length.
    pub fn new(windows: Vec<Window>, scores: Vec<f32>) -> DetectResult<Self> {
        if windows.len() != scores.len() {
            return Err(DetectError::LengthMismatch {
                windows: windows.len(),
                scores: scores.len(),
            });
        }
        Ok(Self { windows, scores })
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Iterates over `(window, score)` pairs in pool order.
    pub fn iter(&self) -> impl Iterator<Item = ScoredWindow> + '_ {
        self.windows
            .iter()
            .zip(self.scores.iter())
            .map(|(&window, &score)| ScoredWindow { window, score })
    }

    /// Splits the pool back into its parallel sequences.
    pub fn into_parts(self) -> (Vec<Window>, Vec<f32>) {
        (self.windows, self.scores)
    }

    /// Greedy non-maximum suppression over the pool, see [`suppress`](crate::suppress).
    pub fn suppress(self, iou_threshold: f32, score_threshold: f32) -> DetectResult<Self> {
        let (windows, scores) =
            nms::suppress(&self.windows, &self.scores, iou_threshold, score_threshold)?;
        Ok(Self { windows, scores })
    }

    pub(crate) fn push(&mut self, window: Window, score: f32) {
        self.windows.push(window);
        self.scores.push(score);
    }
}

impl FromIterator<ScoredWindow> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = ScoredWindow>>(iter: I) -> Self {
        let mut pool = Self::default();
        for item in iter {
            pool.push(item.window, item.score);
        }
        pool
    }
}
