//! Greedy IoU-based non-maximum suppression.

use crate::candidate::ScoredWindow;
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult};
use crate::window::{iou, Window};
use std::cmp::Ordering;

fn score_cmp_desc(a: &ScoredWindow, b: &ScoredWindow) -> Ordering {
    b.score.total_cmp(&a.score)
}

fn check_threshold(name: &'static str, value: f32) -> DetectResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DetectError::InvalidParameter {
            name,
            reason: "must lie in [0, 1]",
        });
    }
    Ok(())
}

/// Reduces scored windows to a non-redundant set of detections.
///
/// Windows scoring below `score_threshold` are dropped first. The rest are
/// visited by descending score; each visited window is kept and every
/// remaining window overlapping it with IoU `>= iou_threshold` is discarded.
/// Equal scores keep their input order. The output is in selection order and
/// kept windows are pairwise below `iou_threshold`.
///
/// Runs in O(n^2) over the windows that pass the score filter.
pub fn suppress(
    windows: &[Window],
    scores: &[f32],
    iou_threshold: f32,
    score_threshold: f32,
) -> DetectResult<(Vec<Window>, Vec<f32>)> {
    if windows.len() != scores.len() {
        return Err(DetectError::LengthMismatch {
            windows: windows.len(),
            scores: scores.len(),
        });
    }
    check_threshold("iou_threshold", iou_threshold)?;
    check_threshold("score_threshold", score_threshold)?;

    let _span = trace_span!("suppress", candidates = windows.len()).entered();

    let mut remaining: Vec<ScoredWindow> = windows
        .iter()
        .zip(scores.iter())
        .filter(|(_, &score)| score >= score_threshold)
        .map(|(&window, &score)| ScoredWindow { window, score })
        .collect();
    // Stable sort, then reverse so that popping yields the best score and,
    // among equal scores, the earliest generated window.
    remaining.sort_by(score_cmp_desc);
    remaining.reverse();

    let mut kept_windows = Vec::new();
    let mut kept_scores = Vec::new();
    while let Some(best) = remaining.pop() {
        remaining.retain(|other| iou(&best.window, &other.window) < iou_threshold);
        kept_windows.push(best.window);
        kept_scores.push(best.score);
    }

    trace_event!("suppressed", kept = kept_windows.len());
    Ok((kept_windows, kept_scores))
}
