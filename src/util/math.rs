//! Numeric helpers for grid construction.

/// Returns `n` evenly spaced samples over `[start, stop]`, endpoints included.
///
/// `n == 1` yields `[start]`; `n == 0` yields nothing.
pub(crate) fn linspace(start: f32, stop: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f32;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as f32
                    }
                })
                .collect()
        }
    }
}

/// Rounds a non-negative length to the nearest pixel count.
///
/// Negative and non-finite inputs map to zero.
pub(crate) fn round_px(value: f32) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round() as usize
}
