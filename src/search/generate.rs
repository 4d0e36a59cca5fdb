//! Candidate generation across window sizes.
//!
//! Each window size is swept independently: windows are enumerated, their
//! pixels normalized and turned into features. Results are concatenated in
//! size order so that the pooled order is the same whether or not the sizes
//! are processed in parallel.

use crate::classify::{FeatureExtractor, Normalize};
use crate::trace::{trace_event, trace_span};
use crate::util::DetectResult;
use crate::window::{generate_windows, Window};
use crate::ImageView;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Pooled windows with their feature vectors, index-aligned.
#[derive(Debug, Default)]
pub(crate) struct Candidates {
    pub(crate) windows: Vec<Window>,
    pub(crate) features: Vec<Vec<f32>>,
}

impl Candidates {
    fn append(&mut self, mut other: Candidates) {
        self.windows.append(&mut other.windows);
        self.features.append(&mut other.features);
    }

    pub(crate) fn len(&self) -> usize {
        self.windows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

fn candidates_for_size<N, F>(
    image: ImageView<'_>,
    size: (usize, usize),
    px_step: usize,
    normalizer: &N,
    extractor: &F,
) -> DetectResult<Candidates>
where
    N: Normalize + ?Sized,
    F: FeatureExtractor + ?Sized,
{
    let (height, width) = size;
    let sweep = generate_windows(image, height, width, px_step, px_step)?;
    let mut out = Candidates {
        windows: Vec::with_capacity(sweep.len()),
        features: Vec::with_capacity(sweep.len()),
    };
    for (region, window) in sweep {
        let patch = normalizer.normalize(region)?;
        out.features.push(extractor.extract(&patch));
        out.windows.push(window);
    }
    Ok(out)
}

/// Sweeps every window size in order and pools the results.
pub(crate) fn generate_candidates<N, F>(
    image: ImageView<'_>,
    sizes: &[(usize, usize)],
    px_step: usize,
    normalizer: &N,
    extractor: &F,
) -> DetectResult<Candidates>
where
    N: Normalize + ?Sized,
    F: FeatureExtractor + ?Sized,
{
    let _span = trace_span!("generate_candidates", sizes = sizes.len()).entered();

    let mut pool = Candidates::default();
    for &size in sizes {
        pool.append(candidates_for_size(image, size, px_step, normalizer, extractor)?);
    }

    trace_event!("candidates_generated", count = pool.len());
    Ok(pool)
}

/// Parallel variant of [`generate_candidates`] (rayon), one task per size.
#[cfg(feature = "rayon")]
pub(crate) fn generate_candidates_par<N, F>(
    image: ImageView<'_>,
    sizes: &[(usize, usize)],
    px_step: usize,
    normalizer: &N,
    extractor: &F,
) -> DetectResult<Candidates>
where
    N: Normalize + ?Sized,
    F: FeatureExtractor + ?Sized,
{
    let _span = trace_span!("generate_candidates", sizes = sizes.len(), parallel = true).entered();

    let results: Vec<_> = sizes
        .par_iter()
        .map(|&size| candidates_for_size(image, size, px_step, normalizer, extractor))
        .collect();

    let mut pool = Candidates::default();
    for result in results {
        pool.append(result?);
    }

    trace_event!("candidates_generated", count = pool.len());
    Ok(pool)
}
