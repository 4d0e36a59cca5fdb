//! Scale/aspect-ratio grid for the multi-scale sweep.

use crate::util::math::{linspace, round_px};
use crate::util::{DetectError, DetectResult};

/// One `(height, width)` window size sampled from the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPoint {
    /// Sampled aspect ratio (width / height).
    pub ratio: f32,
    /// Sampled scale, the unrounded window height.
    pub scale: f32,
    /// Window height in pixels, `round(scale)`.
    pub height: usize,
    /// Window width in pixels, `round(ratio * height)`.
    pub width: usize,
}

impl GridPoint {
    /// Returns the `(height, width)` size followed by its transpose.
    pub fn orientations(&self) -> [(usize, usize); 2] {
        [(self.height, self.width), (self.width, self.height)]
    }

    fn is_degenerate(&self) -> bool {
        self.height == 0 || self.width == 0
    }
}

/// Cartesian product of linearly spaced ratios and scales.
///
/// Points are ordered ratio-major: the outer loop walks the ratios, the
/// inner loop the scales. Sizes that round to zero pixels are dropped.
#[derive(Clone, Debug)]
pub struct ScaleGrid {
    points: Vec<GridPoint>,
}

impl ScaleGrid {
    /// Samples `ratios_nb` ratios in `[min_ratio, max_ratio]` and `scales_nb`
    /// scales in `[min_scale, max_scale]`.
    pub fn new(
        min_ratio: f32,
        max_ratio: f32,
        ratios_nb: usize,
        min_scale: f32,
        max_scale: f32,
        scales_nb: usize,
    ) -> DetectResult<Self> {
        check_range("ratio", min_ratio, max_ratio)?;
        check_range("scale", min_scale, max_scale)?;

        let ratios = linspace(min_ratio, max_ratio, ratios_nb);
        let scales = linspace(min_scale, max_scale, scales_nb);
        let mut points = Vec::with_capacity(ratios.len() * scales.len());
        for &ratio in &ratios {
            for &scale in &scales {
                let height = round_px(scale);
                let width = round_px(ratio * height as f32);
                let point = GridPoint {
                    ratio,
                    scale,
                    height,
                    width,
                };
                if !point.is_degenerate() {
                    points.push(point);
                }
            }
        }
        Ok(Self { points })
    }

    /// Returns the sampled grid points.
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Returns every searched `(height, width)`, each point then its transpose.
    pub fn window_sizes(&self) -> Vec<(usize, usize)> {
        self.points.iter().flat_map(GridPoint::orientations).collect()
    }

    /// Returns the number of grid points (before orientation doubling).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no grid point survived sampling.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn check_range(name: &'static str, min: f32, max: f32) -> DetectResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(DetectError::InvalidParameter {
            name,
            reason: "range bounds must be finite",
        });
    }
    if min <= 0.0 {
        return Err(DetectError::InvalidParameter {
            name,
            reason: "range bounds must be positive",
        });
    }
    if max < min {
        return Err(DetectError::InvalidParameter {
            name,
            reason: "max must not be below min",
        });
    }
    Ok(())
}
