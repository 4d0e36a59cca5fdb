//! Fixed patch shape used by the normalizer.

use crate::util::{DetectError, DetectResult};

/// Target `(height, width)` of normalized patches.
///
/// Persisted as a one-line record `target_shape=(H, W)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetShape {
    pub height: usize,
    pub width: usize,
}

impl TargetShape {
    /// Side length of the default square shape.
    pub const DEFAULT_SCALE: usize = 128;

    const RECORD_KEY: &'static str = "target_shape=";

    pub fn new(height: usize, width: usize) -> DetectResult<Self> {
        if height == 0 || width == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        Ok(Self { height, width })
    }

    /// Derives the shape from the mean width/height ratio of positive samples.
    ///
    /// The height is [`Self::DEFAULT_SCALE`]; the width is `ratio * height`
    /// truncated and rounded down to a multiple of 8.
    pub fn from_mean_ratio(ratio: f32) -> DetectResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(DetectError::InvalidParameter {
                name: "ratio",
                reason: "must be finite and positive",
            });
        }
        let width = (ratio * Self::DEFAULT_SCALE as f32) as usize;
        Self::new(Self::DEFAULT_SCALE, width - width % 8)
    }

    /// Parses a record, falling back to the default on malformed input.
    pub fn parse_record(text: &str) -> Self {
        Self::parse_record_strict(text).unwrap_or_default()
    }

    /// Parses a record, failing on malformed input.
    pub fn parse_record_strict(text: &str) -> DetectResult<Self> {
        let line = text.lines().next().unwrap_or("").trim();
        let value = line
            .strip_prefix(Self::RECORD_KEY)
            .ok_or_else(|| invalid(format!("missing `{}` prefix", Self::RECORD_KEY)))?;
        let inner = value
            .trim()
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .ok_or_else(|| invalid(format!("expected `(H, W)`, got `{value}`")))?;

        let dims = inner
            .split(',')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| invalid(err.to_string()))?;
        match dims.as_slice() {
            &[height, width] => {
                Self::new(height, width).map_err(|_| invalid("dimensions must be positive".into()))
            }
            _ => Err(invalid(format!("expected 2 dimensions, got {}", dims.len()))),
        }
    }

    /// Formats the shape as a persistable record.
    pub fn to_record(&self) -> String {
        format!("{}({}, {})", Self::RECORD_KEY, self.height, self.width)
    }
}

impl Default for TargetShape {
    fn default() -> Self {
        Self {
            height: Self::DEFAULT_SCALE,
            width: Self::DEFAULT_SCALE,
        }
    }
}

fn invalid(reason: String) -> DetectError {
    DetectError::InvalidTargetShape { reason }
}
