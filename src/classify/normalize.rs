//! Reference patch normalizer.
//!
//! Pipeline: grayscale in `[0, 1]`, a quarter turn counter-clockwise when the
//! region is wider than tall, then an antialiased resize to the target shape.
//! Grayscale always precedes the resize.

use crate::classify::{Normalize, Patch, TargetShape};
use crate::image::ImageView;
use crate::util::{DetectError, DetectResult};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};

type GrayF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

// ITU-R BT.709 luma weights.
const LUMA_R: f32 = 0.2125;
const LUMA_G: f32 = 0.7154;
const LUMA_B: f32 = 0.0721;

/// Normalizes raw regions to fixed-shape grayscale patches.
#[derive(Clone, Copy, Debug)]
pub struct PatchNormalizer {
    target: TargetShape,
    filter: FilterType,
}

impl PatchNormalizer {
    /// Creates a normalizer producing `target`-shaped patches.
    pub fn new(target: TargetShape) -> Self {
        Self {
            target,
            filter: FilterType::Triangle,
        }
    }

    /// Overrides the resampling filter (defaults to `Triangle`).
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn target(&self) -> TargetShape {
        self.target
    }
}

impl Default for PatchNormalizer {
    fn default() -> Self {
        Self::new(TargetShape::default())
    }
}

impl Normalize for PatchNormalizer {
    fn normalize(&self, region: ImageView<'_>) -> DetectResult<Patch> {
        let mut gray = to_gray_f32(region)?;
        if gray.width() > gray.height() {
            gray = imageops::rotate270(&gray);
        }
        let resized = imageops::resize(
            &gray,
            self.target.width as u32,
            self.target.height as u32,
            self.filter,
        );
        Patch::new(resized.into_raw(), self.target.width, self.target.height)
    }
}

fn to_gray_f32(region: ImageView<'_>) -> DetectResult<GrayF32> {
    let (width, height) = (region.width(), region.height());
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = region.row(y).ok_or(DetectError::BufferTooSmall {
            needed: y * region.stride() + width * region.channels(),
            got: region.as_slice().len(),
        })?;
        match region.channels() {
            1 => data.extend(row.iter().map(|&v| f32::from(v) / 255.0)),
            _ => data.extend(row.chunks_exact(3).map(|px| {
                (LUMA_R * f32::from(px[0]) + LUMA_G * f32::from(px[1]) + LUMA_B * f32::from(px[2]))
                    / 255.0
            })),
        }
    }
    GrayF32::from_raw(width as u32, height as u32, data)
        .ok_or(DetectError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::PatchNormalizer;
    use crate::classify::{Normalize, TargetShape};
    use crate::image::ImageView;

    #[test]
    fn output_has_target_shape_and_unit_range() {
        let data: Vec<u8> = (0..40 * 30 * 3).map(|i| (i % 256) as u8).collect();
        let view = ImageView::from_slice(&data, 40, 30, 3).unwrap();
        let normalizer = PatchNormalizer::new(TargetShape::new(16, 8).unwrap());
        let patch = normalizer.normalize(view).unwrap();
        assert_eq!((patch.height(), patch.width()), (16, 8));
        assert!(patch.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn wide_regions_rotate_counter_clockwise() {
        // 1x2 region [dark, bright]; after a CCW quarter turn the bright
        // pixel is on top.
        let data = [0u8, 255];
        let view = ImageView::from_slice(&data, 2, 1, 1).unwrap();
        let normalizer = PatchNormalizer::new(TargetShape::new(2, 1).unwrap())
            .with_filter(image::imageops::FilterType::Nearest);
        let patch = normalizer.normalize(view).unwrap();
        assert_eq!(patch.get(0, 0), Some(1.0));
        assert_eq!(patch.get(0, 1), Some(0.0));
    }

    #[test]
    fn white_rgb_maps_to_one() {
        let data = [255u8; 4 * 4 * 3];
        let view = ImageView::from_slice(&data, 4, 4, 3).unwrap();
        let patch = PatchNormalizer::new(TargetShape::new(4, 4).unwrap())
            .normalize(view)
            .unwrap();
        assert!(patch.data().iter().all(|v| (v - 1.0).abs() < 1e-5));
    }
}
