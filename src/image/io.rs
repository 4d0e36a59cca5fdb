//! Loading and saving through the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{DetectError, DetectResult};
use image::{ColorType, DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// Converts a decoded image, keeping grayscale inputs single-channel.
///
/// Everything that is not plain luma is flattened to 8-bit RGB; alpha is
/// dropped.
pub fn owned_from_dynamic_image(img: &DynamicImage) -> DetectResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    match img.color() {
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16 => {
            OwnedImage::new(img.to_luma8().into_raw(), width, height, 1)
        }
        _ => OwnedImage::new(img.to_rgb8().into_raw(), width, height, 3),
    }
}

/// Loads an image from disk as a 1- or 3-channel owned image.
pub fn load_image<P: AsRef<Path>>(path: P) -> DetectResult<OwnedImage> {
    let img = image::open(path).map_err(|err| DetectError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Writes an owned image to disk; the format follows the file extension.
pub fn save_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> DetectResult<()> {
    let width = img.width() as u32;
    let height = img.height() as u32;
    let data = img.data().to_vec();
    let dynamic = match img.channels() {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        _ => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
    }
    .ok_or(DetectError::BufferTooSmall {
        needed: img.width() * img.height() * img.channels(),
        got: img.data().len(),
    })?;
    dynamic.save(path).map_err(|err| DetectError::ImageIo {
        reason: err.to_string(),
    })
}
