//! Rectangle outlines for visualizing detections.

use crate::image::{ImageView, OwnedImage};
use crate::util::DetectResult;
use crate::window::Window;

/// Draws window outlines on a copy of `image`.
///
/// `color` is given as RGB; grayscale images receive its luma. Outlines grow
/// inward by `thickness` pixels and are clipped to the image bounds.
pub fn draw_windows(
    image: ImageView<'_>,
    windows: &[Window],
    color: [u8; 3],
    thickness: usize,
) -> DetectResult<OwnedImage> {
    let mut out = OwnedImage::from_view(image)?;
    for window in windows {
        outline(&mut out, window, color, thickness.max(1));
    }
    Ok(out)
}

fn outline(img: &mut OwnedImage, window: &Window, color: [u8; 3], thickness: usize) {
    let (top, left) = window.upper_left();
    let (bottom, right) = window.lower_right();
    let bottom = bottom.min(img.height());
    let right = right.min(img.width());
    if top >= bottom || left >= right {
        return;
    }

    for t in 0..thickness {
        let (r0, r1) = (top + t, bottom.saturating_sub(t + 1));
        let (c0, c1) = (left + t, right.saturating_sub(t + 1));
        if r0 > r1 || c0 > c1 {
            break;
        }
        for col in c0..=c1 {
            put(img, r0, col, color);
            put(img, r1, col, color);
        }
        for row in r0..=r1 {
            put(img, row, c0, color);
            put(img, row, c1, color);
        }
    }
}

fn put(img: &mut OwnedImage, row: usize, col: usize, color: [u8; 3]) {
    let channels = img.channels();
    let idx = (row * img.width() + col) * channels;
    let data = img.data_mut();
    if channels == 1 {
        let luma = 0.2125 * f32::from(color[0])
            + 0.7154 * f32::from(color[1])
            + 0.0721 * f32::from(color[2]);
        data[idx] = luma.round().clamp(0.0, 255.0) as u8;
    } else {
        data[idx..idx + 3].copy_from_slice(&color);
    }
}
