use cupscan::{
    detect, window_count, DetectResult, Detector, ImageView, PatchNormalizer, PixelFeatures,
    SearchConfig, SuppressConfig, TargetShape, Window,
};
use std::cell::Cell;

const IMG_WIDTH: usize = 160;
const IMG_HEIGHT: usize = 120;

/// Dark image with a bright 60x30 (rows x cols) block at row 30, col 50.
fn make_scene() -> Vec<u8> {
    let mut data = vec![0u8; IMG_WIDTH * IMG_HEIGHT];
    for y in 30..90 {
        for x in 50..80 {
            data[y * IMG_WIDTH + x] = 255;
        }
    }
    data
}

fn mean_brightness(batch: &[Vec<f32>]) -> DetectResult<Vec<f32>> {
    Ok(batch
        .iter()
        .map(|features| features.iter().sum::<f32>() / features.len() as f32)
        .collect())
}

fn block_config(confidence_threshold: f32) -> SearchConfig {
    SearchConfig {
        min_ratio: 0.5,
        max_ratio: 0.5,
        ratios_nb: 1,
        min_scale: 60.0,
        max_scale: 60.0,
        scales_nb: 1,
        px_step: 10,
        confidence_threshold,
        ..SearchConfig::default()
    }
}

fn normalizer() -> PatchNormalizer {
    PatchNormalizer::new(TargetShape::new(16, 8).unwrap())
}

#[test]
fn finds_the_bright_block() {
    let data = make_scene();
    let image = ImageView::from_slice(&data, IMG_WIDTH, IMG_HEIGHT, 1).unwrap();

    let pool = detect(
        image,
        &mean_brightness,
        &PixelFeatures,
        &normalizer(),
        &block_config(0.9),
    )
    .unwrap();

    let expected = Window::new((30, 50), (90, 80)).unwrap();
    assert_eq!(pool.windows(), &[expected]);
    assert!(pool.scores()[0] > 0.99);
}

#[test]
fn suppression_keeps_the_exact_window_first() {
    let data = make_scene();
    let image = ImageView::from_slice(&data, IMG_WIDTH, IMG_HEIGHT, 1).unwrap();
    let detector =
        Detector::new(mean_brightness, PixelFeatures, normalizer()).with_config(block_config(0.5));

    let pool = detector.detect(image).unwrap();
    assert!(pool.len() > 1);
    assert!(pool.scores().iter().all(|&s| s >= 0.5));

    let kept = detector
        .detect_suppressed(image, &SuppressConfig::default())
        .unwrap();
    assert_eq!(kept.windows()[0], Window::new((30, 50), (90, 80)).unwrap());
    assert!(kept.len() < pool.len());
    for (i, a) in kept.windows().iter().enumerate() {
        for b in &kept.windows()[i + 1..] {
            assert!(a.iou(b) < 0.5);
        }
    }
}

#[test]
fn pool_covers_both_orientations_in_generation_order() {
    let data = make_scene();
    let image = ImageView::from_slice(&data, IMG_WIDTH, IMG_HEIGHT, 1).unwrap();

    let pool = detect(
        image,
        &mean_brightness,
        &PixelFeatures,
        &normalizer(),
        &block_config(0.0),
    )
    .unwrap();

    let tall = window_count((IMG_HEIGHT, IMG_WIDTH), 60, 30, 10, 10);
    let wide = window_count((IMG_HEIGHT, IMG_WIDTH), 30, 60, 10, 10);
    assert_eq!((tall, wide), (98, 110));
    assert_eq!(pool.len(), tall + wide);

    let windows = pool.windows();
    assert!(windows[..tall]
        .iter()
        .all(|w| (w.height(), w.width()) == (60, 30)));
    assert!(windows[tall..]
        .iter()
        .all(|w| (w.height(), w.width()) == (30, 60)));
    assert_eq!(windows[0].upper_left(), (0, 0));
    assert_eq!(windows[1].upper_left(), (0, 10));
}

#[test]
fn classifier_sees_one_batch_by_default() {
    let data = make_scene();
    let image = ImageView::from_slice(&data, IMG_WIDTH, IMG_HEIGHT, 1).unwrap();
    let calls = Cell::new(0usize);
    let sizes = Cell::new(Vec::new());
    let counting = |batch: &[Vec<f32>]| -> DetectResult<Vec<f32>> {
        calls.set(calls.get() + 1);
        let mut seen = sizes.take();
        seen.push(batch.len());
        sizes.set(seen);
        mean_brightness(batch)
    };

    detect(image, &counting, &PixelFeatures, &normalizer(), &block_config(0.5)).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(sizes.take(), vec![208]);

    let chunked = SearchConfig {
        batch_size: Some(50),
        ..block_config(0.5)
    };
    detect(image, &counting, &PixelFeatures, &normalizer(), &chunked).unwrap();
    assert_eq!(calls.get(), 6);
    assert_eq!(sizes.take(), vec![50, 50, 50, 50, 8]);
}

#[test]
fn image_smaller_than_every_window_is_not_an_error() {
    let data = vec![128u8; 20 * 20];
    let image = ImageView::from_slice(&data, 20, 20, 1).unwrap();
    let calls = Cell::new(0usize);
    let counting = |batch: &[Vec<f32>]| -> DetectResult<Vec<f32>> {
        calls.set(calls.get() + 1);
        mean_brightness(batch)
    };

    let pool = detect(image, &counting, &PixelFeatures, &normalizer(), &block_config(0.0)).unwrap();
    assert!(pool.is_empty());
    assert_eq!(calls.get(), 0);

    let kept = pool.suppress(0.5, 0.5).unwrap();
    assert!(kept.is_empty());
}

#[test]
fn rgb_images_are_accepted() {
    let gray = make_scene();
    let rgb: Vec<u8> = gray.iter().flat_map(|&v| [v, v, v]).collect();
    let image = ImageView::from_slice(&rgb, IMG_WIDTH, IMG_HEIGHT, 3).unwrap();

    let pool = detect(
        image,
        &mean_brightness,
        &PixelFeatures,
        &normalizer(),
        &block_config(0.9),
    )
    .unwrap();
    assert_eq!(pool.windows(), &[Window::new((30, 50), (90, 80)).unwrap()]);
}

#[test]
fn invalid_config_is_rejected() {
    let data = make_scene();
    let image = ImageView::from_slice(&data, IMG_WIDTH, IMG_HEIGHT, 1).unwrap();
    let bad = SearchConfig {
        px_step: 0,
        ..SearchConfig::default()
    };
    assert!(detect(image, &mean_brightness, &PixelFeatures, &normalizer(), &bad).is_err());
    assert!(SearchConfig::default().validate().is_ok());
}
