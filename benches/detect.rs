use cupscan::{
    detect, suppress, DetectResult, ImageView, PatchNormalizer, PixelFeatures, SearchConfig,
    TargetShape, Window,
};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
            data.extend_from_slice(&[value, value / 2, 255 - value]);
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

fn bench_suppress(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 2000;
    let windows: Vec<Window> = (0..n)
        .map(|_| {
            let height = rng.random_range(60..200);
            let width = rng.random_range(30..120);
            Window::from_origin(rng.random_range(0..480), rng.random_range(0..640), height, width)
                .unwrap()
        })
        .collect();
    let scores: Vec<f32> = (0..n).map(|_| rng.random_range(0.0..1.0)).collect();

    c.bench_function("suppress_2000", |b| {
        b.iter(|| black_box(suppress(&windows, &scores, 0.5, 0.5).unwrap()));
    });
}

fn bench_detect(c: &mut Criterion) {
    let width = 320;
    let height = 240;
    let data = make_image(width, height);
    let image = ImageView::from_slice(&data, width, height, 3).unwrap();
    let normalizer = PatchNormalizer::new(TargetShape::new(32, 16).unwrap());
    let cfg = SearchConfig {
        min_scale: 60.0,
        max_scale: 160.0,
        scales_nb: 3,
        ratios_nb: 2,
        px_step: 20,
        ..SearchConfig::default()
    };

    c.bench_function("detect_320x240", |b| {
        b.iter(|| {
            black_box(detect(image, &mean_brightness, &PixelFeatures, &normalizer, &cfg).unwrap())
        });
    });

    #[cfg(feature = "rayon")]
    {
        let par_cfg = SearchConfig {
            parallel: true,
            ..cfg.clone()
        };
        c.bench_function("detect_320x240_par", |b| {
            b.iter(|| {
                black_box(
                    detect(image, &mean_brightness, &PixelFeatures, &normalizer, &par_cfg).unwrap(),
                )
            });
        });
    }
}

criterion_group!(benches, bench_suppress, bench_detect);
criterion_main!(benches);
