use cupscan::window::window_positions;
use cupscan::{generate_windows, window_count, ImageView, Window};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn ceil_div(a: usize, b: usize) -> usize {
    a.div_ceil(b)
}

#[test]
fn count_matches_closed_form_and_windows_stay_inside() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..300 {
        let rows = rng.random_range(1..120);
        let cols = rng.random_range(1..120);
        let h = rng.random_range(1..=rows);
        let w = rng.random_range(1..=cols);
        let sr = rng.random_range(1..30);
        let sc = rng.random_range(1..30);

        let windows: Vec<Window> = window_positions((rows, cols), h, w, sr, sc)
            .unwrap()
            .collect();
        let expected = ceil_div(rows - h + 1, sr) * ceil_div(cols - w + 1, sc);
        assert_eq!(windows.len(), expected);
        assert_eq!(window_count((rows, cols), h, w, sr, sc), expected);
        for window in &windows {
            assert!(window.fits_within((rows, cols)));
            assert_eq!((window.height(), window.width()), (h, w));
        }
    }
}

#[test]
fn sixty_pixel_windows_on_hundred_pixel_image() {
    let windows: Vec<_> = window_positions((100, 100), 60, 60, 40, 40)
        .unwrap()
        .map(|w| (w.upper_left(), w.lower_right()))
        .collect();
    assert_eq!(
        windows,
        vec![
            ((0, 0), (60, 60)),
            ((0, 40), (60, 100)),
            ((40, 0), (100, 60)),
            ((40, 40), (100, 100)),
        ]
    );
}

#[test]
fn oversized_windows_yield_nothing() {
    assert_eq!(window_positions((50, 80), 51, 10, 5, 5).unwrap().count(), 0);
    assert_eq!(window_positions((50, 80), 10, 81, 5, 5).unwrap().count(), 0);
    assert_eq!(window_positions((50, 80), 0, 10, 5, 5).unwrap().count(), 0);
    assert_eq!(window_count((50, 80), 51, 10, 5, 5), 0);
}

#[test]
fn patches_match_window_pixels() {
    let width = 9;
    let height = 7;
    let data: Vec<u8> = (0..(width * height) as u8).collect();
    let image = ImageView::from_slice(&data, width, height, 1).unwrap();

    let sweep = generate_windows(image, 3, 4, 2, 3).unwrap();
    assert_eq!(sweep.len(), 3 * 2);
    for (patch, window) in sweep {
        let (row, col) = window.upper_left();
        assert_eq!((patch.height(), patch.width()), (3, 4));
        for y in 0..3 {
            for x in 0..4 {
                let expected = ((row + y) * width + col + x) as u8;
                assert_eq!(patch.get(x, y), Some(&[expected][..]));
            }
        }
    }
}

#[test]
fn zero_steps_are_rejected() {
    let data = [0u8; 16];
    let image = ImageView::from_slice(&data, 4, 4, 1).unwrap();
    assert!(generate_windows(image, 2, 2, 0, 1).is_err());
}
