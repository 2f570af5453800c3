//! End-to-end behaviour of the simulation.
//!
//! # Running tests
//! ```bash
//! cargo test -p ocean-core --test properties
//! ```

use ocean_core::{
    AmbientField, KERNEL_RADIUS, MIN_VERTICES, ObstructionSource, Ocean, OceanConfig, Plane,
    Raster, StillWater,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ==================== HELPERS ====================

fn config(nx: usize, ny: usize) -> OceanConfig {
    OceanConfig {
        vertices_x: nx,
        vertices_y: ny,
        width: (nx - 1) as f32,
        length: (ny - 1) as f32,
        dt: 1.0 / 24.0,
        alpha: 0.3,
        sigma: 1.0,
        wake_exponent: 2.0,
        ..OceanConfig::default()
    }
}

fn still(nx: usize, ny: usize) -> Ocean {
    Ocean::new(config(nx, ny), Box::new(StillWater), Vec::new()).unwrap()
}

fn interior(nx: usize, ny: usize, band: usize) -> impl Iterator<Item = (usize, usize)> {
    (band..ny - band).flat_map(move |y| (band..nx - band).map(move |x| (x, y)))
}

/// Ambient elevation that changes every frame.
struct Ripple;

impl AmbientField for Ripple {
    fn fill(&mut self, frame: i64, plane: &Plane, out: &mut [f32]) {
        for y in 0..plane.dims.ny {
            for x in 0..plane.dims.nx {
                let (px, py) = plane.position(x, y);
                let phase = 0.7 * px + 0.4 * py - 0.5 * frame as f32;
                out[plane.dims.idx(x, y)] = 0.3 * phase.sin();
            }
        }
    }
}

/// A square hull gliding along x one cell every four frames, pushing water up ahead
/// of it.
struct Hull {
    x0: usize,
    y: usize,
}

impl ObstructionSource for Hull {
    fn rasterize(&mut self, frame: i64, raster: &mut Raster<'_>) {
        let x = self.x0 + frame as usize / 4;
        for dy in 0..3 {
            for dx in 0..3 {
                raster.obstruct(x + dx, self.y + dy, 1.0);
            }
            raster.inject(x + 3, self.y + dy, 0.4);
        }
    }
}

// ==================== CONSTRUCTION ====================

#[test]
fn test_valid_dimensions_allocate_full_fields() {
    for (nx, ny) in [(MIN_VERTICES, MIN_VERTICES), (13, 40), (27, 14), (64, 64)] {
        let ocean = still(nx, ny);

        assert_eq!(ocean.height().len(), nx * ny);
        assert_eq!(ocean.previous_height().len(), nx * ny);
        assert_eq!(ocean.obstruction().len(), nx * ny);
        assert_eq!(ocean.source().len(), nx * ny);
        assert_eq!(ocean.ambient().len(), nx * ny);
        assert_eq!(ocean.snapshot().heights.len(), nx * ny);
    }
}

#[test]
fn test_too_small_dimensions_fail() {
    let min = 2 * KERNEL_RADIUS + 1;
    for (nx, ny) in [(min - 1, min), (min, min - 1), (2, 2)] {
        assert!(Ocean::new(config(nx, ny), Box::new(StillWater), Vec::new()).is_err());
    }
}

// ==================== OBSTRUCTION ====================

#[test]
fn test_open_water_smooths_to_unit_obstruction() {
    let n = 21 * 21;
    let mut source = vec![0.0; n];
    source[10 * 21 + 10] = 0.5;

    let run = |ambient: f32| {
        let mut ocean = still(21, 21);
        ocean
            .replace_fields(&vec![ambient; n], &vec![1.0; n], &source)
            .unwrap();
        for o in ocean.obstruction() {
            assert!((o - 1.0).abs() < 1e-6);
        }
        for _ in 0..20 {
            ocean.advance();
            ocean
                .replace_fields(&vec![ambient; n], &vec![1.0; n], &vec![0.0; n])
                .unwrap();
        }
        ocean.height().to_vec()
    };

    // Free water ignores the ambient field entirely.
    let calm = run(0.0);
    let swell = run(0.2);
    for (a, b) in calm.iter().zip(&swell) {
        assert!((a - b).abs() < 1e-4, "{a} vs {b}");
    }
    assert!(calm.iter().any(|&h| h != 0.0));
}

#[test]
fn test_full_obstruction_tracks_ambient() {
    let mut ocean = Ocean::new(config(17, 17), Box::new(Ripple), Vec::new()).unwrap();
    let n = 17 * 17;

    // Stir the water first so height and previous height are non-trivial.
    let mut source = vec![0.0; n];
    source[8 * 17 + 8] = 1.0;
    ocean.replace_fields(&vec![0.0; n], &vec![1.0; n], &source).unwrap();
    ocean.advance();
    ocean.advance();

    ocean.update_fields();
    let ambient = ocean.ambient().to_vec();
    ocean
        .replace_fields(&ambient, &vec![0.0; n], &vec![0.0; n])
        .unwrap();
    ocean.advance();

    for (x, y) in interior(17, 17, 2) {
        let i = y * 17 + x;
        assert_eq!(ocean.height()[i], ambient[i], "cell ({x}, {y})");
    }
}

#[test]
fn test_obstruction_stays_in_unit_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut ocean = still(24, 19);
    let n = 24 * 19;
    let raw: Vec<f32> = (0..n).map(|_| if rng.gen_bool(0.3) { 0.0 } else { 1.0 }).collect();

    ocean.replace_fields(&vec![0.0; n], &raw, &vec![0.0; n]).unwrap();

    assert!(ocean.obstruction().iter().all(|&o| (0.0..=1.0).contains(&o)));
}

// ==================== STEPPING ====================

#[test]
fn test_buffer_rotation() {
    let mut ocean = Ocean::new(
        config(20, 16),
        Box::new(Ripple),
        vec![Box::new(Hull { x0: 4, y: 6 })],
    )
    .unwrap();

    for _ in 0..4 {
        ocean.update_fields();
        let before = ocean.height().to_vec();

        ocean.advance();

        assert_eq!(ocean.previous_height(), before.as_slice());
    }
}

#[test]
fn test_runs_are_deterministic() {
    let run = || {
        let mut ocean = Ocean::new(
            config(32, 28),
            Box::new(Ripple),
            vec![Box::new(Hull { x0: 8, y: 12 })],
        )
        .unwrap();
        let mut last = Vec::new();
        for _ in 0..30 {
            ocean.update_fields();
            last = ocean.advance().heights;
        }
        last
    };

    let a = run();
    let b = run();

    assert_eq!(a, b);
    assert!(a.iter().all(|h| h.is_finite()));
}

#[test]
fn test_random_field_sequences_are_deterministic() {
    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ocean = still(15, 15);
        let n = 15 * 15;
        for _ in 0..10 {
            let ambient: Vec<f32> = (0..n).map(|_| rng.gen_range(-0.5..0.5)).collect();
            let raw: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0..=1.0)).collect();
            let source: Vec<f32> = (0..n).map(|_| rng.gen_range(-0.1..0.1)).collect();
            ocean.replace_fields(&ambient, &raw, &source).unwrap();
            ocean.advance();
        }
        ocean.height().to_vec()
    };

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn test_single_source_stays_local() {
    // 13x13, dt = 1/24, alpha = 0.3, sigma = 1, wake exponent 2, one unit source at
    // the center.
    let mut ocean = still(13, 13);
    let n = 13 * 13;
    let center = 6 * 13 + 6;
    let mut source = vec![0.0; n];
    source[center] = 1.0;
    ocean.replace_fields(&vec![0.0; n], &vec![1.0; n], &source).unwrap();

    ocean.advance();

    let r = KERNEL_RADIUS as isize;
    for y in 0..13isize {
        for x in 0..13isize {
            let h = ocean.height()[(y * 13 + x) as usize];
            if (x - 6).abs() > r || (y - 6).abs() > r {
                assert_eq!(h, 0.0);
            }
        }
    }
    assert_eq!(ocean.height()[center], 1.0);
    assert_eq!(ocean.height().iter().filter(|&&h| h != 0.0).count(), 1);
}

#[test]
fn test_wave_front_spreads_one_kernel_radius_per_step() {
    let mut ocean = still(41, 41);
    let n = 41 * 41;
    let mut source = vec![0.0; n];
    source[20 * 41 + 20] = 1.0;
    ocean.replace_fields(&vec![0.0; n], &vec![1.0; n], &source).unwrap();
    ocean.advance();
    ocean.replace_fields(&vec![0.0; n], &vec![1.0; n], &vec![0.0; n]).unwrap();

    ocean.advance();

    let r = KERNEL_RADIUS as isize;
    let mut touched = 0;
    for y in 0..41isize {
        for x in 0..41isize {
            let h = ocean.height()[(y * 41 + x) as usize];
            if (x - 20).abs() > r || (y - 20).abs() > r {
                assert_eq!(h, 0.0, "cell ({x}, {y}) outside the kernel footprint");
            } else if h != 0.0 {
                touched += 1;
            }
        }
    }
    assert!(touched > 1);
}

#[test]
fn test_damped_waves_stay_bounded() {
    let mut ocean = Ocean::new(
        config(48, 48),
        Box::new(StillWater),
        vec![Box::new(Hull { x0: 6, y: 22 })],
    )
    .unwrap();

    for _ in 0..144 {
        ocean.update_fields();
        let frame = ocean.advance();
        assert!(frame.heights.iter().all(|h| h.is_finite() && h.abs() < 50.0));
    }
}
