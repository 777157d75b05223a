//! Procedural levels for when no level file is given.
//!
//! Altitudes come from fBm OpenSimplex2 noise, trees are scattered with a
//! seeded ChaCha RNG and a single S-shaped road crosses the middle of the map.
//! The same seed always yields the same level.

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{GeometryConfig, DEFAULT_SUNLIGHT};
use crate::error::GeometryResult;
use crate::height_field::HeightField;
use crate::level::Level;
use crate::road_spline::RoadSpline;

const MAX_ALTITUDE: f32 = 6.0;
const BASE_FREQUENCY: f32 = 0.06;
const OCTAVES: i32 = 4;
const PERSISTENCE: f32 = 0.5;
const LACUNARITY: f32 = 2.0;
/// Trees per grid quad.
const TREE_DENSITY: f32 = 0.02;
const ROAD_WIDTH: f32 = 1.5;
/// Trees keep at least this far from the road centre line.
const ROAD_CLEARANCE: f32 = 2.0;

/// Row-major altitudes in `[0, MAX_ALTITUDE]`.
pub fn generate_altitudes(width: usize, depth: usize, seed: i32) -> Vec<f32> {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(BASE_FREQUENCY));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(OCTAVES));
    noise.set_fractal_gain(Some(PERSISTENCE));
    noise.set_fractal_lacunarity(Some(LACUNARITY));

    let mut altitudes = vec![0.0_f32; width * depth];
    for z in 0..depth {
        for x in 0..width {
            let raw = noise.get_noise_2d(x as f32, z as f32);
            altitudes[z * width + x] = ((raw + 1.0) * 0.5).clamp(0.0, 1.0) * MAX_ALTITUDE;
        }
    }
    altitudes
}

/// An S-curve of two segments spanning the middle 80% of the map in x.
fn s_curve_spine(width: usize, depth: usize) -> Vec<Vec2> {
    let w = (width - 1) as f32;
    let d = (depth - 1) as f32;
    [
        (0.10, 0.5),
        (0.25, 0.2),
        (0.35, 0.2),
        (0.50, 0.5),
        (0.65, 0.8),
        (0.75, 0.8),
        (0.90, 0.5),
    ]
    .iter()
    .map(|&(fx, fz)| Vec2::new(fx * w, fz * d))
    .collect()
}

/// Generate a complete level from a seed.
pub fn generate_level(
    seed: u64,
    width: usize,
    depth: usize,
    config: &GeometryConfig,
) -> GeometryResult<Level> {
    let altitudes = generate_altitudes(width, depth, seed as i32);
    let height_field =
        HeightField::new(width, depth, altitudes)?.with_diagonal_rule(config.diagonal_rule);
    let mut level = Level::new(height_field, Vec3::from_array(DEFAULT_SUNLIGHT));

    let road = RoadSpline::new(ROAD_WIDTH, s_curve_spine(width, depth))?;
    let road_points: Vec<Vec2> = (0..=config.road_sample_rate.max(1))
        .map(|i| {
            let t = road.segment_count() as f32 * i as f32 / config.road_sample_rate.max(1) as f32;
            road.point(t)
        })
        .collect::<GeometryResult<_>>()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let max_x = (width - 1) as f32;
    let max_z = (depth - 1) as f32;
    let tree_count = (max_x * max_z * TREE_DENSITY).round() as usize;
    for _ in 0..tree_count {
        let x = rng.gen_range(0.0..=max_x);
        let z = rng.gen_range(0.0..=max_z);
        let spot = Vec2::new(x, z);
        if road_points
            .iter()
            .any(|p| p.distance(spot) < ROAD_CLEARANCE)
        {
            continue;
        }
        level.add_tree(x, z)?;
    }
    level.add_road(road.width(), road.control_points().to_vec())?;

    debug!(
        "Generated {width}x{depth} level from seed {seed}: {} trees",
        level.trees().len()
    );
    Ok(level)
}
