use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Smallest grid extent that still holds one quad.
pub const MIN_GRID_DIMENSION: usize = 2;

/// Subdivisions across the whole road spine, independent of segment count.
pub const DEFAULT_ROAD_SAMPLE_RATE: u32 = 100;

/// Chord-sum steps per segment when measuring a spline.
pub const SPLINE_LENGTH_STEPS: usize = 64;

/// Below this chord length a road spline is treated as a single point.
pub const MIN_SPLINE_LENGTH: f32 = 1e-4;

/// Eye height of the walking camera above the terrain surface.
pub const EYE_HEIGHT: f32 = 1.8;

/// Climbs larger than this are eased instead of snapped.
pub const CLIMB_THRESHOLD: f32 = 0.5;

/// Fraction of the remaining climb covered per camera step.
pub const CLIMB_EASE: f32 = 0.25;

/// Walking speed in world units per second.
pub const WALK_SPEED: f32 = 6.0;

/// Turning speed in degrees per second.
pub const TURN_SPEED: f32 = 90.0;

/// Default sunlight direction (towards the sun) when a level omits it.
pub const DEFAULT_SUNLIGHT: [f32; 3] = [-1.0, 1.0, 0.0];

/// How each grid quad is split into two triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DiagonalRule {
    /// Split along the diagonal whose end altitudes differ the most, so ridges
    /// and valleys running across a quad stay visible.
    #[default]
    RidgePreserving,
    /// Always split along the `(x1, z0)`–`(x0, z1)` diagonal.
    Canonical,
}

/// Tuning knobs passed explicitly to the mesh builders.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Number of subdivisions along a road spine; `rate + 1` samples are taken.
    pub road_sample_rate: u32,
    /// Quad split rule shared by the terrain mesh and altitude queries.
    pub diagonal_rule: DiagonalRule,
    /// Average face normals per shared terrain vertex.
    pub smooth_terrain_normals: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            road_sample_rate: DEFAULT_ROAD_SAMPLE_RATE,
            diagonal_rule: DiagonalRule::default(),
            smooth_terrain_normals: true,
        }
    }
}
