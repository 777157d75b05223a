//! Level descriptions: the JSON file format and the loaded scene aggregate.
//!
//! A level file looks like
//!
//! ```json
//! { "width": 3, "depth": 3,
//!   "sunlight": [-1.0, 1.0, 0.0],
//!   "altitude": [0, 0, 0, 0, 1, 0, 0, 0, 0],
//!   "trees": [ { "position": [1.0, 1.0] } ],
//!   "roads": [ { "width": 0.5, "spine": [0, 0, 1, 0, 1, 1, 2, 2] } ] }
//! ```
//!
//! `altitude` is row-major (`index = z * width + x`) and `spine` interleaves the
//! `x, z` coordinates of `3N + 1` Bezier control points.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{GeometryConfig, DEFAULT_SUNLIGHT};
use crate::error::{GeometryError, GeometryResult};
use crate::height_field::HeightField;
use crate::road_spline::RoadSpline;
use crate::trees::Tree;

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub width: usize,
    pub depth: usize,
    #[serde(default = "default_sunlight")]
    pub sunlight: [f32; 3],
    pub altitude: Vec<f32>,
    #[serde(default)]
    pub trees: Vec<TreeEntry>,
    #[serde(default)]
    pub roads: Vec<RoadEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// `[x, z]`; the altitude comes from the terrain.
    pub position: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadEntry {
    pub width: f32,
    pub spine: Vec<f32>,
}

fn default_sunlight() -> [f32; 3] {
    DEFAULT_SUNLIGHT
}

// ---------------------------------------------------------------------------
// LevelError
// ---------------------------------------------------------------------------

/// Errors raised while reading a level from disk or JSON.
#[derive(Debug)]
pub enum LevelError {
    /// The level file could not be read or written.
    Io(std::io::Error),
    /// The JSON did not match the level format.
    Parse(serde_json::Error),
    /// The level data parsed but describes invalid geometry.
    Geometry(GeometryError),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "I/O error: {e}"),
            LevelError::Parse(e) => write!(f, "Level parse error: {e}"),
            LevelError::Geometry(e) => write!(f, "Level geometry error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) => Some(e),
            LevelError::Geometry(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

impl From<GeometryError> for LevelError {
    fn from(e: GeometryError) -> Self {
        LevelError::Geometry(e)
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// A loaded level: terrain, roads, trees and the sun direction.
#[derive(Resource, Debug, Clone)]
pub struct Level {
    height_field: HeightField,
    roads: Vec<RoadSpline>,
    trees: Vec<Tree>,
    sunlight: Vec3,
}

impl Level {
    pub fn new(height_field: HeightField, sunlight: Vec3) -> Self {
        Self {
            height_field,
            roads: Vec::new(),
            trees: Vec::new(),
            sunlight,
        }
    }

    /// Validate a parsed level file and build the domain types.
    pub fn from_file(file: LevelFile, config: &GeometryConfig) -> GeometryResult<Self> {
        let height_field = HeightField::new(file.width, file.depth, file.altitude)?
            .with_diagonal_rule(config.diagonal_rule);
        let mut level = Level::new(height_field, Vec3::from_array(file.sunlight));
        for tree in &file.trees {
            level.add_tree(tree.position[0], tree.position[1])?;
        }
        for road in &file.roads {
            level.roads.push(RoadSpline::from_flat(road.width, &road.spine)?);
        }
        Ok(level)
    }

    pub fn from_json(json: &str, config: &GeometryConfig) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        Ok(Self::from_file(file, config)?)
    }

    /// The file representation of this level.
    pub fn to_file(&self) -> LevelFile {
        LevelFile {
            width: self.height_field.width(),
            depth: self.height_field.depth(),
            sunlight: self.sunlight.to_array(),
            altitude: self.height_field.altitudes().to_vec(),
            trees: self
                .trees
                .iter()
                .map(|t| TreeEntry {
                    position: [t.position.x, t.position.z],
                })
                .collect(),
            roads: self
                .roads
                .iter()
                .map(|r| RoadEntry {
                    width: r.width(),
                    spine: r.control_points().iter().flat_map(|p| [p.x, p.y]).collect(),
                })
                .collect(),
        }
    }

    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    pub fn roads(&self) -> &[RoadSpline] {
        &self.roads
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Direction towards the sun. The sun is a directional light with no
    /// position.
    pub fn sunlight(&self) -> Vec3 {
        self.sunlight
    }

    pub fn set_sunlight_dir(&mut self, dx: f32, dy: f32, dz: f32) {
        self.sunlight = Vec3::new(dx, dy, dz);
    }

    /// Plant a tree at `(x, z)`; its height comes from the terrain.
    pub fn add_tree(&mut self, x: f32, z: f32) -> GeometryResult<()> {
        let tree = Tree::planted(&self.height_field, x, z)?;
        self.trees.push(tree);
        Ok(())
    }

    pub fn add_road(&mut self, width: f32, spine: Vec<Vec2>) -> GeometryResult<()> {
        self.roads.push(RoadSpline::new(width, spine)?);
        Ok(())
    }
}

/// Read and validate a level file.
pub fn load_level(path: impl AsRef<Path>, config: &GeometryConfig) -> Result<Level, LevelError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let level = Level::from_json(&json, config)?;
    info!(
        "Loaded level {}: {}x{} terrain, {} roads, {} trees",
        path.display(),
        level.height_field.width(),
        level.height_field.depth(),
        level.roads.len(),
        level.trees.len()
    );
    Ok(level)
}

/// Write a level back out in the file format.
pub fn save_level(level: &Level, path: impl AsRef<Path>) -> Result<(), LevelError> {
    let json = serde_json::to_string_pretty(&level.to_file())?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagonalRule;

    const SMALL_LEVEL: &str = r#"{
        "width": 3,
        "depth": 3,
        "sunlight": [0.0, 1.0, 1.0],
        "altitude": [0, 0, 0, 0, 1, 0, 0, 0, 0],
        "trees": [ { "position": [0.5, 0.5] } ],
        "roads": [ { "width": 0.5, "spine": [0, 0, 1, 0, 1, 1, 2, 2] } ]
    }"#;

    #[test]
    fn test_parse_small_level() {
        let level = Level::from_json(SMALL_LEVEL, &GeometryConfig::default()).unwrap();
        assert_eq!(level.height_field().width(), 3);
        assert_eq!(level.height_field().grid_altitude(1, 1).unwrap(), 1.0);
        assert_eq!(level.sunlight(), Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(level.trees().len(), 1);
        assert_eq!(level.roads().len(), 1);
        assert_eq!(level.roads()[0].segment_count(), 1);
        assert_eq!(level.roads()[0].width(), 0.5);
    }

    #[test]
    fn test_tree_altitude_from_terrain() {
        let level = Level::from_json(SMALL_LEVEL, &GeometryConfig::default()).unwrap();
        let tree = level.trees()[0];
        let expected = level.height_field().altitude(0.5, 0.5).unwrap();
        assert_eq!(tree.position.y, expected);
        assert!(tree.position.y > 0.0);
    }

    #[test]
    fn test_optional_sections_default() {
        let json = r#"{ "width": 2, "depth": 2, "altitude": [1, 1, 1, 1] }"#;
        let level = Level::from_json(json, &GeometryConfig::default()).unwrap();
        assert!(level.trees().is_empty());
        assert!(level.roads().is_empty());
        assert_eq!(level.sunlight(), Vec3::from_array(DEFAULT_SUNLIGHT));
    }

    #[test]
    fn test_config_rule_applied() {
        let config = GeometryConfig {
            diagonal_rule: DiagonalRule::Canonical,
            ..default()
        };
        let level = Level::from_json(SMALL_LEVEL, &config).unwrap();
        assert_eq!(level.height_field().diagonal_rule(), DiagonalRule::Canonical);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Level::from_json("{ \"width\": 2 ", &GeometryConfig::default()).unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)), "got: {err}");
    }

    #[test]
    fn test_bad_geometry_is_geometry_error() {
        let json = r#"{ "width": 2, "depth": 2, "altitude": [1, 1, 1],
                        "roads": [] }"#;
        let err = Level::from_json(json, &GeometryConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::Geometry(GeometryError::InvalidConfiguration(_))
        ));
        let json = r#"{ "width": 2, "depth": 2, "altitude": [1, 1, 1, 1],
                        "roads": [ { "width": 1.0, "spine": [0, 0, 1, 1, 1, 0] } ] }"#;
        let err = Level::from_json(json, &GeometryConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::Geometry(GeometryError::InvalidConfiguration(_))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_overflowing_dimensions_rejected() {
        let json = r#"{"width":8589934592,"depth":8589934592,"altitude":[]}"#;
        let err = Level::from_json(json, &GeometryConfig::default()).unwrap_err();
        assert!(
            matches!(err, LevelError::Geometry(GeometryError::InvalidConfiguration(_))),
            "got {err}"
        );
    }

    #[test]
    fn test_tree_outside_terrain_rejected() {
        let json = r#"{ "width": 2, "depth": 2, "altitude": [1, 1, 1, 1],
                        "trees": [ { "position": [5.0, 0.0] } ] }"#;
        let err = Level::from_json(json, &GeometryConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::Geometry(GeometryError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let level = Level::from_json(SMALL_LEVEL, &GeometryConfig::default()).unwrap();
        let file = level.to_file();
        let json = serde_json::to_string(&file).expect("serialize");
        let restored = Level::from_json(&json, &GeometryConfig::default()).unwrap();
        assert_eq!(restored.height_field(), level.height_field());
        assert_eq!(restored.roads(), level.roads());
        assert_eq!(restored.trees(), level.trees());
        assert_eq!(restored.sunlight(), level.sunlight());
    }

    #[test]
    fn test_add_road_and_sunlight() {
        let mut level = Level::new(HeightField::flat(4, 4, 0.0).unwrap(), Vec3::Y);
        level
            .add_road(
                1.0,
                vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(1.0, 0.0),
                    Vec2::new(2.0, 0.0),
                    Vec2::new(3.0, 0.0),
                ],
            )
            .unwrap();
        assert!(level.add_road(1.0, vec![Vec2::ZERO; 2]).is_err());
        assert_eq!(level.roads().len(), 1);
        level.set_sunlight_dir(1.0, 2.0, 3.0);
        assert_eq!(level.sunlight(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_error_display_and_source() {
        let err = LevelError::from(GeometryError::InvalidArgument("t".to_string()));
        let msg = format!("{err}");
        assert!(msg.contains("Level geometry error"), "got: {msg}");
        assert!(std::error::Error::source(&err).is_some());
        let io = LevelError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(format!("{io}").contains("missing"));
    }
}
