pub mod config;
pub mod error;
pub mod height_field;
pub mod level;
pub mod road_spline;
pub mod terrain_generation;
pub mod trees;

pub use error::{GeometryError, GeometryResult};
pub use height_field::{HeightField, QuadDiagonal};
pub use level::{load_level, save_level, Level, LevelError};
pub use road_spline::RoadSpline;
