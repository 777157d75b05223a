mod frame;
mod systems;
mod tessellation;

pub use frame::{forward_direction, RoadFrame};
pub use systems::{spawn_roads, RoadMesh};
pub use tessellation::RoadMeshBuilder;
