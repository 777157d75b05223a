mod mesh;
mod systems;
mod tests;

pub use mesh::TerrainMeshBuilder;
pub use systems::{spawn_terrain, TerrainMesh};
