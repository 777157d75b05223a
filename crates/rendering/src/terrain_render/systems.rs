use bevy::prelude::*;

use world::config::GeometryConfig;
use world::Level;

use super::mesh::TerrainMeshBuilder;

/// Marker for the terrain surface entity.
#[derive(Component)]
pub struct TerrainMesh;

pub fn spawn_terrain(
    mut commands: Commands,
    level: Res<Level>,
    config: Res<GeometryConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let builder = TerrainMeshBuilder::new(config.smooth_terrain_normals);
    let buffers = match builder.build(level.height_field()) {
        Ok(buffers) => buffers,
        Err(e) => {
            error!("Failed to build terrain mesh: {e}");
            return;
        }
    };
    info!("Spawning terrain: {} triangles", buffers.triangle_count());

    commands.spawn((
        Mesh3d(meshes.add(buffers.into_mesh())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.33, 0.52, 0.24),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::IDENTITY,
        TerrainMesh,
    ));
}
