use bevy::prelude::*;

use world::config::GeometryConfig;
use world::Level;

use super::tessellation::RoadMeshBuilder;

/// Marker component for road ribbon entities.
#[derive(Component)]
pub struct RoadMesh {
    /// Position of the road in `Level::roads`.
    pub index: usize,
}

/// Build one mesh per road. A road that fails to build is logged and skipped.
pub fn spawn_roads(
    mut commands: Commands,
    level: Res<Level>,
    config: Res<GeometryConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if level.roads().is_empty() {
        return;
    }

    // Roads sit exactly on flat terrain; the bias keeps them in front of it.
    let asphalt = materials.add(StandardMaterial {
        base_color: Color::srgb(0.22, 0.22, 0.25),
        perceptual_roughness: 0.8,
        depth_bias: 50.0,
        ..default()
    });

    let builder = RoadMeshBuilder::from_config(&config);
    let mut spawned = 0;
    for (index, road) in level.roads().iter().enumerate() {
        let buffers = match builder.build(road, road.width(), level.height_field()) {
            Ok(buffers) => buffers,
            Err(e) => {
                error!("Skipping road {index}: {e}");
                continue;
            }
        };
        commands.spawn((
            Mesh3d(meshes.add(buffers.into_mesh())),
            MeshMaterial3d(asphalt.clone()),
            Transform::IDENTITY,
            RoadMesh { index },
        ));
        spawned += 1;
    }
    info!("Spawned {spawned} of {} roads", level.roads().len());
}
