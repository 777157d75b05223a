use bevy::prelude::*;

use world::config::DEFAULT_SUNLIGHT;
use world::Level;

pub mod camera;
pub mod mesh_buffers;
pub mod road_render;
pub mod terrain_render;
pub mod tree_props;

pub use mesh_buffers::MeshBuffers;

/// Builds the scene for the `Level` resource and drives the walking camera.
/// Expects `Level` and `GeometryConfig` to be inserted before startup.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                camera::setup_camera,
                setup_lighting,
                terrain_render::spawn_terrain,
                road_render::spawn_roads,
                tree_props::spawn_trees,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                camera::walk_camera,
                camera::apply_walk_camera,
                tree_props::update_tree_lod,
            )
                .chain(),
        );
    }
}

/// Direction the sunlight travels: away from the sun.
pub fn sun_travel_direction(sunlight: Vec3) -> Vec3 {
    -sunlight.try_normalize().unwrap_or(Vec3::from_array(DEFAULT_SUNLIGHT).normalize())
}

fn setup_lighting(mut commands: Commands, level: Res<Level>) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::IDENTITY.looking_to(sun_travel_direction(level.sunlight()), Vec3::Y),
    ));
}
