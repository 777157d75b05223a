//! Level trees rendered as a trunk cylinder with a cone canopy, plus distance
//! culling against the walking camera.

use bevy::prelude::*;

use world::Level;

use crate::camera::WalkCamera;

// =============================================================================
// Constants
// =============================================================================

const TRUNK_RADIUS: f32 = 0.12;
const TRUNK_HEIGHT: f32 = 1.2;
const CANOPY_RADIUS: f32 = 0.7;
const CANOPY_HEIGHT: f32 = 2.0;

/// Trees further than this from the camera are hidden.
pub const TREE_LOD_DISTANCE: f32 = 120.0;

#[derive(Component)]
pub struct TreeProp;

// =============================================================================
// Pure helper functions
// =============================================================================

/// Size multiplier in `[0.85, 1.15)`, stable for a given ground position.
pub fn tree_scale(position: Vec3) -> f32 {
    let hash = (position.x * 41.0).abs() as u32 ^ (position.z * 53.0).abs() as u32;
    0.85 + (hash % 30) as f32 / 100.0
}

pub fn should_show_tree(camera: Vec3, tree: Vec3, lod_distance: f32) -> bool {
    camera.distance_squared(tree) <= lod_distance * lod_distance
}

// =============================================================================
// Systems
// =============================================================================

pub fn spawn_trees(
    mut commands: Commands,
    level: Res<Level>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if level.trees().is_empty() {
        return;
    }

    let trunk = meshes.add(Cylinder::new(TRUNK_RADIUS, TRUNK_HEIGHT));
    let canopy = meshes.add(Cone {
        radius: CANOPY_RADIUS,
        height: CANOPY_HEIGHT,
    });
    let trunk_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.28, 0.12),
        perceptual_roughness: 0.9,
        ..default()
    });
    let canopy_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.45, 0.15),
        perceptual_roughness: 0.8,
        ..default()
    });

    for tree in level.trees() {
        let scale = tree_scale(tree.position);
        // Primitive meshes are centred on their origin.
        commands
            .spawn((
                TreeProp,
                Mesh3d(trunk.clone()),
                MeshMaterial3d(trunk_mat.clone()),
                Transform::from_translation(tree.position + Vec3::Y * TRUNK_HEIGHT * 0.5 * scale)
                    .with_scale(Vec3::splat(scale)),
                Visibility::default(),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(canopy.clone()),
                    MeshMaterial3d(canopy_mat.clone()),
                    Transform::from_xyz(0.0, (TRUNK_HEIGHT + CANOPY_HEIGHT) * 0.5, 0.0),
                ));
            });
    }
    info!("Spawned {} trees", level.trees().len());
}

pub fn update_tree_lod(
    walker: Res<WalkCamera>,
    mut trees: Query<(&Transform, &mut Visibility), With<TreeProp>>,
) {
    if !walker.is_changed() {
        return;
    }
    for (transform, mut vis) in trees.iter_mut() {
        let visible = should_show_tree(walker.position, transform.translation, TREE_LOD_DISTANCE);
        let wanted = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *vis != wanted {
            *vis = wanted;
        }
    }
}
