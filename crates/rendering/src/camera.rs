use bevy::prelude::*;

use world::config::{CLIMB_EASE, CLIMB_THRESHOLD, EYE_HEIGHT, TURN_SPEED, WALK_SPEED};
use world::{HeightField, Level};

/// First-person camera that walks over the terrain.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WalkCamera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Heading in radians around +Y; zero looks along -Z.
    pub yaw: f32,
}

impl WalkCamera {
    /// Stand at the start of the first road looking along it, or in the
    /// middle of the terrain when the level has no roads.
    pub fn starting_at(level: &Level) -> Self {
        let field = level.height_field();
        let (ground, yaw) = level
            .roads()
            .first()
            .and_then(|road| {
                let p = road.point(0.0).ok()?;
                let t = road.tangent(0.0).ok()?;
                let yaw = if t.length_squared() > 0.0 {
                    (-t.x).atan2(-t.y)
                } else {
                    0.0
                };
                Some((p, yaw))
            })
            .unwrap_or_else(|| {
                let centre = Vec2::new(
                    (field.width() - 1) as f32 * 0.5,
                    (field.depth() - 1) as f32 * 0.5,
                );
                (centre, 0.0)
            });
        Self {
            position: Vec3::new(ground.x, eye_altitude(field, ground.x, ground.y), ground.y),
            yaw,
        }
    }
}

/// Horizontal viewing direction for a heading.
pub fn line_of_sight(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Resting eye altitude at `(x, z)`: `EYE_HEIGHT` above the terrain, or above
/// zero when off the terrain.
pub fn eye_altitude(field: &HeightField, x: f32, z: f32) -> f32 {
    field.altitude(x, z).unwrap_or(0.0) + EYE_HEIGHT
}

/// Next eye altitude after stepping to `(x, z)` from altitude `eye_y`.
///
/// Over the terrain, large climbs close 25% of the gap per step and descents
/// snap. Off the terrain the eye sinks towards `EYE_HEIGHT` the same way:
/// large drops are eased and small ones snap.
pub fn follow_altitude(field: &HeightField, eye_y: f32, x: f32, z: f32) -> f32 {
    let target = eye_altitude(field, x, z);
    let gap = if field.contains(x, z) {
        target - eye_y
    } else {
        eye_y - target
    };
    if gap > CLIMB_THRESHOLD {
        eye_y + (target - eye_y) * CLIMB_EASE
    } else {
        target
    }
}

pub fn setup_camera(mut commands: Commands, level: Res<Level>) {
    let walker = WalkCamera::starting_at(&level);
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(walker.position)
            .looking_to(line_of_sight(walker.yaw), Vec3::Y),
    ));
    info!(
        "Camera at ({:.1}, {:.1}, {:.1})",
        walker.position.x, walker.position.y, walker.position.z
    );
    commands.insert_resource(walker);
}

/// Arrow keys (or WASD): up/down walk, left/right turn.
pub fn walk_camera(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    level: Res<Level>,
    mut walker: ResMut<WalkCamera>,
) {
    let dt = time.delta_secs();

    let mut turn = 0.0;
    if keys.pressed(KeyCode::ArrowLeft) || keys.pressed(KeyCode::KeyA) {
        turn += 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) || keys.pressed(KeyCode::KeyD) {
        turn -= 1.0;
    }
    let mut step = 0.0;
    if keys.pressed(KeyCode::ArrowUp) || keys.pressed(KeyCode::KeyW) {
        step += 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) || keys.pressed(KeyCode::KeyS) {
        step -= 1.0;
    }
    if turn == 0.0 && step == 0.0 {
        return;
    }

    walker.yaw += turn * TURN_SPEED.to_radians() * dt;
    let mut position = walker.position + line_of_sight(walker.yaw) * step * WALK_SPEED * dt;
    position.y = follow_altitude(level.height_field(), walker.position.y, position.x, position.z);
    walker.position = position;
}

/// Copy the walker state onto the camera transform.
pub fn apply_walk_camera(
    walker: Res<WalkCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if !walker.is_changed() {
        return;
    }
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = Transform::from_translation(walker.position)
        .looking_to(line_of_sight(walker.yaw), Vec3::Y);
}
