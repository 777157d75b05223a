use bevy::prelude::*;

use crate::error::GeometryResult;
use crate::height_field::HeightField;

/// A tree standing on the terrain surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tree {
    pub position: Vec3,
}

impl Tree {
    /// Plant a tree at `(x, z)`, resting on the interpolated terrain altitude.
    pub fn planted(height_field: &HeightField, x: f32, z: f32) -> GeometryResult<Self> {
        let y = height_field.altitude(x, z)?;
        Ok(Self {
            position: Vec3::new(x, y, z),
        })
    }
}
