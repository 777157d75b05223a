//! Plain vertex/index buffers shared by the terrain and road builders.
//!
//! Builders fill a `MeshBuffers`; the scene systems turn it into a Bevy `Mesh`
//! with [`MeshBuffers::into_mesh`]. Keeping the buffers separate from `Mesh`
//! lets the geometry be inspected and tested without a render world.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use world::{GeometryError, GeometryResult};

/// Fails when `vertex_count` vertices cannot all be addressed by `u32`
/// indices.
pub fn ensure_u32_indexable(vertex_count: usize) -> GeometryResult<()> {
    if vertex_count > u32::MAX as usize + 1 {
        return Err(GeometryError::IndexOutOfRange(format!(
            "{vertex_count} vertices exceed u32 index range"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals. Empty means "flat shaded".
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, counter-clockwise seen from +Y.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn position(&self, index: u32) -> GeometryResult<Vec3> {
        self.positions
            .get(index as usize)
            .map(|p| Vec3::from_array(*p))
            .ok_or_else(|| {
                GeometryError::IndexOutOfRange(format!(
                    "vertex {index} of {}",
                    self.positions.len()
                ))
            })
    }

    /// Unnormalized geometric normal of a triangle (length = 2 * area).
    pub fn triangle_normal(&self, triangle: [u32; 3]) -> GeometryResult<Vec3> {
        let a = self.position(triangle[0])?;
        let b = self.position(triangle[1])?;
        let c = self.position(triangle[2])?;
        Ok((b - a).cross(c - a))
    }

    /// Check the buffer invariants: whole triangles, indices in range and one
    /// uv (and normal, when present) per position.
    pub fn validate(&self) -> GeometryResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if self.uvs.len() != self.positions.len() {
            return Err(GeometryError::InvalidConfiguration(format!(
                "{} uvs for {} positions",
                self.uvs.len(),
                self.positions.len()
            )));
        }
        if !self.normals.is_empty() && self.normals.len() != self.positions.len() {
            return Err(GeometryError::InvalidConfiguration(format!(
                "{} normals for {} positions",
                self.normals.len(),
                self.positions.len()
            )));
        }
        let count = self.positions.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(GeometryError::IndexOutOfRange(format!(
                "index {bad} with only {count} vertices"
            )));
        }
        Ok(())
    }

    /// Replace the normals with area-weighted averages of the face normals
    /// around each vertex.
    pub fn compute_smooth_normals(&mut self) -> GeometryResult<()> {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.triangles() {
            let n = self.triangle_normal(triangle)?;
            for i in triangle {
                accumulated[i as usize] += n;
            }
        }
        self.normals = accumulated
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
        Ok(())
    }

    /// Convert into a render-ready triangle-list mesh. Buffers without
    /// normals are un-indexed and flat shaded.
    pub fn into_mesh(self) -> Mesh {
        let flat = self.normals.is_empty();
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs)
        .with_inserted_indices(Indices::U32(self.indices));
        if flat {
            mesh.duplicate_vertices();
            mesh.compute_flat_normals();
        } else {
            mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        }
        mesh
    }
}
