use bevy::prelude::*;

use world::{GeometryResult, HeightField, QuadDiagonal};

use crate::mesh_buffers::{ensure_u32_indexable, MeshBuffers};

/// Triangulates a height field into one vertex per grid point and two
/// triangles per grid quad.
#[derive(Debug, Clone, Copy)]
pub struct TerrainMeshBuilder {
    pub smooth_normals: bool,
}

impl Default for TerrainMeshBuilder {
    fn default() -> Self {
        Self {
            smooth_normals: true,
        }
    }
}

impl TerrainMeshBuilder {
    pub fn new(smooth_normals: bool) -> Self {
        Self { smooth_normals }
    }

    /// Vertices are emitted row by row (`index = z * width + x`) with texture
    /// coordinates equal to their grid `(x, z)`.
    pub fn build(&self, field: &HeightField) -> GeometryResult<MeshBuffers> {
        let w = field.width();
        let d = field.depth();
        ensure_u32_indexable(w * d)?;
        let mut buffers = MeshBuffers::with_capacity(w * d, 2 * (w - 1) * (d - 1));

        for z in 0..d {
            for x in 0..w {
                let y = field.grid_altitude(x, z)?;
                buffers.positions.push([x as f32, y, z as f32]);
                buffers.uvs.push([x as f32, z as f32]);
            }
        }

        // Each quad is addressed from its near-row corner i0 = (x, z):
        //   i3 (x, z-1) ---- i2 (x+1, z-1)
        //   i0 (x, z)   ---- i1 (x+1, z)
        for z in 1..d {
            for x in 0..w - 1 {
                let i0 = (w * z + x) as u32;
                let i1 = (w * z + x + 1) as u32;
                let i2 = (w * (z - 1) + x + 1) as u32;
                let i3 = (w * (z - 1) + x) as u32;
                match field.quad_diagonal(x, z - 1)? {
                    QuadDiagonal::Backward => {
                        buffers.indices.extend_from_slice(&[i0, i1, i2, i0, i2, i3]);
                    }
                    QuadDiagonal::Forward => {
                        buffers.indices.extend_from_slice(&[i1, i3, i0, i1, i2, i3]);
                    }
                }
            }
        }

        if self.smooth_normals {
            buffers.compute_smooth_normals()?;
        }
        debug!(
            "Terrain mesh: {} vertices, {} triangles",
            buffers.vertex_count(),
            buffers.triangle_count()
        );
        Ok(buffers)
    }
}
