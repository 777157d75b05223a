use bevy::prelude::*;

use world::config::{GeometryConfig, MIN_SPLINE_LENGTH};
use world::{GeometryError, GeometryResult, HeightField, RoadSpline};

use super::frame::{forward_direction, RoadFrame};
use crate::mesh_buffers::{ensure_u32_indexable, MeshBuffers};

/// Sweeps a road cross-section along a spline, producing a ribbon of two
/// vertices per sample.
#[derive(Debug, Clone, Copy)]
pub struct RoadMeshBuilder {
    /// Subdivisions along the whole spine; `sample_rate + 1` samples are taken.
    pub sample_rate: u32,
}

impl RoadMeshBuilder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn from_config(config: &GeometryConfig) -> Self {
        Self::new(config.road_sample_rate)
    }

    /// Number of spine samples, both ends included.
    pub fn sample_count(&self) -> usize {
        self.sample_rate as usize + 1
    }

    /// Build the road ribbon. The whole road lies in the horizontal plane at
    /// the terrain altitude under its first control point.
    ///
    /// Vertex `2s` is the left edge of sample `s` and `2s + 1` the right edge.
    pub fn build(
        &self,
        spline: &RoadSpline,
        width: f32,
        field: &HeightField,
    ) -> GeometryResult<MeshBuffers> {
        if !width.is_finite() || width <= 0.0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "road width must be positive, got {width}"
            )));
        }
        if self.sample_rate == 0 {
            return Err(GeometryError::InvalidConfiguration(
                "road sample rate must be at least 1".into(),
            ));
        }
        let length = spline.length();
        if length < MIN_SPLINE_LENGTH {
            return Err(GeometryError::InvalidConfiguration(format!(
                "road spine has no length ({length})"
            )));
        }
        ensure_u32_indexable(2 * self.sample_count())?;
        let anchor = spline.control_points()[0];
        let road_altitude = field.altitude(anchor.x, anchor.y)?;

        let rate = self.sample_rate as usize;
        let segments = spline.segment_count() as f32;
        let mut points = Vec::with_capacity(rate + 1);
        let mut tangents = Vec::with_capacity(rate + 1);
        for s in 0..=rate {
            let t = segments * s as f32 / rate as f32;
            points.push(spline.point(t)?);
            tangents.push(spline.tangent(t)?);
        }

        let half = width * 0.5;
        let mut buffers = MeshBuffers::with_capacity(2 * points.len(), 2 * rate);
        let mut previous = None;
        for (s, (&point, &tangent)) in points.iter().zip(&tangents).enumerate() {
            let chord = points[(s + 1).min(rate)] - points[s.saturating_sub(1)];
            let forward = forward_direction(tangent, chord, previous)
                .or_else(|| (points[rate] - points[0]).try_normalize())
                .unwrap_or(Vec2::X);
            previous = Some(forward);

            let frame = RoadFrame::new(Vec3::new(point.x, road_altitude, point.y), forward);
            let up = frame.up().to_array();
            for edge in [-half, half] {
                let v = frame.to_world(Vec3::new(edge, 0.0, 0.0));
                buffers.positions.push(v.to_array());
                buffers.normals.push(up);
                buffers.uvs.push([v.x, v.z]);
            }

            if s > 0 {
                let l0 = (2 * (s - 1)) as u32;
                let r0 = l0 + 1;
                let l1 = l0 + 2;
                let r1 = l0 + 3;
                buffers.indices.extend_from_slice(&[l1, r1, r0, l0, l1, r0]);
            }
        }

        debug!(
            "Road mesh: {} samples, {} triangles, length {:.2}",
            points.len(),
            buffers.triangle_count(),
            length
        );
        Ok(buffers)
    }
}

impl Default for RoadMeshBuilder {
    fn default() -> Self {
        Self::from_config(&GeometryConfig::default())
    }
}
