use bevy::prelude::*;

use crate::config::SPLINE_LENGTH_STEPS;
use crate::error::{GeometryError, GeometryResult};

/// Cubic Bernstein basis at local parameter `u`.
#[inline]
pub fn bernstein(u: f32) -> [f32; 4] {
    let v = 1.0 - u;
    [v * v * v, 3.0 * v * v * u, 3.0 * v * u * u, u * u * u]
}

/// Derivative basis, applied to the control-point differences
/// `(P1 - P0), (P2 - P1), (P3 - P2)`.
#[inline]
pub fn bernstein_derivative(u: f32) -> [f32; 3] {
    let v = 1.0 - u;
    [3.0 * v * v, 6.0 * u * v, 3.0 * u * u]
}

/// A road spine: a chain of cubic Bezier segments sharing end points, plus the
/// road width. Control point `x` maps to world X and `y` to world Z.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSpline {
    width: f32,
    control_points: Vec<Vec2>,
}

impl RoadSpline {
    /// `control_points.len()` must be `3 * N + 1` with `N >= 1`.
    pub fn new(width: f32, control_points: Vec<Vec2>) -> GeometryResult<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "road width must be positive, got {width}"
            )));
        }
        let count = control_points.len();
        if count < 4 || (count - 1) % 3 != 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "road spine needs 3N+1 control points (N >= 1), got {count}"
            )));
        }
        if let Some(i) = control_points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "control point {i} is not finite"
            )));
        }
        Ok(Self {
            width,
            control_points,
        })
    }

    /// Build from interleaved `[x0, z0, x1, z1, ...]` coordinates.
    pub fn from_flat(width: f32, coords: &[f32]) -> GeometryResult<Self> {
        if coords.len() % 2 != 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "road spine has an odd number of coordinates ({})",
                coords.len()
            )));
        }
        let points = coords
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect();
        Self::new(width, points)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Number of cubic segments `N`; the parameter range is `[0, N]`.
    pub fn segment_count(&self) -> usize {
        (self.control_points.len() - 1) / 3
    }

    pub fn control_point(&self, i: usize) -> Option<Vec2> {
        self.control_points.get(i).copied()
    }

    pub fn control_points(&self) -> &[Vec2] {
        &self.control_points
    }

    /// Position on the spine. Segment `k` covers `t` in `[k, k + 1]`.
    pub fn point(&self, t: f32) -> GeometryResult<Vec2> {
        let ([p0, p1, p2, p3], u) = self.segment_at(t)?;
        let [b0, b1, b2, b3] = bernstein(u);
        Ok(p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3)
    }

    /// First derivative of the spine with respect to `t`.
    pub fn tangent(&self, t: f32) -> GeometryResult<Vec2> {
        let ([p0, p1, p2, p3], u) = self.segment_at(t)?;
        let [d0, d1, d2] = bernstein_derivative(u);
        Ok((p1 - p0) * d0 + (p2 - p1) * d1 + (p3 - p2) * d2)
    }

    /// Chord-sum arc length with `steps_per_segment` chords per segment.
    pub fn approximate_length(&self, steps_per_segment: usize) -> f32 {
        let steps = steps_per_segment.max(1);
        let mut length = 0.0_f32;
        for segment in self.control_points.windows(4).step_by(3) {
            let mut prev = segment[0];
            for i in 1..=steps {
                let [b0, b1, b2, b3] = bernstein(i as f32 / steps as f32);
                let pt = segment[0] * b0 + segment[1] * b1 + segment[2] * b2 + segment[3] * b3;
                length += (pt - prev).length();
                prev = pt;
            }
        }
        length
    }

    /// Arc length at the default resolution.
    pub fn length(&self) -> f32 {
        self.approximate_length(SPLINE_LENGTH_STEPS)
    }

    /// The four control points of the segment owning `t`, and the local
    /// parameter inside it.
    fn segment_at(&self, t: f32) -> GeometryResult<([Vec2; 4], f32)> {
        let n = self.segment_count();
        if !t.is_finite() || t < 0.0 || t > n as f32 {
            return Err(GeometryError::InvalidArgument(format!(
                "curve parameter {t} outside [0, {n}]"
            )));
        }
        let k = (t.floor() as usize).min(n - 1);
        let u = t - k as f32;
        let i = 3 * k;
        let cp = &self.control_points;
        Ok(([cp[i], cp[i + 1], cp[i + 2], cp[i + 3]], u))
    }
}
