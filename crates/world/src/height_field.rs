//! Terrain altitude grid with piecewise-linear interpolation.
//!
//! Altitudes are sampled on integer `(x, z)` grid points. Every grid quad is
//! split into two triangles and a query at a real-valued point interpolates
//! linearly inside the triangle that contains it, which makes the continuous
//! surface identical to the one the terrain mesh renders.
//!
//! ```text
//!   p1 (x0,z0) ---- p0 (x1,z0)
//!      |          / |
//!      |  Backward  |
//!      |      /     |
//!   p2 (x0,z1) ---- p3 (x1,z1)
//! ```

use bevy::prelude::*;

use crate::config::{DiagonalRule, MIN_GRID_DIMENSION};
use crate::error::{GeometryError, GeometryResult};

/// The diagonal a grid quad is split along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadDiagonal {
    /// Joins `(x1, z0)` and `(x0, z1)`.
    Backward,
    /// Joins `(x0, z0)` and `(x1, z1)`.
    Forward,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    depth: usize,
    altitudes: Vec<f32>,
    diagonal_rule: DiagonalRule,
}

impl HeightField {
    /// Build a height field from row-major altitudes (`index = z * width + x`).
    pub fn new(width: usize, depth: usize, altitudes: Vec<f32>) -> GeometryResult<Self> {
        if width < MIN_GRID_DIMENSION || depth < MIN_GRID_DIMENSION {
            return Err(GeometryError::InvalidConfiguration(format!(
                "height field must be at least {MIN_GRID_DIMENSION}x{MIN_GRID_DIMENSION}, got {width}x{depth}"
            )));
        }
        let count = sample_count(width, depth)?;
        if altitudes.len() != count {
            return Err(GeometryError::InvalidConfiguration(format!(
                "{width}x{depth} height field needs {count} altitudes, got {}",
                altitudes.len()
            )));
        }
        if let Some(i) = altitudes.iter().position(|h| !h.is_finite()) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "altitude at ({}, {}) is not finite",
                i % width,
                i / width
            )));
        }
        Ok(Self {
            width,
            depth,
            altitudes,
            diagonal_rule: DiagonalRule::default(),
        })
    }

    /// A field where every grid point sits at `altitude`.
    pub fn flat(width: usize, depth: usize, altitude: f32) -> GeometryResult<Self> {
        Self::new(width, depth, vec![altitude; sample_count(width, depth)?])
    }

    /// Build from `columns[x][z]`, the `[width][depth]` layout level data uses.
    pub fn from_columns(columns: Vec<Vec<f32>>) -> GeometryResult<Self> {
        let width = columns.len();
        let depth = columns.first().map_or(0, Vec::len);
        if let Some(x) = columns.iter().position(|c| c.len() != depth) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "column {x} has {} altitudes, expected {depth}",
                columns[x].len()
            )));
        }
        let mut altitudes = vec![0.0; width * depth];
        for (x, column) in columns.iter().enumerate() {
            for (z, &h) in column.iter().enumerate() {
                altitudes[z * width + x] = h;
            }
        }
        Self::new(width, depth, altitudes)
    }

    pub fn with_diagonal_rule(mut self, rule: DiagonalRule) -> Self {
        self.diagonal_rule = rule;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn diagonal_rule(&self) -> DiagonalRule {
        self.diagonal_rule
    }

    /// Row-major altitude samples.
    pub fn altitudes(&self) -> &[f32] {
        &self.altitudes
    }

    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        z * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, z: usize) -> bool {
        x < self.width && z < self.depth
    }

    /// Whether a real-valued point lies on the surface (edges included).
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= 0.0 && z >= 0.0 && x <= (self.width - 1) as f32 && z <= (self.depth - 1) as f32
    }

    pub fn grid_altitude(&self, x: usize, z: usize) -> GeometryResult<f32> {
        if !self.in_bounds(x, z) {
            return Err(self.out_of_range(x, z));
        }
        Ok(self.at(x, z))
    }

    /// Overwrite one grid sample. Only meant for construction and loading.
    pub fn set_grid_altitude(&mut self, x: usize, z: usize, altitude: f32) -> GeometryResult<()> {
        if !self.in_bounds(x, z) {
            return Err(self.out_of_range(x, z));
        }
        if !altitude.is_finite() {
            return Err(GeometryError::InvalidArgument(format!(
                "altitude {altitude} at ({x}, {z})"
            )));
        }
        let idx = self.index(x, z);
        self.altitudes[idx] = altitude;
        Ok(())
    }

    /// Lowest and highest grid altitude.
    pub fn altitude_range(&self) -> (f32, f32) {
        self.altitudes
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }

    /// Which diagonal splits the quad whose low corner is `(x0, z0)`.
    ///
    /// The terrain mesh builder and [`HeightField::altitude`] both ask this,
    /// so rendered triangles and altitude queries always agree.
    pub fn quad_diagonal(&self, x0: usize, z0: usize) -> GeometryResult<QuadDiagonal> {
        if x0 + 1 >= self.width || z0 + 1 >= self.depth {
            return Err(GeometryError::IndexOutOfRange(format!(
                "quad ({x0}, {z0}) in {}x{} height field",
                self.width, self.depth
            )));
        }
        Ok(self.diagonal_of(x0, z0))
    }

    /// Interpolated altitude at an arbitrary point of the surface.
    pub fn altitude(&self, x: f32, z: f32) -> GeometryResult<f32> {
        if x.is_nan() || z.is_nan() {
            return Err(GeometryError::InvalidArgument(format!(
                "altitude query at ({x}, {z})"
            )));
        }
        if !self.contains(x, z) {
            return Err(GeometryError::IndexOutOfRange(format!(
                "altitude query ({x}, {z}) outside {}x{} height field",
                self.width, self.depth
            )));
        }

        let x0 = x.floor() as usize;
        let z0 = z.floor() as usize;
        if x == x0 as f32 && z == z0 as f32 {
            return Ok(self.at(x0, z0));
        }
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);

        // On the far outer edges the quad collapses to a single grid edge.
        if x1 == x0 {
            return Ok(lerp(self.at(x0, z0), self.at(x0, z1), z - z0 as f32));
        }
        if z1 == z0 {
            return Ok(lerp(self.at(x0, z0), self.at(x1, z0), x - x0 as f32));
        }

        let p0 = self.corner(x1, z0);
        let p1 = self.corner(x0, z0);
        let p2 = self.corner(x0, z1);
        let p3 = self.corner(x1, z1);

        let altitude = match self.diagonal_of(x0, z0) {
            QuadDiagonal::Backward => {
                // Zero on the p0-p2 line, negative on p1's side.
                let f = 2.0 * (x - p0.x) + 2.0 * (z - p0.z);
                if f < 0.0 {
                    lerp_triangle(x, z, p2, p1, p0)
                } else if f > 0.0 {
                    lerp_triangle(x, z, p0, p3, p2)
                } else {
                    lerp_along_z(z, p0, p2)
                }
            }
            QuadDiagonal::Forward => {
                // Zero on the p1-p3 line, positive on p0's side.
                let f = (x - p1.x) - (z - p1.z);
                if f > 0.0 {
                    lerp_triangle(x, z, p3, p0, p1)
                } else if f < 0.0 {
                    lerp_triangle(x, z, p1, p2, p3)
                } else {
                    lerp_along_z(z, p1, p3)
                }
            }
        };
        Ok(altitude)
    }

    #[inline]
    fn at(&self, x: usize, z: usize) -> f32 {
        self.altitudes[self.index(x, z)]
    }

    #[inline]
    fn corner(&self, x: usize, z: usize) -> Vec3 {
        Vec3::new(x as f32, self.at(x, z), z as f32)
    }

    fn diagonal_of(&self, x0: usize, z0: usize) -> QuadDiagonal {
        match self.diagonal_rule {
            DiagonalRule::Canonical => QuadDiagonal::Backward,
            DiagonalRule::RidgePreserving => {
                let backward = (self.at(x0, z0 + 1) - self.at(x0 + 1, z0)).abs();
                let forward = (self.at(x0 + 1, z0 + 1) - self.at(x0, z0)).abs();
                if backward > forward {
                    QuadDiagonal::Backward
                } else {
                    QuadDiagonal::Forward
                }
            }
        }
    }

    fn out_of_range(&self, x: usize, z: usize) -> GeometryError {
        GeometryError::IndexOutOfRange(format!(
            "grid ({x}, {z}) in {}x{} height field",
            self.width, self.depth
        ))
    }
}

/// Number of grid points in a `width x depth` field.
fn sample_count(width: usize, depth: usize) -> GeometryResult<usize> {
    width.checked_mul(depth).ok_or_else(|| {
        GeometryError::InvalidConfiguration(format!(
            "{width}x{depth} height field has too many grid points"
        ))
    })
}

/// Linear interpolation that returns `a` at `t == 0` and `b` at `t == 1`
/// bit-for-bit.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t == 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

/// Altitude on the segment `a`-`b` at depth `z`. Points are `(x, altitude, z)`.
fn lerp_along_z(z: f32, a: Vec3, b: Vec3) -> f32 {
    lerp(a.y, b.y, (z - a.z) / (b.z - a.z))
}

/// Two nested lerps inside a triangle whose `left` and `right` corners share a
/// row and whose `apex` lies on the other row: first down both apex edges to
/// the query's `z`, then across in `x`.
fn lerp_triangle(x: f32, z: f32, apex: Vec3, left: Vec3, right: Vec3) -> f32 {
    let s = (z - apex.z) / (left.z - apex.z);
    let (lx, ly) = (lerp(apex.x, left.x, s), lerp(apex.y, left.y, s));
    let (rx, ry) = (lerp(apex.x, right.x, s), lerp(apex.y, right.y, s));
    if rx == lx {
        return ly;
    }
    lerp(ly, ry, (x - lx) / (rx - lx))
}
