use bevy::prelude::*;

/// Local coordinate frame of a road sample.
///
/// Columns of the transform are the right axis `i`, the up axis `j`, the
/// forward axis `k` and the origin on the spine. Local `x` runs across the
/// road, so `(±width / 2, 0, 0)` maps to the two road edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadFrame {
    transform: Mat4,
}

impl RoadFrame {
    /// `forward` is the horizontal travel direction in `(x, z)`; it must be
    /// non-zero.
    pub fn new(origin: Vec3, forward: Vec2) -> Self {
        let k = Vec3::new(forward.x, 0.0, forward.y).normalize();
        let i = Vec3::new(k.z, 0.0, -k.x);
        let j = k.cross(i);
        Self {
            transform: Mat4::from_cols(
                i.extend(0.0),
                j.extend(0.0),
                k.extend(0.0),
                origin.extend(1.0),
            ),
        }
    }

    pub fn right(&self) -> Vec3 {
        self.transform.x_axis.truncate()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.y_axis.truncate()
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.z_axis.truncate()
    }

    pub fn origin(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.transform.transform_point3(local)
    }
}

/// Travel direction for a sample: the tangent when it is usable, otherwise
/// the chord between neighbouring samples, otherwise the previous direction.
pub fn forward_direction(tangent: Vec2, chord: Vec2, previous: Option<Vec2>) -> Option<Vec2> {
    tangent
        .try_normalize()
        .or_else(|| chord.try_normalize())
        .or(previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_axes_orthonormal() {
        let frame = RoadFrame::new(Vec3::new(1.0, 2.0, 3.0), Vec2::new(3.0, 4.0));
        let (i, j, k) = (frame.right(), frame.up(), frame.forward());
        for axis in [i, j, k] {
            assert!((axis.length() - 1.0).abs() < 1e-6);
        }
        assert!(i.dot(j).abs() < 1e-6);
        assert!(j.dot(k).abs() < 1e-6);
        assert!(k.dot(i).abs() < 1e-6);
        assert!((j - Vec3::Y).length() < 1e-6, "up axis {j}");
        assert_eq!(frame.origin(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_frame_along_z() {
        let frame = RoadFrame::new(Vec3::ZERO, Vec2::new(0.0, 2.0));
        assert_eq!(frame.forward(), Vec3::Z);
        assert_eq!(frame.right(), Vec3::X);
        assert_eq!(frame.to_world(Vec3::new(0.5, 0.0, 0.0)), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_to_world_offsets_from_origin() {
        let frame = RoadFrame::new(Vec3::new(10.0, 1.0, 5.0), Vec2::new(1.0, 0.0));
        // Forward +x gives right axis -z.
        let p = frame.to_world(Vec3::new(2.0, 0.0, 0.0));
        assert!((p - Vec3::new(10.0, 1.0, 3.0)).length() < 1e-6, "got {p}");
    }

    #[test]
    fn test_forward_direction_fallbacks() {
        assert_eq!(
            forward_direction(Vec2::new(0.0, 3.0), Vec2::X, None),
            Some(Vec2::Y)
        );
        assert_eq!(
            forward_direction(Vec2::ZERO, Vec2::new(2.0, 0.0), None),
            Some(Vec2::X)
        );
        assert_eq!(
            forward_direction(Vec2::ZERO, Vec2::ZERO, Some(Vec2::NEG_Y)),
            Some(Vec2::NEG_Y)
        );
        assert_eq!(forward_direction(Vec2::ZERO, Vec2::ZERO, None), None);
    }
}
