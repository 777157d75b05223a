//! Tests for terrain triangulation.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use world::config::DiagonalRule;
    use world::HeightField;

    use crate::terrain_render::TerrainMeshBuilder;

    fn bumpy_field(width: usize, depth: usize) -> HeightField {
        let mut altitudes = Vec::with_capacity(width * depth);
        for z in 0..depth {
            for x in 0..width {
                altitudes.push(((x * 7 + z * 3) % 5) as f32 * 0.5);
            }
        }
        HeightField::new(width, depth, altitudes).unwrap()
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        let field = bumpy_field(4, 3);
        let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 2 * 3 * 2);
        assert_eq!(mesh.uvs.len(), 12);
        assert_eq!(mesh.normals.len(), 12);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_vertices_are_row_major_grid_points() {
        let field = bumpy_field(5, 4);
        let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
        for z in 0..4 {
            for x in 0..5 {
                let i = z * 5 + x;
                let h = field.grid_altitude(x, z).unwrap();
                assert_eq!(mesh.positions[i], [x as f32, h, z as f32]);
                assert_eq!(mesh.uvs[i], [x as f32, z as f32]);
            }
        }
    }

    #[test]
    fn test_ridge_picks_steeper_diagonal() {
        // i0 = (0,1) -> 0, i1 = (1,1) -> 0, i2 = (1,0) -> 5, i3 = (0,0) -> 1
        let field = HeightField::new(2, 2, vec![1.0, 5.0, 0.0, 0.0]).unwrap();
        let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
        assert_eq!(mesh.indices, vec![2, 3, 1, 2, 1, 0]);
    }

    #[test]
    fn test_ridge_picks_other_diagonal() {
        // |i0 - i2| = 0, |i1 - i3| = 3
        let field = HeightField::new(2, 2, vec![0.0, 0.0, 0.0, 3.0]).unwrap();
        let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
        assert_eq!(mesh.indices, vec![3, 0, 2, 3, 1, 0]);
    }

    #[test]
    fn test_canonical_rule_ignores_ridges() {
        let field = HeightField::new(2, 2, vec![0.0, 0.0, 0.0, 3.0])
            .unwrap()
            .with_diagonal_rule(DiagonalRule::Canonical);
        let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
        assert_eq!(mesh.indices, vec![2, 3, 1, 2, 1, 0]);
    }

    #[test]
    fn test_all_triangles_face_up() {
        for rule in [DiagonalRule::RidgePreserving, DiagonalRule::Canonical] {
            let field = bumpy_field(6, 5).with_diagonal_rule(rule);
            let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
            for tri in mesh.triangles() {
                let n = mesh.triangle_normal(tri).unwrap();
                assert!(n.y > 0.0, "{rule:?}: triangle {tri:?} has normal {n}");
            }
        }
    }

    #[test]
    fn test_triangles_agree_with_altitude_queries() {
        for rule in [DiagonalRule::RidgePreserving, DiagonalRule::Canonical] {
            let field = bumpy_field(6, 5).with_diagonal_rule(rule);
            let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
            for tri in mesh.triangles() {
                let centroid = tri
                    .iter()
                    .map(|&i| mesh.position(i).unwrap())
                    .sum::<Vec3>()
                    / 3.0;
                let h = field.altitude(centroid.x, centroid.z).unwrap();
                assert!(
                    (h - centroid.y).abs() < 1e-4,
                    "{rule:?}: triangle {tri:?} centroid {centroid} but altitude {h}"
                );
            }
        }
    }

    #[test]
    fn test_flat_field_normals_point_up() {
        let field = HeightField::flat(4, 4, 2.0).unwrap();
        let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
        for n in &mesh.normals {
            assert!((Vec3::from_array(*n) - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_flat_shading_leaves_normals_empty() {
        let field = bumpy_field(3, 3);
        let mesh = TerrainMeshBuilder::new(false).build(&field).unwrap();
        assert!(mesh.normals.is_empty());
        mesh.validate().unwrap();
    }

    #[test]
    fn test_slope_normal_leans_downhill() {
        // Altitude rises with x, so normals tilt towards -x.
        let field = HeightField::new(3, 2, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]).unwrap();
        let mesh = TerrainMeshBuilder::default().build(&field).unwrap();
        for n in &mesh.normals {
            let n = Vec3::from_array(*n);
            assert!(n.x < 0.0 && n.y > 0.0, "normal {n}");
            assert!(n.z.abs() < 1e-5);
        }
    }
}
