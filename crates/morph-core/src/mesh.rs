//! UV-sphere mesh with fixed topology and mutable positions/normals.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::error::{MorphError, Result};
use crate::math::safe_normalize;

/// Vertex storage for one morphing instance.
///
/// Rest positions, directions and indices are fixed at construction; only
/// `positions` and `normals` change per frame.
pub struct SphereMesh {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    rest: Vec<Vec3>,
    /// Unit direction of each rest position (floored against zero length).
    directions: Vec<Vec3>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a sphere with `(width + 1) * (height + 1)` vertices, seam and
    /// pole vertices duplicated, rows running from +Y down to -Y.
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Result<Self> {
        if width_segments < 3 || height_segments < 2 {
            return Err(MorphError::MeshResolution {
                width: width_segments,
                height: height_segments,
            });
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(MorphError::invalid("radius", format!("{radius} is not a positive size")));
        }

        let row = width_segments as usize + 1;
        let count = row * (height_segments as usize + 1);
        let mut rest = Vec::with_capacity(count);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                rest.push(Vec3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                ));
            }
        }

        let mut indices = Vec::with_capacity(6 * width_segments as usize * (height_segments as usize - 1));
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = (iy * row + ix + 1) as u32;
                let b = (iy * row + ix) as u32;
                let c = ((iy + 1) * row + ix) as u32;
                let d = ((iy + 1) * row + ix + 1) as u32;
                // The pole rows collapse to a single point, so each keeps one triangle
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        let directions: Vec<Vec3> = rest.iter().map(|p| safe_normalize(*p, Vec3::Y)).collect();

        Ok(Self {
            radius,
            width_segments,
            height_segments,
            positions: rest.clone(),
            normals: directions.clone(),
            rest,
            directions,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.rest.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest
    }

    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Positions as a flat `xyzxyz...` slice for upload.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normal_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Overwrite every position with `f(vertex_index, rest_direction)`.
    #[cfg(not(feature = "parallel"))]
    pub fn displace<F>(&mut self, f: F)
    where
        F: Fn(usize, Vec3) -> Vec3 + Sync,
    {
        for (i, (p, d)) in self.positions.iter_mut().zip(&self.directions).enumerate() {
            *p = f(i, *d);
        }
    }

    #[cfg(feature = "parallel")]
    pub fn displace<F>(&mut self, f: F)
    where
        F: Fn(usize, Vec3) -> Vec3 + Sync,
    {
        use rayon::prelude::*;

        self.positions
            .par_iter_mut()
            .zip(self.directions.par_iter())
            .enumerate()
            .for_each(|(i, (p, d))| *p = f(i, *d));
    }

    /// Recompute area-weighted vertex normals from the current positions.
    ///
    /// Face normals (cross products, magnitude = twice the triangle area) are
    /// accumulated at each corner and normalised. A vertex whose accumulated
    /// normal vanishes takes its rest direction.
    pub fn recompute_normals(&mut self) {
        for n in self.normals.iter_mut() {
            *n = Vec3::ZERO;
        }

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa = self.positions[a];
            let face = (self.positions[c] - self.positions[b]).cross(pa - self.positions[b]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }

        for (n, dir) in self.normals.iter_mut().zip(&self.directions) {
            *n = safe_normalize(*n, *dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertex_and_index_counts() {
        let mesh = SphereMesh::new(1.4, 16, 8).unwrap();
        assert_eq!(mesh.vertex_count(), 17 * 9);
        assert_eq!(mesh.indices().len(), 6 * 16 * 7);
        assert_eq!(mesh.position_floats().len(), mesh.vertex_count() * 3);
    }

    #[test]
    fn test_rest_positions_on_sphere() {
        let mesh = SphereMesh::new(1.4, 12, 6).unwrap();
        for p in mesh.rest_positions() {
            assert!((p.length() - 1.4).abs() < 1e-5, "rest vertex off sphere: {:?}", p);
        }
        for d in mesh.directions() {
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_poles_are_first_and_last_rows() {
        let mesh = SphereMesh::new(1.0, 8, 4).unwrap();
        assert!((mesh.directions()[0] - Vec3::Y).length() < 1e-5);
        let last = mesh.vertex_count() - 1;
        assert!((mesh.directions()[last] - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_recomputed_normals_point_outward() {
        let mut mesh = SphereMesh::new(1.0, 24, 12).unwrap();
        mesh.recompute_normals();
        for (n, d) in mesh.normals.iter().zip(mesh.directions()) {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.dot(*d) > 0.9, "normal {:?} not outward for {:?}", n, d);
        }
    }

    #[test]
    fn test_rejects_degenerate_resolution() {
        assert!(matches!(
            SphereMesh::new(1.0, 2, 8),
            Err(MorphError::MeshResolution { width: 2, height: 8 })
        ));
        assert!(SphereMesh::new(1.0, 8, 1).is_err());
        assert!(SphereMesh::new(0.0, 8, 8).is_err());
    }

    #[test]
    fn test_collapsed_mesh_keeps_finite_normals() {
        let mut mesh = SphereMesh::new(1.0, 8, 4).unwrap();
        for p in mesh.positions.iter_mut() {
            *p = Vec3::ZERO;
        }
        mesh.recompute_normals();
        for (n, d) in mesh.normals.iter().zip(mesh.directions()) {
            assert_eq!(*n, *d);
        }
    }
}
