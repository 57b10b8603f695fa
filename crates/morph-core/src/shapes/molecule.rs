//! Ball-and-stick shapes built from analytic primitives seen from the origin.
//!
//! The surface along a direction is the farthest exit point of a ray cast
//! from the centre through every sphere and capped bond cylinder, so the
//! result is the union of the primitives as a star-shaped hull.

use glam::Vec3;

/// Reference radius the water layout was tuned against.
pub const REFERENCE_RADIUS: f32 = 1.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Atom {
    pub center: Vec3,
    pub radius: f32,
}

/// Cylinder between two atoms, clipped to the segment between their centres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bond {
    pub from: usize,
    pub to: usize,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoleculeLayout {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// Radius returned for rays that hit nothing.
    pub baseline: f32,
}

impl MoleculeLayout {
    /// H2O with a 104.5 degree bond angle, scaled from the reference radius
    /// to `scale`.
    pub fn water(scale: f32) -> Self {
        let k = scale / REFERENCE_RADIUS;
        let half_angle = 104.5_f32.to_radians() * 0.5;
        let bond_len = 1.3;
        let oxygen = Vec3::new(0.0, -0.25, 0.0);
        let h_offset = Vec3::new(half_angle.sin() * bond_len, half_angle.cos() * bond_len, 0.0);

        Self {
            atoms: vec![
                Atom { center: oxygen * k, radius: 0.6 * k },
                Atom { center: (oxygen + Vec3::new(-h_offset.x, h_offset.y, 0.0)) * k, radius: 0.45 * k },
                Atom { center: (oxygen + h_offset) * k, radius: 0.45 * k },
            ],
            bonds: vec![
                Bond { from: 0, to: 1, radius: 0.14 * k },
                Bond { from: 0, to: 2, radius: 0.14 * k },
            ],
            baseline: scale * 0.02,
        }
    }

    /// Distance along `dir` (unit length) to the outermost primitive exit,
    /// or `baseline` when the ray misses everything.
    pub fn cast(&self, dir: Vec3) -> f32 {
        let mut best = self.baseline;

        for atom in &self.atoms {
            if let Some(hit) = ray_sphere_exit(dir, atom.center, atom.radius) {
                best = best.max(hit);
            }
        }

        for bond in &self.bonds {
            let (Some(a), Some(b)) = (self.atoms.get(bond.from), self.atoms.get(bond.to)) else {
                continue;
            };
            if let Some(hit) = ray_segment_cylinder_exit(dir, a.center, b.center, bond.radius) {
                best = best.max(hit);
            }
        }

        best
    }

    pub fn point(&self, dir: Vec3) -> Vec3 {
        dir * self.cast(dir)
    }
}

/// Far intersection of the ray `t * dir` (t > 0) with a sphere.
///
/// With a unit `dir` the quadratic reduces to `t² - 2bt + c = 0`.
pub fn ray_sphere_exit(dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let b = dir.dot(center);
    let c = center.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc <= 0.0 {
        return None;
    }
    let hit = b + disc.sqrt();
    (hit > 0.0).then_some(hit)
}

/// Far intersection of the ray `t * dir` with the cylinder of `radius`
/// around segment `start..end`, kept only if it lands within the segment.
pub fn ray_segment_cylinder_exit(dir: Vec3, start: Vec3, end: Vec3, radius: f32) -> Option<f32> {
    let axis = end - start;
    let len = axis.length();
    if len < 1.0e-6 {
        return None;
    }
    let e = axis / len;

    // Components perpendicular to the bond axis of the ray direction and of
    // the offset from the axis origin.
    let f = dir - e * dir.dot(e);
    let g = -start + e * start.dot(e);

    let qa = f.length_squared();
    if qa <= 1.0e-4 {
        // Ray (nearly) parallel to the bond
        return None;
    }
    let qb = 2.0 * f.dot(g);
    let qc = g.length_squared() - radius * radius;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc <= 0.0 {
        return None;
    }

    let hit = (-qb + disc.sqrt()) / (2.0 * qa);
    if hit <= 0.0 {
        return None;
    }
    let along = (dir * hit - start).dot(e);
    (0.0..=len).contains(&along).then_some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_exit_through_center() {
        let hit = ray_sphere_exit(Vec3::X, Vec3::new(2.0, 0.0, 0.0), 0.5).unwrap();
        assert!((hit - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_miss_behind() {
        assert!(ray_sphere_exit(Vec3::NEG_X, Vec3::new(2.0, 0.0, 0.0), 0.5).is_none());
    }

    #[test]
    fn test_sphere_exit_from_inside() {
        let hit = ray_sphere_exit(Vec3::Y, Vec3::ZERO, 0.75).unwrap();
        assert!((hit - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_cylinder_hit_clipped_to_segment() {
        let start = Vec3::new(1.0, -1.0, 0.0);
        let end = Vec3::new(1.0, 1.0, 0.0);
        let hit = ray_segment_cylinder_exit(Vec3::X, start, end, 0.1).unwrap();
        assert!((hit - 1.1).abs() < 1e-5);

        // Same line but the segment only covers y in [0.5, 1]
        let short = ray_segment_cylinder_exit(Vec3::X, Vec3::new(1.0, 0.5, 0.0), end, 0.1);
        assert!(short.is_none());
    }

    #[test]
    fn test_cylinder_parallel_ray_ignored() {
        let hit = ray_segment_cylinder_exit(Vec3::Y, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.2);
        assert!(hit.is_none());
    }

    #[test]
    fn test_water_contains_origin() {
        // Oxygen encloses the origin, so every direction hits something
        let water = MoleculeLayout::water(REFERENCE_RADIUS);
        for i in 0..64 {
            let a = i as f32 * 0.41;
            let d = Vec3::new(a.cos() * (a * 0.3).cos(), (a * 0.3).sin(), a.sin() * (a * 0.3).cos()).normalize();
            assert!(water.cast(d) > water.baseline);
        }
    }
}
