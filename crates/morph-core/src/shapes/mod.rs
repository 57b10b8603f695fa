//! Procedural shape library.
//!
//! Every shape maps a unit rest direction (plus time, plus the vertex index
//! for the heart) to a displaced point. The set is closed, so dispatch is a
//! plain `match` on [`Shape`].
pub mod heart;
pub mod molecule;
pub mod radial;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use heart::HeartTable;
use molecule::{ray_sphere_exit, MoleculeLayout};
use radial::HelixParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Blob,
    Helix,
    CompactHelix,
    Capsule,
    Molecule,
    Heart,
    Target,
    Shield,
    Gear,
    PartnerCircles,
}

impl Shape {
    pub const ALL: [Shape; 10] = [
        Shape::Blob,
        Shape::Helix,
        Shape::CompactHelix,
        Shape::Capsule,
        Shape::Molecule,
        Shape::Heart,
        Shape::Target,
        Shape::Shield,
        Shape::Gear,
        Shape::PartnerCircles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Blob => "blob",
            Shape::Helix => "helix",
            Shape::CompactHelix => "compact_helix",
            Shape::Capsule => "capsule",
            Shape::Molecule => "molecule",
            Shape::Heart => "heart",
            Shape::Target => "target",
            Shape::Shield => "shield",
            Shape::Gear => "gear",
            Shape::PartnerCircles => "partner_circles",
        }
    }

    /// Whether the shape reads the per-vertex lookup table.
    pub fn uses_vertex_index(self) -> bool {
        matches!(self, Shape::Heart)
    }

    /// Documented `(min, max)` magnitude of the displaced point for any unit
    /// direction and any time, at global scale `s`.
    pub fn magnitude_bounds(self, s: f32) -> (f32, f32) {
        let (lo, hi) = match self {
            Shape::Blob => (0.7, 1.3),
            Shape::Helix => (0.015, 2.5),
            Shape::CompactHelix => (0.03, 1.7),
            Shape::Capsule => (0.3, 0.75),
            Shape::Molecule => (0.02, 1.2),
            Shape::Heart => (0.01, 2.5),
            Shape::Target => (0.1, 1.2),
            Shape::Shield => (0.2, 1.35),
            Shape::Gear => (0.15, 1.1),
            Shape::PartnerCircles => (0.2, 1.05),
        };
        (lo * s, hi * s)
    }
}

const PARTNER_RADIUS: f32 = 0.62;

/// Two overlapping spheres drifting apart and together along X.
pub fn partner_circles(d: Vec3, t: f32, s: f32) -> Vec3 {
    let offset = s * (0.32 + 0.06 * (t * 0.7).sin());
    let r = s * PARTNER_RADIUS;
    let hit = [Vec3::new(-offset, 0.0, 0.0), Vec3::new(offset, 0.0, 0.0)]
        .iter()
        .filter_map(|c| ray_sphere_exit(d, *c, r))
        .fold(s * 0.02, f32::max);
    d * hit
}

/// Per-instance shape data plus the dispatcher.
pub struct ShapeLibrary {
    scale: f32,
    heart: HeartTable,
    molecule: MoleculeLayout,
}

impl ShapeLibrary {
    /// Build the library for a mesh whose rest directions are `directions`.
    ///
    /// The heart table is only solved when `shapes` contains the heart.
    pub fn new(scale: f32, directions: &[Vec3], shapes: &[Shape]) -> Self {
        let heart = if shapes.contains(&Shape::Heart) {
            HeartTable::build(directions, scale)
        } else {
            HeartTable::build(&[], scale)
        };
        Self {
            scale,
            heart,
            molecule: MoleculeLayout::water(scale),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn heart(&self) -> &HeartTable {
        &self.heart
    }

    pub fn molecule(&self) -> &MoleculeLayout {
        &self.molecule
    }

    /// Displaced point of `shape` for unit direction `d` at time `t`.
    pub fn evaluate(&self, shape: Shape, d: Vec3, t: f32, vertex: Option<usize>) -> Vec3 {
        let s = self.scale;
        match shape {
            Shape::Blob => radial::blob(d, t, s),
            Shape::Helix => radial::helix(d, t, s, &HelixParams::FULL),
            Shape::CompactHelix => radial::helix(d, t, s, &HelixParams::COMPACT),
            Shape::Capsule => radial::capsule(d, t, s),
            Shape::Molecule => self.molecule.point(d),
            Shape::Heart => self.heart.point(d, vertex),
            Shape::Target => radial::target(d, t, s),
            Shape::Shield => radial::shield(d, t, s),
            Shape::Gear => radial::gear(d, t, s),
            Shape::PartnerCircles => partner_circles(d, t, s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = Shape::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Shape::ALL.len());
    }

    #[test]
    fn test_serde_names_match() {
        for shape in Shape::ALL {
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{}\"", shape.name()));
        }
    }

    #[test]
    fn test_only_heart_reads_vertex_index() {
        let indexed: Vec<_> = Shape::ALL.iter().filter(|s| s.uses_vertex_index()).collect();
        assert_eq!(indexed, [&Shape::Heart]);
    }

    #[test]
    fn test_heart_table_skipped_when_unused() {
        let dirs = [Vec3::X, Vec3::Y, Vec3::Z];
        let lib = ShapeLibrary::new(1.0, &dirs, &[Shape::Blob, Shape::Gear]);
        assert!(lib.heart().is_empty());
        // Still total: solved on demand
        let p = lib.evaluate(Shape::Heart, Vec3::X, 0.0, Some(0));
        assert!((p.length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_partner_circles_overlap_at_origin() {
        for i in 0..32 {
            let a = i as f32 * 0.2;
            let d = Vec3::new(a.cos(), a.sin(), 0.0);
            let p = partner_circles(d, i as f32, 1.0);
            assert!(p.length() >= 0.2 && p.length() <= 1.05, "{:?}", p);
        }
    }
}
