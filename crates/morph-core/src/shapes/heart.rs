//! Taubin heart surface, solved once per mesh.
//!
//! The surface `(x² + 9/4 y² + z² - 1)³ = x² z³ + 9/80 y² z³` has no simple
//! radial form, so for every rest direction the radius is found by bisection
//! and cached by vertex index.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use glam::Vec3;

const SEARCH_MIN: f32 = 0.01;
const SEARCH_MAX: f32 = 2.5;
const ITERATIONS: u32 = 25;

/// Radius of the unit heart along `d`.
///
/// Our Y axis is the surface's asymmetric Z axis and our Z its Y axis. The
/// implicit function is negative inside and rises through the root within
/// `[0.01, 2.5]` for every unit direction, so a fixed 25-step bisection is
/// enough. Should a direction fail to bracket, the search settles on an
/// interval end.
pub fn heart_radius(d: Vec3) -> f32 {
    let a = d.x * d.x + 2.25 * d.z * d.z + d.y * d.y;
    let b = d.y * d.y * d.y * (d.x * d.x + 9.0 * d.z * d.z / 80.0);

    let mut lo = SEARCH_MIN;
    let mut hi = SEARCH_MAX;
    for _ in 0..ITERATIONS {
        let mid = (lo + hi) * 0.5;
        let r2 = mid * mid;
        let inner = r2 * a - 1.0;
        let f = inner * inner * inner - r2 * r2 * mid * b;
        if f < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) * 0.5
}

/// Per-vertex heart positions, immutable after construction.
#[derive(Clone, Debug, Default)]
pub struct HeartTable {
    scale: f32,
    points: Vec<Vec3>,
}

impl HeartTable {
    /// Solve the heart for every unit direction and store `d * r * scale`.
    pub fn build(directions: &[Vec3], scale: f32) -> Self {
        #[cfg(feature = "parallel")]
        let points = directions
            .par_iter()
            .map(|d| *d * heart_radius(*d) * scale)
            .collect();

        #[cfg(not(feature = "parallel"))]
        let points = directions
            .iter()
            .map(|d| *d * heart_radius(*d) * scale)
            .collect();

        Self { scale, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    /// Cached point for `index`, solving on the fly when the index is absent
    /// or outside the table.
    pub fn point(&self, d: Vec3, index: Option<usize>) -> Vec3 {
        index
            .and_then(|i| self.get(i))
            .unwrap_or_else(|| d * heart_radius(d) * self.scale)
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}
