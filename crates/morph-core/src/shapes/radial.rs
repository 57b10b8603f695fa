//! Closed-form radial shapes.
//!
//! Each function takes a unit direction, the elapsed time and the global
//! scale `s`, and returns the displaced point. All of them are total and
//! bounded for unit input; the documented ranges live on
//! [`Shape::magnitude_bounds`](super::Shape::magnitude_bounds).

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::math::{angular_distance, gaussian, smoothstep};

// ---------- Liquid blob ----------

/// Relative radius offset of the blob, bounded to `[-0.3, 0.3]`.
pub fn blob_offset(d: Vec3, t: f32) -> f32 {
    (d.x * 1.8 + t * 0.3).sin() * 0.12
        + (d.y * 2.0 + t * 0.25 + (d.z * 1.5).cos()).sin() * 0.10
        + (d.z * 1.6 + t * 0.28 + (d.x * 1.3).sin()).sin() * 0.08
}

/// Smooth organic wobble around the base sphere.
pub fn blob(d: Vec3, t: f32, s: f32) -> Vec3 {
    d * s * (1.0 + blob_offset(d, t))
}

// ---------- Double helix ----------

/// Tuning for the two helix variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelixParams {
    /// Vertical extent per unit of direction `y`, in units of `s`.
    pub height: f32,
    /// Turns of the spiral tracks per unit of direction `y`.
    pub twist: f32,
    /// Angular speed of the spiral in rad/s.
    pub spin: f32,
    /// Gaussian width of each strand, in radians.
    pub sigma: f32,
    /// Radius of the thin core that keeps the surface from collapsing.
    pub base: f32,
    pub strand_weight: f32,
    pub rung_weight: f32,
    /// Rungs per unit of direction `y` (scaled by PI).
    pub rung_frequency: f32,
}

impl HelixParams {
    pub const FULL: Self = Self {
        height: 2.3,
        twist: 7.0,
        spin: 0.4,
        sigma: 0.28,
        base: 0.02,
        strand_weight: 0.7,
        rung_weight: 0.25,
        rung_frequency: 3.5,
    };

    pub const COMPACT: Self = Self {
        height: 1.5,
        twist: 5.0,
        spin: 0.6,
        sigma: 0.32,
        base: 0.04,
        strand_weight: 0.5,
        rung_weight: 0.2,
        rung_frequency: 2.5,
    };
}

/// Strand and rung densities for a direction, both in `[0, 1]` / `[0, 0.5]`.
pub fn helix_density(d: Vec3, t: f32, p: &HelixParams) -> (f32, f32) {
    let theta = d.z.atan2(d.x);
    let track = d.y * p.twist + t * p.spin;
    let d1 = angular_distance(theta, track);
    let d2 = angular_distance(theta, track + PI);
    let strand = gaussian(d1, p.sigma).max(gaussian(d2, p.sigma));

    let rung_on = (d.y * p.rung_frequency * PI).cos().max(0.0).powi(16);
    let rung = rung_on * (1.0 - strand * 2.5).max(0.0) * 0.5;
    (strand, rung)
}

/// Two phase-offset strands bridged by periodic rungs.
pub fn helix(d: Vec3, t: f32, s: f32, p: &HelixParams) -> Vec3 {
    let (strand, rung) = helix_density(d, t, p);
    let r = s * (p.base + p.strand_weight * strand + p.rung_weight * rung);
    Vec3::new(d.x * r, d.y * s * p.height, d.z * r)
}

// ---------- Capsule ----------

const CAPSULE_RADIUS: f32 = 0.32;
const CAPSULE_HALF_LENGTH: f32 = 0.4;
/// Direction `y` beyond which the end caps take over.
pub const CAPSULE_CAP_START: f32 = 0.7;

/// `(along, radius)` profile of the capsule for the axial parameter `u`
/// in `[-1, 1]`. Zone joins are tangent-continuous.
pub fn capsule_profile(u: f32, s: f32) -> (f32, f32) {
    let pill_r = s * CAPSULE_RADIUS;
    let half_len = s * CAPSULE_HALF_LENGTH;
    let cap_span = 1.0 - CAPSULE_CAP_START;

    let (along, radius) = if u < -CAPSULE_CAP_START {
        let a = (1.0 - (u + 1.0) / cap_span) * FRAC_PI_2;
        (-half_len - pill_r * a.sin(), pill_r * a.cos())
    } else if u > CAPSULE_CAP_START {
        let a = (u - CAPSULE_CAP_START) / cap_span * FRAC_PI_2;
        (half_len + pill_r * a.sin(), pill_r * a.cos())
    } else {
        (u / CAPSULE_CAP_START * half_len, pill_r)
    };
    (along, radius.max(0.001))
}

/// Horizontal pill: the direction's Y drives the long axis, laid out on X.
pub fn capsule(d: Vec3, _t: f32, s: f32) -> Vec3 {
    let theta = d.z.atan2(d.x);
    let (along, radius) = capsule_profile(d.y.clamp(-1.0, 1.0), s);
    Vec3::new(along, theta.cos() * radius, theta.sin() * radius)
}

// ---------- Secondary set ----------

const TARGET_RINGS: [f32; 3] = [1.0, 0.65, 0.3];

/// Flattened disc with three pulsing concentric ridges and a centre dot.
pub fn target(d: Vec3, t: f32, s: f32) -> Vec3 {
    let rho = (d.x * d.x + d.y * d.y).sqrt();
    let ring = TARGET_RINGS
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let pulse = 1.0 + (t * 1.5 + i as f32).sin() * 0.1;
            gaussian(rho - r * pulse, 0.06)
        })
        .fold(0.0_f32, f32::max);
    let dot = gaussian(rho, 0.12) * (1.0 + (t * 2.0).sin() * 0.2);

    let planar = s * (0.85 + 0.1 * ring);
    let depth = s * (0.12 + 0.22 * ring + 0.3 * dot);
    Vec3::new(d.x * planar, d.y * planar, d.z * depth)
}

/// Heraldic shield: tapered bottom point, raised rim and a pulsing boss.
pub fn shield(d: Vec3, t: f32, s: f32) -> Vec3 {
    let rho = (d.x * d.x + d.y * d.y).sqrt();
    let taper = smoothstep(0.0, 1.0, -d.y);
    let rim = gaussian(rho - 0.93, 0.05);
    let boss = gaussian(rho, 0.3) * (1.0 + (t * 1.5).sin() * 0.15);

    Vec3::new(
        d.x * s * 0.8 * (1.0 - 0.35 * taper),
        d.y * s * 0.9 * (1.0 + 0.25 * taper),
        d.z * s * (0.22 + 0.1 * rim + 0.3 * boss),
    )
}

const GEAR_TEETH: f32 = 10.0;

/// Slowly turning cog: tooth modulation on the rim, a thick hub and spokes.
pub fn gear(d: Vec3, t: f32, s: f32) -> Vec3 {
    let rho = (d.x * d.x + d.y * d.y).sqrt();
    let theta = d.y.atan2(d.x) + t * 0.2;
    let teeth = smoothstep(-0.25, 0.25, (theta * GEAR_TEETH).cos());
    let hub = gaussian(rho, 0.25);
    let spokes = (theta * 3.0).cos().max(0.0).powi(8);

    let planar = s * (0.75 + 0.17 * teeth);
    Vec3::new(d.x * planar, d.y * planar, d.z * s * (0.18 + 0.2 * hub + 0.06 * spokes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_offset_bounded() {
        for i in 0..500 {
            let a = i as f32 * 0.37;
            let d = Vec3::new(a.cos(), (a * 0.7).sin(), (a * 1.3).sin()).normalize();
            let n = blob_offset(d, i as f32 * 2.0);
            assert!(n.abs() <= 0.3 + 1e-6, "offset {} out of range", n);
        }
    }

    #[test]
    fn test_helix_strand_peaks_on_track() {
        // At y = 0, t = 0 the first track sits at theta = 0 (+X)
        let (on, _) = helix_density(Vec3::X, 0.0, &HelixParams::FULL);
        let (off, _) = helix_density(Vec3::Z, 0.0, &HelixParams::FULL);
        assert!((on - 1.0).abs() < 1e-5);
        assert!(off < 0.01, "quarter turn away should be nearly empty: {}", off);
    }

    #[test]
    fn test_helix_second_strand_opposite() {
        let (strand, _) = helix_density(Vec3::NEG_X, 0.0, &HelixParams::FULL);
        assert!((strand - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_helix_height_linear() {
        let d = Vec3::new(0.0, 0.6, 0.8);
        let p = helix(d, 3.0, 1.4, &HelixParams::FULL);
        assert!((p.y - 0.6 * 1.4 * 2.3).abs() < 1e-5);
    }

    #[test]
    fn test_capsule_zone_joins_match() {
        let s = 1.4;
        let eps = 1e-4;
        for u in [-CAPSULE_CAP_START, CAPSULE_CAP_START] {
            let (a0, r0) = capsule_profile(u - eps, s);
            let (a1, r1) = capsule_profile(u + eps, s);
            assert!((a0 - a1).abs() < 1e-3, "along jumps at {}: {} vs {}", u, a0, a1);
            assert!((r0 - r1).abs() < 1e-3, "radius jumps at {}: {} vs {}", u, r0, r1);
        }
    }

    #[test]
    fn test_capsule_tips_close() {
        let (along, radius) = capsule_profile(1.0, 1.0);
        assert!((along - 0.72).abs() < 1e-5);
        assert!(radius < 0.002);
        let (along, _) = capsule_profile(-1.0, 1.0);
        assert!((along + 0.72).abs() < 1e-5);
    }

    #[test]
    fn test_gear_teeth_modulate_rim() {
        let tooth = gear(Vec3::X, 0.0, 1.0);
        let gap_angle = std::f32::consts::PI / GEAR_TEETH;
        let gap = gear(Vec3::new(gap_angle.cos(), gap_angle.sin(), 0.0), 0.0, 1.0);
        assert!(tooth.length() > gap.length() + 0.1);
    }
}
