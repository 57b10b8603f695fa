use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Shortest direction vector length accepted before normalising.
pub const MIN_DIRECTION_LENGTH: f32 = 1.0e-6;

/// Smooth interpolation - GLSL `smoothstep`.
///
/// Equal edges degrade to a hard step instead of dividing by zero.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span.abs() < f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    ease(((x - edge0) / span).clamp(0.0, 1.0))
}

/// Cubic ease `3x² - 2x³` on an already normalised `x`.
///
/// Exactly 0 at 0 and exactly 1 at 1.
#[inline]
pub fn ease(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Blend two points. Returns `a` bit-for-bit at `t == 0` and `b` at `t == 1`.
#[inline]
pub fn lerp_point(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Signed angle from `b` to `a`, wrapped into `[-PI, PI]`.
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// Unnormalised Gaussian bump `exp(-x² / 2σ²)`, 1 at `x == 0`.
#[inline]
pub fn gaussian(x: f32, sigma: f32) -> f32 {
    (-(x * x) / (2.0 * sigma * sigma)).exp()
}

/// Normalise `v`, falling back to `fallback` when it is shorter than
/// [`MIN_DIRECTION_LENGTH`] or not finite.
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if !len.is_finite() || len < MIN_DIRECTION_LENGTH {
        return fallback;
    }
    v / len
}

/// `0xRRGGBB` to linear-ish `[0, 1]` RGB.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Nearest multiple of a full turn.
pub fn nearest_full_turn(angle: f32) -> f32 {
    (angle / TAU).round() * TAU
}
