use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How far the mesh leans toward the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub enabled: bool,
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
    /// Extra yaw (radians) at full horizontal deflection.
    pub yaw_gain: f32,
    /// Extra pitch (radians) at full vertical deflection.
    pub pitch_gain: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smoothing: 0.05,
            yaw_gain: 0.4,
            pitch_gain: 0.2,
        }
    }
}

impl PointerConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Pointer position in normalized device space, eased toward the latest
/// sample once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSmoother {
    target: Vec2,
    current: Vec2,
    smoothing: f32,
}

impl PointerSmoother {
    pub fn new(smoothing: f32) -> Self {
        Self {
            target: Vec2::ZERO,
            current: Vec2::ZERO,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Record a pointer sample, clamped to `[-1, 1]` per axis.
    /// Non-finite samples are dropped.
    pub fn set_target(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("ignoring non-finite pointer sample ({}, {})", x, y);
            return;
        }
        self.target = Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn update(&mut self) -> Vec2 {
        self.current += (self.target - self.current) * self.smoothing;
        self.current
    }
}
