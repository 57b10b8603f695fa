use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};
use crate::material::MaterialDesc;
use crate::pointer::PointerConfig;
use crate::presets;
use crate::reflection::{BackdropPalette, RefreshPolicy};
use crate::scene::{Camera, Light};
use crate::shapes::Shape;

/// `amplitude * sin(rate * t)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wobble {
    pub amplitude: f32,
    pub rate: f32,
}

impl Wobble {
    pub const fn new(amplitude: f32, rate: f32) -> Self {
        Self { amplitude, rate }
    }

    pub fn at(&self, t: f32) -> f32 {
        self.amplitude * (self.rate * t).sin()
    }
}

/// Whole-mesh idle motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Continuous yaw, radians per second.
    pub spin: f32,
    pub yaw_sway: Wobble,
    pub pitch: Wobble,
    pub roll: Wobble,
    pub bob_x: Wobble,
    pub bob_y: Wobble,
    /// Shape that should face the camera while it is showing.
    pub facing: Option<Shape>,
    /// Blend past which an incoming facing shape counts as showing.
    pub facing_threshold: f32,
    /// Fraction of the remaining yaw removed per frame while facing.
    pub facing_ease: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            spin: 0.15,
            yaw_sway: Wobble::default(),
            pitch: Wobble::new(0.1, 0.2),
            roll: Wobble::new(0.03, 0.15),
            bob_x: Wobble::new(0.02, 0.35),
            bob_y: Wobble::new(0.08, 0.6),
            facing: Some(Shape::Heart),
            facing_threshold: 0.3,
            facing_ease: 0.15,
        }
    }
}

impl MotionConfig {
    pub fn still() -> Self {
        Self {
            spin: 0.0,
            yaw_sway: Wobble::default(),
            pitch: Wobble::default(),
            roll: Wobble::default(),
            bob_x: Wobble::default(),
            bob_y: Wobble::default(),
            facing: None,
            ..Self::default()
        }
    }
}

/// Uniform scale pulse `1 + amplitude * sin(rate * t)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breathing {
    pub rate: f32,
    pub amplitude: f32,
}

impl Breathing {
    pub fn scale_at(&self, t: f32) -> f32 {
        1.0 + (t * self.rate).sin() * self.amplitude
    }
}

/// Which controller picks the shapes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DriverConfig {
    Timed {
        hold: f32,
        transition: f32,
        intro: f32,
    },
    Stepped {
        /// Progress added per frame.
        step: f32,
        initial: usize,
    },
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig::Timed {
            hold: 5.0,
            transition: 1.8,
            intro: 0.25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig {
    pub resolution: u32,
    pub policy: RefreshPolicy,
    pub palette: BackdropPalette,
    pub animate_backdrop: bool,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            resolution: 256,
            policy: RefreshPolicy::EveryFrame,
            palette: BackdropPalette::Indigo,
            animate_backdrop: false,
        }
    }
}

/// Everything needed to build one [`MorphEngine`](crate::engine::MorphEngine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Global shape scale `S`, also the rest sphere radius.
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub shapes: Vec<Shape>,
    pub driver: DriverConfig,
    pub motion: MotionConfig,
    pub pointer: PointerConfig,
    pub breathing: Option<Breathing>,
    pub reflection: ReflectionConfig,
    pub material: MaterialDesc,
    pub lights: Vec<Light>,
    pub camera: Camera,
    /// Output size in pixels applied at construction.
    pub initial_size: UVec2,
}

impl Default for EngineConfig {
    fn default() -> Self {
        presets::hero_orb()
    }
}

impl EngineConfig {
    /// Parse a JSON document (missing fields take hero defaults) and
    /// validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shapes.is_empty() {
            return Err(MorphError::EmptyShapeList);
        }
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(MorphError::invalid("radius", format!("{} must be positive", self.radius)));
        }
        if self.width_segments < 3 || self.height_segments < 2 {
            return Err(MorphError::MeshResolution {
                width: self.width_segments,
                height: self.height_segments,
            });
        }

        match self.driver {
            DriverConfig::Timed {
                hold,
                transition,
                intro,
            } => {
                if !(hold > 0.0) {
                    return Err(MorphError::invalid("driver.hold", format!("{hold} must be positive")));
                }
                if !(transition >= 0.0) {
                    return Err(MorphError::invalid(
                        "driver.transition",
                        format!("{transition} must not be negative"),
                    ));
                }
                if !(intro > 0.0) {
                    return Err(MorphError::invalid("driver.intro", format!("{intro} must be positive")));
                }
            }
            DriverConfig::Stepped { step, initial } => {
                if !(step > 0.0 && step <= 1.0) {
                    return Err(MorphError::invalid("driver.step", format!("{step} is outside (0, 1]")));
                }
                if initial >= self.shapes.len() {
                    return Err(MorphError::StepOutOfRange {
                        index: initial,
                        len: self.shapes.len(),
                    });
                }
            }
        }

        if self.reflection.resolution == 0 {
            return Err(MorphError::invalid("reflection.resolution", "must be non-zero"));
        }
        if self.reflection.policy == RefreshPolicy::Interval(0) {
            return Err(MorphError::invalid("reflection.policy", "interval must be at least one frame"));
        }

        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0) {
            return Err(MorphError::invalid("camera.fov_degrees", format!("{} must be positive", cam.fov_degrees)));
        }
        if !(cam.near > 0.0) {
            return Err(MorphError::invalid("camera.near", format!("{} must be positive", cam.near)));
        }
        if !(cam.far > cam.near) {
            return Err(MorphError::invalid(
                "camera.far",
                format!("{} must exceed near plane {}", cam.far, cam.near),
            ));
        }

        if !self.material.is_valid() {
            return Err(MorphError::invalid("material", "factor outside [0, 1]"));
        }
        if !(self.pointer.smoothing >= 0.0 && self.pointer.smoothing <= 1.0) {
            return Err(MorphError::invalid(
                "pointer.smoothing",
                format!("{} is outside [0, 1]", self.pointer.smoothing),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_wobble_and_breathing() {
        let w = Wobble::new(0.5, 2.0);
        assert_eq!(w.at(0.0), 0.0);
        assert!((w.at(std::f32::consts::FRAC_PI_4) - 0.5).abs() < 1e-6);
        let b = Breathing {
            rate: 0.5,
            amplitude: 0.03,
        };
        assert_eq!(b.scale_at(0.0), 1.0);
    }

    #[test]
    fn test_driver_json_tagged() {
        let json = r#"{ "mode": "stepped", "step": 0.05, "initial": 1 }"#;
        let driver: DriverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(driver, DriverConfig::Stepped { step: 0.05, initial: 1 });
    }
}
