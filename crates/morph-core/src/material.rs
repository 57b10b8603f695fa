use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::rgb_hex;
use crate::renderer::ReflectionMap;

/// Physically-based material handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    pub color: Vec3,
    pub metalness: f32,
    pub roughness: f32,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
    pub opacity: f32,
    /// Bound by the reflection probe; never part of the configuration.
    #[serde(skip)]
    pub env_map: Option<ReflectionMap>,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self::iridescent_glass()
    }
}

impl MaterialDesc {
    /// Deep indigo liquid glass for the hero orb.
    pub fn iridescent_glass() -> Self {
        Self {
            color: rgb_hex(0x5050e0),
            metalness: 0.28,
            roughness: 0.02,
            reflectivity: 1.0,
            clearcoat: 1.0,
            clearcoat_roughness: 0.01,
            env_map_intensity: 2.8,
            opacity: 1.0,
            env_map: None,
        }
    }

    /// Translucent chrome that picks up a rotating backdrop.
    pub fn chrome() -> Self {
        Self {
            color: rgb_hex(0xccccdd),
            metalness: 0.6,
            roughness: 0.08,
            reflectivity: 0.9,
            clearcoat: 1.0,
            clearcoat_roughness: 0.03,
            env_map_intensity: 2.5,
            opacity: 0.85,
            env_map: None,
        }
    }

    /// Soft clearcoated blue for the small card shapes.
    pub fn satin() -> Self {
        Self {
            color: rgb_hex(0x3545b5),
            metalness: 0.4,
            roughness: 0.1,
            reflectivity: 0.5,
            clearcoat: 1.0,
            clearcoat_roughness: 0.05,
            env_map_intensity: 1.0,
            opacity: 1.0,
            env_map: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        [
            self.metalness,
            self.roughness,
            self.reflectivity,
            self.clearcoat,
            self.clearcoat_roughness,
            self.opacity,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
            && self.env_map_intensity >= 0.0
            && self.color.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_presets_valid() {
        for (name, preset) in [
            ("glass", MaterialDesc::iridescent_glass()),
            ("chrome", MaterialDesc::chrome()),
            ("satin", MaterialDesc::satin()),
        ] {
            assert!(preset.is_valid(), "{} preset out of range", name);
            assert!(preset.env_map.is_none(), "{} should start unbound", name);
        }
    }

    #[test]
    fn test_rejects_out_of_range_roughness() {
        let mut m = MaterialDesc::satin();
        m.roughness = 1.5;
        assert!(!m.is_valid());
    }
}
