//! Lights, camera and whole-mesh transform passed across the renderer
//! boundary.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::rgb_hex;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    /// Shines from `position` toward the origin.
    Directional {
        color: Vec3,
        intensity: f32,
        position: Vec3,
    },
    Ambient {
        color: Vec3,
        intensity: f32,
    },
}

impl Light {
    pub fn directional(hex: u32, intensity: f32, x: f32, y: f32, z: f32) -> Self {
        Light::Directional {
            color: rgb_hex(hex),
            intensity,
            position: Vec3::new(x, y, z),
        }
    }

    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Light::Ambient {
            color: rgb_hex(hex),
            intensity,
        }
    }

    /// Unit vector the light travels along, `None` for ambient light.
    pub fn direction(&self) -> Option<Vec3> {
        match self {
            Light::Directional { position, .. } => Some(-position.normalize_or_zero()),
            Light::Ambient { .. } => None,
        }
    }
}

/// Blue-indigo rig for the hero orb.
pub fn hero_lights() -> Vec<Light> {
    vec![
        Light::directional(0x4455ee, 3.2, 5.0, 5.0, 5.0),
        Light::directional(0x5560e8, 2.8, -5.0, 3.0, 3.0),
        Light::directional(0x4466ee, 2.0, 3.0, -4.0, -5.0),
        Light::directional(0x5050dd, 1.6, -2.0, 7.0, -2.0),
        Light::directional(0x4848cc, 1.5, 0.0, -2.0, -7.0),
        Light::ambient(0x4455cc, 0.35),
    ]
}

/// High-contrast warm/cool rig for chrome surfaces.
pub fn chrome_lights() -> Vec<Light> {
    vec![
        Light::directional(0xffffff, 4.0, 5.0, 5.0, 5.0),
        Light::directional(0xccddff, 3.0, -5.0, 3.0, 3.0),
        Light::directional(0xffeedd, 2.5, 3.0, -4.0, -5.0),
        Light::directional(0xaabbff, 2.0, -2.0, 7.0, -2.0),
        Light::directional(0xffffff, 2.0, 0.0, -3.0, -7.0),
        Light::directional(0xffccaa, 1.5, -4.0, -2.0, 4.0),
        Light::ambient(0x8899cc, 0.4),
    ]
}

/// Two-key rig used by the small card canvases.
pub fn card_lights() -> Vec<Light> {
    vec![
        Light::directional(0x5060e8, 2.0, 3.0, 3.0, 5.0),
        Light::directional(0x4448dd, 1.2, -3.0, 2.0, 3.0),
        Light::ambient(0x4455cc, 0.6),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 4.5),
            aspect: 1.0,
        }
    }
}

impl Camera {
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }
}

/// Rotation (Euler XYZ, radians), translation and uniform scale of the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTransform {
    pub rotation: Vec3,
    pub position: Vec3,
    pub scale: f32,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            position: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl MeshTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }
}

/// Which scene objects the renderer should draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneVisibility {
    pub mesh: bool,
    pub backdrop: bool,
}

impl Default for SceneVisibility {
    fn default() -> Self {
        Self {
            mesh: true,
            backdrop: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_points_at_origin() {
        let light = Light::directional(0xffffff, 1.0, 0.0, 5.0, 0.0);
        let d = light.direction().unwrap();
        assert!((d - Vec3::NEG_Y).length() < 1e-6);
        assert!(Light::ambient(0xffffff, 1.0).direction().is_none());
    }

    #[test]
    fn test_identity_transform() {
        assert!(MeshTransform::default().matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_light_json_tagged() {
        let json = serde_json::to_value(Light::ambient(0x000000, 0.5)).unwrap();
        assert_eq!(json["kind"], "ambient");
    }
}
