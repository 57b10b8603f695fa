//! Boundary to the external rasterizer.
//!
//! The engine never draws. Each frame it hands a [`FrameView`] to a
//! [`Renderer`], and the reflection probe occasionally asks it for an
//! environment capture.

use glam::{UVec2, Vec3};

use crate::material::MaterialDesc;
use crate::reflection::Backdrop;
use crate::scene::{Camera, Light, MeshTransform, SceneVisibility};

/// Handle to a cube image owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReflectionMap {
    pub id: u32,
    pub resolution: u32,
}

/// One environment snapshot request.
pub struct EnvironmentCapture<'a> {
    pub origin: Vec3,
    pub resolution: u32,
    pub lights: &'a [Light],
    pub backdrop: &'a Backdrop,
    /// The morphing mesh is hidden and the backdrop shown for the capture.
    pub visibility: SceneVisibility,
}

/// Everything needed to draw one frame.
pub struct FrameView<'a> {
    pub positions: &'a [Vec3],
    pub normals: &'a [Vec3],
    pub indices: &'a [u32],
    pub transform: MeshTransform,
    pub material: &'a MaterialDesc,
    pub lights: &'a [Light],
    pub camera: &'a Camera,
    pub output_size: UVec2,
    pub visibility: SceneVisibility,
}

pub trait Renderer {
    /// Render the scene into a cube image at `capture.origin` and return a
    /// handle that materials can bind.
    fn capture_environment(&mut self, capture: &EnvironmentCapture<'_>) -> ReflectionMap;

    fn draw(&mut self, frame: &FrameView<'_>);
}
