//! Environment backdrop and the reflection probe that captures it.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::material::MaterialDesc;
use crate::mesh::SphereMesh;
use crate::renderer::{EnvironmentCapture, ReflectionMap, Renderer};
use crate::scene::{Light, SceneVisibility};

pub const BACKDROP_RADIUS: f32 = 30.0;
pub const BACKDROP_SEGMENTS: u32 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackdropPalette {
    /// Dark-to-bright indigo sweep.
    Indigo,
    /// Diagonal bands plus a bright studio hotspot.
    Chrome,
}

impl BackdropPalette {
    /// Vertex colour for a backdrop point at height `y` and azimuth
    /// `atan2(z, x)`.
    pub fn color_at(self, p: Vec3) -> Vec3 {
        let et = (p.y / BACKDROP_RADIUS + 1.0) * 0.5;
        let ea = p.z.atan2(p.x);
        match self {
            BackdropPalette::Indigo => Vec3::new(
                0.08 + et * 0.18 * (ea * 0.5).cos().max(0.0),
                0.06 + et * 0.14,
                0.32 + et * 0.55 * (ea * 0.5 + 1.0).sin().max(0.0),
            ),
            BackdropPalette::Chrome => {
                let band = (et * PI * 3.0 + ea * 2.0).sin() * 0.5 + 0.5;
                let hotspot = ((ea - 1.0).cos() * ((et - 0.6) * PI).cos()).max(0.0).powi(4);
                Vec3::new(
                    0.03 + band * 0.35 + hotspot * 0.9,
                    0.03 + band * 0.3 + hotspot * 0.85,
                    0.08 + band * 0.5 + hotspot * 0.95,
                )
            }
        }
    }
}

/// Large vertex-coloured sphere that only ever appears in reflections.
pub struct Backdrop {
    mesh: SphereMesh,
    colors: Vec<Vec3>,
    palette: BackdropPalette,
    animate: bool,
    /// Euler XYZ rotation, radians.
    pub rotation: Vec3,
}

impl Backdrop {
    pub fn new(palette: BackdropPalette, animate: bool) -> Result<Self> {
        let mesh = SphereMesh::new(BACKDROP_RADIUS, BACKDROP_SEGMENTS, BACKDROP_SEGMENTS)?;
        let colors = mesh
            .rest_positions()
            .iter()
            .map(|p| palette.color_at(*p))
            .collect();
        Ok(Self {
            mesh,
            colors,
            palette,
            animate,
            rotation: Vec3::ZERO,
        })
    }

    pub fn palette(&self) -> BackdropPalette {
        self.palette
    }

    pub fn is_animated(&self) -> bool {
        self.animate
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn color_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Float count shared by the position and colour buffers.
    pub fn attribute_len(&self) -> usize {
        self.mesh.position_floats().len()
    }

    /// Slow drift for animated backdrops. Static backdrops stay put.
    pub fn update(&mut self, time: f32) {
        if self.animate {
            self.rotation = Vec3::new((time * 0.1).sin() * 0.2, time * 0.15, 0.0);
        }
    }
}

/// When the probe re-captures its environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    Once,
    EveryFrame,
    /// Every `n` rendered frames.
    Interval(u32),
}

/// Cube-camera stand-in: owns the current map handle and refresh cadence.
#[derive(Clone, Debug)]
pub struct ReflectionProbe {
    pub resolution: u32,
    pub policy: RefreshPolicy,
    map: Option<ReflectionMap>,
    frames_since_capture: u32,
    captures: u64,
}

impl ReflectionProbe {
    pub fn new(resolution: u32, policy: RefreshPolicy) -> Self {
        Self {
            resolution,
            policy,
            map: None,
            frames_since_capture: 0,
            captures: 0,
        }
    }

    pub fn map(&self) -> Option<ReflectionMap> {
        self.map
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }

    pub fn needs_refresh(&self) -> bool {
        if self.map.is_none() {
            return true;
        }
        match self.policy {
            RefreshPolicy::Once => false,
            RefreshPolicy::EveryFrame => true,
            RefreshPolicy::Interval(n) => self.frames_since_capture >= n.max(1),
        }
    }

    /// Capture the environment around `origin` and bind it to `material`.
    ///
    /// The mesh is hidden and the backdrop shown for the capture only;
    /// afterwards the mesh is visible and the backdrop hidden again.
    pub fn refresh<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        origin: Vec3,
        lights: &[Light],
        backdrop: &Backdrop,
        visibility: &mut SceneVisibility,
        material: &mut MaterialDesc,
    ) -> ReflectionMap {
        visibility.mesh = false;
        visibility.backdrop = true;

        let map = renderer.capture_environment(&EnvironmentCapture {
            origin,
            resolution: self.resolution,
            lights,
            backdrop,
            visibility: *visibility,
        });

        visibility.mesh = true;
        visibility.backdrop = false;

        material.env_map = Some(map);
        self.map = Some(map);
        self.frames_since_capture = 0;
        self.captures += 1;
        map
    }

    /// Per rendered frame: refresh if the policy asks for it.
    /// Returns whether a capture happened.
    pub fn update<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        origin: Vec3,
        lights: &[Light],
        backdrop: &Backdrop,
        visibility: &mut SceneVisibility,
        material: &mut MaterialDesc,
    ) -> bool {
        self.frames_since_capture = self.frames_since_capture.saturating_add(1);
        if !self.needs_refresh() {
            return false;
        }
        self.refresh(renderer, origin, lights, backdrop, visibility, material);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FrameView;

    #[derive(Default)]
    struct CountingRenderer {
        captures: u32,
        seen: Vec<SceneVisibility>,
    }

    impl Renderer for CountingRenderer {
        fn capture_environment(&mut self, capture: &EnvironmentCapture<'_>) -> ReflectionMap {
            self.captures += 1;
            self.seen.push(capture.visibility);
            ReflectionMap {
                id: self.captures,
                resolution: capture.resolution,
            }
        }

        fn draw(&mut self, _frame: &FrameView<'_>) {}
    }

    fn run(policy: RefreshPolicy, frames: usize) -> (ReflectionProbe, CountingRenderer, MaterialDesc) {
        let backdrop = Backdrop::new(BackdropPalette::Indigo, false).unwrap();
        let mut probe = ReflectionProbe::new(64, policy);
        let mut renderer = CountingRenderer::default();
        let mut vis = SceneVisibility::default();
        let mut material = MaterialDesc::satin();
        for _ in 0..frames {
            probe.update(&mut renderer, Vec3::ZERO, &[], &backdrop, &mut vis, &mut material);
            assert_eq!(vis, SceneVisibility::default());
        }
        (probe, renderer, material)
    }

    #[test]
    fn test_once_captures_single_time() {
        let (probe, renderer, material) = run(RefreshPolicy::Once, 10);
        assert_eq!(renderer.captures, 1);
        assert_eq!(probe.captures(), 1);
        assert_eq!(material.env_map, probe.map());
    }

    #[test]
    fn test_every_frame_and_interval() {
        assert_eq!(run(RefreshPolicy::EveryFrame, 7).1.captures, 7);
        // Frame 1 captures, then every third frame
        assert_eq!(run(RefreshPolicy::Interval(3), 7).1.captures, 3);
    }

    #[test]
    fn test_mesh_hidden_during_capture() {
        let (_, renderer, _) = run(RefreshPolicy::EveryFrame, 2);
        for vis in renderer.seen {
            assert!(!vis.mesh);
            assert!(vis.backdrop);
        }
    }

    #[test]
    fn test_palettes_in_gamut() {
        for palette in [BackdropPalette::Indigo, BackdropPalette::Chrome] {
            let backdrop = Backdrop::new(palette, false).unwrap();
            assert_eq!(backdrop.colors().len(), backdrop.mesh().vertex_count());
            for c in backdrop.colors() {
                assert!(c.is_finite());
                assert!(c.min_element() >= 0.0);
                assert!(c.max_element() <= 2.5);
            }
        }
    }

    #[test]
    fn test_attribute_len_covers_both_buffers() {
        let backdrop = Backdrop::new(BackdropPalette::Indigo, true).unwrap();
        let floats = backdrop.mesh().vertex_count() * 3;
        assert_eq!(backdrop.attribute_len(), floats);
        assert_eq!(backdrop.color_floats().len(), floats);
        assert_eq!(backdrop.mesh().position_floats().len(), floats);
    }

    #[test]
    fn test_static_backdrop_ignores_time() {
        let mut backdrop = Backdrop::new(BackdropPalette::Chrome, false).unwrap();
        backdrop.update(12.0);
        assert_eq!(backdrop.rotation, Vec3::ZERO);
        backdrop.animate = true;
        backdrop.update(10.0);
        assert!((backdrop.rotation.y - 1.5).abs() < 1e-5);
    }
}
