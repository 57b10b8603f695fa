//! Per-frame animation driver.
//!
//! One [`MorphEngine`] owns a sphere mesh and everything that moves it:
//! the morph controller, the shape library, idle motion, pointer easing and
//! the reflection probe. The host calls [`MorphEngine::tick`] once per
//! display refresh with the elapsed time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{UVec2, Vec2, Vec3};

use crate::config::{DriverConfig, EngineConfig};
use crate::error::Result;
use crate::material::MaterialDesc;
use crate::math::{lerp_point, nearest_full_turn};
use crate::mesh::SphereMesh;
use crate::morph::{MorphController, MorphCycle, MorphState, StepMorph};
use crate::pointer::PointerSmoother;
use crate::reflection::{Backdrop, ReflectionProbe};
use crate::renderer::{FrameView, Renderer};
use crate::scene::{Camera, Light, MeshTransform, SceneVisibility};
use crate::shapes::{Shape, ShapeLibrary};

/// On-screen flag shared with whatever observes the canvas.
///
/// Writes may come from another thread; the engine only reads it at the
/// top of each tick.
#[derive(Clone, Debug)]
pub struct VisibilityFlag(Arc<AtomicBool>);

impl VisibilityFlag {
    pub fn new(visible: bool) -> Self {
        Self(Arc::new(AtomicBool::new(visible)))
    }

    pub fn set(&self, visible: bool) {
        self.0.store(visible, Ordering::Relaxed);
    }

    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for VisibilityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    /// Vertices displaced, summed over all rendered frames.
    pub vertex_evaluations: u64,
    pub environment_captures: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Off screen: nothing advanced, nothing drawn.
    Skipped,
    Rendered(MorphState),
}

pub struct MorphEngine {
    config: EngineConfig,
    mesh: SphereMesh,
    library: ShapeLibrary,
    controller: MorphController,
    probe: ReflectionProbe,
    backdrop: Backdrop,
    pointer: PointerSmoother,
    material: MaterialDesc,
    camera: Camera,
    transform: MeshTransform,
    scene_visibility: SceneVisibility,
    visible: VisibilityFlag,
    output_size: UVec2,
    /// Accumulated spin, kept apart from the pointer offset so facing
    /// correction can unwind it.
    yaw: f32,
    last_time: Option<f32>,
    state: MorphState,
    stats: FrameStats,
}

impl MorphEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let mesh = SphereMesh::new(config.radius, config.width_segments, config.height_segments)?;
        let library = ShapeLibrary::new(config.radius, mesh.directions(), &config.shapes);

        let n = config.shapes.len();
        let controller = match config.driver {
            DriverConfig::Timed {
                hold,
                transition,
                intro,
            } => MorphController::Timed(MorphCycle::new(n, hold, transition).with_intro(intro)),
            DriverConfig::Stepped { step, initial } => {
                MorphController::Stepped(StepMorph::new(n, initial, step))
            }
        };
        let state = match &controller {
            MorphController::Timed(_) => MorphState::resting(0),
            MorphController::Stepped(steps) => steps.state(),
        };

        let probe = ReflectionProbe::new(config.reflection.resolution, config.reflection.policy);
        let backdrop = Backdrop::new(config.reflection.palette, config.reflection.animate_backdrop)?;

        log::debug!(
            "morph engine: {} vertices, {} triangles, shapes [{}], heart table {} entries",
            mesh.vertex_count(),
            mesh.triangle_count(),
            config
                .shapes
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", "),
            library.heart().len()
        );

        let mut engine = Self {
            pointer: PointerSmoother::new(config.pointer.smoothing),
            material: config.material,
            camera: config.camera,
            transform: MeshTransform::default(),
            scene_visibility: SceneVisibility::default(),
            visible: VisibilityFlag::default(),
            output_size: UVec2::ONE,
            yaw: 0.0,
            last_time: None,
            state,
            stats: FrameStats::default(),
            mesh,
            library,
            controller,
            probe,
            backdrop,
            config,
        };
        let size = engine.config.initial_size;
        engine.resize(size.x, size.y);
        Ok(engine)
    }

    /// Advance to `time` (seconds since start) and draw through `renderer`.
    pub fn tick<R: Renderer + ?Sized>(&mut self, time: f32, renderer: &mut R) -> FrameOutcome {
        if !self.visible.is_visible() {
            self.stats.frames_skipped += 1;
            return FrameOutcome::Skipped;
        }

        let t = if time.is_finite() {
            time
        } else {
            log::warn!("non-finite frame time {}, reusing previous", time);
            self.last_time.unwrap_or(0.0)
        };
        let dt = self.last_time.map_or(0.0, |prev| (t - prev).max(0.0));
        self.last_time = Some(t);

        let state = self.controller.advance(t);
        self.deform(state, t);
        self.mesh.recompute_normals();
        self.update_motion(state, t, dt);
        self.backdrop.update(t);

        if self.probe.update(
            renderer,
            self.transform.position,
            &self.config.lights,
            &self.backdrop,
            &mut self.scene_visibility,
            &mut self.material,
        ) {
            self.stats.environment_captures += 1;
        }

        renderer.draw(&FrameView {
            positions: &self.mesh.positions,
            normals: &self.mesh.normals,
            indices: self.mesh.indices(),
            transform: self.transform,
            material: &self.material,
            lights: &self.config.lights,
            camera: &self.camera,
            output_size: self.output_size,
            visibility: self.scene_visibility,
        });

        self.state = state;
        self.stats.frames_rendered += 1;
        FrameOutcome::Rendered(state)
    }

    /// Displace every vertex to the blend of the two active shapes.
    fn deform(&mut self, state: MorphState, t: f32) {
        let a = self.config.shapes[state.current];
        let b = self.config.shapes[state.next];
        let blend = state.blend;
        let s = self.library.scale();
        let library = &self.library;

        self.mesh.displace(|i, d| {
            let ia = a.uses_vertex_index().then_some(i);
            let ib = b.uses_vertex_index().then_some(i);
            let p = if blend <= 0.0 {
                library.evaluate(a, d, t, ia)
            } else if blend >= 1.0 {
                library.evaluate(b, d, t, ib)
            } else {
                lerp_point(
                    library.evaluate(a, d, t, ia),
                    library.evaluate(b, d, t, ib),
                    blend,
                )
            };
            if p.is_finite() {
                p
            } else {
                d * s
            }
        });
        self.stats.vertex_evaluations += self.mesh.vertex_count() as u64;
    }

    fn is_facing(&self, state: MorphState) -> bool {
        let motion = &self.config.motion;
        let Some(facing) = motion.facing else {
            return false;
        };
        state.is_showing(motion.facing_threshold, |i| self.config.shapes[i] == facing)
    }

    fn update_motion(&mut self, state: MorphState, t: f32, dt: f32) {
        let motion = self.config.motion;
        let facing = self.is_facing(state);

        if facing {
            self.yaw += (nearest_full_turn(self.yaw) - self.yaw) * motion.facing_ease;
        } else {
            self.yaw += motion.spin * dt;
        }

        let pointer = if self.config.pointer.enabled {
            self.pointer.update()
        } else {
            Vec2::ZERO
        };

        let (sway, pitch, roll) = if facing {
            (0.0, 0.0, 0.0)
        } else {
            (motion.yaw_sway.at(t), motion.pitch.at(t), motion.roll.at(t))
        };

        self.transform = MeshTransform {
            rotation: Vec3::new(
                pitch + pointer.y * self.config.pointer.pitch_gain,
                self.yaw + sway + pointer.x * self.config.pointer.yaw_gain,
                roll,
            ),
            position: Vec3::new(motion.bob_x.at(t), motion.bob_y.at(t), 0.0),
            scale: self.config.breathing.map_or(1.0, |b| b.scale_at(t)),
        };
    }

    /// Scroll-linked section signal. Returns `false` when ignored.
    pub fn set_target_step(&mut self, index: usize) -> bool {
        self.controller.set_target(index)
    }

    /// Pointer position in `[-1, 1]` device coordinates.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer.set_target(x, y);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        self.output_size = UVec2::new(width, height);
        self.camera.aspect = width as f32 / height as f32;
    }

    /// Handle for the host's intersection observer.
    pub fn visibility(&self) -> VisibilityFlag {
        self.visible.clone()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn library(&self) -> &ShapeLibrary {
        &self.library
    }

    pub fn controller(&self) -> &MorphController {
        &self.controller
    }

    pub fn shape_at(&self, index: usize) -> Option<Shape> {
        self.config.shapes.get(index).copied()
    }

    pub fn state(&self) -> MorphState {
        self.state
    }

    pub fn transform(&self) -> MeshTransform {
        self.transform
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn material(&self) -> &MaterialDesc {
        &self.material
    }

    pub fn lights(&self) -> &[Light] {
        &self.config.lights
    }

    pub fn probe(&self) -> &ReflectionProbe {
        &self.probe
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn scene_visibility(&self) -> SceneVisibility {
        self.scene_visibility
    }

    pub fn output_size(&self) -> UVec2 {
        self.output_size
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::renderer::{EnvironmentCapture, ReflectionMap};

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn capture_environment(&mut self, capture: &EnvironmentCapture<'_>) -> ReflectionMap {
            ReflectionMap {
                id: 1,
                resolution: capture.resolution,
            }
        }

        fn draw(&mut self, _frame: &FrameView<'_>) {}
    }

    fn small(mut config: EngineConfig) -> EngineConfig {
        config.width_segments = 16;
        config.height_segments = 8;
        config
    }

    #[test]
    fn test_hidden_engine_skips() {
        let mut engine = MorphEngine::new(small(presets::hero_orb())).unwrap();
        engine.set_visible(false);
        assert_eq!(engine.tick(1.0, &mut NullRenderer), FrameOutcome::Skipped);
        let stats = engine.stats();
        assert_eq!(stats.frames_skipped, 1);
        assert_eq!(stats.vertex_evaluations, 0);
    }

    #[test]
    fn test_nan_time_reuses_previous() {
        let mut engine = MorphEngine::new(small(presets::hero_orb())).unwrap();
        engine.tick(2.0, &mut NullRenderer);
        let before = engine.yaw();
        engine.tick(f32::NAN, &mut NullRenderer);
        assert_eq!(engine.yaw(), before);
        for p in &engine.mesh().positions {
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_time_going_backwards_does_not_unspin() {
        let mut engine = MorphEngine::new(small(presets::hero_orb())).unwrap();
        engine.tick(3.0, &mut NullRenderer);
        let before = engine.yaw();
        engine.tick(1.0, &mut NullRenderer);
        assert!(engine.yaw() >= before);
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut engine = MorphEngine::new(small(presets::hero_orb())).unwrap();
        engine.resize(400, 200);
        assert_eq!(engine.camera().aspect, 2.0);
        engine.resize(0, 300);
        assert_eq!(engine.output_size(), UVec2::new(400, 200));
    }

    #[test]
    fn test_breathing_scales_transform() {
        let mut engine = MorphEngine::new(small(presets::engage_steps())).unwrap();
        engine.tick(std::f32::consts::PI, &mut NullRenderer);
        assert!((engine.transform().scale - 1.03).abs() < 1e-4);
    }
}
