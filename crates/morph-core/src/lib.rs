//! Procedural shape-morphing engine.
//!
//! A fixed-topology sphere mesh is displaced every frame toward a blend of
//! two analytic shapes chosen by a timed or scroll-linked controller. The
//! crate does no rasterization; a [`renderer::Renderer`] implementation
//! receives the buffers.

pub mod config;
pub mod engine;
pub mod error;
pub mod material;
pub mod math;
pub mod mesh;
pub mod morph;
pub mod pointer;
pub mod presets;
pub mod reflection;
pub mod renderer;
pub mod scene;
pub mod shapes;

pub use config::EngineConfig;
pub use engine::{FrameOutcome, FrameStats, MorphEngine, VisibilityFlag};
pub use error::{MorphError, Result};
pub use morph::MorphState;
pub use renderer::{EnvironmentCapture, FrameView, ReflectionMap, Renderer};
pub use shapes::{Shape, ShapeLibrary};
