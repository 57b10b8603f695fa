//! Named engine configurations.

use glam::{UVec2, Vec3};

use crate::config::{Breathing, DriverConfig, EngineConfig, MotionConfig, ReflectionConfig, Wobble};
use crate::material::MaterialDesc;
use crate::pointer::PointerConfig;
use crate::reflection::{BackdropPalette, RefreshPolicy};
use crate::scene::{card_lights, chrome_lights, hero_lights, Camera};
use crate::shapes::Shape;

/// Large glass orb cycling through five shapes on a timer, turning the
/// heart toward the viewer and leaning after the pointer.
pub fn hero_orb() -> EngineConfig {
    EngineConfig {
        radius: 1.4,
        width_segments: 160,
        height_segments: 160,
        shapes: vec![
            Shape::Blob,
            Shape::Helix,
            Shape::Heart,
            Shape::Capsule,
            Shape::Molecule,
        ],
        driver: DriverConfig::Timed {
            hold: 5.0,
            transition: 1.8,
            intro: 0.25,
        },
        motion: MotionConfig::default(),
        pointer: PointerConfig::default(),
        breathing: None,
        reflection: ReflectionConfig {
            resolution: 256,
            policy: RefreshPolicy::EveryFrame,
            palette: BackdropPalette::Indigo,
            animate_backdrop: false,
        },
        material: MaterialDesc::iridescent_glass(),
        lights: hero_lights(),
        camera: Camera {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 4.5),
            aspect: 1.0,
        },
        initial_size: UVec2::new(800, 800),
    }
}

/// Small card canvas whose shape follows the section scrolled into view.
pub fn engage_steps() -> EngineConfig {
    EngineConfig {
        radius: 1.0,
        width_segments: 64,
        height_segments: 64,
        shapes: vec![
            Shape::Target,
            Shape::Shield,
            Shape::Gear,
            Shape::CompactHelix,
            Shape::PartnerCircles,
        ],
        driver: DriverConfig::Stepped {
            step: 0.02,
            initial: 0,
        },
        motion: MotionConfig {
            yaw_sway: Wobble::new(0.3, 0.2),
            ..MotionConfig::still()
        },
        pointer: PointerConfig::disabled(),
        breathing: Some(Breathing {
            rate: 0.5,
            amplitude: 0.03,
        }),
        reflection: ReflectionConfig {
            resolution: 128,
            policy: RefreshPolicy::Once,
            palette: BackdropPalette::Indigo,
            animate_backdrop: false,
        },
        material: MaterialDesc::satin(),
        lights: card_lights(),
        camera: Camera {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 5.0),
            aspect: 1.0,
        },
        initial_size: UVec2::new(320, 320),
    }
}

/// Single spinning compact helix in chrome, reflecting a drifting banded
/// backdrop at high resolution.
pub fn chrome_helix() -> EngineConfig {
    EngineConfig {
        radius: 1.4,
        width_segments: 128,
        height_segments: 128,
        shapes: vec![Shape::CompactHelix],
        driver: DriverConfig::Timed {
            hold: 5.0,
            transition: 1.8,
            intro: 5.0,
        },
        motion: MotionConfig {
            spin: 0.3,
            ..MotionConfig::still()
        },
        pointer: PointerConfig::disabled(),
        breathing: None,
        reflection: ReflectionConfig {
            resolution: 512,
            policy: RefreshPolicy::EveryFrame,
            palette: BackdropPalette::Chrome,
            animate_backdrop: true,
        },
        material: MaterialDesc::chrome(),
        lights: chrome_lights(),
        camera: Camera {
            fov_degrees: 50.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 7.0),
            aspect: 1.0,
        },
        initial_size: UVec2::new(800, 600),
    }
}

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<EngineConfig> {
    match name {
        "hero_orb" | "hero" => Some(hero_orb()),
        "engage_steps" | "engage" => Some(engage_steps()),
        "chrome_helix" | "chrome" => Some(chrome_helix()),
        _ => None,
    }
}

pub const NAMES: [&str; 3] = ["hero_orb", "engage_steps", "chrome_helix"];
