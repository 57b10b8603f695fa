use glam::{EulerRot, Mat4, Vec3};
use log::{Level, LevelFilter, Log, Metadata, Record};
use morph_core::engine::{FrameOutcome, MorphEngine};
use morph_core::renderer::{EnvironmentCapture, FrameView, ReflectionMap, Renderer};
use morph_core::{presets, EngineConfig};
use wasm_bindgen::prelude::*;

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg: JsValue = format!("[{}] {}", record.target(), record.args()).into();
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route engine logs to the console. Safe to call more than once.
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    // A second call only adjusts the level
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
}

/// Environment capture the page has to perform before the next draw.
#[derive(Clone, Copy, Debug)]
struct CaptureRequest {
    map: ReflectionMap,
    origin: Vec3,
}

const CUBE_TARGET_ID: u32 = 1;

/// Renderer half that lives on the Rust side: records what the page must
/// draw and hands out reflection-map ids for the page's cube targets.
#[derive(Default)]
struct HostRenderer {
    model: [f32; 16],
    view: [f32; 16],
    projection: [f32; 16],
    backdrop_model: [f32; 16],
    pending_capture: Option<CaptureRequest>,
    draws: u64,
}

impl Renderer for HostRenderer {
    fn capture_environment(&mut self, capture: &EnvironmentCapture<'_>) -> ReflectionMap {
        // One cube target per canvas, reused for every refresh
        let map = ReflectionMap {
            id: CUBE_TARGET_ID,
            resolution: capture.resolution,
        };
        let r = capture.backdrop.rotation;
        self.backdrop_model =
            Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z).to_cols_array();
        self.pending_capture = Some(CaptureRequest {
            map,
            origin: capture.origin,
        });
        map
    }

    fn draw(&mut self, frame: &FrameView<'_>) {
        self.model = frame.transform.matrix().to_cols_array();
        self.view = frame.camera.view().to_cols_array();
        self.projection = frame.camera.projection().to_cols_array();
        self.draws += 1;
    }
}

#[wasm_bindgen]
pub struct MorphCanvas {
    engine: MorphEngine,
    host: HostRenderer,
}

#[wasm_bindgen]
impl MorphCanvas {
    /// Build a canvas from a named preset (`hero_orb`, `engage_steps`,
    /// `chrome_helix`). An error means the feature is absent for this page.
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str) -> Result<MorphCanvas, JsValue> {
        let config = presets::by_name(preset)
            .ok_or_else(|| JsValue::from_str(&format!("unknown preset `{preset}`")))?;
        Self::build(config)
    }

    /// Build a canvas from a JSON `EngineConfig`.
    pub fn from_json(json: &str) -> Result<MorphCanvas, JsValue> {
        let config = EngineConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::build(config)
    }

    /// Advance and record one frame. Returns `false` when the canvas was
    /// off screen and nothing changed.
    pub fn tick(&mut self, time: f32) -> bool {
        matches!(self.engine.tick(time, &mut self.host), FrameOutcome::Rendered(_))
    }

    pub fn set_visible(&self, visible: bool) {
        self.engine.set_visible(visible);
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.engine.set_pointer(x, y);
    }

    pub fn set_active_step(&mut self, index: usize) -> bool {
        self.engine.set_target_step(index)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width, height);
    }

    pub fn vertex_count(&self) -> usize {
        self.engine.mesh().vertex_count()
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.engine.mesh().position_floats().as_ptr()
    }

    pub fn normals_ptr(&self) -> *const f32 {
        self.engine.mesh().normal_floats().as_ptr()
    }

    /// Float count of the position and normal buffers.
    pub fn attribute_len(&self) -> usize {
        self.engine.mesh().position_floats().len()
    }

    pub fn indices_ptr(&self) -> *const u32 {
        self.engine.mesh().indices().as_ptr()
    }

    pub fn indices_len(&self) -> usize {
        self.engine.mesh().indices().len()
    }

    pub fn model_matrix_ptr(&self) -> *const f32 {
        self.host.model.as_ptr()
    }

    pub fn view_matrix_ptr(&self) -> *const f32 {
        self.host.view.as_ptr()
    }

    pub fn projection_matrix_ptr(&self) -> *const f32 {
        self.host.projection.as_ptr()
    }

    pub fn backdrop_positions_ptr(&self) -> *const f32 {
        self.engine.backdrop().mesh().position_floats().as_ptr()
    }

    pub fn backdrop_colors_ptr(&self) -> *const f32 {
        self.engine.backdrop().color_floats().as_ptr()
    }

    /// Length in floats of both backdrop position and colour buffers.
    pub fn backdrop_attribute_len(&self) -> usize {
        self.engine.backdrop().attribute_len()
    }

    pub fn backdrop_indices_ptr(&self) -> *const u32 {
        self.engine.backdrop().mesh().indices().as_ptr()
    }

    pub fn backdrop_indices_len(&self) -> usize {
        self.engine.backdrop().mesh().indices().len()
    }

    pub fn backdrop_model_matrix_ptr(&self) -> *const f32 {
        self.host.backdrop_model.as_ptr()
    }

    /// Cube resolution of an outstanding capture, 0 when none is pending.
    pub fn pending_capture_resolution(&self) -> u32 {
        self.host.pending_capture.map_or(0, |c| c.map.resolution)
    }

    /// `[x, y, z]` of the outstanding capture origin.
    pub fn pending_capture_origin(&self) -> js_sys::Float32Array {
        let origin = self.host.pending_capture.map_or(Vec3::ZERO, |c| c.origin);
        js_sys::Float32Array::from(origin.to_array().as_slice())
    }

    /// The page calls this once the cube target is rendered.
    pub fn complete_capture(&mut self) {
        self.host.pending_capture = None;
    }

    pub fn reflection_map_id(&self) -> u32 {
        self.engine.material().env_map.map_or(0, |m| m.id)
    }

    pub fn current_shape(&self) -> String {
        let state = self.engine.state();
        self.engine
            .shape_at(state.current)
            .map_or_else(String::new, |s| s.name().to_string())
    }

    pub fn blend(&self) -> f32 {
        self.engine.state().blend
    }

    pub fn frames_rendered(&self) -> f64 {
        self.engine.stats().frames_rendered as f64
    }

    pub fn frames_skipped(&self) -> f64 {
        self.engine.stats().frames_skipped as f64
    }

    pub fn draw_count(&self) -> f64 {
        self.host.draws as f64
    }
}

impl MorphCanvas {
    fn build(config: EngineConfig) -> Result<MorphCanvas, JsValue> {
        let engine = MorphEngine::new(config).map_err(|e| {
            log::error!("morph canvas unavailable: {}", e);
            JsValue::from_str(&e.to_string())
        })?;
        web_sys::console::log_1(
            &format!("WASM MorphCanvas created: {} vertices", engine.mesh().vertex_count()).into(),
        );
        Ok(MorphCanvas {
            engine,
            host: HostRenderer::default(),
        })
    }
}
