//! Frame scheduling and the configurator's UI-facing surface.
//!
//! [`Configurator`] owns every component and advances them in a fixed order
//! once per frame. The host calls [`Configurator::tick`] from its render loop
//! and forwards pointer and window events in between.
//!
//! # Lifecycle Flow
//!
//! Each tick runs these steps:
//! 1. Install the newest completed model load, if any
//! 2. Hit test once with the latest pointer position
//! 3. Advance the door animations with that frame's hits
//! 4. Let the host's [`RenderSurface`] draw the mutated graph
//! 5. Account frame statistics
//!
//! Form controls edit the [`ConfigurationState`] through setters which apply
//! to the loaded model immediately and are re-applied whenever a new model is
//! installed.

use instant::{Duration, Instant};
use log::{debug, error, info, warn};
use winit::event::WindowEvent;

use crate::{
    config::{Axis, BodyPart, ConfigurationState, Dimensions, Feature, Settings},
    context::Context,
    data_structures::{mesh::Color, scene_graph::SceneGraph},
    door::DoorSet,
    error::ConfiguratorError,
    pick::{Intersection, hit_test},
    pointer::PointerState,
    registry::ModelRegistry,
    render::RenderSurface,
    resources::loader::{LoadOutcome, ModelLoader, ModelSource},
};

/// Initializes logging for the current platform.
///
/// Safe to call more than once; later calls only report that a logger exists.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            warn!("Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            warn!("Could not initialize logger: {}", e);
        }
    }
}

/// What happened during one [`Configurator::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSummary {
    pub hits: Vec<Intersection>,
    /// Part ids of the doors hovered this frame.
    pub hovered_doors: Vec<String>,
    pub model_loaded: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadStatus {
    pub fn message(&self) -> String {
        match self {
            LoadStatus::Idle | LoadStatus::Loading => "Loading model...".to_string(),
            LoadStatus::Loaded => "Model loaded successfully!".to_string(),
            LoadStatus::Failed(reason) => format!("Failed to load model: {}", reason),
        }
    }
}

#[derive(Debug)]
struct FrameStats {
    interval: Duration,
    frames: u32,
    since: Instant,
    fps: Option<f32>,
}

impl FrameStats {
    fn new(interval_millis: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_millis),
            frames: 0,
            since: Instant::now(),
            fps: None,
        }
    }

    fn record_frame(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= self.interval && !elapsed.is_zero() {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            debug!("{:.1} fps ({} frames in {:?})", fps, self.frames, elapsed);
            self.fps = Some(fps);
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

#[derive(Debug)]
pub struct Configurator {
    ctx: Context,
    settings: Settings,
    state: ConfigurationState,
    registry: ModelRegistry,
    doors: DoorSet,
    loader: ModelLoader,
    status: LoadStatus,
    stats: FrameStats,
}

impl Configurator {
    /// Creates a configurator for a render surface of `width` x `height` pixels.
    ///
    /// No model is loaded yet; see [`Configurator::load_default_model`].
    pub fn new(settings: Settings, width: u32, height: u32) -> Result<Self, ConfiguratorError> {
        settings.validate()?;
        let ctx = Context::new(&settings.camera, width, height);
        let registry = ModelRegistry::new(settings.parts.clone());
        let doors = DoorSet::new(&settings);
        let stats = FrameStats::new(settings.stats_interval_millis);
        Ok(Self {
            ctx,
            state: ConfigurationState::default(),
            registry,
            doors,
            loader: ModelLoader::new()?,
            status: LoadStatus::Idle,
            stats,
            settings,
        })
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &ConfigurationState {
        &self.state
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn doors(&self) -> &DoorSet {
        &self.doors
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn status_message(&self) -> String {
        self.status.message()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.registry.is_loaded()
    }

    /// Frames per second of the last completed statistics interval.
    pub fn fps(&self) -> Option<f32> {
        self.stats.fps
    }

    /**
     * Advances the configurator by one frame.
     *
     * Never fails: load errors end up in the status message, a degenerate
     * surface skips hit testing, render errors are logged.
     */
    pub fn tick(&mut self, surface: &mut dyn RenderSurface) -> FrameSummary {
        if let Some(outcome) = self.loader.poll() {
            self.finish_load(outcome);
        }

        let hits = match self.ctx.pointer_ndc() {
            Some(_) => hit_test(
                &self.ctx.pointer(),
                &self.ctx.camera,
                &self.ctx.projection,
                self.registry.scene(),
            ),
            None => Vec::new(),
        };
        let hovered_doors = self.doors.update(&mut self.registry, &hits);

        if let Err(e) = surface.render_frame(&self.ctx, self.registry.scene()) {
            error!("Unable to render {:#}", e);
        }
        self.stats.record_frame();

        FrameSummary {
            hits,
            hovered_doors,
            model_loaded: self.registry.is_loaded(),
        }
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) -> Result<PointerState, ConfiguratorError> {
        self.ctx.on_pointer_move(client_x, client_y)
    }

    pub fn on_pointer_leave(&mut self) {
        self.ctx.on_pointer_leave();
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    /// Forwards an event of the host's winit loop. Returns whether it was consumed.
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        self.ctx.on_window_event(event)
    }

    /// Starts loading the asset named in the settings.
    pub fn load_default_model(&mut self) -> u64 {
        self.request_model(ModelSource::Asset(self.settings.model.clone()))
    }

    /// Starts loading `source` in the background; it replaces the current model once decoded.
    pub fn request_model(&mut self, source: ModelSource) -> u64 {
        self.status = LoadStatus::Loading;
        self.loader.request(source)
    }

    /// Accepts a model file picked by the user.
    pub fn upload_model(&mut self, name: &str, data: Vec<u8>) -> Result<u64, ConfiguratorError> {
        let source = ModelSource::upload(name, data)?;
        Ok(self.request_model(source))
    }

    /// Blocks until the newest request finished or `timeout` passed. Returns whether a model is loaded.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait_for_model(&mut self, timeout: Duration) -> bool {
        if let Some(outcome) = self.loader.wait(timeout) {
            self.finish_load(outcome);
        }
        self.registry.is_loaded()
    }

    /**
     * Installs an already decoded model right away.
     *
     * Background loads still running are superseded. Returns the part bindings
     * that found no node in `scene`.
     */
    pub fn install_model(&mut self, scene: SceneGraph) -> Vec<ConfiguratorError> {
        if self.loader.is_loading() {
            let generation = self.loader.supersede();
            debug!("Pending model loads superseded by direct install (request {})", generation);
        }
        self.install_scene(scene)
    }

    fn install_scene(&mut self, scene: SceneGraph) -> Vec<ConfiguratorError> {
        let missing = self.registry.load(scene);
        self.apply_configuration();
        self.status = LoadStatus::Loaded;
        missing
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<(), ConfiguratorError> {
        let scale = self.state.set_dimensions(dimensions, self.settings.scaling)?;
        self.registry.apply_dimensions(scale);
        Ok(())
    }

    pub fn set_dimension(&mut self, axis: Axis, value: f32) -> Result<(), ConfiguratorError> {
        let scale = self.state.set_dimension(axis, value, self.settings.scaling)?;
        self.registry.apply_dimensions(scale);
        Ok(())
    }

    /// Accepts `#RRGGBB` or `#RGB`.
    pub fn set_part_color(&mut self, part: BodyPart, hex: &str) -> Result<(), ConfiguratorError> {
        let color = Color::from_hex(hex)?;
        self.state.set_color(part, color);
        // the body colour covers the whole model, so every part is repainted on top of it
        self.apply_colors();
        Ok(())
    }

    pub fn set_feature_enabled(&mut self, feature: Feature, enabled: bool) {
        self.state.set_feature(feature, enabled);
        self.apply_feature(feature);
    }

    /// Flips a feature and returns its new state.
    pub fn toggle_feature(&mut self, feature: Feature) -> bool {
        let enabled = !self.state.is_enabled(feature);
        self.set_feature_enabled(feature, enabled);
        enabled
    }

    pub fn dispose(self) {
        let Self {
            ctx,
            mut registry,
            loader,
            ..
        } = self;
        loader.shutdown();
        registry.clear();
        ctx.dispose();
        info!("Configurator disposed");
    }

    fn finish_load(&mut self, outcome: LoadOutcome) {
        match outcome.result {
            Ok(scene) => {
                info!("Model `{}` decoded ({} nodes)", outcome.origin, scene.len());
                self.install_scene(scene);
            }
            Err(e) => {
                error!("{}", e);
                let reason = match e {
                    ConfiguratorError::LoadFailure { reason, .. } => reason,
                    other => other.to_string(),
                };
                self.status = LoadStatus::Failed(reason);
            }
        }
    }

    fn apply_configuration(&mut self) {
        self.registry.apply_placement(&self.settings.placement);
        self.apply_colors();
        for feature in Feature::ALL {
            self.apply_feature(feature);
        }
        if let Some(scale) = self.state.scale() {
            self.registry.apply_dimensions(scale);
        }
    }

    fn apply_colors(&mut self) {
        for part in BodyPart::ALL {
            let (Some(color), Some(targets)) = (self.state.color(part), self.settings.color_targets.get(&part))
            else {
                continue;
            };
            for part_id in targets {
                self.registry.apply_color(part_id, color);
            }
        }
    }

    fn apply_feature(&mut self, feature: Feature) {
        let enabled = self.state.is_enabled(feature);
        if let Some(targets) = self.settings.feature_targets.get(&feature) {
            for part_id in targets {
                self.registry.apply_visibility(part_id, enabled);
            }
        }
    }
}
