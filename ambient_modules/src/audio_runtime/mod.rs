// src/audio_runtime/mod.rs

pub mod overlay;
pub mod scheduler;

pub use overlay::Fade;
pub use scheduler::{Fire, RepeatingTask};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::assets::{AssetCache, AssetSource, AudioAsset};
use crate::audio::{OpenedOutput, OutputBackend};
use crate::config::EngineConfig;
use crate::engine::{BusId, OutputFormat, SharedGraph, SourceOptions};
use crate::error::Result;
use crate::scene::{SceneCatalog, SceneId, SecondaryLayer};
use crate::session::{EngineSnapshot, EngineState, PlaybackSession};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The ambient soundscape engine: one base scene with its secondary
/// layers, plus the fireplace overlay.
///
/// Cheap to clone; clones share the same engine. Operations must run
/// inside a tokio runtime.
#[derive(Clone)]
pub struct AudioEngine {
    inner: Arc<Inner>,
}

struct Inner {
    config: EngineConfig,
    catalog: SceneCatalog,
    backend: Box<dyn OutputBackend>,
    assets: AssetCache,
    output: Mutex<Option<OpenedOutput>>,
    session: Mutex<PlaybackSession>,
    rng: Mutex<StdRng>,
}

impl AudioEngine {
    pub fn new(config: EngineConfig, backend: impl OutputBackend + 'static, source: Arc<dyn AssetSource>) -> Result<Self> {
        let catalog = match config.asset_extension.as_deref() {
            Some(ext) => SceneCatalog::standard().with_asset_extension(ext),
            None => SceneCatalog::standard(),
        };
        Self::with_catalog(config, catalog, backend, source)
    }

    pub fn with_catalog(
        config: EngineConfig,
        catalog: SceneCatalog,
        backend: impl OutputBackend + 'static,
        source: Arc<dyn AssetSource>,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let session = PlaybackSession::new(config.initial_volume);

        Ok(Self {
            inner: Arc::new(Inner {
                catalog,
                backend: Box::new(backend),
                assets: AssetCache::new(source),
                output: Mutex::new(None),
                session: Mutex::new(session),
                rng: Mutex::new(rng),
                config,
            }),
        })
    }

    fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.inner.catalog
    }

    fn session(&self) -> MutexGuard<'_, PlaybackSession> {
        lock(&self.inner.session)
    }

    /// The live graph, once the output has been opened.
    pub fn graph(&self) -> Option<SharedGraph> {
        lock(&self.inner.output).as_ref().map(|o| o.graph.clone())
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.graph().map(|g| lock(&g).format())
    }

    /// Open the output if needed and make sure it is running. Idempotent.
    pub async fn initialize(&self) -> Result<()> {
        let volume = self.session().volume;
        let mut output = lock(&self.inner.output);

        if let Some(opened) = output.as_ref() {
            if !opened.stream.is_running() {
                opened.stream.resume()?;
            }
            return Ok(());
        }

        let opened = self.inner.backend.open(volume)?;
        let format = {
            let mut graph = lock(&opened.graph);
            let format = graph.format();
            // One frame of silence so platforms that gate output on first
            // playback let the stream through.
            graph.start_source(Arc::new(AudioAsset::silence(format, 1)), SourceOptions::default());
            format
        };
        info!(
            backend = self.inner.backend.name(),
            sample_rate = format.sample_rate,
            channels = format.channels,
            "audio output ready"
        );
        *output = Some(opened);
        Ok(())
    }

    /// Switch scenes. Does nothing when `scene` is already selected. When
    /// playing, the previous base layer and its timers are torn down before
    /// the new scene starts; the overlay is left alone.
    pub async fn set_scene(&self, scene: SceneId) {
        let generation = {
            let mut session = self.session();
            if session.scene == scene {
                return;
            }
            let previous = std::mem::replace(&mut session.scene, scene);
            let generation = session.next_generation();
            self.teardown_base(&mut session);
            info!(%previous, %scene, "scene changed");
            session.playing.then_some(generation)
        };

        if let Some(generation) = generation {
            self.start_scene(scene, generation).await;
        }
    }

    /// Start the current scene. Does nothing when already playing.
    pub async fn play(&self) {
        if let Err(e) = self.initialize().await {
            warn!(error = %e, "audio output unavailable, staying stopped");
            return;
        }

        let (scene, generation) = {
            let mut session = self.session();
            if session.playing {
                return;
            }
            session.playing = true;
            (session.scene, session.generation)
        };
        info!(%scene, "playing");
        self.start_scene(scene, generation).await;
    }

    /// Stop everything: base layer, pending secondary triggers and the
    /// overlay (without a fade).
    pub fn stop(&self) {
        {
            let mut session = self.session();
            session.playing = false;
            session.next_generation();
            self.teardown_base(&mut session);
        }
        self.disable_overlay_with(Fade::Immediate);
        info!("stopped");
    }

    /// Play when stopped, stop when playing. Returns the new playing flag.
    pub async fn toggle(&self) -> bool {
        if self.is_playing() {
            self.stop();
        } else {
            self.play().await;
        }
        self.is_playing()
    }

    /// Set the master volume, clamped to 0..=1. The overlay follows at its
    /// presence level when active.
    pub fn set_volume(&self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        let mut session = self.session();
        session.volume = volume;

        let Some(graph) = self.graph() else { return };
        let mut graph = lock(&graph);
        if let Some(gain) = graph.bus_gain_mut(BusId::MASTER) {
            gain.set_value(volume);
        }
        if session.overlay.active {
            if let Some(gain) = session.overlay.bus.and_then(|bus| graph.bus_gain_mut(bus)) {
                gain.set_value(volume * self.inner.config.overlay_presence);
            }
        }
        debug!(volume, "volume set");
    }

    pub fn get_state(&self) -> EngineState {
        self.session().state()
    }

    pub fn is_playing(&self) -> bool {
        self.session().playing
    }

    pub fn scene(&self) -> SceneId {
        self.session().scene
    }

    pub fn volume(&self) -> f32 {
        self.session().volume
    }

    pub fn available_scenes(&self) -> &'static [SceneId] {
        &SceneId::ALL
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let session = self.session();
        let graph = self.graph();
        let graph = graph.as_ref().map(|g| lock(g));

        let live = |id: Option<crate::engine::SourceId>| match (&graph, id) {
            (Some(g), Some(id)) => g.is_live(id),
            _ => false,
        };

        EngineSnapshot {
            state: session.state(),
            live_sources: graph.as_ref().map_or(0, |g| g.live_sources()),
            one_shots_live: graph
                .as_ref()
                .map_or(0, |g| g.sources().iter().filter(|s| !s.is_looping()).count()),
            sources_started: graph.as_ref().map_or(0, |g| g.started_total()),
            pending_timers: session.pending_timers(),
            cached_assets: self.inner.assets.cached(),
            base_source_live: live(session.base_source),
            overlay_source_live: live(session.overlay.source),
            graph_time: graph.as_ref().map_or(0.0, |g| g.current_time()),
        }
    }

    /// Stop the base source and abort the secondary timers.
    fn teardown_base(&self, session: &mut PlaybackSession) {
        if let Some(id) = session.base_source.take() {
            if let Some(graph) = self.graph() {
                if !lock(&graph).stop_source(id) {
                    debug!(?id, "base source was already stopped");
                }
            }
        }
        let aborted = session.clear_secondary();
        if aborted > 0 {
            debug!(aborted, "secondary timers cleared");
        }
    }

    async fn start_scene(&self, scene: SceneId, generation: u64) {
        let Some(definition) = self.inner.catalog.definition(scene).cloned() else {
            debug!(%scene, "scene has no layers");
            return;
        };
        let Some(graph) = self.graph() else { return };
        let format = lock(&graph).format();

        if let Some(asset) = self.inner.assets.load(&definition.base.asset, format).await {
            let mut session = self.session();
            if session.is_current(generation) && session.base_source.is_none() {
                let opts = SourceOptions {
                    looping: true,
                    gain: definition.base.volume,
                    bus: BusId::MASTER,
                };
                session.base_source = Some(lock(&graph).start_source(asset, opts));
            } else {
                debug!(%scene, "scene superseded while loading");
                return;
            }
        }

        for layer in definition.secondary {
            self.schedule_secondary(layer, generation);
        }
    }

    fn schedule_secondary(&self, layer: SecondaryLayer, generation: u64) {
        let mut min = layer.min_interval.unwrap_or_else(|| self.inner.config.min_interval());
        let mut max = layer.max_interval.unwrap_or_else(|| self.inner.config.max_interval());
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }

        let delay_handle = self.downgrade();
        let fire_handle = self.downgrade();
        let label = layer.asset.clone();
        let task = RepeatingTask::spawn(
            label,
            move || {
                delay_handle
                    .upgrade()
                    .map_or(min, |inner| Self::from_inner(inner).random_delay(min, max))
            },
            move || {
                let handle = fire_handle.clone();
                let layer = layer.clone();
                async move {
                    match handle.upgrade() {
                        Some(inner) => Self::from_inner(inner).trigger_secondary(&layer, generation).await,
                        None => Fire::Stop,
                    }
                }
            },
        );

        let mut session = self.session();
        if session.is_current(generation) {
            session.secondary.push(task);
        }
    }

    async fn trigger_secondary(&self, layer: &SecondaryLayer, generation: u64) -> Fire {
        if !self.session().is_current(generation) {
            return Fire::Stop;
        }
        let Some(graph) = self.graph() else { return Fire::Rearm };
        let format = lock(&graph).format();

        let Some(asset) = self.inner.assets.load(&layer.asset, format).await else {
            debug!(asset = %layer.asset, "secondary trigger skipped");
            return Fire::Rearm;
        };

        let gain = layer.volume * self.jitter_factor();
        let session = self.session();
        if !session.is_current(generation) {
            return Fire::Stop;
        }
        let opts = SourceOptions {
            looping: false,
            gain,
            bus: BusId::MASTER,
        };
        let id = lock(&graph).start_source(asset, opts);
        debug!(asset = %layer.asset, ?id, gain, "secondary triggered");
        Fire::Rearm
    }

    fn random_delay(&self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let secs = lock(&self.inner.rng).random_range(min.as_secs_f64()..=max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    fn jitter_factor(&self) -> f32 {
        let jitter = self.inner.config.volume_jitter;
        if jitter <= 0.0 {
            return 1.0;
        }
        lock(&self.inner.rng).random_range(1.0 - jitter..=1.0 + jitter)
    }
}
