// src/session/mod.rs

pub mod export;

use serde::Serialize;
use tracing::debug;

use crate::audio_runtime::scheduler::RepeatingTask;
use crate::engine::{BusId, SourceId};
use crate::scene::SceneId;

/// Fireplace overlay bookkeeping.
#[derive(Debug, Default)]
pub struct OverlayState {
    pub active: bool,
    pub source: Option<SourceId>,
    /// Created on first enable and reused afterwards.
    pub bus: Option<BusId>,
    /// Bumped on every disable so an enable that is still loading can tell
    /// it was cancelled.
    pub epoch: u64,
}

/// Mutable playback state of the engine.
#[derive(Debug)]
pub struct PlaybackSession {
    pub scene: SceneId,
    pub playing: bool,
    pub volume: f32,
    pub base_source: Option<SourceId>,
    pub secondary: Vec<RepeatingTask>,
    pub overlay: OverlayState,
    /// Bumped whenever the running scene is torn down. Work started under
    /// an older generation must not touch the graph.
    pub generation: u64,
}

impl PlaybackSession {
    pub fn new(volume: f32) -> Self {
        Self {
            scene: SceneId::default(),
            playing: false,
            volume,
            base_source: None,
            secondary: Vec::new(),
            overlay: OverlayState::default(),
            generation: 0,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.playing && self.generation == generation
    }

    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Abort every secondary timer. Returns how many were still pending.
    pub fn clear_secondary(&mut self) -> usize {
        let pending = self.pending_timers();
        for task in self.secondary.drain(..) {
            debug!(layer = task.label(), "secondary timer aborted");
            task.abort();
        }
        pending
    }

    pub fn pending_timers(&self) -> usize {
        self.secondary.iter().filter(|t| !t.is_finished()).count()
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            scene: self.scene,
            is_playing: self.playing,
            volume: self.volume,
            overlay_active: self.overlay.active,
        }
    }
}

/// Externally visible engine state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineState {
    pub scene: SceneId,
    pub is_playing: bool,
    pub volume: f32,
    pub overlay_active: bool,
}

/// Debug view of the graph and scheduler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub live_sources: usize,
    /// Live non-looping sources: secondary one-shots still sounding.
    pub one_shots_live: usize,
    pub sources_started: u64,
    pub pending_timers: usize,
    pub cached_assets: usize,
    pub base_source_live: bool,
    pub overlay_source_live: bool,
    /// Graph clock in seconds; zero before the output is opened.
    pub graph_time: f64,
}
