// src/engine/mod.rs

pub mod gain;
pub mod mixer;
pub mod source;

pub use gain::{GainParam, LinearRamp};
pub use mixer::Mixer;
pub use source::{BusId, Source, SourceId, SourceOptions};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assets::AudioAsset;

/// Sample rate and channel count every asset is converted to before it
/// reaches the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl OutputFormat {
    pub fn channels(&self) -> usize {
        self.channels as usize
    }
}

/// Graph shared between the engine and the output callback.
pub type SharedGraph = Arc<Mutex<Graph>>;

/// The audio graph: a set of buses (master first) and the sources playing
/// into them. Every bus feeds the output directly.
pub struct Graph {
    format: OutputFormat,
    buses: Vec<GainParam>,
    sources: Vec<Source>,
    mixer: Mixer,
    next_source: u64,
    frames_rendered: u64,
}

impl Graph {
    pub fn new(format: OutputFormat, master_gain: f32) -> Self {
        Self {
            format,
            buses: vec![GainParam::new(master_gain)],
            sources: Vec::new(),
            mixer: Mixer::new(format.channels()),
            next_source: 0,
            frames_rendered: 0,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Graph clock in seconds, advanced by rendering.
    pub fn current_time(&self) -> f64 {
        self.frames_rendered as f64 / self.format.sample_rate as f64
    }

    pub fn create_bus(&mut self, gain: f32) -> BusId {
        self.buses.push(GainParam::new(gain));
        BusId(self.buses.len() - 1)
    }

    pub fn bus_gain(&self, bus: BusId) -> Option<&GainParam> {
        self.buses.get(bus.0)
    }

    pub fn bus_gain_mut(&mut self, bus: BusId) -> Option<&mut GainParam> {
        self.buses.get_mut(bus.0)
    }

    /// Ramp a bus from its current level to `to`, starting now.
    pub fn ramp_bus(&mut self, bus: BusId, to: f32, duration: Duration) -> bool {
        let now = self.current_time();
        match self.buses.get_mut(bus.0) {
            Some(gain) => {
                let from = gain.value_at(now);
                gain.linear_ramp(from, to, now, duration.as_secs_f64());
                true
            }
            None => false,
        }
    }

    pub fn start_source(&mut self, asset: Arc<AudioAsset>, opts: SourceOptions) -> SourceId {
        self.next_source += 1;
        let id = SourceId(self.next_source);
        self.sources.push(Source::new(id, asset, opts));
        id
    }

    /// Stop and remove a source. Returns `false` when it already finished
    /// or was stopped before.
    pub fn stop_source(&mut self, id: SourceId) -> bool {
        match self.sources.iter().position(|s| s.id == id) {
            Some(pos) => {
                self.sources.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_live(&self, id: SourceId) -> bool {
        self.sources.iter().any(|s| s.id == id)
    }

    pub fn live_sources(&self) -> usize {
        self.sources.len()
    }

    /// Sources started over the graph's lifetime.
    pub fn started_total(&self) -> u64 {
        self.next_source
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Fill an interleaved block and advance the clock. Finished one-shots
    /// are dropped afterwards.
    pub fn render(&mut self, out: &mut [f32]) {
        let channels = self.format.channels();
        if channels == 0 {
            out.fill(0.0);
            return;
        }
        let frames = out.len() / channels;
        let start_time = self.current_time();

        self.mixer.begin_block(frames, self.buses.len());
        for source in &mut self.sources {
            self.mixer.render_source(source, frames);
        }
        self.mixer.mix_into(out, &self.buses, start_time, self.format.sample_rate);

        self.sources.retain(|s| !s.is_finished());
        self.frames_rendered += frames as u64;

        let now = self.current_time();
        for gain in &mut self.buses {
            gain.settle(now);
        }
    }

    /// Render `duration` of audio into a fresh interleaved buffer, in
    /// blocks of `block_frames`.
    pub fn render_for(&mut self, duration: Duration, block_frames: usize) -> Vec<f32> {
        let channels = self.format.channels();
        let total_frames = (duration.as_secs_f64() * self.format.sample_rate as f64).round() as usize;
        let mut out = vec![0.0f32; total_frames * channels];
        for block in out.chunks_mut(block_frames.max(1) * channels.max(1)) {
            self.render(block);
        }
        out
    }
}
