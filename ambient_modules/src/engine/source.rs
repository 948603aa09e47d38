// src/engine/source.rs

use std::sync::Arc;

use crate::assets::AudioAsset;

/// Identifier for a playing source. Never reused within a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// Output bus a source is routed to. Bus 0 is the master bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BusId(pub usize);

impl BusId {
    pub const MASTER: BusId = BusId(0);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceOptions {
    pub looping: bool,
    /// Per-source gain, applied before the bus gain.
    pub gain: f32,
    pub bus: BusId,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            looping: false,
            gain: 1.0,
            bus: BusId::MASTER,
        }
    }
}

/// Playback cursor over a decoded asset.
pub struct Source {
    pub id: SourceId,
    pub bus: BusId,
    pub gain: f32,
    looping: bool,
    asset: Arc<AudioAsset>,
    /// Next frame to read.
    position: usize,
    finished: bool,
}

impl Source {
    pub fn new(id: SourceId, asset: Arc<AudioAsset>, opts: SourceOptions) -> Self {
        Self {
            id,
            bus: opts.bus,
            gain: opts.gain,
            looping: opts.looping,
            finished: asset.frames() == 0,
            asset,
            position: 0,
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// One-shots finish after their last frame; loops never do (unless
    /// the asset is empty).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn reference(&self) -> &str {
        &self.asset.reference
    }

    /// Write up to `dst.len() / channels` frames, scaled by the source gain.
    /// The remainder of `dst` is zeroed. Returns frames written.
    pub fn render_into(&mut self, dst: &mut [f32], channels: usize) -> usize {
        dst.fill(0.0);
        if self.finished || channels == 0 {
            return 0;
        }

        let total = self.asset.frames();
        let wanted = dst.len() / channels;
        let samples = &self.asset.samples;
        let mut written = 0;

        while written < wanted {
            if self.position >= total {
                if self.looping {
                    self.position = 0;
                } else {
                    self.finished = true;
                    break;
                }
            }

            let n = (wanted - written).min(total - self.position);
            let src = &samples[self.position * channels..(self.position + n) * channels];
            let out = &mut dst[written * channels..(written + n) * channels];
            for (o, s) in out.iter_mut().zip(src) {
                *o = s * self.gain;
            }

            self.position += n;
            written += n;
        }

        if !self.looping && self.position >= total {
            self.finished = true;
        }
        written
    }
}
