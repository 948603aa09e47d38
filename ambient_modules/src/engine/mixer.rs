// src/engine/mixer.rs

use super::gain::GainParam;
use super::source::Source;

/// Per-bus accumulation buffers for one render block.
pub struct Mixer {
    channels: usize,
    bus_buffers: Vec<Vec<f32>>,
    scratch_buffer: Vec<f32>,
}

impl Mixer {
    pub fn new(channels: usize) -> Self {
        let initial_capacity = 2048 * channels;
        Self {
            channels,
            bus_buffers: Vec::new(),
            scratch_buffer: Vec::with_capacity(initial_capacity),
        }
    }

    pub fn begin_block(&mut self, frames: usize, buses: usize) {
        let needed = frames * self.channels;
        if self.bus_buffers.len() < buses {
            self.bus_buffers.resize_with(buses, Vec::new);
        }
        for buf in &mut self.bus_buffers[..buses] {
            buf.resize(needed, 0.0);
            buf.fill(0.0);
        }
        if self.scratch_buffer.len() < needed {
            self.scratch_buffer.resize(needed, 0.0);
        }
    }

    /// Render one source and add it to its bus. Sources routed to an
    /// unknown bus are advanced but not heard.
    pub fn render_source(&mut self, source: &mut Source, frames: usize) {
        let total_samples = frames * self.channels;
        let written = source.render_into(&mut self.scratch_buffer[..total_samples], self.channels);

        let Some(bus) = self.bus_buffers.get_mut(source.bus.0) else {
            return;
        };
        let samples = written * self.channels;
        for (acc, s) in bus[..samples].iter_mut().zip(&self.scratch_buffer[..samples]) {
            *acc += s;
        }
    }

    /// Sum every bus into `out` under its (possibly ramping) gain, then
    /// soft-clip. `start_time` is the graph clock at the first frame.
    pub fn mix_into(&self, out: &mut [f32], gains: &[GainParam], start_time: f64, sample_rate: u32) {
        let channels = self.channels;
        let frames = out.len() / channels;
        out.fill(0.0);

        for (buf, gain) in self.bus_buffers.iter().zip(gains) {
            for f in 0..frames.min(buf.len() / channels) {
                let t = start_time + f as f64 / sample_rate as f64;
                let g = gain.value_at(t);
                if g == 0.0 {
                    continue;
                }
                let base = f * channels;
                for ch in 0..channels {
                    out[base + ch] += buf[base + ch] * g;
                }
            }
        }

        for sample in out.iter_mut() {
            *sample = if sample.abs() < 1e-10 { 0.0 } else { sample.tanh() };
        }
    }
}
