// src/session/export.rs

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use crate::audio_runtime::lock;
use crate::engine::SharedGraph;

const BLOCK_FRAMES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSummary {
    pub frames: u64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Largest absolute sample value written, before quantization.
    pub peak: f32,
}

/// Render `duration` of the graph into a 16-bit WAV file.
///
/// The graph clock advances while rendering, so only use this on a graph
/// that no device is pulling from.
pub fn render_to_wav(graph: &SharedGraph, duration: Duration, output_path: impl AsRef<Path>) -> Result<ExportSummary> {
    let output_path = output_path.as_ref();
    let mut graph = lock(graph);
    let format = graph.format();
    let channels = format.channels();

    let spec = WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output_path, spec)
        .with_context(|| format!("creating {}", output_path.display()))?;

    let total_frames = (duration.as_secs_f64() * format.sample_rate as f64).round() as u64;
    let mut block = vec![0.0f32; BLOCK_FRAMES * channels];
    let mut written = 0u64;
    let mut peak = 0.0f32;

    while written < total_frames {
        let frames = (total_frames - written).min(BLOCK_FRAMES as u64) as usize;
        let buf = &mut block[..frames * channels];
        graph.render(buf);

        for &s in buf.iter() {
            peak = peak.max(s.abs());
            let sample = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(sample)?;
        }
        written += frames as u64;
    }
    writer.finalize()?;

    info!(
        path = %output_path.display(),
        frames = written,
        seconds = duration.as_secs_f32(),
        "export finished"
    );

    Ok(ExportSummary {
        frames: written,
        sample_rate: format.sample_rate,
        channels: format.channels,
        peak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AudioAsset;
    use crate::engine::{Graph, OutputFormat, SourceOptions};
    use std::sync::{Arc, Mutex};

    #[test]
    fn writes_requested_length() {
        let format = OutputFormat { sample_rate: 8_000, channels: 2 };
        let mut graph = Graph::new(format, 1.0);
        let tone = AudioAsset::new("tone", vec![0.5; 200 * 2], format);
        graph.start_source(Arc::new(tone), SourceOptions { looping: true, ..Default::default() });
        let graph = Arc::new(Mutex::new(graph));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let summary = render_to_wav(&graph, Duration::from_millis(500), &path).unwrap();
        assert_eq!(summary.frames, 4_000);
        assert!((summary.peak - 0.5f32.tanh()).abs() < 1e-6);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.duration(), 4_000);
    }
}
