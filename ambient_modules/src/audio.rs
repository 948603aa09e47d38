// src/audio.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SizedSample, Stream, StreamConfig};
use tracing::{info, warn};

use crate::engine::{Graph, OutputFormat, SharedGraph};
use crate::error::{EngineError, Result};

/// A running (or suspended) output that pulls from the graph.
pub trait OutputStream: Send {
    fn resume(&self) -> Result<()>;
    fn is_running(&self) -> bool;
}

pub struct OpenedOutput {
    pub graph: SharedGraph,
    pub stream: Box<dyn OutputStream>,
}

/// Something that can host the audio graph.
pub trait OutputBackend: Send + Sync {
    /// Create a graph in the backend's format and start pulling from it.
    fn open(&self, master_gain: f32) -> Result<OpenedOutput>;

    fn name(&self) -> &'static str;
}

/// Helper struct to hold output device info
pub struct OutputConfig {
    pub device: Device,
    pub config: StreamConfig,
    pub sample_format: SampleFormat,
    pub output_channels: usize,
    pub output_sample_rate: u32,
}

/// Finds the default audio output device and its config.
pub fn setup_output_device() -> Result<OutputConfig> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(EngineError::OutputUnavailable)?;
    let supported_config = device
        .default_output_config()
        .map_err(|e| EngineError::OutputConfig(e.to_string()))?;
    let sample_format = supported_config.sample_format();
    let config = supported_config.config();
    let output_channels = config.channels as usize;
    let output_sample_rate = config.sample_rate.0;

    info!(
        device = device.name().unwrap_or_else(|_| "<unnamed>".into()),
        channels = output_channels,
        sample_rate = output_sample_rate,
        "output device selected"
    );

    Ok(OutputConfig {
        device,
        config,
        sample_format,
        output_channels,
        output_sample_rate,
    })
}

/// Build a CPAL output stream that renders the graph. The graph renders at
/// most two channels; extra device channels are silent.
pub fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    graph: SharedGraph,
    graph_channels: usize,
) -> Result<Stream>
where
    T: SizedSample + cpal::FromSample<f32>,
{
    let device_channels = config.channels as usize;
    let mut scratch: Vec<f32> = Vec::with_capacity(4096);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / device_channels;
                scratch.resize(frames * graph_channels, 0.0);

                match graph.lock() {
                    Ok(mut g) => g.render(&mut scratch),
                    Err(_) => scratch.fill(0.0),
                }

                for (frame, src) in data
                    .chunks_mut(device_channels)
                    .zip(scratch.chunks(graph_channels))
                {
                    for (i, out) in frame.iter_mut().enumerate() {
                        *out = T::from_sample(src.get(i).copied().unwrap_or(0.0));
                    }
                }
            },
            |err| warn!(error = %err, "output stream error"),
            None,
        )
        .map_err(|e| EngineError::StreamBuild(e.to_string()))
}

fn start_device_stream(master_gain: f32) -> Result<(Stream, SharedGraph)> {
    let output = setup_output_device()?;
    let graph_channels = output.output_channels.clamp(1, 2);
    let format = OutputFormat {
        sample_rate: output.output_sample_rate,
        channels: graph_channels as u16,
    };
    let graph = Arc::new(Mutex::new(Graph::new(format, master_gain)));

    let stream = match output.sample_format {
        SampleFormat::F32 => build_stream::<f32>(&output.device, &output.config, graph.clone(), graph_channels)?,
        SampleFormat::I16 => build_stream::<i16>(&output.device, &output.config, graph.clone(), graph_channels)?,
        SampleFormat::U16 => build_stream::<u16>(&output.device, &output.config, graph.clone(), graph_channels)?,
        other => {
            return Err(EngineError::OutputConfig(format!("unsupported sample format {other:?}")));
        }
    };
    stream.play().map_err(|e| EngineError::StreamPlay(e.to_string()))?;
    Ok((stream, graph))
}

enum StreamCmd {
    Play,
    Close,
}

/// Default system output through cpal.
///
/// `cpal::Stream` is not `Send` on every platform, so the stream is built
/// and owned by a dedicated thread for its whole life.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

struct CpalStream {
    cmd_tx: mpsc::Sender<StreamCmd>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl OutputBackend for CpalBackend {
    fn open(&self, master_gain: f32) -> Result<OpenedOutput> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<SharedGraph>>();
        let (cmd_tx, cmd_rx) = mpsc::channel::<StreamCmd>();
        let running = Arc::new(AtomicBool::new(false));
        let running_thread = running.clone();

        let handle = thread::Builder::new()
            .name("audio-output".into())
            .spawn(move || {
                let (stream, graph) = match start_device_stream(master_gain) {
                    Ok(started) => started,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                running_thread.store(true, Ordering::SeqCst);
                let _ = ready_tx.send(Ok(graph));

                while let Ok(cmd) = cmd_rx.recv() {
                    match cmd {
                        StreamCmd::Play => match stream.play() {
                            Ok(()) => running_thread.store(true, Ordering::SeqCst),
                            Err(e) => warn!(error = %e, "failed to resume output stream"),
                        },
                        StreamCmd::Close => break,
                    }
                }
                running_thread.store(false, Ordering::SeqCst);
            })?;

        let graph = ready_rx
            .recv()
            .map_err(|_| EngineError::StreamBuild("output thread exited during setup".into()))??;

        Ok(OpenedOutput {
            graph,
            stream: Box::new(CpalStream {
                cmd_tx,
                running,
                thread: Some(handle),
            }),
        })
    }

    fn name(&self) -> &'static str {
        "cpal"
    }
}

impl OutputStream for CpalStream {
    fn resume(&self) -> Result<()> {
        self.cmd_tx
            .send(StreamCmd::Play)
            .map_err(|_| EngineError::StreamPlay("output thread is gone".into()))
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(StreamCmd::Close);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// A graph with no device behind it. Nothing pulls from it in real time;
/// callers render it themselves (offline export, tests).
#[derive(Debug, Clone, Copy)]
pub struct HeadlessBackend {
    pub format: OutputFormat,
}

impl HeadlessBackend {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

struct HeadlessStream {
    running: AtomicBool,
}

impl OutputBackend for HeadlessBackend {
    fn open(&self, master_gain: f32) -> Result<OpenedOutput> {
        if self.format.sample_rate == 0 || self.format.channels == 0 {
            return Err(EngineError::InvalidConfig(format!("unusable headless format {:?}", self.format)));
        }
        Ok(OpenedOutput {
            graph: Arc::new(Mutex::new(Graph::new(self.format, master_gain))),
            stream: Box::new(HeadlessStream {
                running: AtomicBool::new(true),
            }),
        })
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}

impl OutputStream for HeadlessStream {
    fn resume(&self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_opens_graph_in_requested_format() {
        let format = OutputFormat { sample_rate: 16_000, channels: 1 };
        let opened = HeadlessBackend::new(format).open(0.5).unwrap();
        assert!(opened.stream.is_running());
        let graph = opened.graph.lock().unwrap();
        assert_eq!(graph.format(), format);
        assert_eq!(graph.bus_gain(crate::engine::BusId::MASTER).unwrap().target(), 0.5);
    }

    #[test]
    fn headless_rejects_zero_channels() {
        let format = OutputFormat { sample_rate: 16_000, channels: 0 };
        assert!(matches!(
            HeadlessBackend::new(format).open(1.0),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
