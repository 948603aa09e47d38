// src/decoder/mod.rs

pub mod dsp;
pub mod resample;

use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::debug;

use crate::engine::OutputFormat;
use crate::error::AssetError;

/// Interleaved f32 PCM at the file's own rate and channel count.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }
}

/// Decode an encoded file held in memory. The reference's extension is
/// passed to the probe as a hint.
pub fn decode_bytes(reference: &str, bytes: Vec<u8>) -> Result<DecodedAudio, AssetError> {
    let decode_err = |reason: String| AssetError::Decode {
        reference: reference.to_string(),
        reason,
    };

    let mut hint = Hint::new();
    if let Some(ext) = Path::new(reference).extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
    let probed = get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| decode_err(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| decode_err("no default audio track".into()))?;
    let track_id = track.id;
    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(e.to_string()))?;

    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut samples = Vec::<f32>::new();
    // Locked on the first non-empty packet.
    let mut layout: Option<(u32, usize)> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_err(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                debug!(reference, error = e, "skipping undecodable packet");
                continue;
            }
            Err(SymphoniaError::IoError(_)) => continue,
            Err(e) => return Err(decode_err(e.to_string())),
        };
        if decoded.frames() == 0 {
            continue;
        }

        let spec = *decoded.spec();
        let packet_channels = spec.channels.count();
        let (_, channels) = *layout.get_or_insert((spec.rate, packet_channels));

        if sample_buf.as_ref().is_none_or(|b| b.capacity() < decoded.capacity()) {
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let Some(buf) = sample_buf.as_mut() else { continue };
        buf.copy_interleaved_ref(decoded);

        if packet_channels == channels {
            samples.extend_from_slice(buf.samples());
        } else {
            samples.extend(dsp::updown_mix_interleaved(buf.samples(), packet_channels, channels));
        }
    }

    match layout {
        Some((sample_rate, channels)) if !samples.is_empty() => Ok(DecodedAudio {
            samples,
            sample_rate,
            channels,
        }),
        _ => Err(AssetError::Empty {
            reference: reference.to_string(),
        }),
    }
}

/// Bring decoded audio to the output format: channel mix first, then
/// sample-rate conversion.
pub fn convert_to_format(reference: &str, audio: DecodedAudio, format: OutputFormat) -> Result<Vec<f32>, AssetError> {
    let channels = format.channels();
    let mixed = if audio.channels == channels {
        audio.samples
    } else {
        dsp::updown_mix_interleaved(&audio.samples, audio.channels, channels)
    };

    resample::resample_interleaved(&mixed, channels, audio.sample_rate, format.sample_rate).map_err(|e| {
        AssetError::Resample {
            reference: reference.to_string(),
            reason: format!("{e:#}"),
        }
    })
}
