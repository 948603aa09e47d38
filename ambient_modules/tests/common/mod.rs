//! Shared fixtures: in-memory WAV assets and headless engines.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use ambient_modules::scene::{BaseLayer, SceneCatalog, SceneDefinition, SecondaryLayer};
use ambient_modules::{
    AssetError, AssetSource, AudioEngine, EngineConfig, HeadlessBackend, MemoryAssetSource, OutputFormat, SceneId,
};

pub const FORMAT: OutputFormat = OutputFormat { sample_rate: 8_000, channels: 1 };

/// 16-bit mono WAV with a square wave at `level` (0..1).
pub fn wav_tone(sample_rate: u32, seconds: f32, level: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let frames = (sample_rate as f32 * seconds) as usize;
    let amplitude = (level * i16::MAX as f32) as i16;
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..frames {
            let s = if (i / 20) % 2 == 0 { amplitude } else { -amplitude };
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Every asset the catalog references, as short WAV tones.
pub fn assets_for(catalog: &SceneCatalog) -> MemoryAssetSource {
    let source = MemoryAssetSource::new();
    for reference in catalog.asset_references() {
        source.insert(reference, wav_tone(FORMAT.sample_rate, 0.25, 0.3));
    }
    source
}

pub fn config() -> EngineConfig {
    EngineConfig {
        asset_extension: Some("wav".into()),
        seed: Some(42),
        ..Default::default()
    }
}

/// Headless engine over the standard catalog with every asset present.
pub fn engine() -> AudioEngine {
    let catalog = SceneCatalog::standard().with_asset_extension("wav");
    let source = Arc::new(assets_for(&catalog));
    AudioEngine::with_catalog(config(), catalog, HeadlessBackend::new(FORMAT), source).unwrap()
}

/// Headless engine whose asset source has nothing in it.
pub fn engine_without_assets() -> AudioEngine {
    AudioEngine::new(config(), HeadlessBackend::new(FORMAT), Arc::new(MemoryAssetSource::new())).unwrap()
}

/// Catalog with a single scene whose secondary layer fires every
/// `min..=max`.
pub fn fast_catalog(min: Duration, max: Duration) -> SceneCatalog {
    SceneCatalog::from_definitions([
        (
            SceneId::Wind,
            SceneDefinition {
                base: BaseLayer { asset: "sounds/wind-loop.wav".into(), volume: 0.3 },
                secondary: vec![SecondaryLayer {
                    asset: "sounds/leaves-rustle.wav".into(),
                    volume: 0.2,
                    min_interval: Some(min),
                    max_interval: Some(max),
                }],
            },
        ),
        (
            SceneId::Fire,
            SceneDefinition {
                base: BaseLayer { asset: "sounds/fire-crackles.wav".into(), volume: 0.5 },
                secondary: vec![],
            },
        ),
    ])
}

pub fn fast_engine(min: Duration, max: Duration) -> AudioEngine {
    let catalog = fast_catalog(min, max);
    let source = Arc::new(assets_for(&catalog));
    AudioEngine::with_catalog(config(), catalog, HeadlessBackend::new(FORMAT), source).unwrap()
}

/// Asset source that blocks for `delay` on every fetch.
pub struct SlowSource {
    inner: MemoryAssetSource,
    delay: Duration,
}

impl AssetSource for SlowSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        std::thread::sleep(self.delay);
        self.inner.fetch(reference)
    }
}

/// Standard catalog with every asset present, but each fetch takes `delay`.
pub fn slow_engine(delay: Duration) -> AudioEngine {
    let catalog = SceneCatalog::standard().with_asset_extension("wav");
    let source = Arc::new(SlowSource { inner: assets_for(&catalog), delay });
    AudioEngine::with_catalog(config(), catalog, HeadlessBackend::new(FORMAT), source).unwrap()
}

/// Live sources that loop (base layers and the overlay).
pub fn looping_sources(engine: &AudioEngine) -> usize {
    let snap = engine.snapshot();
    snap.live_sources - snap.one_shots_live
}
