// src/assets/mod.rs

pub mod source;

pub use source::{AssetSource, FileAssetSource, MemoryAssetSource};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::decoder;
use crate::engine::OutputFormat;
use crate::error::AssetError;

/// A decoded buffer, already in the graph's output format.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAsset {
    pub reference: String,
    /// Interleaved, `format.channels` samples per frame.
    pub samples: Vec<f32>,
    pub format: OutputFormat,
}

impl AudioAsset {
    pub fn new(reference: impl Into<String>, samples: Vec<f32>, format: OutputFormat) -> Self {
        Self {
            reference: reference.into(),
            samples,
            format,
        }
    }

    pub fn silence(format: OutputFormat, frames: usize) -> Self {
        Self::new("<silence>", vec![0.0; frames * format.channels()], format)
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels().max(1)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.format.sample_rate.max(1) as f64)
    }
}

/// Fetch, decode and convert one asset. Blocking.
pub fn load_asset(source: &dyn AssetSource, reference: &str, format: OutputFormat) -> Result<AudioAsset, AssetError> {
    let bytes = source.fetch(reference)?;
    let decoded = decoder::decode_bytes(reference, bytes)?;
    let samples = decoder::convert_to_format(reference, decoded, format)?;
    if samples.is_empty() {
        return Err(AssetError::Empty {
            reference: reference.to_string(),
        });
    }
    Ok(AudioAsset::new(reference, samples, format))
}

type Slot = Arc<OnceCell<Arc<AudioAsset>>>;

/// Process-lifetime cache of decoded assets, keyed by reference.
///
/// Concurrent requests for the same reference share one fetch and decode.
/// A failed load leaves the slot empty, so a later request tries again.
/// Entries are never evicted. The cache assumes a single output format
/// for its whole life.
pub struct AssetCache {
    source: Arc<dyn AssetSource>,
    entries: Mutex<HashMap<String, Slot>>,
}

impl AssetCache {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Load `reference`, logging and swallowing failures.
    pub async fn load(&self, reference: &str, format: OutputFormat) -> Option<Arc<AudioAsset>> {
        match self.try_load(reference, format).await {
            Ok(asset) => Some(asset),
            Err(e) => {
                warn!(reference, error = %e, "asset unavailable");
                None
            }
        }
    }

    pub async fn try_load(&self, reference: &str, format: OutputFormat) -> Result<Arc<AudioAsset>, AssetError> {
        let slot = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(reference.to_string())
            .or_default()
            .clone();

        slot.get_or_try_init(|| async {
            let source = Arc::clone(&self.source);
            let owned = reference.to_string();
            let asset = tokio::task::spawn_blocking(move || load_asset(source.as_ref(), &owned, format))
                .await
                .map_err(|_| AssetError::Interrupted {
                    reference: reference.to_string(),
                })??;
            debug!(reference, frames = asset.frames(), "asset decoded");
            Ok::<_, AssetError>(Arc::new(asset))
        })
        .await
        .cloned()
    }

    /// Number of references with a decoded buffer.
    pub fn cached(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_cached(&self, reference: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .is_some_and(|slot| slot.initialized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FORMAT: OutputFormat = OutputFormat { sample_rate: 8_000, channels: 1 };

    fn tone(frames: usize) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames {
                writer.write_sample(1_000i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    struct Counting {
        inner: MemoryAssetSource,
        fetches: AtomicUsize,
    }

    impl AssetSource for Counting {
        fn fetch(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.inner.fetch(reference)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_loads_share_one_fetch() {
        let source = Arc::new(Counting {
            inner: MemoryAssetSource::new().with("sounds/a.wav", tone(800)),
            fetches: AtomicUsize::new(0),
        });
        let cache = Arc::new(AssetCache::new(source.clone()));

        let (a, b) = tokio::join!(cache.load("sounds/a.wav", FORMAT), cache.load("sounds/a.wav", FORMAT));
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.frames(), 800);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.cached(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let source = Arc::new(MemoryAssetSource::new());
        let cache = AssetCache::new(source.clone());

        assert!(cache.load("sounds/late.wav", FORMAT).await.is_none());
        assert!(!cache.is_cached("sounds/late.wav"));

        source.insert("sounds/late.wav", tone(10));
        assert!(cache.load("sounds/late.wav", FORMAT).await.is_some());
        assert!(cache.is_cached("sounds/late.wav"));
    }

    #[test]
    fn silence_has_requested_length() {
        let asset = AudioAsset::silence(OutputFormat { sample_rate: 48_000, channels: 2 }, 480);
        assert_eq!(asset.samples.len(), 960);
        assert!((asset.duration().as_secs_f64() - 0.01).abs() < 1e-9);
    }
}
