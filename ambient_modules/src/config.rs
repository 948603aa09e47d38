// src/config.rs

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::scene::{SceneId, SoundPresence};

/// Upper bound for every `*_secs` field: one day.
pub const MAX_SECONDS: f32 = 86_400.0;

/// Engine tuning. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory that asset references (`sounds/...`) are resolved against.
    pub asset_root: PathBuf,
    /// Replaces the extension of every catalog asset reference when set.
    pub asset_extension: Option<String>,
    pub initial_volume: f32,
    /// Overlay level relative to the master volume.
    pub overlay_presence: f32,
    pub overlay_fade_secs: f32,
    /// Delay before a faded-out overlay source is stopped. Slightly longer
    /// than the fade so the ramp completes first.
    pub overlay_stop_delay_secs: f32,
    /// One-shot volume is scaled by a factor in [1 - jitter, 1 + jitter].
    pub volume_jitter: f32,
    pub min_interval_secs: f32,
    pub max_interval_secs: f32,
    /// Fixed RNG seed; drawn from the OS when absent.
    pub seed: Option<u64>,
    pub headless_sample_rate: u32,
    pub headless_channels: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let presence = SoundPresence::for_scene(SceneId::Fire)
            .map_or(0.35, |p| p.base_volume);
        Self {
            asset_root: PathBuf::from("."),
            asset_extension: None,
            initial_volume: 0.5,
            overlay_presence: presence,
            overlay_fade_secs: 2.0,
            overlay_stop_delay_secs: 2.1,
            volume_jitter: 0.2,
            min_interval_secs: 10.0,
            max_interval_secs: 60.0,
            seed: None,
            headless_sample_rate: 48_000,
            headless_channels: 2,
        }
    }
}

impl EngineConfig {
    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f32| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!("{name} must be within 0..=1, got {v}")))
            }
        };
        let seconds = |name: &str, v: f32| {
            if (0.0..=MAX_SECONDS).contains(&v) {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!("{name} must be within 0..={MAX_SECONDS} seconds, got {v}")))
            }
        };

        unit("initial_volume", self.initial_volume)?;
        unit("overlay_presence", self.overlay_presence)?;
        unit("volume_jitter", self.volume_jitter)?;
        seconds("overlay_fade_secs", self.overlay_fade_secs)?;
        seconds("overlay_stop_delay_secs", self.overlay_stop_delay_secs)?;
        seconds("min_interval_secs", self.min_interval_secs)?;
        seconds("max_interval_secs", self.max_interval_secs)?;

        if self.min_interval_secs > self.max_interval_secs {
            return Err(EngineError::InvalidConfig(format!(
                "min_interval_secs ({}) exceeds max_interval_secs ({})",
                self.min_interval_secs, self.max_interval_secs
            )));
        }
        if self.headless_sample_rate == 0 || self.headless_channels == 0 {
            return Err(EngineError::InvalidConfig(
                "headless output format needs a non-zero rate and channel count".into(),
            ));
        }
        Ok(())
    }

    pub fn overlay_fade(&self) -> Duration {
        Duration::from_secs_f32(self.overlay_fade_secs)
    }

    pub fn overlay_stop_delay(&self) -> Duration {
        Duration::from_secs_f32(self.overlay_stop_delay_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f32(self.min_interval_secs)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_secs_f32(self.max_interval_secs)
    }
}
