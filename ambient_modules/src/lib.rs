// src/lib.rs

pub mod assets;
pub mod audio;
pub mod audio_runtime;
pub mod calendar;
pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod scene;
pub mod session;
pub mod weather;

pub use assets::{AssetSource, FileAssetSource, MemoryAssetSource};
pub use audio::{CpalBackend, HeadlessBackend, OutputBackend};
pub use audio_runtime::AudioEngine;
pub use calendar::{major_season_for, micro_season_for, MajorSeason, MicroSeason};
pub use config::EngineConfig;
pub use engine::OutputFormat;
pub use error::{AssetError, EngineError};
pub use scene::{scene_info, select_scene, SceneId};
pub use session::{EngineSnapshot, EngineState};
