// src/scene/mod.rs

pub mod catalog;
pub mod selector;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownScene;

pub use catalog::{BaseLayer, SceneCatalog, SceneDefinition, SecondaryLayer, SoundPresence};
pub use selector::{scene_info, select_scene, select_scene_now, SceneDecision, TimeOfDay, WeatherOverride};

/// Identifier of an acoustic scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneId {
    Rain,
    Fire,
    Wind,
    /// Summer night insects.
    Night,
    /// Autumn night crickets.
    NightAutumn,
    /// Summer evening cicadas (higurashi).
    EveningSummer,
    Morning,
    /// Summer midday cicadas.
    Cicada,
    Snow,
    Wave,
    Stream,
    /// Nothing plays.
    #[default]
    Silent,
}

impl SceneId {
    /// Every selectable scene, in picker order.
    pub const ALL: [SceneId; 12] = [
        SceneId::Rain,
        SceneId::Fire,
        SceneId::Wind,
        SceneId::Night,
        SceneId::NightAutumn,
        SceneId::EveningSummer,
        SceneId::Morning,
        SceneId::Cicada,
        SceneId::Snow,
        SceneId::Wave,
        SceneId::Stream,
        SceneId::Silent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneId::Rain => "rain",
            SceneId::Fire => "fire",
            SceneId::Wind => "wind",
            SceneId::Night => "night",
            SceneId::NightAutumn => "night-autumn",
            SceneId::EveningSummer => "evening-summer",
            SceneId::Morning => "morning",
            SceneId::Cicada => "cicada",
            SceneId::Snow => "snow",
            SceneId::Wave => "wave",
            SceneId::Stream => "stream",
            SceneId::Silent => "silent",
        }
    }

    /// The scene after this one in picker order, wrapping around.
    pub fn next(self) -> SceneId {
        let pos = SceneId::ALL.iter().position(|s| *s == self).unwrap_or(0);
        SceneId::ALL[(pos + 1) % SceneId::ALL.len()]
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}
