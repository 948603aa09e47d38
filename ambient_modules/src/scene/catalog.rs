// src/scene/catalog.rs

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::SceneId;

/// Continuously looping layer of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayer {
    pub asset: String,
    pub volume: f32,
}

/// One-shot layer triggered at random intervals while its scene plays.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryLayer {
    pub asset: String,
    pub volume: f32,
    /// Falls back to the engine default when absent.
    pub min_interval: Option<Duration>,
    pub max_interval: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneDefinition {
    pub base: BaseLayer,
    pub secondary: Vec<SecondaryLayer>,
}

/// Intended perceptual weight of a layer, as opposed to its raw gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundPresence {
    /// Average level, 0.0 - 1.0.
    pub base_volume: f32,
    /// Plus/minus swing around `base_volume`.
    pub fluctuation: f32,
    /// Trigger frequency factor, 0.0 - 1.0 (higher = more frequent).
    pub density: f32,
}

impl SoundPresence {
    pub const FIRE: SoundPresence = SoundPresence { base_volume: 0.35, fluctuation: 0.08, density: 0.6 };
    pub const RAIN: SoundPresence = SoundPresence { base_volume: 0.4, fluctuation: 0.05, density: 0.3 };

    /// Presence profile for a scene, where one has been tuned.
    pub fn for_scene(scene: SceneId) -> Option<SoundPresence> {
        match scene {
            SceneId::Fire => Some(SoundPresence::FIRE),
            SceneId::Rain => Some(SoundPresence::RAIN),
            _ => None,
        }
    }
}

fn sound(file: &str) -> String {
    format!("sounds/{file}")
}

fn base(file: &str, volume: f32) -> BaseLayer {
    BaseLayer { asset: sound(file), volume }
}

fn secondary(file: &str, volume: f32, min_secs: u64, max_secs: u64) -> SecondaryLayer {
    SecondaryLayer {
        asset: sound(file),
        volume,
        min_interval: Some(Duration::from_secs(min_secs)),
        max_interval: Some(Duration::from_secs(max_secs)),
    }
}

/// Immutable table of scene definitions. `silent` has no entry.
#[derive(Debug, Clone)]
pub struct SceneCatalog {
    scenes: HashMap<SceneId, SceneDefinition>,
}

impl SceneCatalog {
    pub fn standard() -> Self {
        let mut scenes = HashMap::new();
        let mut add = |id, base, secondary| {
            scenes.insert(id, SceneDefinition { base, secondary });
        };

        add(
            SceneId::Rain,
            base("rain-loop.mp3", 0.4),
            vec![secondary("thunder-distant.mp3", 0.2, 30, 120)],
        );
        // Crackles and pops are both in the main loop.
        add(SceneId::Fire, base("fire-crackles.mp3", 0.5), vec![]);
        add(
            SceneId::Wind,
            base("wind-loop.mp3", 0.3),
            vec![secondary("leaves-rustle.mp3", 0.2, 10, 40)],
        );
        add(
            SceneId::Night,
            base("insects-loop.mp3", 0.3),
            vec![secondary("owl-distant.mp3", 0.15, 60, 180)],
        );
        add(SceneId::NightAutumn, base("autumn-insects.mp3", 0.25), vec![]);
        add(
            SceneId::EveningSummer,
            base("higurashi-loop.mp3", 0.35),
            vec![secondary("crows-evening.mp3", 0.15, 45, 120)],
        );
        add(SceneId::Morning, base("birds-morning.mp3", 0.35), vec![]);
        add(SceneId::Cicada, base("cicada-loop.mp3", 0.4), vec![]);
        add(SceneId::Snow, base("snow-wind.mp3", 0.2), vec![]);
        add(SceneId::Wave, base("wave-loop.mp3", 0.4), vec![]);
        add(SceneId::Stream, base("stream-loop.mp3", 0.35), vec![]);

        Self { scenes }
    }

    /// Catalog from explicit definitions. Scenes left out play nothing.
    pub fn from_definitions(definitions: impl IntoIterator<Item = (SceneId, SceneDefinition)>) -> Self {
        Self {
            scenes: definitions.into_iter().collect(),
        }
    }

    /// Same scenes, with every asset reference switched to another file
    /// extension (for installs that ship `.ogg` or `.wav` instead of `.mp3`).
    pub fn with_asset_extension(mut self, extension: &str) -> Self {
        let swap = |asset: &mut String| {
            *asset = Path::new(asset.as_str())
                .with_extension(extension)
                .to_string_lossy()
                .into_owned();
        };
        for def in self.scenes.values_mut() {
            swap(&mut def.base.asset);
            for layer in &mut def.secondary {
                swap(&mut layer.asset);
            }
        }
        self
    }

    pub fn definition(&self, id: SceneId) -> Option<&SceneDefinition> {
        self.scenes.get(&id)
    }

    /// Every distinct asset reference used by the catalog, sorted.
    pub fn asset_references(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self
            .scenes
            .values()
            .flat_map(|def| {
                std::iter::once(def.base.asset.as_str())
                    .chain(def.secondary.iter().map(|l| l.asset.as_str()))
            })
            .collect();
        refs.sort_unstable();
        refs.dedup();
        refs
    }
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_but_silent_has_a_definition() {
        let catalog = SceneCatalog::standard();
        for id in SceneId::ALL {
            assert_eq!(catalog.definition(id).is_some(), id != SceneId::Silent, "{id}");
        }
    }

    #[test]
    fn secondary_layers_carry_ordered_intervals() {
        let catalog = SceneCatalog::standard();
        for id in SceneId::ALL {
            let Some(def) = catalog.definition(id) else { continue };
            for layer in &def.secondary {
                let (min, max) = (layer.min_interval.unwrap(), layer.max_interval.unwrap());
                assert!(min <= max, "{id}: {}", layer.asset);
            }
        }
        let rain = catalog.definition(SceneId::Rain).unwrap();
        assert_eq!(rain.base.asset, "sounds/rain-loop.mp3");
        assert_eq!(rain.secondary[0].asset, "sounds/thunder-distant.mp3");
    }

    #[test]
    fn extension_swap_rewrites_every_reference() {
        let catalog = SceneCatalog::standard().with_asset_extension("ogg");
        let refs = catalog.asset_references();
        assert!(refs.iter().all(|r| r.ends_with(".ogg")));
        assert!(refs.contains(&"sounds/owl-distant.ogg"));
    }

    #[test]
    fn presence_is_tuned_for_fire_and_rain_only() {
        assert_eq!(SoundPresence::for_scene(SceneId::Fire).unwrap().base_volume, 0.35);
        assert_eq!(SoundPresence::for_scene(SceneId::Rain).unwrap().base_volume, 0.4);
        assert!(SoundPresence::for_scene(SceneId::Wind).is_none());
    }
}
