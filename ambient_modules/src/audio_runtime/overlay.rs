// src/audio_runtime/overlay.rs

//! Fireplace overlay: the `fire` base loop on its own bus, faded in and out
//! on top of whatever scene is playing.

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::{lock, AudioEngine};
use crate::engine::SourceOptions;
use crate::scene::SceneId;

/// How `disable_overlay_with` silences the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    /// Linear fade to silence, then stop the source.
    Out,
    Immediate,
}

impl AudioEngine {
    pub fn overlay_active(&self) -> bool {
        self.session().overlay.active
    }

    /// Fade the fire loop in over the current scene. Does nothing when the
    /// overlay is already running.
    ///
    /// The overlay counts as active even if the fire asset cannot be
    /// loaded; it is then silent until disabled and enabled again.
    pub async fn enable_overlay(&self) {
        let epoch = {
            let session = self.session();
            if session.overlay.active && session.overlay.source.is_some() {
                return;
            }
            session.overlay.epoch
        };

        if let Err(e) = self.initialize().await {
            warn!(error = %e, "audio output unavailable, overlay not started");
            return;
        }
        let Some(graph) = self.graph() else { return };
        let format = lock(&graph).format();

        let asset = match self.inner.catalog.definition(SceneId::Fire) {
            Some(fire) => self.inner.assets.load(&fire.base.asset, format).await,
            None => None,
        };

        let mut session = self.session();
        if session.overlay.epoch != epoch {
            debug!("overlay enable cancelled while loading");
            return;
        }
        if session.overlay.active && session.overlay.source.is_some() {
            return;
        }

        let target = session.volume * self.inner.config.overlay_presence;
        let fade = self.inner.config.overlay_fade();
        let mut graph = lock(&graph);
        let bus = *session.overlay.bus.get_or_insert_with(|| graph.create_bus(0.0));

        let now = graph.current_time();
        if let Some(gain) = graph.bus_gain_mut(bus) {
            gain.set_value(0.0);
            gain.linear_ramp(0.0, target, now, fade.as_secs_f64());
        }

        match asset {
            Some(asset) => {
                let opts = SourceOptions {
                    looping: true,
                    gain: 1.0,
                    bus,
                };
                session.overlay.source = Some(graph.start_source(asset, opts));
            }
            None => warn!("fire asset unavailable, overlay is silent"),
        }
        session.overlay.active = true;
        info!(target_gain = target, fade_secs = fade.as_secs_f32(), "overlay enabled");
    }

    /// Fade the overlay out and stop its source once the fade is done.
    pub fn disable_overlay(&self) {
        self.disable_overlay_with(Fade::Out);
    }

    pub fn disable_overlay_with(&self, fade: Fade) {
        let (source, bus) = {
            let mut session = self.session();
            session.overlay.epoch += 1;
            let was_active = std::mem::replace(&mut session.overlay.active, false);
            let source = session.overlay.source.take();
            if !was_active && source.is_none() {
                return;
            }
            (source, session.overlay.bus)
        };
        let Some(source) = source else {
            debug!("overlay disabled without a source");
            return;
        };
        let Some(graph) = self.graph() else { return };

        match fade {
            Fade::Out => {
                if let Some(bus) = bus {
                    lock(&graph).ramp_bus(bus, 0.0, self.inner.config.overlay_fade());
                }
                let delay = self.inner.config.overlay_stop_delay();
                match Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            tokio::time::sleep(delay).await;
                            lock(&graph).stop_source(source);
                        });
                    }
                    Err(_) => {
                        lock(&graph).stop_source(source);
                    }
                }
                info!("overlay fading out");
            }
            Fade::Immediate => {
                let mut graph = lock(&graph);
                graph.stop_source(source);
                if let Some(gain) = bus.and_then(|bus| graph.bus_gain_mut(bus)) {
                    gain.set_value(0.0);
                }
                info!("overlay stopped");
            }
        }
    }
}
