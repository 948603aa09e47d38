//! Play / stop / scene switching against a headless output.

mod common;

use std::time::Duration;

use ambient_modules::engine::BusId;
use ambient_modules::{EngineState, SceneId};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn toggle_reports_resulting_state() {
    let engine = common::engine();
    engine.set_scene(SceneId::Rain).await;

    assert!(engine.toggle().await);
    assert!(engine.snapshot().base_source_live);

    assert!(!engine.toggle().await);
    assert!(!engine.snapshot().base_source_live);
}

#[tokio::test]
async fn toggle_on_fresh_engine_starts_playing() {
    let engine = common::engine();
    assert!(engine.toggle().await);
    assert!(engine.is_playing());
}

#[tokio::test]
async fn fresh_engine_is_stopped_and_silent() {
    let engine = common::engine();
    assert_eq!(
        engine.get_state(),
        EngineState {
            scene: SceneId::Silent,
            is_playing: false,
            volume: 0.5,
            overlay_active: false,
        }
    );
    assert!(engine.graph().is_none());
    assert_eq!(engine.available_scenes().len(), 12);
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let engine = common::engine();
    engine.initialize().await.unwrap();
    // The one-frame unlock source is the only thing started.
    assert_eq!(engine.snapshot().one_shots_live, 1);
    let first = engine.snapshot().sources_started;
    engine.initialize().await.unwrap();
    assert_eq!(engine.snapshot().sources_started, first);
    assert_eq!(engine.output_format(), Some(common::FORMAT));
}

#[tokio::test]
async fn scene_selected_while_stopped_plays_on_play() {
    let engine = common::engine();
    engine.set_scene(SceneId::Wind).await;
    assert!(!engine.is_playing());
    assert!(!engine.snapshot().base_source_live);

    engine.play().await;
    let snap = engine.snapshot();
    assert!(snap.state.is_playing);
    assert_eq!(snap.state.scene, SceneId::Wind);
    assert!(snap.base_source_live);
    assert_eq!(snap.pending_timers, 1);
}

#[tokio::test]
async fn same_scene_does_not_restart() {
    let engine = common::engine();
    engine.set_scene(SceneId::Cicada).await;
    engine.play().await;
    let before = engine.snapshot().sources_started;

    engine.set_scene(SceneId::Cicada).await;
    engine.play().await;
    assert_eq!(engine.snapshot().sources_started, before);
}

#[tokio::test]
async fn switching_scenes_replaces_the_base_layer() {
    let engine = common::engine();
    engine.set_scene(SceneId::Rain).await;
    engine.play().await;
    let before = engine.snapshot();

    engine.set_scene(SceneId::Stream).await;
    let after = engine.snapshot();

    assert!(after.state.is_playing);
    assert!(after.base_source_live);
    assert_eq!(after.sources_started, before.sources_started + 1);
    // The rain base loop is gone and the stream loop took its place.
    assert_eq!(after.live_sources, before.live_sources);
    // Stream has no secondary layers; rain's thunder timer was cleared.
    assert_eq!(after.pending_timers, 0);
}

#[tokio::test]
async fn stop_is_idempotent() {
    let engine = common::engine();
    engine.set_scene(SceneId::Night).await;
    engine.play().await;

    engine.stop();
    engine.stop();

    let snap = engine.snapshot();
    assert!(!snap.state.is_playing);
    assert!(!snap.base_source_live);
    assert_eq!(snap.pending_timers, 0);
}

#[tokio::test]
async fn silent_scene_is_playing_without_sound() {
    let engine = common::engine();
    engine.play().await;
    let snap = engine.snapshot();
    assert!(snap.state.is_playing);
    assert_eq!(snap.state.scene, SceneId::Silent);
    assert!(!snap.base_source_live);
    assert_eq!(snap.pending_timers, 0);
}

#[tokio::test]
async fn missing_asset_leaves_engine_playing_without_base() {
    let engine = common::engine_without_assets();
    engine.set_scene(SceneId::Rain).await;
    engine.play().await;

    let snap = engine.snapshot();
    assert!(snap.state.is_playing);
    assert!(!snap.base_source_live);
    assert_eq!(snap.cached_assets, 0);
    // The thunder layer is still scheduled; its triggers are skipped.
    assert_eq!(snap.pending_timers, 1);
}

#[tokio::test]
async fn volume_reaches_master_bus() {
    let engine = common::engine();
    engine.initialize().await.unwrap();
    engine.set_volume(0.8);

    let graph = engine.graph().unwrap();
    let target = graph.lock().unwrap().bus_gain(BusId::MASTER).unwrap().target();
    assert_eq!(target, 0.8);

    engine.set_volume(4.0);
    assert_eq!(engine.get_state().volume, 1.0);
    let target = graph.lock().unwrap().bus_gain(BusId::MASTER).unwrap().target();
    assert_eq!(target, 1.0);
}

#[tokio::test]
async fn decoded_assets_are_reused_across_scenes() {
    let engine = common::engine();
    engine.set_scene(SceneId::Morning).await;
    engine.play().await;
    engine.set_scene(SceneId::Snow).await;
    engine.set_scene(SceneId::Morning).await;
    assert_eq!(engine.snapshot().cached_assets, 2);
}

const SLOW_FETCH: Duration = Duration::from_millis(150);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_during_base_load_discards_the_load() {
    let engine = common::slow_engine(SLOW_FETCH);
    engine.set_scene(SceneId::Rain).await;

    let player = engine.clone();
    let play = tokio::spawn(async move { player.play().await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.stop();
    play.await.unwrap();

    let snap = engine.snapshot();
    assert!(!snap.state.is_playing);
    assert!(!snap.base_source_live);
    assert_eq!(snap.pending_timers, 0);
    assert_eq!(common::looping_sources(&engine), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn replay_during_stale_load_starts_one_base() {
    let engine = common::slow_engine(SLOW_FETCH);
    engine.set_scene(SceneId::Rain).await;

    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.play().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.stop();
    engine.play().await;
    first.await.unwrap();

    let snap = engine.snapshot();
    assert!(snap.state.is_playing);
    assert!(snap.base_source_live);
    assert_eq!(snap.pending_timers, 1);
    assert_eq!(common::looping_sources(&engine), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scene_switch_during_load_keeps_only_the_new_scene() {
    let engine = common::slow_engine(SLOW_FETCH);
    engine.set_scene(SceneId::Wave).await;

    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.play().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.set_scene(SceneId::Stream).await;
    first.await.unwrap();

    let graph = engine.graph().unwrap();
    let refs: Vec<String> = graph
        .lock()
        .unwrap()
        .sources()
        .iter()
        .filter(|s| s.is_looping())
        .map(|s| s.reference().to_string())
        .collect();
    assert_eq!(refs, vec!["sounds/stream-loop.wav".to_string()]);
}
