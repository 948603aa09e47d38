mod common;

use std::time::Duration;

use ambient_modules::SceneId;

const MIN: Duration = Duration::from_millis(40);
const MAX: Duration = Duration::from_millis(80);

fn secondary_count(engine: &ambient_modules::AudioEngine) -> usize {
    let graph = engine.graph().unwrap();
    let graph = graph.lock().unwrap();
    graph
        .sources()
        .iter()
        .filter(|s| s.reference() == "sounds/leaves-rustle.wav")
        .count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn secondary_layer_fires_repeatedly_while_playing() {
    let engine = common::fast_engine(MIN, MAX);
    engine.set_scene(SceneId::Wind).await;
    engine.play().await;
    assert_eq!(engine.snapshot().pending_timers, 1);

    tokio::time::sleep(Duration::from_millis(600)).await;

    // Headless graphs are never rendered, so every one-shot is still live.
    let fired = secondary_count(&engine);
    assert!(fired >= 3, "only {fired} triggers");
    assert!(engine.snapshot().base_source_live);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_cancels_pending_triggers() {
    let engine = common::fast_engine(MIN, MAX);
    engine.set_scene(SceneId::Wind).await;
    engine.play().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    engine.stop();
    let snap = engine.snapshot();
    assert_eq!(snap.pending_timers, 0);
    let started = snap.sources_started;
    let one_shots = snap.one_shots_live;
    assert!(one_shots >= 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    let snap = engine.snapshot();
    assert_eq!(snap.sources_started, started);
    assert_eq!(snap.one_shots_live, one_shots);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scene_switch_cancels_old_triggers() {
    let engine = common::fast_engine(MIN, MAX);
    engine.set_scene(SceneId::Wind).await;
    engine.play().await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    engine.set_scene(SceneId::Fire).await;
    let after_switch = secondary_count(&engine);
    assert_eq!(engine.snapshot().pending_timers, 0);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(secondary_count(&engine), after_switch);
    assert!(engine.snapshot().base_source_live);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scene_without_definition_plays_nothing() {
    let engine = common::fast_engine(MIN, MAX);
    engine.set_scene(SceneId::Rain).await;
    engine.play().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    let snap = engine.snapshot();
    assert!(snap.state.is_playing);
    assert!(!snap.base_source_live);
    assert_eq!(snap.pending_timers, 0);
    assert_eq!(secondary_count(&engine), 0);
}
