mod common;

use std::time::Duration;

use ambient_modules::session::export::render_to_wav;
use ambient_modules::SceneId;

#[tokio::test]
async fn rendered_scene_is_audible() {
    let engine = common::engine();
    engine.set_scene(SceneId::Wave).await;
    engine.play().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wave.wav");
    let graph = engine.graph().unwrap();
    let summary = render_to_wav(&graph, Duration::from_secs(1), &path).unwrap();

    assert_eq!(summary.frames, 8_000);
    assert_eq!(summary.channels, 1);
    assert!(summary.peak > 0.0);

    let mut reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 8_000);
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples.len(), 8_000);
    // The base loop is 0.25 s long, so the second half still has sound.
    assert!(samples[4_000..].iter().any(|&s| s != 0));

    // One-frame unlock source is reaped once rendered; the loop survives.
    let snap = engine.snapshot();
    assert!(snap.base_source_live);
    assert_eq!(snap.live_sources, 1);
    assert_eq!(snap.one_shots_live, 0);
}

#[tokio::test]
async fn silent_scene_renders_silence() {
    let engine = common::engine();
    engine.play().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silent.wav");
    let summary = render_to_wav(&engine.graph().unwrap(), Duration::from_millis(250), &path).unwrap();

    assert_eq!(summary.frames, 2_000);
    assert_eq!(summary.peak, 0.0);
}

#[tokio::test]
async fn overlay_fades_in_during_render() {
    let engine = common::engine();
    engine.enable_overlay().await;

    let graph = engine.graph().unwrap();
    let head = graph.lock().unwrap().render_for(Duration::from_millis(100), 256);
    let tail = {
        graph.lock().unwrap().render_for(Duration::from_millis(1_900), 256);
        graph.lock().unwrap().render_for(Duration::from_millis(100), 256)
    };

    let peak = |block: &[f32]| block.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak(&head) < peak(&tail));
    assert!(peak(&tail) <= 0.5 * 0.35 * 0.3 + 1e-3);
}
