//! End-to-end startup and frame loop tests

use glam::DVec2;

use crate::app::{HostEvent, STATUS_READY, StartupError};
use crate::render::PaintOp;
use crate::scheduler::SchedulerState;
use crate::test_utils::*;
use crate::wasm::ModuleLoadFailure;

#[tokio::test]
async fn test_startup_sequence_order() {
    let (mut app, _) = test_app();
    let fetcher = MockFetcher::with_game(game_wasm());

    app.start_up(&fetcher).await.unwrap();

    let requests = fetcher.requests();
    assert_eq!(requests.len(), 6);
    assert!(requests[..5].iter().all(|r| r.starts_with("audio/")));
    assert_eq!(requests[5], "towerd.wasm");

    assert!(app.bridge().is_loaded());
    assert_eq!(app.status().text(), STATUS_READY);
    // logged during init, after the panel was attached
    assert_eq!(app.log_panel().entries().collect::<Vec<_>>(), ["wave 1"]);
}

#[tokio::test]
async fn test_audio_failure_never_fetches_module() {
    let (mut app, _) = test_app();
    let fetcher = MockFetcher::with_game(game_wasm()).remove("audio/tower-shoot.wav");

    let err = app.start_up(&fetcher).await.unwrap_err();

    assert!(matches!(err, StartupError::Audio(ref failure) if failure.asset == "towerShoot"));
    assert!(!fetcher.requests().iter().any(|r| r == "towerd.wasm"));
    assert!(!app.bridge().is_loaded());
    assert!(app.status().text().starts_with("Error: "));
}

#[tokio::test]
async fn test_missing_module_is_load_failure() {
    let (mut app, _) = test_app();
    let fetcher = MockFetcher::with_audio();

    let err = app.start_up(&fetcher).await.unwrap_err();

    assert!(matches!(err, StartupError::Module(ModuleLoadFailure::Fetch(_))));
    assert!(app.status().is_error());
}

#[tokio::test]
async fn test_bad_module_reports_status() {
    let (mut app, _) = test_app();
    let fetcher = MockFetcher::with_game(b"not wasm".to_vec());

    let err = app.start_up(&fetcher).await.unwrap_err();
    assert!(matches!(err, StartupError::Module(ModuleLoadFailure::Compile(_))));
    assert_eq!(app.status().text(), format!("Error: {err}"));
}

#[tokio::test]
async fn test_play_session() {
    let (mut app, sink) = test_app();
    app.start_up(&MockFetcher::with_game(full_game_wasm())).await.unwrap();

    app.dispatch(HostEvent::StartButton);
    app.dispatch(HostEvent::key("2"));
    app.dispatch(HostEvent::MouseMove { client: DVec2::new(300.0, 100.0) });

    let mut timestamp = 0.0;
    for _ in 0..3 {
        app.dispatch(HostEvent::AnimationFrame { timestamp_ms: timestamp });
        timestamp += 16.0;
    }
    assert!(app.scheduler().has_pending_frame());

    // (300, 100) at scale 2 is x=600: not placeable, so a red cross
    let visible = app.bridge().context().render.canvas().visible_ops().to_vec();
    assert!(matches!(visible.last(), Some(PaintOp::Line { .. })));

    app.dispatch(HostEvent::key(" "));
    app.dispatch(HostEvent::AnimationFrame { timestamp_ms: timestamp });
    assert_eq!(app.scheduler().state(), SchedulerState::Paused);
    assert!(!app.scheduler().has_pending_frame());

    app.dispatch(HostEvent::key(" "));
    assert!(app.scheduler().has_pending_frame());

    app.dispatch(HostEvent::MouseClick { client: DVec2::new(10.0, 10.0) });
    assert_eq!(sink.played(), ["enemyHit", "towerShoot"]);
}
