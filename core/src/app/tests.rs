//! Application shell tests

use glam::{DVec2, Vec2};

use super::*;
use crate::render::PaintOp;
use crate::test_utils::*;

fn last_op(app: &App<crate::render::RecordingCanvas>) -> Option<PaintOp> {
    app.bridge().context().render.canvas().ops().last().cloned()
}

// ============================================================================
// Construction and resize
// ============================================================================

#[test]
fn test_new_fits_configured_width() {
    let (app, _) = test_app();
    assert_eq!(app.display().scale(), DVec2::new(2.0, 2.0));
    assert_eq!(app.layout().bounding_box().size(), DVec2::new(400.0, 300.0));
    assert_eq!(app.scheduler().state(), SchedulerState::Idle);
    assert_eq!(app.module_locator(), "towerd.wasm");
}

#[test]
fn test_resize_passes_scale_to_module() {
    let (mut app, _) = started_app(full_game_wasm());

    assert!(!app.dispatch(HostEvent::Resize { container_width: 1600.0 }));
    assert_eq!(app.display().scale(), DVec2::new(0.5, 0.5));
    assert!(matches!(
        last_op(&app),
        Some(PaintOp::Circle { center, .. }) if center == Vec2::new(0.5, 0.5)
    ));
}

#[test]
fn test_invalid_resize_keeps_scale() {
    let (mut app, _) = test_app();
    assert!(app.resize(0.0).is_none());
    assert_eq!(app.display().scale(), DVec2::new(2.0, 2.0));
}

// ============================================================================
// Game control
// ============================================================================

#[test]
fn test_controls_ignored_before_load() {
    let (mut app, _) = test_app();

    app.start_game();
    app.toggle_pause();
    assert!(!app.dispatch(HostEvent::key(" ")));

    assert_eq!(app.scheduler().state(), SchedulerState::Idle);
    assert_eq!(app.status().text(), "");
}

#[test]
fn test_start_pause_resume_statuses() {
    let (mut app, sink) = started_app(full_game_wasm());
    assert_eq!(app.status().text(), STATUS_READY);

    app.dispatch(HostEvent::StartButton);
    assert_eq!(app.status().text(), STATUS_STARTED);
    assert_eq!(app.scheduler().state(), SchedulerState::Running);
    // resetGame ran
    assert_eq!(sink.played(), ["enemyHit"]);
    assert_eq!(app.log_panel().entries().last(), Some("reset"));

    assert!(app.dispatch(HostEvent::key(" ")));
    assert_eq!(app.status().text(), STATUS_PAUSED);
    assert_eq!(app.scheduler().state(), SchedulerState::Paused);

    app.dispatch(HostEvent::PauseButton);
    assert_eq!(app.status().text(), STATUS_RESUMED);
    assert_eq!(app.scheduler().frames_requested(), 1);
}

#[test]
fn test_toggle_pause_ignored_while_idle() {
    let (mut app, _) = started_app(game_wasm());
    app.toggle_pause();
    assert_eq!(app.scheduler().state(), SchedulerState::Idle);
    assert_eq!(app.status().text(), STATUS_READY);
}

#[test]
fn test_start_without_reset_export() {
    let (mut app, sink) = started_app(game_wasm());
    app.start_game();
    assert_eq!(app.scheduler().state(), SchedulerState::Running);
    assert!(sink.played().is_empty());
}

#[test]
fn test_keys_select_towers() {
    let (mut app, _) = started_app(game_wasm());

    assert!(!app.dispatch(HostEvent::key("3")));
    assert_eq!(app.selected_tower(), TowerKind::Square);
    assert!(matches!(last_op(&app), Some(PaintOp::Circle { radius, .. }) if radius == 3.0));

    app.dispatch(HostEvent::key("Escape"));
    assert_eq!(app.selected_tower(), TowerKind::None);

    app.dispatch(HostEvent::key("9"));
    assert_eq!(app.selected_tower(), TowerKind::None);
}

#[test]
fn test_tower_button_selects() {
    let (mut app, _) = started_app(game_wasm());
    app.dispatch(HostEvent::TowerButton(TowerKind::Line));
    assert_eq!(app.selected_tower(), TowerKind::Line);
}

#[test]
fn test_log_toggle() {
    let (mut app, _) = test_app();
    app.dispatch(HostEvent::LogToggle);
    assert!(!app.log_panel().is_visible());
}

// ============================================================================
// Pointer input
// ============================================================================

#[test]
fn test_click_commits_snapped_world_point() {
    let (mut app, sink) = started_app(game_wasm());
    app.start_game();

    // 400px wide display, scale 2: (25, 41) -> (50, 82) -> (60, 100)
    app.dispatch(HostEvent::MouseClick { client: DVec2::new(25.0, 41.0) });

    assert!(matches!(
        last_op(&app),
        Some(PaintOp::FillRect { origin, .. }) if origin == Vec2::new(60.0, 100.0)
    ));
    assert_eq!(sink.played(), ["towerShoot"]);
}

#[test]
fn test_click_ignored_while_paused() {
    let (mut app, sink) = started_app(game_wasm());
    app.start_game();
    app.toggle_pause();

    app.dispatch(HostEvent::MouseClick { client: DVec2::new(25.0, 41.0) });
    assert!(sink.played().is_empty());
}

#[test]
fn test_touch_release_commits_last_hover() {
    let (mut app, sink) = started_app(game_wasm());

    assert!(app.dispatch(HostEvent::TouchStart { touches: HostEvent::touch(DVec2::new(2.5, 2.5)) }));
    assert_eq!(app.hover(), Some(crate::input::GridPoint { x: 20.0, y: 20.0 }));

    assert!(app.dispatch(HostEvent::TouchEnd { touches: Touches::new() }));
    assert_eq!(app.hover(), None);
    assert_eq!(sink.played(), ["towerShoot"]);
}

#[test]
fn test_mouse_leave_clears_hover() {
    let (mut app, _) = test_app();
    app.dispatch(HostEvent::MouseMove { client: DVec2::new(100.0, 100.0) });
    assert!(app.hover().is_some());
    app.dispatch(HostEvent::MouseLeave);
    assert!(app.hover().is_none());
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn test_frames_drive_update_and_preview() {
    let (mut app, _) = started_app(game_wasm());
    app.start_game();
    app.dispatch(HostEvent::MouseMove { client: DVec2::new(25.0, 41.0) });

    assert_eq!(app.frame(1000.0), FrameOutcome::Rendered { dt: 0.0 });
    let outcome = app.frame(1016.0);
    assert!(matches!(outcome, FrameOutcome::Rendered { dt } if (dt - 0.016).abs() < 1e-9));

    let canvas = app.bridge().context().render.canvas();
    let visible = canvas.visible_ops();
    // circle + label from update, then ring + range circle
    assert_eq!(visible.len(), 4);
    assert!(matches!(visible[3], PaintOp::Circle { radius, .. } if radius == 120.0));
}

#[test]
fn test_trap_in_update_stops_loop_and_reports() {
    let (mut app, _) = started_app(module(&[IMPORTS, STATE, INIT, TRAPPING_UPDATE, CONTROLS]));
    app.start_game();

    assert!(matches!(app.frame(0.0), FrameOutcome::Trapped(_)));
    assert_eq!(app.scheduler().state(), SchedulerState::Idle);
    assert!(app.status().is_error());
    assert!(app.status().text().starts_with("Error: "));
    assert_eq!(app.frame(16.0), FrameOutcome::Skipped);
}
