//! Input pipeline tests

use glam::DVec2;

use super::*;
use crate::display::VirtualSurface;

#[derive(Default)]
struct Commits(Vec<GridPoint>);

impl CommitSink for Commits {
    fn commit(&mut self, at: GridPoint) {
        self.0.push(at);
    }
}

fn identity() -> (DisplayTransform, VirtualSurface) {
    let mut display = DisplayTransform::new(800, 600);
    let mut layout = VirtualSurface::new(DVec2::ZERO, 1.0);
    display.recompute(800.0, &mut layout);
    (display, layout)
}

fn point(x: f64, y: f64) -> GridPoint {
    GridPoint { x, y }
}

// ============================================================================
// Grid snapping
// ============================================================================

#[test]
fn test_snap_examples() {
    assert_eq!(GridPoint::snap(DVec2::new(5.0, 5.0)), point(20.0, 20.0));
    assert_eq!(GridPoint::snap(DVec2::new(45.0, 81.0)), point(60.0, 100.0));
    assert_eq!(GridPoint::snap(DVec2::new(40.0, 79.999)), point(60.0, 60.0));
}

#[test]
fn test_snap_is_idempotent() {
    for v in [-95.0, -0.5, 0.0, 7.25, 39.999, 40.0, 123.4, 799.0] {
        let once = snap_to_grid(v);
        assert_eq!(snap_to_grid(once), once, "value {v}");
    }
}

#[test]
fn test_snap_negative_coordinates() {
    assert_eq!(snap_to_grid(-1.0), -20.0);
    assert!(!GridPoint::snap(DVec2::new(-1.0, 5.0)).is_on_surface());
}

// ============================================================================
// Hover and commit
// ============================================================================

#[test]
fn test_move_sets_hover_and_leave_clears() {
    let (display, layout) = identity();
    let mapping = PointerMapping { display: &display, layout: &layout };
    let mut input = PointerInputUnifier::new();

    input.on_move(DVec2::new(45.0, 81.0), mapping);
    assert_eq!(input.hover(), Some(point(60.0, 100.0)));

    input.on_leave();
    assert_eq!(input.hover(), None);
}

#[test]
fn test_move_uses_display_scale() {
    let mut display = DisplayTransform::new(800, 600);
    let mut layout = VirtualSurface::new(DVec2::new(100.0, 20.0), 1.0);
    display.recompute(400.0, &mut layout);
    let mapping = PointerMapping { display: &display, layout: &layout };
    let mut input = PointerInputUnifier::new();

    // (125, 40) client -> (25, 20) on surface -> (50, 40) world
    input.on_move(DVec2::new(125.0, 40.0), mapping);
    assert_eq!(input.hover(), Some(point(60.0, 60.0)));
}

#[test]
fn test_move_off_surface_clears_hover() {
    let (display, layout) = identity();
    let mapping = PointerMapping { display: &display, layout: &layout };
    let mut input = PointerInputUnifier::new();

    input.on_move(DVec2::new(10.0, 10.0), mapping);
    input.on_move(DVec2::new(-3.0, 10.0), mapping);
    assert_eq!(input.hover(), None);
}

#[test]
fn test_click_commits_snapped_point() {
    let (display, layout) = identity();
    let mapping = PointerMapping { display: &display, layout: &layout };
    let mut input = PointerInputUnifier::new();
    let mut sink = Commits::default();

    input.on_commit(DVec2::new(5.0, 5.0), mapping, &mut sink);
    assert_eq!(sink.0, [point(20.0, 20.0)]);
    assert_eq!(input.hover(), None);
}

// ============================================================================
// Touch
// ============================================================================

#[test]
fn test_single_touch_hovers_then_commits_on_release() {
    let (display, layout) = identity();
    let mapping = PointerMapping { display: &display, layout: &layout };
    let mut input = PointerInputUnifier::new();
    let mut sink = Commits::default();

    input.on_touch_start(&[DVec2::new(5.0, 5.0)], mapping);
    input.on_touch_move(&[DVec2::new(45.0, 81.0)], mapping);
    input.on_touch_end(&mut sink);

    assert_eq!(sink.0, [point(60.0, 100.0)]);
    assert_eq!(input.hover(), None);
}

#[test]
fn test_multi_touch_is_ignored_for_hover() {
    let (display, layout) = identity();
    let mapping = PointerMapping { display: &display, layout: &layout };
    let mut input = PointerInputUnifier::new();

    input.on_touch_start(&[DVec2::new(5.0, 5.0)], mapping);
    input.on_touch_move(&[DVec2::new(300.0, 300.0), DVec2::new(10.0, 10.0)], mapping);
    assert_eq!(input.hover(), Some(point(20.0, 20.0)));

    input.on_touch_move(&[], mapping);
    assert_eq!(input.hover(), Some(point(20.0, 20.0)));
}

#[test]
fn test_release_without_hover_is_dropped() {
    let mut input = PointerInputUnifier::new();
    let mut sink = Commits::default();

    input.on_touch_end(&mut sink);
    assert!(sink.0.is_empty());
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn test_key_names() {
    assert_eq!(Key::from_name("3"), Key::Digit(3));
    assert_eq!(Key::from_name("Escape"), Key::Escape);
    assert_eq!(Key::from_name(" "), Key::Space);
    assert_eq!(Key::from_name("q"), Key::Other("q".to_string()));
    assert_eq!(Key::from_name("12"), Key::Other("12".to_string()));
}

#[test]
fn test_key_commands() {
    assert_eq!(key_command(&Key::Digit(1)), Some(KeyCommand::SelectTower(TowerKind::Line)));
    assert_eq!(key_command(&Key::Digit(4)), Some(KeyCommand::SelectTower(TowerKind::Pentagon)));
    assert_eq!(key_command(&Key::Escape), Some(KeyCommand::SelectTower(TowerKind::None)));
    assert_eq!(key_command(&Key::Space), Some(KeyCommand::TogglePause));
    assert_eq!(key_command(&Key::Digit(0)), None);
    assert_eq!(key_command(&Key::Digit(5)), None);
}

#[test]
fn test_tower_codes() {
    assert_eq!(TowerKind::Square.code(), 3);
    assert_eq!(TowerKind::from_code(2), Some(TowerKind::Triangle));
    assert_eq!(TowerKind::from_code(9), None);
}
