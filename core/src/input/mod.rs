//! Pointer and keyboard input
//!
//! Mouse and touch streams are folded into three canonical operations:
//! hover (move), leave and commit. Positions are converted to module
//! coordinates and snapped to the center of a 40-unit grid cell.

mod keyboard;

#[cfg(test)]
mod tests;

use glam::{DVec2, Vec2};

pub use keyboard::{Key, KeyCommand, TowerKind, key_command};

use crate::display::{DisplayTransform, SurfaceLayout};

/// Edge length of one placement cell in module units
pub const GRID_CELL_SIZE: f64 = 40.0;

/// Snap one coordinate to the center of its grid cell
pub fn snap_to_grid(v: f64) -> f64 {
    (v / GRID_CELL_SIZE).floor() * GRID_CELL_SIZE + GRID_CELL_SIZE / 2.0
}

/// A grid-cell center in module coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    /// Snap a module-space position to its cell center
    pub fn snap(world: DVec2) -> Self {
        Self {
            x: snap_to_grid(world.x),
            y: snap_to_grid(world.y),
        }
    }

    /// Cells left of or above the surface are never hovered
    pub fn is_on_surface(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Receiver of committed placement points
pub trait CommitSink {
    fn commit(&mut self, at: GridPoint);
}

/// Client-space to module-space mapping used by every pointer handler
#[derive(Clone, Copy)]
pub struct PointerMapping<'a> {
    pub display: &'a DisplayTransform,
    pub layout: &'a dyn SurfaceLayout,
}

impl PointerMapping<'_> {
    fn snap(&self, client: DVec2) -> GridPoint {
        GridPoint::snap(self.display.screen_to_world(client, self.layout))
    }
}

/// Hover state shared by mouse and touch input
#[derive(Debug, Clone, Default)]
pub struct PointerInputUnifier {
    hover: Option<GridPoint>,
}

impl PointerInputUnifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hover cell, if a pointer is over the surface
    pub fn hover(&self) -> Option<GridPoint> {
        self.hover
    }

    /// Pointer moved (or entered) at `client`
    pub fn on_move(&mut self, client: DVec2, mapping: PointerMapping<'_>) {
        let at = mapping.snap(client);
        self.hover = at.is_on_surface().then_some(at);
    }

    /// Pointer left the surface
    pub fn on_leave(&mut self) {
        self.hover = None;
    }

    /// Click at `client`: commit the snapped point
    pub fn on_commit(&mut self, client: DVec2, mapping: PointerMapping<'_>, sink: &mut dyn CommitSink) {
        sink.commit(mapping.snap(client));
    }

    /// Touch began; only a single contact updates the hover
    pub fn on_touch_start(&mut self, touches: &[DVec2], mapping: PointerMapping<'_>) {
        if let [touch] = touches {
            self.on_move(*touch, mapping);
        }
    }

    /// Touch moved; only a single contact updates the hover
    pub fn on_touch_move(&mut self, touches: &[DVec2], mapping: PointerMapping<'_>) {
        if let [touch] = touches {
            self.on_move(*touch, mapping);
        }
    }

    /// Contact ended: commit the last hover cell and clear it
    ///
    /// A release without a prior hover is dropped.
    pub fn on_touch_end(&mut self, sink: &mut dyn CommitSink) {
        if let Some(at) = self.hover.take() {
            sink.commit(at);
        }
    }
}
