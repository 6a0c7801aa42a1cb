//! Application shell
//!
//! [`App`] is the single owner of every host component. Platform callbacks
//! arrive as [`HostEvent`]s and run to completion one at a time.

pub mod config;
mod event;
mod startup;
mod status;

#[cfg(test)]
mod tests;

use glam::DVec2;

pub use config::Config;
pub use event::{HostEvent, Touches};
pub use startup::StartupError;
pub use status::{
    STATUS_LOADING, STATUS_PAUSED, STATUS_READY, STATUS_RESUMED, STATUS_STARTED, StatusLine,
};

use crate::audio::AudioCueBridge;
use crate::display::{DisplayTransform, SurfaceLayout};
use crate::input::{
    CommitSink, GridPoint, Key, KeyCommand, PointerInputUnifier, PointerMapping, TowerKind,
    key_command,
};
use crate::log_panel::LogPanel;
use crate::render::Canvas2d;
use crate::scheduler::{FrameOutcome, FrameScheduler, SchedulerState};
use crate::wasm::{BridgeContext, BridgeError, HostBridge, WasmEngine};

pub struct App<C: Canvas2d + 'static> {
    bridge: HostBridge<C>,
    display: DisplayTransform,
    layout: Box<dyn SurfaceLayout>,
    input: PointerInputUnifier,
    scheduler: FrameScheduler,
    status: StatusLine,
    selected_tower: TowerKind,
    module_locator: String,
}

impl<C: Canvas2d + 'static> App<C> {
    /// Wire up every component and fit the surface to the configured width
    ///
    /// The internal resolution is taken from the canvas.
    pub fn new(
        config: &Config,
        engine: WasmEngine,
        canvas: C,
        audio: AudioCueBridge,
        layout: Box<dyn SurfaceLayout>,
    ) -> Self {
        let (width, height) = canvas.resolution();
        let log = LogPanel::new(config.log.panel_capacity);
        let mut app = Self {
            bridge: HostBridge::new(engine, BridgeContext::new(canvas, audio, log)),
            display: DisplayTransform::new(width, height),
            layout,
            input: PointerInputUnifier::new(),
            scheduler: FrameScheduler::new(config.scheduler.max_delta_secs),
            status: StatusLine::default(),
            selected_tower: TowerKind::None,
            module_locator: config.game.module.clone(),
        };
        app.resize(config.display.container_width);
        app
    }

    pub fn bridge(&self) -> &HostBridge<C> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut HostBridge<C> {
        &mut self.bridge
    }

    pub fn display(&self) -> &DisplayTransform {
        &self.display
    }

    pub fn layout(&self) -> &dyn SurfaceLayout {
        self.layout.as_ref()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn hover(&self) -> Option<GridPoint> {
        self.input.hover()
    }

    /// Tower kind highlighted in the UI
    pub fn selected_tower(&self) -> TowerKind {
        self.selected_tower
    }

    pub fn log_panel(&self) -> &LogPanel {
        &self.bridge.context().log
    }

    pub fn module_locator(&self) -> &str {
        &self.module_locator
    }

    /// Attach the log panel, flushing anything logged so far
    pub fn initialize_ui(&mut self) {
        let flushed = self.bridge.context_mut().log.attach();
        tracing::debug!("UI initialized ({} staged log messages)", flushed);
    }

    /// Refit the surface to a new container width and inform the module
    pub fn resize(&mut self, container_width: f64) -> Option<DVec2> {
        let scale = self.display.recompute(container_width, self.layout.as_mut())?;
        if let Err(e) = self.bridge.set_scale(scale.x, scale.y) {
            self.fail(e);
        }
        Some(scale)
    }

    /// Reset the game (when supported) and start or continue the frame loop
    pub fn start_game(&mut self) {
        if !self.bridge.is_loaded() {
            return;
        }
        if let Err(e) = self.bridge.reset_game() {
            self.fail(e);
            return;
        }
        self.status.set(STATUS_STARTED);
        self.scheduler.start();
    }

    /// Pause a running loop or resume a paused one
    ///
    /// Ignored before the module is loaded and before the game was started.
    pub fn toggle_pause(&mut self) {
        if !self.bridge.is_loaded() {
            return;
        }
        match self.scheduler.state() {
            SchedulerState::Running => {
                self.scheduler.pause();
                self.status.set(STATUS_PAUSED);
            }
            SchedulerState::Paused => {
                self.scheduler.resume();
                self.status.set(STATUS_RESUMED);
            }
            SchedulerState::Idle => {}
        }
    }

    /// Highlight a tower kind and forward it to the module
    pub fn select_tower(&mut self, kind: TowerKind) {
        self.selected_tower = kind;
        if let Err(e) = self.bridge.select_tower_type(kind) {
            self.fail(e);
        }
    }

    /// Apply a keyboard shortcut; returns true if default handling is suppressed
    pub fn handle_key(&mut self, key: &Key) -> bool {
        if !self.bridge.is_loaded() {
            return false;
        }
        match key_command(key) {
            Some(KeyCommand::SelectTower(kind)) => {
                self.select_tower(kind);
                false
            }
            Some(KeyCommand::TogglePause) => {
                self.toggle_pause();
                true
            }
            None => false,
        }
    }

    /// Deliver one host event; returns true if default handling is suppressed
    pub fn dispatch(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Resize { container_width } => {
                self.resize(container_width);
                false
            }
            HostEvent::MouseMove { client } => {
                let mapping = PointerMapping {
                    display: &self.display,
                    layout: self.layout.as_ref(),
                };
                self.input.on_move(client, mapping);
                false
            }
            HostEvent::MouseLeave => {
                self.input.on_leave();
                false
            }
            HostEvent::MouseClick { client } => {
                let mapping = PointerMapping {
                    display: &self.display,
                    layout: self.layout.as_ref(),
                };
                let mut gate = ClickGate::new(&mut self.bridge, &self.scheduler);
                self.input.on_commit(client, mapping, &mut gate);
                let trap = gate.trap;
                self.settle(trap);
                false
            }
            HostEvent::TouchStart { touches } => {
                let mapping = PointerMapping {
                    display: &self.display,
                    layout: self.layout.as_ref(),
                };
                self.input.on_touch_start(&touches, mapping);
                true
            }
            HostEvent::TouchMove { touches } => {
                let mapping = PointerMapping {
                    display: &self.display,
                    layout: self.layout.as_ref(),
                };
                self.input.on_touch_move(&touches, mapping);
                true
            }
            HostEvent::TouchEnd { .. } => {
                let mut gate = ClickGate::new(&mut self.bridge, &self.scheduler);
                self.input.on_touch_end(&mut gate);
                let trap = gate.trap;
                self.settle(trap);
                true
            }
            HostEvent::Key(key) => self.handle_key(&key),
            HostEvent::StartButton => {
                self.start_game();
                false
            }
            HostEvent::PauseButton => {
                self.toggle_pause();
                false
            }
            HostEvent::TowerButton(kind) => {
                self.select_tower(kind);
                false
            }
            HostEvent::LogToggle => {
                self.bridge.context_mut().log.toggle_visibility();
                false
            }
            HostEvent::AnimationFrame { timestamp_ms } => {
                self.frame(timestamp_ms);
                false
            }
        }
    }

    /// Deliver an animation-frame callback to the scheduler
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        let hover = self.input.hover();
        let outcome = self.scheduler.on_frame(timestamp_ms, &mut self.bridge, hover);
        if let FrameOutcome::Trapped(e) = &outcome {
            self.status.set_error(e);
        }
        outcome
    }

    fn settle(&mut self, trap: Option<BridgeError>) {
        if let Some(e) = trap {
            self.fail(e);
        }
    }

    /// A call into the module trapped: stop the loop and show the error
    fn fail(&mut self, error: BridgeError) {
        self.scheduler.stop();
        self.status.set_error(&error);
    }
}

/// Commit sink that forwards to `handleClick` unless the game is paused
struct ClickGate<'a, C: Canvas2d + 'static> {
    bridge: &'a mut HostBridge<C>,
    paused: bool,
    trap: Option<BridgeError>,
}

impl<'a, C: Canvas2d + 'static> ClickGate<'a, C> {
    fn new(bridge: &'a mut HostBridge<C>, scheduler: &FrameScheduler) -> Self {
        Self {
            bridge,
            paused: scheduler.state() == SchedulerState::Paused,
            trap: None,
        }
    }
}

impl<C: Canvas2d + 'static> CommitSink for ClickGate<'_, C> {
    fn commit(&mut self, at: GridPoint) {
        if self.paused {
            tracing::debug!("Click at ({}, {}) ignored while paused", at.x, at.y);
            return;
        }
        if let Err(e) = self.bridge.handle_click(at.x, at.y) {
            self.trap = Some(e);
        }
    }
}
