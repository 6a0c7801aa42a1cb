//! Store data reachable from host functions

use crate::audio::AudioCueBridge;
use crate::log_panel::LogPanel;
use crate::render::{Canvas2d, RenderCallSurface};

/// Log target for messages emitted by the game module
pub const GAME_LOG_TARGET: &str = "towerd::game";

/// Everything the import table needs while the module runs
///
/// Owned by the wasmtime `Store`; host functions reach it through
/// `Caller::data_mut`.
pub struct BridgeContext<C: Canvas2d> {
    /// Drawing surface for `clearCanvas` and `draw*`
    pub render: RenderCallSurface<C>,
    /// Cue triggers for `play*Sound`
    pub audio: AudioCueBridge,
    /// Destination of `consoleLog`
    pub log: LogPanel,
}

impl<C: Canvas2d> BridgeContext<C> {
    pub fn new(canvas: C, audio: AudioCueBridge, log: LogPanel) -> Self {
        Self {
            render: RenderCallSurface::new(canvas),
            audio,
            log,
        }
    }

    /// Record a message from the module (or the host on its behalf)
    pub fn log_message(&mut self, message: &str) {
        tracing::info!(target: GAME_LOG_TARGET, "{}", message);
        self.log.push(message);
    }
}
