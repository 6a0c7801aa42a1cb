//! Frame loop state machine
//!
//! The host delivers animation-frame callbacks with a millisecond timestamp.
//! The scheduler decides whether a callback advances the game, computes the
//! frame delta, and keeps at most one frame request outstanding.


use crate::input::GridPoint;
use crate::wasm::BridgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Never started, or stopped after a trap
    #[default]
    Idle,
    Running,
    Paused,
}

/// What a frame callback drives
pub trait FrameTarget {
    /// Advance the simulation by `dt` seconds
    fn update(&mut self, dt: f64) -> Result<(), BridgeError>;

    /// Draw the placement preview for the hovered cell
    fn render_preview(&mut self, at: GridPoint) -> Result<(), BridgeError>;
}

/// Result of delivering one frame callback
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The game advanced by `dt` seconds and the next frame was requested
    Rendered { dt: f64 },
    /// The loop is paused or idle; no new frame was requested
    Stopped,
    /// No frame was pending; the callback was ignored
    Skipped,
    /// The module trapped; the loop is back to Idle
    Trapped(BridgeError),
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: SchedulerState,
    frame_pending: bool,
    frames_requested: u64,
    last_timestamp: Option<f64>,
    max_delta: Option<f64>,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FrameScheduler {
    /// `max_delta_secs` caps each frame delta; `None` passes wall time through
    pub fn new(max_delta_secs: Option<f64>) -> Self {
        let max_delta = max_delta_secs.filter(|max| max.is_finite() && *max > 0.0);
        Self {
            state: SchedulerState::Idle,
            frame_pending: false,
            frames_requested: 0,
            last_timestamp: None,
            max_delta,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Idle/Paused -> Running. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.state == SchedulerState::Running {
            return false;
        }
        if self.state == SchedulerState::Idle || !self.frame_pending {
            self.last_timestamp = None;
        }
        self.state = SchedulerState::Running;
        self.request_frame();
        true
    }

    /// Running -> Paused. The pending callback sees the new state and stops.
    pub fn pause(&mut self) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }
        self.state = SchedulerState::Paused;
        true
    }

    /// Paused -> Running, requesting a frame only if none is pending.
    ///
    /// If the in-flight callback has not run yet the loop never stopped, so
    /// the previous timestamp stays the baseline for the next delta.
    pub fn resume(&mut self) -> bool {
        if self.state != SchedulerState::Paused {
            return false;
        }
        self.state = SchedulerState::Running;
        if !self.frame_pending {
            self.last_timestamp = None;
        }
        self.request_frame();
        true
    }

    /// Back to Idle; a pending callback will be ignored
    pub fn stop(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Ask for the next animation frame unless one is already pending
    pub fn request_frame(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        self.frames_requested += 1;
        true
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frame_pending
    }

    /// Total frame requests issued so far
    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    /// Deliver an animation-frame callback
    pub fn on_frame(
        &mut self,
        timestamp_ms: f64,
        target: &mut impl FrameTarget,
        hover: Option<GridPoint>,
    ) -> FrameOutcome {
        if !self.frame_pending {
            return FrameOutcome::Skipped;
        }
        self.frame_pending = false;

        if self.state != SchedulerState::Running {
            return FrameOutcome::Stopped;
        }

        let dt = self.delta(timestamp_ms);

        let result = target
            .update(dt)
            .and_then(|()| match hover {
                Some(at) => target.render_preview(at),
                None => Ok(()),
            });
        if let Err(e) = result {
            tracing::error!("Frame loop stopped: {}", e);
            self.state = SchedulerState::Idle;
            return FrameOutcome::Trapped(e);
        }

        self.request_frame();
        FrameOutcome::Rendered { dt }
    }

    /// Seconds since the previous callback; the first callback is the baseline
    fn delta(&mut self, timestamp_ms: f64) -> f64 {
        if !timestamp_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_timestamp.replace(timestamp_ms) {
            Some(prev) => (timestamp_ms - prev) / 1000.0,
            None => 0.0,
        };
        if !(dt.is_finite() && dt > 0.0) {
            return 0.0;
        }
        match self.max_delta {
            Some(max) => dt.min(max),
            None => dt,
        }
    }
}
