//! towerd Core - host runtime for the towerd game module
//!
//! The game's simulation lives in an externally compiled WebAssembly module.
//! This crate is everything on the host side of that boundary: the import
//! table the module calls into (drawing, audio cues, logging), the export
//! surface the host drives, and the coordinate/input pipeline in between.
//!
//! # Architecture
//!
//! - [`HostBridge`] - module loader, import table and guarded export surface
//! - [`MemoryView`] - `(ptr, len)` string reads from the module's linear memory
//! - [`DisplayTransform`] - internal resolution vs on-screen size
//! - [`PointerInputUnifier`] - mouse/touch hover and commit with grid snapping
//! - [`RenderCallSurface`] - immediate-mode drawing primitives over a [`Canvas2d`]
//! - [`AudioCueBridge`] - fixed cue registry with fire-and-forget playback
//! - [`FrameScheduler`] - Idle/Running/Paused frame loop
//! - [`App`] - explicit context owning all of the above, fed by [`HostEvent`]s

pub mod app;
pub mod audio;
pub mod display;
pub mod fetch;
pub mod input;
#[cfg(test)]
mod integration;
pub mod log_panel;
pub mod render;
pub mod scheduler;
#[cfg(test)]
pub mod test_utils;
pub mod wasm;

pub use app::{App, Config, HostEvent, StartupError, StatusLine};
pub use audio::{AUDIO_REGISTRY, AudioCue, AudioCueBridge, AudioLoadFailure, AudioSink, DecodedClip, NullAudio};
pub use display::{DisplayTransform, Rect, SurfaceLayout, VirtualSurface};
pub use fetch::{AssetFetcher, AssetSource, FetchError};
pub use input::{GRID_CELL_SIZE, GridPoint, Key, KeyCommand, PointerInputUnifier, TowerKind, snap_to_grid};
pub use log_panel::LogPanel;
pub use render::{Canvas2d, PaintOp, PaintStyle, RecordingCanvas, RenderCallSurface, Rgb, Rgba};
pub use scheduler::{FrameOutcome, FrameScheduler, FrameTarget, SchedulerState};
pub use wasm::{
    BridgeContext, BridgeError, HostBridge, MemoryError, MemoryView, ModuleCapabilities,
    ModuleLoadFailure, WasmEngine,
};
