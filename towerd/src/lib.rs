//! towerd - headless player
//!
//! Drives the game module through [`towerd_core::App`] with a software
//! canvas, cpal audio and scripted input. Used by the `towerd` binary and by
//! tooling that renders frames without a browser.

pub mod audio;
pub mod capture;
pub mod graphics;
pub mod player;
pub mod script;

pub use graphics::PixelCanvas;
pub use player::{Player, PlayerConfig, PlayerReport, run};
pub use script::{InputScript, ScriptError, ScriptEvent};
