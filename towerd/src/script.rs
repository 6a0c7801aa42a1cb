//! TOML input scripts for unattended play
//!
//! A script lists frames by number. Each entry carries host events delivered
//! before that frame's animation callback and an optional screenshot request.
//!
//! ```toml
//! [[frames]]
//! f = 0
//! events = [{ type = "start" }, { type = "key", key = "2" }]
//!
//! [[frames]]
//! f = 30
//! events = [{ type = "click", x = 120, y = 80 }]
//! screenshot = true
//! ```

use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use towerd_core::{HostEvent, TowerKind};

/// Script loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate frame: {0}")]
    DuplicateFrame(u64),
}

/// Complete input script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    #[serde(default)]
    pub frames: Vec<FrameEntry>,
}

/// Everything that happens on one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    /// Frame number
    pub f: u64,

    /// Events delivered in order before the frame callback
    #[serde(default)]
    pub events: Vec<ScriptEvent>,

    /// Capture the canvas after this frame
    #[serde(default)]
    pub screenshot: bool,
}

/// A host event in script form; coordinates are client pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Resize { width: f64 },
    MouseMove { x: f64, y: f64 },
    MouseLeave,
    Click { x: f64, y: f64 },
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    Key { key: String },
    Start,
    Pause,
    Tower { kind: TowerKind },
    LogToggle,
}

impl From<&ScriptEvent> for HostEvent {
    fn from(event: &ScriptEvent) -> Self {
        match event {
            ScriptEvent::Resize { width } => HostEvent::Resize {
                container_width: *width,
            },
            ScriptEvent::MouseMove { x, y } => HostEvent::MouseMove {
                client: DVec2::new(*x, *y),
            },
            ScriptEvent::MouseLeave => HostEvent::MouseLeave,
            ScriptEvent::Click { x, y } => HostEvent::MouseClick {
                client: DVec2::new(*x, *y),
            },
            ScriptEvent::TouchStart { x, y } => HostEvent::TouchStart {
                touches: HostEvent::touch(DVec2::new(*x, *y)),
            },
            ScriptEvent::TouchMove { x, y } => HostEvent::TouchMove {
                touches: HostEvent::touch(DVec2::new(*x, *y)),
            },
            ScriptEvent::TouchEnd => HostEvent::TouchEnd {
                touches: Default::default(),
            },
            ScriptEvent::Key { key } => HostEvent::key(key),
            ScriptEvent::Start => HostEvent::StartButton,
            ScriptEvent::Pause => HostEvent::PauseButton,
            ScriptEvent::Tower { kind } => HostEvent::TowerButton(*kind),
            ScriptEvent::LogToggle => HostEvent::LogToggle,
        }
    }
}

impl InputScript {
    /// Parse and validate a script; entries come back sorted by frame
    pub fn from_toml(source: &str) -> Result<Self, ScriptError> {
        let mut script: Self = toml::from_str(source)?;
        script.frames.sort_by_key(|entry| entry.f);
        if let Some(pair) = script.frames.windows(2).find(|pair| pair[0].f == pair[1].f) {
            return Err(ScriptError::DuplicateFrame(pair[0].f));
        }
        Ok(script)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Entry for frame `f`, if any
    pub fn entry(&self, f: u64) -> Option<&FrameEntry> {
        self.frames
            .binary_search_by_key(&f, |entry| entry.f)
            .ok()
            .map(|i| &self.frames[i])
    }

    /// Last frame with an entry
    pub fn last_frame(&self) -> Option<u64> {
        self.frames.last().map(|entry| entry.f)
    }
}
