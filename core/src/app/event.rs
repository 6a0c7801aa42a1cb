//! Host events delivered to the application

use glam::DVec2;
use smallvec::SmallVec;

use crate::input::{Key, TowerKind};

/// Active touch contacts in client coordinates
pub type Touches = SmallVec<[DVec2; 2]>;

/// Everything the platform can tell the application
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The container was resized to a new width (screen pixels)
    Resize { container_width: f64 },
    MouseMove { client: DVec2 },
    MouseLeave,
    MouseClick { client: DVec2 },
    TouchStart { touches: Touches },
    TouchMove { touches: Touches },
    /// A contact ended; `touches` are the contacts still down
    TouchEnd { touches: Touches },
    Key(Key),
    StartButton,
    PauseButton,
    TowerButton(TowerKind),
    LogToggle,
    /// Animation-frame callback with a millisecond timestamp
    AnimationFrame { timestamp_ms: f64 },
}

impl HostEvent {
    /// Key press by platform key name
    pub fn key(name: &str) -> Self {
        HostEvent::Key(Key::from_name(name))
    }

    /// Single-contact touch helper
    pub fn touch(client: DVec2) -> Touches {
        smallvec::smallvec![client]
    }
}
