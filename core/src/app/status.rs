//! One-line status display

pub const STATUS_LOADING: &str = "Loading audio and WASM...";
pub const STATUS_READY: &str = "Game ready";
pub const STATUS_STARTED: &str = "Game started";
pub const STATUS_PAUSED: &str = "Game paused";
pub const STATUS_RESUMED: &str = "Game resumed";

/// Latest status text shown to the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    error: bool,
}

impl StatusLine {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.error = false;
        tracing::info!("Status: {}", self.text);
    }

    /// Show an error as `Error: <message>`
    pub fn set_error(&mut self, error: &dyn std::error::Error) {
        self.text = format!("Error: {error}");
        self.error = true;
        tracing::error!("Status: {}", self.text);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}
