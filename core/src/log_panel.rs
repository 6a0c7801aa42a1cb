//! Bounded in-game log of module messages
//!
//! Messages that arrive before the UI is ready are staged and flushed exactly
//! once by [`LogPanel::attach`].

use std::collections::VecDeque;

/// Default number of entries kept in the panel
pub const DEFAULT_PANEL_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct LogPanel {
    staged: Vec<String>,
    entries: VecDeque<String>,
    capacity: usize,
    attached: bool,
    visible: bool,
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_CAPACITY)
    }
}

impl LogPanel {
    pub fn new(capacity: usize) -> Self {
        Self {
            staged: Vec::new(),
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            attached: false,
            visible: true,
        }
    }

    /// Append a message, staging it if the panel is not attached yet
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.attached {
            self.append(message);
        } else {
            self.staged.push(message);
        }
    }

    /// Mark the panel ready and flush staged messages in order
    ///
    /// Returns the number of flushed messages. Later calls flush nothing.
    pub fn attach(&mut self) -> usize {
        if self.attached {
            return 0;
        }
        self.attached = true;

        let staged = std::mem::take(&mut self.staged);
        let flushed = staged.len();
        for message in staged {
            self.append(message);
        }
        flushed
    }

    fn append(&mut self, message: String) {
        self.entries.push_back(message);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Visible history, oldest first
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Show or hide the panel, returning the new visibility
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
