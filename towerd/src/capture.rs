//! PNG frame captures
//!
//! Screenshots are written as `<game>_<frame>.png` into the capture
//! directory, numbered by the frame that produced them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::graphics::PixelCanvas;

/// Writes canvas snapshots to a directory
#[derive(Debug, Clone)]
pub struct ScreenCapture {
    dir: PathBuf,
    game_name: String,
    saved: Vec<PathBuf>,
}

impl ScreenCapture {
    pub fn new(dir: impl Into<PathBuf>, game_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            game_name: game_name.into(),
            saved: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Save the canvas as the capture for `frame`
    pub fn save(&mut self, canvas: &PixelCanvas, frame: u64) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create capture directory {}", self.dir.display()))?;

        let path = self.dir.join(format!("{}_{:06}.png", self.game_name, frame));
        canvas
            .image()
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to save screenshot {}", path.display()))?;

        info!("Screenshot saved: {}", path.display());
        self.saved.push(path.clone());
        Ok(path)
    }
}
