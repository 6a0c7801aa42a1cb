//! Headless player
//!
//! Runs the game module against a software canvas at a fixed frame rate.
//! Host events come from an input script; frame `f` is delivered with the
//! timestamp `f * 1000 / fps` milliseconds, so runs are reproducible.
//!
//! Without a script the player presses Start on the first frame and lets
//! the game run on its own.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use glam::DVec2;
use tracing::{debug, info, warn};

use towerd_core::{
    App, AssetFetcher, AssetSource, AudioCueBridge, AudioSink, Config, FrameOutcome, HostEvent,
    ModuleCapabilities, VirtualSurface, WasmEngine,
};

use crate::audio;
use crate::capture::ScreenCapture;
use crate::graphics::PixelCanvas;
use crate::script::InputScript;

/// Frames run when neither `--frames` nor a script bounds the session
pub const DEFAULT_FRAME_COUNT: u64 = 600;

/// Default frame rate for timestamps and `--realtime` pacing
pub const DEFAULT_FPS: u32 = 60;

/// Player configuration passed from CLI
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Loaded configuration, with CLI overrides already applied
    pub config: Config,
    /// Scripted input; `None` auto-starts the game
    pub script: Option<InputScript>,
    /// Frames to run (default: through the last scripted frame)
    pub frames: Option<u64>,
    pub fps: u32,
    /// Where `screenshot = true` frames are written
    pub capture_dir: Option<PathBuf>,
    pub mute: bool,
    /// Pace frames at wall-clock speed instead of as fast as possible
    pub realtime: bool,
}

impl PlayerConfig {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            script: None,
            frames: None,
            fps: DEFAULT_FPS,
            capture_dir: None,
            mute: false,
            realtime: false,
        }
    }

    /// Number of frames the session runs
    pub fn frame_count(&self) -> u64 {
        self.frames.unwrap_or_else(|| {
            self.script
                .as_ref()
                .and_then(InputScript::last_frame)
                .map_or(DEFAULT_FRAME_COUNT, |last| last + 1)
        })
    }
}

/// What a finished session looked like
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub frames_run: u64,
    /// Frames the module actually rendered
    pub frames_rendered: u64,
    pub screenshots: Vec<PathBuf>,
    /// Final status line text
    pub status: String,
    /// The session ended on a trap
    pub trapped: bool,
}

/// The application plus script playback state
pub struct Player {
    app: App<PixelCanvas>,
    script: InputScript,
    autostart: bool,
    fps: u32,
    capture: Option<ScreenCapture>,
    frame: u64,
    rendered: u64,
}

impl Player {
    /// Build the application around a software canvas and the given sink
    pub fn new(config: &PlayerConfig, sink: Box<dyn AudioSink>) -> Result<Self> {
        if config.fps == 0 {
            bail!("Frame rate must be at least 1");
        }

        let game = &config.config.game;
        let engine = WasmEngine::new().context("Failed to create WASM engine")?;
        let canvas = PixelCanvas::new(game.width, game.height);
        let layout = VirtualSurface::new(DVec2::ZERO, config.config.display.device_pixel_ratio);
        let app = App::new(
            &config.config,
            engine,
            canvas,
            AudioCueBridge::new(sink),
            Box::new(layout),
        );

        let capture = config.capture_dir.as_ref().map(|dir| {
            let name = game
                .module
                .rsplit('/')
                .next()
                .and_then(|file| file.split('.').next())
                .filter(|stem| !stem.is_empty())
                .unwrap_or("towerd");
            ScreenCapture::new(dir, name)
        });
        if let Some(capture) = &capture {
            info!("Screenshots go to {}", capture.dir().display());
        }

        Ok(Self {
            app,
            script: config.script.clone().unwrap_or_default(),
            autostart: config.script.is_none(),
            fps: config.fps,
            capture,
            frame: 0,
            rendered: 0,
        })
    }

    pub fn app(&self) -> &App<PixelCanvas> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<PixelCanvas> {
        &mut self.app
    }

    /// Next frame number to run
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Where screenshots are written, if capturing
    pub fn capture_dir(&self) -> Option<&Path> {
        self.capture.as_ref().map(|capture| capture.dir())
    }

    /// Timestamp delivered with frame `f`
    pub fn timestamp_ms(&self, f: u64) -> f64 {
        f as f64 * 1000.0 / f64::from(self.fps)
    }

    /// Run the startup sequence against an asset source
    pub async fn start_up<F: AssetFetcher>(&mut self, fetcher: &F) -> Result<ModuleCapabilities> {
        let capabilities = self
            .app
            .start_up(fetcher)
            .await
            .with_context(|| format!("Failed to start {}", self.app.module_locator()))?;
        info!(
            "Module ready (setScale: {}, resetGame: {})",
            capabilities.set_scale, capabilities.reset_game
        );
        Ok(capabilities)
    }

    /// Deliver this frame's events and animation callback
    pub fn step(&mut self) -> Result<FrameOutcome> {
        let f = self.frame;
        self.frame += 1;

        if f == 0 && self.autostart {
            self.app.dispatch(HostEvent::StartButton);
        }

        let mut screenshot = false;
        if let Some(entry) = self.script.entry(f) {
            for event in &entry.events {
                debug!("Frame {}: {:?}", f, event);
                self.app.dispatch(HostEvent::from(event));
            }
            screenshot = entry.screenshot;
        }

        let outcome = self.app.frame(self.timestamp_ms(f));
        if matches!(outcome, FrameOutcome::Rendered { .. }) {
            self.rendered += 1;
        }

        if screenshot {
            match self.capture.as_mut() {
                Some(capture) => {
                    capture.save(self.app.bridge().context().render.canvas(), f)?;
                }
                None => warn!("Frame {} requests a screenshot but no capture directory is set", f),
            }
        }

        Ok(outcome)
    }

    /// Run `frames` frames, optionally paced at `fps`
    pub async fn run(&mut self, frames: u64, realtime: bool) -> Result<PlayerReport> {
        let mut interval = realtime.then(|| {
            let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(self.fps)));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval
        });

        let mut trapped = false;
        while self.frame < frames {
            if let Some(interval) = interval.as_mut() {
                interval.tick().await;
            }
            if let FrameOutcome::Trapped(e) = self.step()? {
                warn!("Frame {} trapped: {}", self.frame - 1, e);
                trapped = true;
                break;
            }
        }

        Ok(self.report(trapped))
    }

    fn report(&self, trapped: bool) -> PlayerReport {
        PlayerReport {
            frames_run: self.frame,
            frames_rendered: self.rendered,
            screenshots: self
                .capture
                .as_ref()
                .map(|capture| capture.saved().to_vec())
                .unwrap_or_default(),
            status: self.app.status().text().to_string(),
            trapped,
        }
    }
}

/// Run a full session on a current-thread runtime
pub fn run(config: PlayerConfig) -> Result<PlayerReport> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    runtime.block_on(async {
        let fetcher = AssetSource::from_root(&config.config.assets.root);
        let sink = audio::open_sink(&config.config.audio, config.mute);
        let mut player = Player::new(&config, sink)?;

        player.start_up(&fetcher).await?;
        let report = player.run(config.frame_count(), config.realtime).await?;

        info!(
            "Ran {} frames ({} rendered), status: {}",
            report.frames_run, report.frames_rendered, report.status
        );
        Ok(report)
    })
}
