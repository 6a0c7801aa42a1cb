//! towerd - headless player
//!
//! Loads the tower-defense module, preloads its audio and runs it at a fixed
//! frame rate against a software canvas.
//!
//! # Usage
//!
//! ```bash
//! towerd towerd.wasm --assets web/
//! towerd towerd.wasm --script demos/first-wave.toml --capture-dir shots/
//! towerd towerd.wasm --assets https://example.com/game/ --frames 300 --realtime
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use towerd::player::{DEFAULT_FPS, PlayerConfig, run};
use towerd::script::InputScript;
use towerd_core::AssetSource;
use towerd_core::app::config;

#[derive(Parser)]
#[command(name = "towerd")]
#[command(author, version, about = "towerd - headless tower-defense player")]
struct Args {
    /// Game module locator, relative to the asset root
    module: String,

    /// Config file (default: platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Asset root directory or http(s) base URL
    #[arg(long, value_name = "ROOT")]
    assets: Option<String>,

    /// Input script (TOML)
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Frames to run (default: through the last scripted frame, or 600)
    #[arg(long)]
    frames: Option<u64>,

    /// Frame rate used for timestamps and pacing
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Directory for scripted screenshots
    #[arg(long, value_name = "DIR")]
    capture_dir: Option<PathBuf>,

    /// Disable audio output
    #[arg(long)]
    mute: bool,

    /// Pace frames at wall-clock speed
    #[arg(long)]
    realtime: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let mut config = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    config.game.module = args.module;
    if let Some(root) = args.assets {
        config.assets.root = root;
    }

    // Validate local module path exists
    if let AssetSource::Fs(_) = AssetSource::from_root(&config.assets.root) {
        let path = PathBuf::from(&config.assets.root).join(&config.game.module);
        if !path.exists() {
            anyhow::bail!("Module not found: {}", path.display());
        }
    }

    if args.fps == 0 {
        anyhow::bail!("Frame rate must be at least 1");
    }

    let script = args
        .script
        .as_deref()
        .map(InputScript::from_file)
        .transpose()
        .context("Failed to load input script")?;

    let player = PlayerConfig {
        config,
        script,
        frames: args.frames,
        fps: args.fps,
        capture_dir: args.capture_dir,
        mute: args.mute,
        realtime: args.realtime,
    };

    let report = run(player)?;
    if report.trapped {
        anyhow::bail!("{}", report.status);
    }
    for path in &report.screenshots {
        println!("{}", path.display());
    }
    Ok(())
}
