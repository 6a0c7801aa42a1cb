//! Shared test fixtures: WAT game modules, recording audio, mock fetching

use std::sync::{Arc, Mutex};

use glam::DVec2;
use hashbrown::HashMap;

use crate::app::{App, Config};
use crate::audio::{AUDIO_REGISTRY, AudioCueBridge, AudioSink, DecodedClip};
use crate::display::VirtualSurface;
use crate::fetch::{AssetFetcher, FetchError};
use crate::log_panel::LogPanel;
use crate::render::RecordingCanvas;
use crate::wasm::{BridgeContext, HostBridge, WasmEngine};

// ============================================================================
// WAT fixtures
// ============================================================================

/// Imports used by the fixture game
pub const IMPORTS: &str = r#"
  (import "env" "consoleLog" (func $log (param i32 i32)))
  (import "env" "clearCanvas" (func $clear))
  (import "env" "drawRect" (func $rect (param f32 f32 f32 f32 i32 i32 i32)))
  (import "env" "drawCircle" (func $circle (param f64 f64 f64 i32 i32 i32 i32)))
  (import "env" "drawText" (func $text (param f32 f32 i32 i32 f32 i32 i32 i32)))
  (import "env" "playTowerShootSound" (func $shoot))
  (import "env" "playEnemyHitSound" (func $hit))
"#;

/// Memory with two strings: "wave 1" at 16 and "reset" at 32
pub const STATE: &str = r#"
  (memory (export "memory") 1)
  (data (i32.const 16) "wave 1")
  (data (i32.const 32) "reset")
"#;

/// Paints a rect of the init size and logs "wave 1"
pub const INIT: &str = r#"
  (func (export "init") (param $w i32) (param $h i32)
    (call $rect (f32.const 0) (f32.const 0)
      (f32.convert_i32_s (local.get $w)) (f32.convert_i32_s (local.get $h))
      (i32.const 0) (i32.const 0) (i32.const 0))
    (call $log (i32.const 16) (i32.const 6)))
"#;

/// Clears, then draws a circle whose radius is dt in milliseconds and a label
pub const UPDATE: &str = r#"
  (func (export "update") (param $dt f64)
    (call $clear)
    (call $circle (f64.const 100) (f64.const 100)
      (f64.mul (local.get $dt) (f64.const 1000))
      (i32.const 255) (i32.const 0) (i32.const 0) (i32.const 1))
    (call $text (f32.const 10) (f32.const 20) (i32.const 16) (i32.const 6)
      (f32.const 16) (i32.const 255) (i32.const 255) (i32.const 255)))
"#;

/// Click draws a 40x40 rect at the click point and plays towerShoot;
/// selectTowerType draws a circle with radius = kind;
/// only cells left of x=400 are placeable; range is always 120
pub const CONTROLS: &str = r#"
  (func (export "handleClick") (param $x f32) (param $y f32)
    (call $rect (local.get $x) (local.get $y) (f32.const 40) (f32.const 40)
      (i32.const 0) (i32.const 255) (i32.const 0))
    (call $shoot))
  (func (export "selectTowerType") (param $kind i32)
    (call $circle (f64.const 0) (f64.const 0) (f64.convert_i32_s (local.get $kind))
      (i32.const 0) (i32.const 0) (i32.const 255) (i32.const 0)))
  (func (export "canPlaceTower") (param $x f32) (param $y f32) (result i32)
    (f32.lt (local.get $x) (f32.const 400)))
  (func (export "getTowerRange") (result f32)
    (f32.const 120))
"#;

/// setScale draws a zero-radius circle at (sx, sy); resetGame logs "reset"
pub const OPTIONAL: &str = r#"
  (func (export "setScale") (param $sx f64) (param $sy f64)
    (call $circle (local.get $sx) (local.get $sy) (f64.const 0)
      (i32.const 1) (i32.const 1) (i32.const 1) (i32.const 0)))
  (func (export "resetGame")
    (call $log (i32.const 32) (i32.const 5))
    (call $hit))
"#;

/// update that traps
pub const TRAPPING_UPDATE: &str = r#"
  (func (export "update") (param f64)
    unreachable)
"#;

/// init that traps
pub const TRAPPING_INIT: &str = r#"
  (func (export "init") (param i32 i32)
    unreachable)
"#;

/// update that logs and draws a string reaching past the end of memory
pub const OUT_OF_BOUNDS_UPDATE: &str = r#"
  (func (export "update") (param f64)
    (call $log (i32.const 65530) (i32.const 100))
    (call $text (f32.const 5) (f32.const 5) (i32.const 65530) (i32.const 100)
      (f32.const 12) (i32.const 0) (i32.const 0) (i32.const 0)))
"#;

/// Assemble a module from WAT fragments
pub fn module(parts: &[&str]) -> Vec<u8> {
    let source = format!("(module {})", parts.concat());
    wat::parse_str(&source).expect("fixture WAT should parse")
}

/// Game with the full required surface and no optional exports
pub fn game_wasm() -> Vec<u8> {
    module(&[IMPORTS, STATE, INIT, UPDATE, CONTROLS])
}

/// Game that also exports setScale and resetGame
pub fn full_game_wasm() -> Vec<u8> {
    module(&[IMPORTS, STATE, INIT, UPDATE, CONTROLS, OPTIONAL])
}

// ============================================================================
// Audio
// ============================================================================

/// Audio sink that records the cue name of every playback
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    played: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: &str, _clip: Arc<DecodedClip>) {
        self.played.lock().unwrap().push(cue.to_string());
    }
}

/// A short 16-bit mono WAV file
pub fn wav_bytes() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22_050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..64i16 {
            writer.write_sample(i * 256).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Run a future to completion on a current-thread runtime
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

/// Audio bridge over the full registry with every clip decoded
pub fn ready_audio(sink: RecordingSink) -> AudioCueBridge {
    let mut audio = AudioCueBridge::new(Box::new(sink));
    block_on(audio.preload(&MockFetcher::with_audio())).unwrap();
    audio
}

// ============================================================================
// Fetching
// ============================================================================

/// In-memory asset store that records every request
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    assets: HashMap<String, Vec<u8>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Every registry cue as a valid WAV
    pub fn with_audio() -> Self {
        let mut fetcher = Self::default();
        for cue in AUDIO_REGISTRY {
            fetcher.assets.insert(cue.source.to_string(), wav_bytes());
        }
        fetcher
    }

    /// Registry audio plus the fixture game under the default locator
    pub fn with_game(wasm: Vec<u8>) -> Self {
        Self::with_audio().insert(&Config::default().game.module, wasm)
    }

    pub fn insert(mut self, locator: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(locator.to_string(), bytes);
        self
    }

    pub fn remove(mut self, locator: &str) -> Self {
        self.assets.remove(locator);
        self
    }

    /// Locators requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl AssetFetcher for MockFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(locator.to_string());
        self.assets.get(locator).cloned().ok_or_else(|| FetchError::Io {
            locator: locator.to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

// ============================================================================
// Bridge and app
// ============================================================================

/// Bridge over a recording canvas with ready audio and an attached log
pub fn test_bridge() -> (HostBridge<RecordingCanvas>, RecordingSink) {
    let sink = RecordingSink::default();
    let mut log = LogPanel::default();
    log.attach();
    let context = BridgeContext::new(RecordingCanvas::new(800, 600), ready_audio(sink.clone()), log);
    let engine = WasmEngine::new().unwrap();
    (HostBridge::new(engine, context), sink)
}

/// Bridge with the given module already instantiated
pub fn loaded_bridge(wasm: &[u8]) -> (HostBridge<RecordingCanvas>, RecordingSink) {
    let (mut bridge, sink) = test_bridge();
    bridge.instantiate(wasm).unwrap();
    (bridge, sink)
}

/// App with unloaded audio and no module, laid out at 400px wide at the origin
pub fn test_app() -> (App<RecordingCanvas>, RecordingSink) {
    let sink = RecordingSink::default();
    let mut config = Config::default();
    config.display.container_width = 400.0;
    let app = App::new(
        &config,
        WasmEngine::new().unwrap(),
        RecordingCanvas::new(config.game.width, config.game.height),
        AudioCueBridge::new(Box::new(sink.clone())),
        Box::new(VirtualSurface::new(DVec2::ZERO, 1.0)),
    );
    (app, sink)
}

/// App that finished startup with the given module
pub fn started_app(wasm: Vec<u8>) -> (App<RecordingCanvas>, RecordingSink) {
    let (mut app, sink) = test_app();
    block_on(app.start_up(&MockFetcher::with_game(wasm))).unwrap();
    (app, sink)
}
