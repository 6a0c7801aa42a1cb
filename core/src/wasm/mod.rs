//! WebAssembly host bridge
//!
//! Loads the game module, serves its imports and owns its export surface.
//! Every call into the module goes through [`HostBridge`], which turns into a
//! no-op returning a neutral value until a module has been instantiated.

mod context;
mod engine;
mod error;
mod exports;
mod imports;
mod memory;
mod values;


use wasmtime::{Func, Linker, Store};

pub use context::{BridgeContext, GAME_LOG_TARGET};
pub use engine::WasmEngine;
pub use error::{BridgeError, ModuleLoadFailure};
pub use exports::ModuleCapabilities;
pub use imports::{HostImport, IMPORT_MODULE};
pub use memory::{MEMORY_EXPORT, MemoryError, MemoryView};

use exports::{ModuleExports, call_numeric};
use imports::link_imports;

use crate::input::{GridPoint, TowerKind};
use crate::render::Canvas2d;
use crate::scheduler::FrameTarget;

/// Owner of the module instance and its store
pub struct HostBridge<C: Canvas2d + 'static> {
    engine: WasmEngine,
    store: Store<BridgeContext<C>>,
    exports: Option<ModuleExports>,
}

impl<C: Canvas2d + 'static> HostBridge<C> {
    /// Create a bridge with no module loaded
    pub fn new(engine: WasmEngine, context: BridgeContext<C>) -> Self {
        let store = Store::new(engine.engine(), context);
        Self {
            engine,
            store,
            exports: None,
        }
    }

    /// Compile, link and instantiate the module, then call `init(width, height)`
    ///
    /// The export surface only becomes visible once `init` has returned.
    pub fn instantiate(&mut self, bytes: &[u8]) -> Result<ModuleCapabilities, ModuleLoadFailure> {
        if self.exports.is_some() {
            return Err(ModuleLoadFailure::AlreadyLoaded);
        }

        let module = self.engine.load_module(bytes)?;

        let mut linker = Linker::new(self.engine.engine());
        link_imports(&mut linker, &module)?;

        let instance = linker
            .instantiate(&mut self.store, &module)
            .map_err(|e| ModuleLoadFailure::Link(format!("{e:#}")))?;

        let exports = ModuleExports::resolve(&mut self.store, &instance)?;

        let (width, height) = self.resolution();
        call_numeric(&mut self.store, &exports.init, &[width as f64, height as f64]).map_err(
            |e| ModuleLoadFailure::Init {
                width,
                height,
                cause: format!("{e:#}"),
            },
        )?;

        let capabilities = exports.capabilities();
        self.exports = Some(exports);
        tracing::info!(
            "Game module initialized at {}x{} ({:?})",
            width,
            height,
            capabilities
        );
        Ok(capabilities)
    }

    /// Whether the export surface is present
    pub fn is_loaded(&self) -> bool {
        self.exports.is_some()
    }

    /// Optional exports of the loaded module (none before load)
    pub fn capabilities(&self) -> ModuleCapabilities {
        self.exports
            .as_ref()
            .map(ModuleExports::capabilities)
            .unwrap_or_default()
    }

    /// Internal resolution passed to `init`
    pub fn resolution(&self) -> (u32, u32) {
        self.store.data().render.resolution()
    }

    pub fn context(&self) -> &BridgeContext<C> {
        self.store.data()
    }

    pub fn context_mut(&mut self) -> &mut BridgeContext<C> {
        self.store.data_mut()
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f64) -> Result<(), BridgeError> {
        match self.exports {
            Some(exports) => self.call("update", exports.update, &[dt]).map(drop),
            None => Ok(()),
        }
    }

    /// Forward a committed click in module coordinates
    pub fn handle_click(&mut self, x: f64, y: f64) -> Result<(), BridgeError> {
        match self.exports {
            Some(exports) => self.call("handleClick", exports.handle_click, &[x, y]).map(drop),
            None => Ok(()),
        }
    }

    pub fn select_tower_type(&mut self, kind: TowerKind) -> Result<(), BridgeError> {
        match self.exports {
            Some(exports) => self
                .call("selectTowerType", exports.select_tower_type, &[kind.code() as f64])
                .map(drop),
            None => Ok(()),
        }
    }

    /// Ask the module whether a tower fits at the given cell (false before load)
    pub fn can_place_tower(&mut self, x: f64, y: f64) -> Result<bool, BridgeError> {
        let Some(exports) = self.exports else {
            return Ok(false);
        };
        let result = self.call("canPlaceTower", exports.can_place_tower, &[x, y])?;
        Ok(result.is_some_and(|v| v != 0.0 && !v.is_nan()))
    }

    /// Range of the selected tower kind (0 before load)
    pub fn get_tower_range(&mut self) -> Result<f64, BridgeError> {
        let Some(exports) = self.exports else {
            return Ok(0.0);
        };
        let result = self.call("getTowerRange", exports.get_tower_range, &[])?;
        Ok(result.filter(|v| v.is_finite()).unwrap_or(0.0))
    }

    /// Pass new screen-to-module scale factors; false when not exported
    pub fn set_scale(&mut self, sx: f64, sy: f64) -> Result<bool, BridgeError> {
        match self.exports.and_then(|e| e.set_scale) {
            Some(func) => self.call("setScale", func, &[sx, sy]).map(|_| true),
            None => Ok(false),
        }
    }

    /// Reset the simulation; false when not exported
    pub fn reset_game(&mut self) -> Result<bool, BridgeError> {
        match self.exports.and_then(|e| e.reset_game) {
            Some(func) => self.call("resetGame", func, &[]).map(|_| true),
            None => Ok(false),
        }
    }

    /// Query the module about `at` and draw the placement overlay
    pub fn render_placement_preview(&mut self, at: GridPoint) -> Result<(), BridgeError> {
        if !self.is_loaded() {
            return Ok(());
        }
        let can_place = self.can_place_tower(at.x, at.y)?;
        let range = self.get_tower_range()?;
        self.store
            .data_mut()
            .render
            .draw_placement_preview(at.as_vec2(), can_place, range as f32);
        Ok(())
    }

    fn call(
        &mut self,
        export: &'static str,
        func: Func,
        args: &[f64],
    ) -> Result<Option<f64>, BridgeError> {
        call_numeric(&mut self.store, &func, args).map_err(|e| {
            let cause = format!("{e:#}");
            tracing::error!("{} trapped: {}", export, cause);
            BridgeError::Trap { export, cause }
        })
    }
}

impl<C: Canvas2d + 'static> FrameTarget for HostBridge<C> {
    fn update(&mut self, dt: f64) -> Result<(), BridgeError> {
        HostBridge::update(self, dt)
    }

    fn render_preview(&mut self, at: GridPoint) -> Result<(), BridgeError> {
        self.render_placement_preview(at)
    }
}
