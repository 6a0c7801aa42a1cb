//! WASM engine wrapper for compiling game modules

use anyhow::Result;
use wasmtime::{Engine, ExternType, Module};

use super::error::ModuleLoadFailure;

/// WASM pages are 64KB
const WASM_PAGE_SIZE: u64 = 65536;

/// Shared WASM engine (one per application)
pub struct WasmEngine {
    engine: Engine,
}

impl WasmEngine {
    /// Create a new WASM engine with default configuration
    pub fn new() -> Result<Self> {
        let engine = Engine::default();
        Ok(Self { engine })
    }

    /// Get a reference to the underlying wasmtime engine
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile a module from its binary (or WAT text) form
    pub fn load_module(&self, bytes: &[u8]) -> Result<Module, ModuleLoadFailure> {
        let module = Module::new(&self.engine, bytes)
            .map_err(|e| ModuleLoadFailure::Compile(format!("{e:#}")))?;

        for export in module.exports() {
            if let ExternType::Memory(mem_type) = export.ty() {
                tracing::debug!(
                    "Module memory '{}' starts at {} bytes (max {:?} pages)",
                    export.name(),
                    mem_type.minimum() * WASM_PAGE_SIZE,
                    mem_type.maximum()
                );
            }
        }

        Ok(module)
    }
}

// NOTE: WasmEngine does not implement Default.
// wasmtime::Engine::default() can fail on unsupported platforms, so
// construction goes through the fallible WasmEngine::new().
