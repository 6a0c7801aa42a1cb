//! Errors raised at the host/module boundary

use crate::fetch::FetchError;

/// Fatal failure while bringing the game module up
///
/// Every variant aborts startup; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ModuleLoadFailure {
    /// The module bytes could not be fetched
    #[error("failed to fetch module: {0}")]
    Fetch(#[from] FetchError),

    /// The bytes are not a valid WebAssembly module
    #[error("invalid module binary: {0}")]
    Compile(String),

    /// Instantiation failed (unknown import, type mismatch, start trap)
    #[error("failed to link module: {0}")]
    Link(String),

    /// A known host import is declared with a shape the host cannot serve
    #[error("import `env.{name}` has an unexpected signature: {reason}")]
    ImportSignature { name: String, reason: String },

    /// A required export is missing
    #[error("module does not export `{0}`")]
    MissingExport(&'static str),

    /// An export exists but cannot be called with the expected arguments
    #[error("export `{name}` has an unexpected signature: {reason}")]
    ExportSignature { name: &'static str, reason: String },

    /// The module trapped inside `init`
    #[error("init({width}, {height}) failed: {cause}")]
    Init {
        width: u32,
        height: u32,
        cause: String,
    },

    /// The export surface is owned for the process lifetime
    #[error("a module is already loaded")]
    AlreadyLoaded,
}

/// Failure of a single call into an already loaded module
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The module trapped while executing an export
    #[error("`{export}` trapped: {cause}")]
    Trap { export: &'static str, cause: String },
}
