//! Startup sequence: UI, audio, module

use super::{App, STATUS_LOADING, STATUS_READY};
use crate::audio::AudioLoadFailure;
use crate::fetch::AssetFetcher;
use crate::render::Canvas2d;
use crate::wasm::{ModuleCapabilities, ModuleLoadFailure};

/// A startup stage failed; later stages never ran
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Audio(#[from] AudioLoadFailure),
    #[error(transparent)]
    Module(#[from] ModuleLoadFailure),
}

impl<C: Canvas2d + 'static> App<C> {
    /// Bring the game up: attach the UI, preload audio, then load the module
    ///
    /// Stages run strictly in order. The outcome is reported on the status
    /// line and nothing is retried.
    pub async fn start_up<F: AssetFetcher>(&mut self, fetcher: &F) -> Result<ModuleCapabilities, StartupError> {
        self.initialize_ui();
        self.status.set(STATUS_LOADING);

        match self.load(fetcher).await {
            Ok(capabilities) => {
                self.status.set(STATUS_READY);
                Ok(capabilities)
            }
            Err(e) => {
                self.status.set_error(&e);
                Err(e)
            }
        }
    }

    async fn load<F: AssetFetcher>(&mut self, fetcher: &F) -> Result<ModuleCapabilities, StartupError> {
        self.bridge.context_mut().audio.preload(fetcher).await?;

        let bytes = fetcher
            .fetch(&self.module_locator)
            .await
            .map_err(ModuleLoadFailure::from)?;
        tracing::info!("Fetched {} ({} bytes)", self.module_locator, bytes.len());

        Ok(self.bridge.instantiate(&bytes)?)
    }
}
