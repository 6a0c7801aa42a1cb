//! Audio playback for the headless player
//!
//! Cue triggers from the game module become independent voices on the
//! default output device. Without a device (or when muted) playback is
//! silently discarded.

mod mixing;
mod output;

#[cfg(test)]
mod tests;

pub use mixing::{MAX_VOICES, Mixer, Voice, soft_clip};
pub use output::AudioOutput;

use towerd_core::app::config::AudioConfig;
use towerd_core::{AudioSink, NullAudio};
use tracing::{info, warn};

/// Open the configured output, falling back to a silent sink
pub fn open_sink(config: &AudioConfig, mute: bool) -> Box<dyn AudioSink> {
    if mute || !config.enabled {
        info!("Audio disabled");
        return Box::new(NullAudio);
    }

    match AudioOutput::new(config.master_volume) {
        Ok(output) => {
            info!("Audio output at {} Hz", output.sample_rate());
            Box::new(output)
        }
        Err(e) => {
            warn!("Failed to open audio output, continuing silently: {:#}", e);
            Box::new(NullAudio)
        }
    }
}
