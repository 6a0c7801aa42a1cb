//! Playback backends

use std::sync::Arc;

use super::DecodedClip;

/// Something that can start playing a clip immediately
///
/// Every call starts a new, independent voice. There is no handle back to the
/// voice and no completion notification.
pub trait AudioSink {
    fn play(&mut self, cue: &str, clip: Arc<DecodedClip>);
}

/// Sink that discards everything (muted or no output device)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: &str, _clip: Arc<DecodedClip>) {}
}
