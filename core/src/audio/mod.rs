//! Audio cue registry and fire-and-forget playback
//!
//! The module triggers sounds by name through the `play*Sound` imports. The
//! registry is fixed at build time; every clip is fetched and decoded once
//! during startup and never changes afterwards.

mod clip;
mod sink;


use std::sync::Arc;

use hashbrown::HashMap;

pub use clip::DecodedClip;
pub use sink::{AudioSink, NullAudio};

use crate::fetch::AssetFetcher;

/// A named sound backed by one external file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCue {
    /// Name used by `trigger`
    pub name: &'static str,
    /// Locator relative to the asset root
    pub source: &'static str,
}

/// The five cues the game module can trigger
pub const AUDIO_REGISTRY: [AudioCue; 5] = [
    AudioCue {
        name: "enemyHit",
        source: "audio/enemy-hit.wav",
    },
    AudioCue {
        name: "levelComplete",
        source: "audio/level-complete.wav",
    },
    AudioCue {
        name: "levelFail",
        source: "audio/level-fail.wav",
    },
    AudioCue {
        name: "towerShoot",
        source: "audio/tower-shoot.wav",
    },
    AudioCue {
        name: "enemyExplosion",
        source: "audio/enemy-explosion.wav",
    },
];

/// A registry entry failed to fetch or decode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load audio `{asset}`: {cause}")]
pub struct AudioLoadFailure {
    /// Name of the failing cue
    pub asset: String,
    pub cause: String,
}

/// One registry entry and its decoded clip, once loaded
#[derive(Debug, Clone)]
pub struct AudioAssetEntry {
    name: String,
    source: String,
    clip: Option<Arc<DecodedClip>>,
}

impl AudioAssetEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn clip(&self) -> Option<&Arc<DecodedClip>> {
        self.clip.as_ref()
    }
}

/// Host half of the `play*Sound` imports
pub struct AudioCueBridge {
    entries: Vec<AudioAssetEntry>,
    index: HashMap<String, usize>,
    sink: Box<dyn AudioSink>,
}

impl AudioCueBridge {
    /// Bridge over [`AUDIO_REGISTRY`]
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self::with_registry(&AUDIO_REGISTRY, sink)
    }

    /// Bridge over a custom cue list
    pub fn with_registry(cues: &[AudioCue], sink: Box<dyn AudioSink>) -> Self {
        let entries: Vec<AudioAssetEntry> = cues
            .iter()
            .map(|cue| AudioAssetEntry {
                name: cue.name.to_string(),
                source: cue.source.to_string(),
                clip: None,
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.clone(), i))
            .collect();
        Self {
            entries,
            index,
            sink,
        }
    }

    /// Fetch and decode every entry that is not loaded yet
    ///
    /// Entries are loaded one after another. Nothing is committed unless all
    /// of them succeed; the first failure is returned.
    pub async fn preload<F: AssetFetcher>(&mut self, fetcher: &F) -> Result<(), AudioLoadFailure> {
        let mut decoded = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            if entry.clip.is_some() {
                decoded.push(None);
                continue;
            }

            let failure = |cause: String| AudioLoadFailure {
                asset: entry.name.clone(),
                cause,
            };
            let bytes = fetcher
                .fetch(entry.source())
                .await
                .map_err(|e| failure(e.to_string()))?;
            let clip = DecodedClip::decode_wav(&bytes).map_err(|e| failure(e.to_string()))?;

            tracing::debug!(
                "Decoded audio '{}' from {} ({} frames @ {} Hz)",
                entry.name(),
                entry.source(),
                clip.frames(),
                clip.sample_rate()
            );
            decoded.push(Some(Arc::new(clip)));
        }

        for (entry, clip) in self.entries.iter_mut().zip(decoded) {
            if clip.is_some() {
                entry.clip = clip;
            }
        }

        tracing::info!("Loaded {} audio cues", self.entries.len());
        Ok(())
    }

    /// Start an independent playback of `name`
    ///
    /// Unknown names and cues that are not loaded are ignored.
    pub fn trigger(&mut self, name: &str) {
        let Some(&i) = self.index.get(name) else {
            return;
        };
        if let Some(clip) = &self.entries[i].clip {
            self.sink.play(name, Arc::clone(clip));
        }
    }

    /// Every entry has a decoded clip
    pub fn is_ready(&self) -> bool {
        self.entries.iter().all(|entry| entry.clip.is_some())
    }

    pub fn entries(&self) -> &[AudioAssetEntry] {
        &self.entries
    }
}
