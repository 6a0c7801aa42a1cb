//! Voice mixing: resampling, summing and soft clipping

use std::sync::Arc;

use towerd_core::DecodedClip;

/// Most voices mixed at once; further triggers are dropped until one ends
pub const MAX_VOICES: usize = 32;

/// One playback of a decoded clip
///
/// Overlapping triggers of the same cue are separate voices.
#[derive(Debug, Clone)]
pub struct Voice {
    clip: Arc<DecodedClip>,
    /// Playhead in source frames
    position: f64,
    /// Source frames advanced per output frame
    step: f64,
}

impl Voice {
    /// Start a clip from the beginning for a device running at `output_rate`
    pub fn new(clip: Arc<DecodedClip>, output_rate: u32) -> Self {
        let step = if output_rate == 0 {
            1.0
        } else {
            f64::from(clip.sample_rate()) / f64::from(output_rate)
        };
        Self {
            clip,
            position: 0.0,
            step,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.clip.frames() as f64
    }

    /// Next output sample, linearly interpolated between source frames
    pub fn next_sample(&mut self) -> Option<f32> {
        if self.is_finished() {
            return None;
        }

        let idx = self.position as usize;
        let frac = (self.position - idx as f64) as f32;
        let a = self.clip.frame_mono(idx);
        let b = self.clip.frame_mono(idx + 1);

        self.position += self.step;
        Some(a + (b - a) * frac)
    }
}

/// Sums active voices into interleaved output buffers
///
/// Owned by the audio callback.
#[derive(Debug)]
pub struct Mixer {
    voices: Vec<Voice>,
    master_volume: f32,
    dropped: usize,
}

impl Mixer {
    pub fn new(master_volume: f32) -> Self {
        Self {
            voices: Vec::with_capacity(MAX_VOICES),
            master_volume: master_volume.clamp(0.0, 1.0),
            dropped: 0,
        }
    }

    /// Start mixing a voice; returns false if every slot is busy
    pub fn add(&mut self, voice: Voice) -> bool {
        if self.voices.len() >= MAX_VOICES {
            self.dropped += 1;
            return false;
        }
        self.voices.push(voice);
        true
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Voices rejected because the mixer was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Fill `out` with `channels` interleaved samples per frame
    ///
    /// Every channel of a frame carries the same mono mix. Finished voices
    /// are released at the end of the buffer.
    pub fn fill(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let mut sum = 0.0;
            for voice in &mut self.voices {
                if let Some(sample) = voice.next_sample() {
                    sum += sample;
                }
            }
            frame.fill(soft_clip(sum * self.master_volume));
        }
        self.voices.retain(|voice| !voice.is_finished());
    }
}

/// Precomputed tanh values for soft clipping, t = 0.0 to 7.0 in 0.25 steps
const TANH_LUT: [f32; 29] = [
    0.0,      // t=0.00
    0.244919, // t=0.25
    0.462117, // t=0.50
    0.635149, // t=0.75
    0.761594, // t=1.00
    0.848284, // t=1.25
    0.905148, // t=1.50
    0.941389, // t=1.75
    0.964028, // t=2.00
    0.978034, // t=2.25
    0.986614, // t=2.50
    0.991815, // t=2.75
    0.995055, // t=3.00
    0.997109, // t=3.25
    0.998396, // t=3.50
    0.999198, // t=3.75
    0.999665, // t=4.00
    0.999892, // t=4.25
    0.999988, // t=4.50
    0.999998, // t=4.75
    1.0,      // t=5.00+
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, // t=5.25-7.00
];

/// Soft clipping for summed voices
///
/// Values in [-1, 1] pass through unchanged; values outside are compressed
/// toward ±2.0 along a tanh curve.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    if x.abs() <= 1.0 {
        return x;
    }

    let t = (x.abs() - 1.0).min(7.0);
    let pos = t * 4.0;
    let idx = (pos as usize).min(27);
    let frac = pos - idx as f32;
    let tanh_val = TANH_LUT[idx] * (1.0 - frac) + TANH_LUT[idx + 1] * frac;

    x.signum() * (1.0 + tanh_val)
}
