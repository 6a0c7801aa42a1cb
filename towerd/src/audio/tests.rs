use std::sync::Arc;

use towerd_core::DecodedClip;

use super::*;

fn ramp(frames: usize, sample_rate: u32) -> Arc<DecodedClip> {
    let samples = (0..frames).map(|i| i as f32 / frames as f32).collect();
    Arc::new(DecodedClip::from_samples(samples, 1, sample_rate))
}

fn constant(value: f32, frames: usize) -> Arc<DecodedClip> {
    Arc::new(DecodedClip::from_samples(vec![value; frames], 1, 44_100))
}

// ============================================================================
// Soft clipping
// ============================================================================

#[test]
fn test_soft_clip_passthrough() {
    assert_eq!(soft_clip(0.5), 0.5);
    assert_eq!(soft_clip(-0.5), -0.5);
    assert_eq!(soft_clip(1.0), 1.0);
    assert_eq!(soft_clip(-1.0), -1.0);
}

#[test]
fn test_soft_clip_limits() {
    let clipped = soft_clip(2.0);
    assert!(clipped > 1.0 && clipped < 2.0);

    let clipped_neg = soft_clip(-2.0);
    assert!(clipped_neg < -1.0 && clipped_neg > -2.0);

    assert!(soft_clip(100.0) <= 2.0);
}

// ============================================================================
// Voices
// ============================================================================

#[test]
fn test_voice_same_rate_plays_every_frame() {
    let mut voice = Voice::new(ramp(4, 44_100), 44_100);
    let samples: Vec<f32> = std::iter::from_fn(|| voice.next_sample()).collect();
    assert_eq!(samples, [0.0, 0.25, 0.5, 0.75]);
    assert!(voice.is_finished());
}

#[test]
fn test_voice_upsamples_with_interpolation() {
    // 22.05 kHz source on a 44.1 kHz device: every other sample is a midpoint
    let mut voice = Voice::new(ramp(4, 22_050), 44_100);
    let samples: Vec<f32> = std::iter::from_fn(|| voice.next_sample()).collect();
    assert_eq!(samples.len(), 8);
    assert!((samples[1] - 0.125).abs() < 1e-6);
    assert!((samples[2] - 0.25).abs() < 1e-6);
}

#[test]
fn test_empty_clip_is_finished() {
    let mut voice = Voice::new(Arc::new(DecodedClip::from_samples(Vec::new(), 1, 44_100)), 44_100);
    assert!(voice.is_finished());
    assert_eq!(voice.next_sample(), None);
}

// ============================================================================
// Mixer
// ============================================================================

#[test]
fn test_mixer_sums_overlapping_voices() {
    let mut mixer = Mixer::new(1.0);
    mixer.add(Voice::new(constant(0.25, 8), 44_100));
    mixer.add(Voice::new(constant(0.25, 4), 44_100));

    let mut out = [0.0f32; 16];
    mixer.fill(&mut out, 2);

    // both channels carry the mono mix
    assert_eq!(out[0], 0.5);
    assert_eq!(out[1], 0.5);
    // the short voice ended after 4 frames
    assert_eq!(out[8], 0.25);
    assert_eq!(mixer.active_voices(), 0);
}

#[test]
fn test_mixer_applies_master_volume() {
    let mut mixer = Mixer::new(0.5);
    mixer.add(Voice::new(constant(0.5, 2), 44_100));

    let mut out = [0.0f32; 2];
    mixer.fill(&mut out, 1);
    assert_eq!(out, [0.25, 0.25]);
}

#[test]
fn test_mixer_outputs_silence_without_voices() {
    let mut mixer = Mixer::new(1.0);
    let mut out = [1.0f32; 6];
    mixer.fill(&mut out, 2);
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn test_mixer_drops_voices_beyond_capacity() {
    let mut mixer = Mixer::new(1.0);
    for _ in 0..MAX_VOICES {
        assert!(mixer.add(Voice::new(constant(0.01, 4), 44_100)));
    }
    assert!(!mixer.add(Voice::new(constant(0.01, 4), 44_100)));
    assert_eq!(mixer.dropped(), 1);
}

#[test]
fn test_mixer_soft_clips_loud_sums() {
    let mut mixer = Mixer::new(1.0);
    for _ in 0..4 {
        mixer.add(Voice::new(constant(1.0, 1), 44_100));
    }
    let mut out = [0.0f32; 1];
    mixer.fill(&mut out, 1);
    assert!(out[0] > 1.0 && out[0] < 2.0);
}

// ============================================================================
// Sink selection
// ============================================================================

#[test]
fn test_muted_sink_discards() {
    let config = towerd_core::app::config::AudioConfig::default();
    let mut sink = open_sink(&config, true);
    sink.play("enemyHit", constant(0.5, 4));
}
