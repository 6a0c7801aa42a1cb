//! Audio output using cpal and a voice ring buffer
//!
//! The main thread hands new voices to the cpal callback through a lock-free
//! SPSC queue. The callback owns the [`Mixer`] and produces every sample.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    HeapRb,
    traits::{Consumer, Producer, Split},
};
use tracing::{debug, error};

use towerd_core::{AudioSink, DecodedClip};

use super::mixing::{MAX_VOICES, Mixer, Voice};

/// Pending voices between two callbacks
const VOICE_QUEUE_SIZE: usize = MAX_VOICES;

/// Audio output device with a running stream
pub struct AudioOutput {
    /// Producer side of the voice queue (main thread writes here)
    producer: ringbuf::HeapProd<Voice>,
    /// The cpal stream (kept alive for the duration)
    _stream: cpal::Stream,
    /// Output sample rate
    sample_rate: u32,
}

impl AudioOutput {
    /// Open the default output device and start streaming silence
    pub fn new(master_volume: f32) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No audio output device available"))?;

        let config = device
            .default_output_config()
            .context("Failed to get default output config")?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let ring = HeapRb::<Voice>::new(VOICE_QUEUE_SIZE);
        let (producer, mut consumer) = ring.split();
        let mut mixer = Mixer::new(master_volume);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let config = config.into();
                device.build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        while let Some(voice) = consumer.try_pop() {
                            mixer.add(voice);
                        }
                        mixer.fill(data, channels);
                    },
                    |err| error!("Audio stream error: {}", err),
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let config = config.into();
                let mut temp_buffer: Vec<f32> = vec![0.0; 4096];
                device.build_output_stream(
                    &config,
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        while let Some(voice) = consumer.try_pop() {
                            mixer.add(voice);
                        }
                        if temp_buffer.len() < data.len() {
                            temp_buffer.resize(data.len(), 0.0);
                        }
                        let mixed = &mut temp_buffer[..data.len()];
                        mixer.fill(mixed, channels);
                        for (out, &f) in data.iter_mut().zip(mixed.iter()) {
                            *out = (f * 32767.0).clamp(-32768.0, 32767.0) as i16;
                        }
                    },
                    |err| error!("Audio stream error: {}", err),
                    None,
                )
            }
            cpal::SampleFormat::U16 => {
                let config = config.into();
                let mut temp_buffer: Vec<f32> = vec![0.0; 4096];
                device.build_output_stream(
                    &config,
                    move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                        while let Some(voice) = consumer.try_pop() {
                            mixer.add(voice);
                        }
                        if temp_buffer.len() < data.len() {
                            temp_buffer.resize(data.len(), 0.0);
                        }
                        let mixed = &mut temp_buffer[..data.len()];
                        mixer.fill(mixed, channels);
                        // 0x8000 is silence for u16 audio
                        for (out, &f) in data.iter_mut().zip(mixed.iter()) {
                            *out = (f * 32767.0 + 32768.0).clamp(0.0, 65535.0) as u16;
                        }
                    },
                    |err| error!("Audio stream error: {}", err),
                    None,
                )
            }
            format => return Err(anyhow!("Unsupported sample format: {:?}", format)),
        }
        .context("Failed to build audio stream")?;

        stream.play().context("Failed to play audio stream")?;

        debug!("Audio stream started at {} Hz, {} channels", sample_rate, channels);

        Ok(Self {
            producer,
            _stream: stream,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioSink for AudioOutput {
    fn play(&mut self, cue: &str, clip: Arc<DecodedClip>) {
        let voice = Voice::new(clip, self.sample_rate);
        if self.producer.try_push(voice).is_err() {
            // Queue full - the callback is behind; drop the trigger
            debug!("Audio voice queue full: dropped {}", cue);
        }
    }
}
