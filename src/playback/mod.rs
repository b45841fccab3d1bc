//! Playback through the default output device.
//!
//! The engine owns the cpal stream and feeds it through a lock-free command
//! queue; [`callback::PlaybackCallback`] drains it on the audio thread.

pub mod callback;
pub mod command;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Producer, Split},
    HeapRb,
};

pub use command::PlaybackCommand;

use crate::buffer::SampleBuffer;
use crate::dsp::resample_linear;
use crate::engine::Playback;
use crate::error::{Result, RetroError};
use callback::PlaybackCallback;

/// Command queue capacity.
const QUEUE_CAPACITY: usize = 64;

/// Plays rendered buffers on the default output device.
pub struct PlaybackEngine {
    stream: cpal::Stream,
    producer: ringbuf::HeapProd<PlaybackCommand>,
    pending: Arc<AtomicUsize>,
    sample_rate: u32,
    channels: u16,
}

impl PlaybackEngine {
    /// Open the default output device at its default configuration.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| RetroError::Playback("no audio output device found".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| RetroError::Playback(format!("device config: {e}")))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let rb = HeapRb::<PlaybackCommand>::new(QUEUE_CAPACITY);
        let (producer, consumer) = rb.split();
        let pending = Arc::new(AtomicUsize::new(0));
        let mut callback = PlaybackCallback::new(consumer, Arc::clone(&pending));

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| callback.process(data),
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| RetroError::Playback(format!("stream build: {e}")))?;
        stream
            .play()
            .map_err(|e| RetroError::Playback(format!("stream play: {e}")))?;

        log::debug!("playback device: {sample_rate} Hz, {channels} ch");
        Ok(Self {
            stream,
            producer,
            pending,
            sample_rate,
            channels,
        })
    }

    /// Returns the device sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the device channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Whether queued audio remains. Audio still inside the device's own
    /// buffer is not counted.
    pub fn is_playing(&self) -> bool {
        self.pending.load(Ordering::Acquire) > 0
    }

    /// Set output gain, clamped to 0.0..=1.0 on the audio thread.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.send(PlaybackCommand::SetVolume(volume))
    }

    fn send(&mut self, cmd: PlaybackCommand) -> Result<()> {
        self.producer
            .try_push(cmd)
            .map_err(|_| RetroError::Playback("playback queue is full".into()))
    }
}

/// Convert `buffer` to interleaved samples at the device rate and channel count.
pub fn prepare_for_device(buffer: &SampleBuffer, sample_rate: u32, channels: u16) -> Result<Vec<f32>> {
    let remixed = buffer.remix(channels)?;
    if remixed.sample_rate() == sample_rate {
        return Ok(remixed.interleaved());
    }
    let resampled = remixed
        .channels()
        .iter()
        .map(|c| resample_linear(c, remixed.sample_rate(), sample_rate))
        .collect();
    Ok(SampleBuffer::new(resampled, sample_rate)?.interleaved())
}

impl Playback for PlaybackEngine {
    fn play(&mut self, buffer: &SampleBuffer) -> Result<()> {
        let samples = prepare_for_device(buffer, self.sample_rate, self.channels)?;
        self.send(PlaybackCommand::Stop)?;
        self.send(PlaybackCommand::Samples(samples))?;
        self.stream
            .play()
            .map_err(|e| RetroError::Playback(e.to_string()))
    }

    fn stop(&mut self) -> Result<()> {
        self.send(PlaybackCommand::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_upmixes_and_resamples() {
        let buffer = SampleBuffer::from_mono(vec![0.0, 0.5, 1.0, 0.5], 8000).unwrap();
        let out = prepare_for_device(&buffer, 16000, 2).unwrap();
        // 4 frames at 8k -> 8 frames at 16k, two channels each.
        assert_eq!(out.len(), 16);
        assert_eq!(out[0], out[1]);
        assert!((out[2] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn prepare_passthrough_when_matching() {
        let buffer = SampleBuffer::new(vec![vec![0.1, 0.2], vec![0.3, 0.4]], 48000).unwrap();
        let out = prepare_for_device(&buffer, 48000, 2).unwrap();
        assert_eq!(out, vec![0.1, 0.3, 0.2, 0.4]);
    }

    #[test]
    #[ignore] // Requires audio device; run manually with `cargo test -- --ignored`
    fn plays_on_default_device() {
        let mut engine = PlaybackEngine::new().expect("no audio device");
        let buffer = SampleBuffer::from_mono(vec![0.0; 800], 8000).unwrap();
        assert!(engine.play(&buffer).is_ok());
        assert!(engine.stop().is_ok());
    }
}
