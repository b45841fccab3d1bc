//! Media engine boundary: decoding, graph rendering and playback.
//!
//! The pipeline only talks to these traits. [`OfflineEngine`] renders
//! everything in memory; [`crate::playback::PlaybackEngine`] plays through
//! the default output device.

pub mod offline;

pub use offline::OfflineEngine;

use crate::buffer::SampleBuffer;
use crate::dsp::{CrushMode, CrusherSettings, DistortionCurve};
use crate::error::Result;

/// Lowpass cutoff of the retro tone stage, in Hz.
pub const RETRO_LOWPASS_HZ: f64 = 3000.0;

/// Anti-alias cutoff as a fraction of the target Nyquist frequency.
pub const ANTI_ALIAS_RATIO: f64 = 0.8;

/// Channels in the retro render output.
pub const RETRO_OUTPUT_CHANNELS: u16 = 1;

/// Crusher stage of a [`StageChain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrushStage {
    pub settings: CrusherSettings,
    pub mode: CrushMode,
}

/// Fixed-topology processing chain: lowpass → crusher → waveshaper.
/// Absent stages are skipped.
#[derive(Debug, Clone, Default)]
pub struct StageChain {
    /// Lowpass cutoff in Hz.
    pub lowpass_hz: Option<f64>,
    pub crusher: Option<CrushStage>,
    pub waveshaper: Option<DistortionCurve>,
}

impl StageChain {
    /// Anti-alias lowpass only, for rendering down to `target_rate`.
    pub fn downsample(target_rate: u32) -> Self {
        Self {
            lowpass_hz: Some(target_rate as f64 / 2.0 * ANTI_ALIAS_RATIO),
            ..Self::default()
        }
    }

    /// Retro tone lowpass, crusher and distortion.
    pub fn retro(settings: CrusherSettings, mode: CrushMode, curve: DistortionCurve) -> Self {
        Self {
            lowpass_hz: Some(RETRO_LOWPASS_HZ),
            crusher: Some(CrushStage { settings, mode }),
            waveshaper: Some(curve),
        }
    }
}

/// Decoding and offline rendering.
pub trait MediaEngine {
    /// Decode a complete audio file.
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer>;

    /// Run `chain` over `source`, producing `output_channels` channels at
    /// `output_rate`, with `floor(len * output_rate / source_rate)` frames.
    fn render_graph(
        &self,
        source: &SampleBuffer,
        chain: &StageChain,
        output_rate: u32,
        output_channels: u16,
    ) -> Result<SampleBuffer>;
}

/// Audio output sink.
pub trait Playback {
    /// Start playing `buffer`, replacing anything already playing.
    fn play(&mut self, buffer: &SampleBuffer) -> Result<()>;

    /// Stop playback and drop queued audio.
    fn stop(&mut self) -> Result<()>;
}
