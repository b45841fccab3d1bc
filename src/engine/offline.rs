//! In-memory media engine.

use std::io::Cursor;

use super::{MediaEngine, StageChain};
use crate::buffer::SampleBuffer;
use crate::dsp::filter::DEFAULT_Q_DB;
use crate::dsp::{resample_linear, Biquad, CrusherBank, WaveShaper};
use crate::error::{Result, RetroError};
use crate::wav;

/// Renders stage chains over whole buffers.
///
/// The lowpass runs at the source rate so it band-limits before the rate
/// change; crusher and waveshaper run at the output rate. Channels are
/// mixed to the requested count last.
#[derive(Debug, Clone, Default)]
pub struct OfflineEngine;

impl OfflineEngine {
    /// Create an engine. It holds no state between renders.
    pub fn new() -> Self {
        Self
    }
}

impl MediaEngine for OfflineEngine {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        let buffer = wav::decode_wav(Cursor::new(bytes))?;
        log::debug!(
            "decoded {} frames, {} ch, {} Hz",
            buffer.len(),
            buffer.channel_count(),
            buffer.sample_rate()
        );
        Ok(buffer)
    }

    fn render_graph(
        &self,
        source: &SampleBuffer,
        chain: &StageChain,
        output_rate: u32,
        output_channels: u16,
    ) -> Result<SampleBuffer> {
        if output_rate == 0 {
            return Err(RetroError::Render("output rate must be positive".into()));
        }
        if output_channels == 0 {
            return Err(RetroError::Render("output needs at least one channel".into()));
        }

        let source_rate = source.sample_rate();
        let mut channels: Vec<Vec<f32>> = source.channels().to_vec();

        if let Some(cutoff) = chain.lowpass_hz {
            match Biquad::lowpass(source_rate, cutoff, DEFAULT_Q_DB) {
                Some(filter) => {
                    for channel in channels.iter_mut() {
                        filter.clone().process_block(channel);
                    }
                }
                None => log::debug!("lowpass {cutoff} Hz bypassed at {source_rate} Hz"),
            }
        }

        let mut channels: Vec<Vec<f32>> = channels
            .iter()
            .map(|c| resample_linear(c, source_rate, output_rate))
            .collect();

        if let Some(stage) = chain.crusher {
            let mut bank = CrusherBank::new(stage.settings, stage.mode, channels.len());
            bank.process(channels.iter_mut().map(|c| c.as_mut_slice()));
        }

        if let Some(curve) = &chain.waveshaper {
            let shaper = WaveShaper::new(curve.clone());
            for channel in channels.iter_mut() {
                shaper.process_block(channel);
            }
        }

        let rendered = SampleBuffer::new(channels, output_rate)
            .and_then(|b| b.remix(output_channels))
            .map_err(|e| RetroError::Render(e.to_string()))?;

        log::debug!(
            "rendered {} -> {} frames at {} Hz, {} ch",
            source.len(),
            rendered.len(),
            output_rate,
            output_channels
        );
        Ok(rendered)
    }
}
