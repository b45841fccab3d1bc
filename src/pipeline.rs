//! The retro render pipeline: decode → downsample → retro effects → trim → encode.

use crate::buffer::SampleBuffer;
use crate::config::RetroConfig;
use crate::dsp::{trim_silence, DistortionCurve};
use crate::engine::{MediaEngine, StageChain, RETRO_OUTPUT_CHANNELS};
use crate::error::Result;
use crate::session::Ticket;
use crate::wav;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct RetroOutput {
    /// Rendered and trimmed audio, ready for playback.
    pub buffer: SampleBuffer,
    /// The same audio as a 16-bit PCM WAV container.
    pub wav: Vec<u8>,
}

/// Drives a [`MediaEngine`] through the retro render for a given config.
pub struct RetroPipeline<E> {
    engine: E,
    config: RetroConfig,
}

impl<E: MediaEngine> RetroPipeline<E> {
    /// Fails with a configuration error if `config` is out of range.
    pub fn new(engine: E, config: RetroConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    /// Returns the validated config.
    pub fn config(&self) -> &RetroConfig {
        &self.config
    }

    /// Returns the media engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Decode `bytes` and run the full render.
    pub fn process(&self, bytes: &[u8], ticket: &Ticket) -> Result<RetroOutput> {
        ticket.check()?;
        let decoded = self.engine.decode(bytes)?;
        self.process_buffer(&decoded, ticket)
    }

    /// Run the render on already-decoded audio.
    pub fn process_buffer(&self, source: &SampleBuffer, ticket: &Ticket) -> Result<RetroOutput> {
        let target_rate = self.config.target_sample_rate;
        log::info!(
            "rendering {:.2}s of {} ch audio at {} Hz -> {} Hz, {} bit, reduction {}, distortion {}",
            source.duration_secs(),
            source.channel_count(),
            source.sample_rate(),
            target_rate,
            self.config.bit_depth,
            self.config.frequency_reduction,
            self.config.distortion_amount
        );

        ticket.check()?;
        let downsampled = self.engine.render_graph(
            source,
            &StageChain::downsample(target_rate),
            target_rate,
            source.channel_count(),
        )?;

        ticket.check()?;
        let chain = StageChain::retro(
            self.config.crusher_settings()?,
            self.config.crush_mode,
            DistortionCurve::generate(self.config.distortion_amount),
        );
        let rendered =
            self.engine
                .render_graph(&downsampled, &chain, target_rate, RETRO_OUTPUT_CHANNELS)?;

        ticket.check()?;
        let buffer = trim_silence(&rendered);
        let wav = wav::encode_wav(&buffer)?;

        log::info!(
            "rendered {} frames ({:.2}s), {} bytes of WAV",
            buffer.len(),
            buffer.duration_secs(),
            wav.len()
        );
        Ok(RetroOutput { buffer, wav })
    }
}
