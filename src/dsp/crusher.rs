//! Bit-depth and sample-rate crusher.
//!
//! Crush -- quantize each held sample to `2^bit_depth` steps per unit.
//! Hold -- keep the last quantized value for `round(1 / frequency_reduction)`
//! calls, emulating a lower effective sample rate.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetroError};

/// Frames per render quantum when several channels share one crusher.
pub const RENDER_QUANTUM: usize = 128;

/// Validated crusher parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrusherSettings {
    bit_depth: u8,
    frequency_reduction: f32,
}

impl CrusherSettings {
    /// `bit_depth` must be in `1..=16` and `frequency_reduction` in `(0, 1]`.
    pub fn new(bit_depth: u8, frequency_reduction: f32) -> Result<Self> {
        if !(1..=16).contains(&bit_depth) {
            return Err(RetroError::Configuration(format!(
                "bit depth {bit_depth} outside 1..=16"
            )));
        }
        if !frequency_reduction.is_finite() || frequency_reduction <= 0.0 || frequency_reduction > 1.0
        {
            return Err(RetroError::Configuration(format!(
                "frequency reduction {frequency_reduction} outside (0, 1]"
            )));
        }
        Ok(Self {
            bit_depth,
            frequency_reduction,
        })
    }

    /// Returns the quantization depth in bits.
    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// Returns the sample-and-hold ratio.
    pub fn frequency_reduction(&self) -> f32 {
        self.frequency_reduction
    }

    /// Number of calls each quantized value is held for.
    pub fn hold_interval(&self) -> u64 {
        ((1.0 / self.frequency_reduction as f64).round() as u64).max(1)
    }
}

/// Stateful quantizer / sample-and-hold for a single stream.
///
/// Not reentrant: interleaving unrelated streams through one instance couples
/// their timing.
#[derive(Debug, Clone)]
pub struct SampleCrusher {
    step: f64,
    hold_interval: u64,
    phase: u64,
    held: f32,
}

impl SampleCrusher {
    /// Create a crusher at phase 0 holding silence.
    pub fn new(settings: CrusherSettings) -> Self {
        Self {
            step: f64::from(1u32 << settings.bit_depth),
            hold_interval: settings.hold_interval(),
            phase: 0,
            held: 0.0,
        }
    }

    /// Crush one sample. Always returns the held value and advances the phase.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.phase % self.hold_interval == 0 {
            self.held = quantize(input, self.step);
        }
        self.phase += 1;
        self.held
    }

    /// Crush a block in place, in order.
    pub fn process_block(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Samples processed since construction or the last reset.
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// Value currently being held.
    pub fn held(&self) -> f32 {
        self.held
    }

    /// Returns the hold interval in calls.
    pub fn hold_interval(&self) -> u64 {
        self.hold_interval
    }

    /// Quantization steps per unit amplitude (`2^bit_depth`).
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Return to phase 0 holding silence.
    pub fn reset(&mut self) {
        self.phase = 0;
        self.held = 0.0;
    }
}

/// `round(x * step) / step`, ties toward positive infinity.
#[inline]
fn quantize(x: f32, step: f64) -> f32 {
    ((x as f64 * step + 0.5).floor() / step) as f32
}

/// How a multi-channel stream is mapped onto crusher instances.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CrushMode {
    /// Independent phase and held value per channel.
    #[default]
    PerChannel,
    /// One crusher for every channel, walked channel by channel within each
    /// render quantum. Phase advances once per sample per channel.
    Shared,
}

/// The crushers used for one render pass.
#[derive(Debug, Clone)]
pub struct CrusherBank {
    mode: CrushMode,
    crushers: Vec<SampleCrusher>,
}

impl CrusherBank {
    /// One crusher per channel, or a single crusher in shared mode.
    pub fn new(settings: CrusherSettings, mode: CrushMode, channel_count: usize) -> Self {
        let instances = match mode {
            CrushMode::PerChannel => channel_count.max(1),
            CrushMode::Shared => 1,
        };
        Self {
            mode,
            crushers: vec![SampleCrusher::new(settings); instances],
        }
    }

    /// Returns the crush mode.
    pub fn mode(&self) -> CrushMode {
        self.mode
    }

    /// Crusher instances, in channel order.
    pub fn crushers(&self) -> &[SampleCrusher] {
        &self.crushers
    }

    /// Crush planar channels in place, quantum by quantum.
    pub fn process<'a, I>(&mut self, channels: I)
    where
        I: IntoIterator<Item = &'a mut [f32]>,
    {
        let mut channels: Vec<&mut [f32]> = channels.into_iter().collect();
        let len = channels.iter().map(|c| c.len()).min().unwrap_or(0);

        let last = self.crushers.len() - 1;
        let mut start = 0;
        while start < len {
            let end = (start + RENDER_QUANTUM).min(len);
            for (idx, channel) in channels.iter_mut().enumerate() {
                let crusher = match self.mode {
                    CrushMode::PerChannel => &mut self.crushers[idx.min(last)],
                    CrushMode::Shared => &mut self.crushers[0],
                };
                crusher.process_block(&mut channel[start..end]);
            }
            start = end;
        }
    }
}
