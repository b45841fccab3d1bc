//! Biquad lowpass used for anti-aliasing and the retro tone stage.

use std::f64::consts::PI;

/// Resonance in dB, the usual default for a lowpass stage.
pub const DEFAULT_Q_DB: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
struct Coeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

/// Direct-form II second-order lowpass.
#[derive(Debug, Clone)]
pub struct Biquad {
    c: Coeffs,
    w1: f64,
    w2: f64,
}

impl Biquad {
    /// RBJ lowpass at `cutoff` Hz with resonance `q_db` (linear Q = 10^(q_db/20)).
    ///
    /// Returns `None` when the cutoff is not below Nyquist, meaning the
    /// stage has nothing to remove.
    pub fn lowpass(sample_rate: u32, cutoff: f64, q_db: f64) -> Option<Self> {
        let nyquist = sample_rate as f64 / 2.0;
        if !(cutoff > 0.0 && cutoff < nyquist) {
            return None;
        }
        let q = 10f64.powf(q_db / 20.0);
        let w0 = 2.0 * PI * cutoff / sample_rate as f64;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();

        let a0 = 1.0 + alpha;
        let c = Coeffs {
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        };
        Some(Self { c, w1: 0.0, w2: 0.0 })
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let c = &self.c;
        let w0 = x as f64 - c.a1 * self.w1 - c.a2 * self.w2;
        let y = c.b0 * w0 + c.b1 * self.w1 + c.b2 * self.w2;
        self.w2 = self.w1;
        self.w1 = w0;
        y as f32
    }

    /// Filter a block in place.
    pub fn process_block(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clear the delay line.
    pub fn reset(&mut self) {
        self.w1 = 0.0;
        self.w2 = 0.0;
    }
}
