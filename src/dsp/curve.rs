//! Distortion transfer curve for the waveshaper.

use std::f64::consts::PI;

/// Number of entries in a generated curve.
pub const CURVE_LEN: usize = 44100;

/// Amount used when none (or an unusable one) is given.
pub const DEFAULT_AMOUNT: f32 = 50.0;

/// Fixed-resolution transfer function. Entry `i` is the output for input
/// `x = i * 2 / CURVE_LEN - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionCurve {
    amount: f32,
    table: Vec<f32>,
}

impl DistortionCurve {
    /// Generate the curve `((3 + k) * x * 20°) / (π + k * |x|)`.
    ///
    /// Negative or non-finite amounts fall back to [`DEFAULT_AMOUNT`].
    pub fn generate(amount: f32) -> Self {
        let amount = if amount.is_finite() && amount >= 0.0 {
            amount
        } else {
            DEFAULT_AMOUNT
        };
        let k = amount as f64;
        let deg = PI / 180.0;

        let table = (0..CURVE_LEN)
            .map(|i| {
                let x = (i * 2) as f64 / CURVE_LEN as f64 - 1.0;
                (((3.0 + k) * x * 20.0 * deg) / (PI + k * x.abs())) as f32
            })
            .collect();

        Self { amount, table }
    }

    /// The amount the curve was generated with, after fallback.
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Table entries in input order.
    pub fn as_slice(&self) -> &[f32] {
        &self.table
    }

    /// Number of entries, always [`CURVE_LEN`].
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Input amplitude represented by entry `i`.
    pub fn input_at(i: usize) -> f64 {
        (i * 2) as f64 / CURVE_LEN as f64 - 1.0
    }
}

impl Default for DistortionCurve {
    fn default() -> Self {
        Self::generate(DEFAULT_AMOUNT)
    }
}
