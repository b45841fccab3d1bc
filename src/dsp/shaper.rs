//! Waveshaper: runs samples through a [`DistortionCurve`].

use super::curve::DistortionCurve;

/// Table-lookup waveshaper with linear interpolation between entries.
#[derive(Debug, Clone)]
pub struct WaveShaper {
    curve: DistortionCurve,
}

impl WaveShaper {
    /// Shaper reading from `curve`.
    pub fn new(curve: DistortionCurve) -> Self {
        Self { curve }
    }

    /// Returns the transfer curve.
    pub fn curve(&self) -> &DistortionCurve {
        &self.curve
    }

    /// Map `x` onto the curve. Entry `i` sits at `x = 2i/n - 1`, so silence
    /// lands exactly on the centre entry. Inputs beyond the table take the
    /// end values.
    #[inline]
    pub fn shape(&self, x: f32) -> f32 {
        let table = self.curve.as_slice();
        let n = table.len();
        if n == 0 {
            return x;
        }
        if x.is_nan() {
            return 0.0;
        }
        let last = n - 1;
        let v = n as f64 * 0.5 * (x as f64 + 1.0);
        if v <= 0.0 {
            return table[0];
        }
        if v >= last as f64 {
            return table[last];
        }
        let k = v.floor() as usize;
        let frac = (v - k as f64) as f32;
        (1.0 - frac) * table[k] + frac * table[k + 1]
    }

    /// Shape a block in place.
    pub fn process_block(&self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.shape(*sample);
        }
    }
}
