//! Linear-interpolation sample rate conversion.

/// Output frame count when rendering `len` frames from `source_rate` to `target_rate`:
/// `floor(len * target_rate / source_rate)`.
pub fn output_len(len: usize, source_rate: u32, target_rate: u32) -> usize {
    if source_rate == 0 {
        return 0;
    }
    (len as u128 * target_rate as u128 / source_rate as u128) as usize
}

/// Resample `input` from `source_rate` to `target_rate`.
///
/// The output always has [`output_len`] frames. Positions past the last
/// input frame repeat it.
pub fn resample_linear(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    let out_len = output_len(input.len(), source_rate, target_rate);
    if input.is_empty() || out_len == 0 {
        return Vec::new();
    }
    if source_rate == target_rate {
        return input.to_vec();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let last = input.len() - 1;
    let mut output = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let sample = if idx < last {
            input[idx] * (1.0 - frac) + input[idx + 1] * frac
        } else {
            input[last]
        };
        output.push(sample);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_floored() {
        assert_eq!(output_len(44100, 44100, 8000), 8000);
        assert_eq!(output_len(100, 44100, 8000), 18); // 18.14
        assert_eq!(output_len(5, 8000, 8000), 5);
        assert_eq!(output_len(10, 0, 8000), 0);
    }

    #[test]
    fn identity() {
        let input = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(resample_linear(&input, 8000, 8000), input);
    }

    #[test]
    fn double_rate_interpolates() {
        let input = vec![0.0, 1.0, 0.0];
        let out = resample_linear(&input, 4000, 8000);
        assert_eq!(out.len(), 6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
        // Past the end the last frame repeats.
        assert_eq!(out[5], 0.0);
    }

    #[test]
    fn half_rate_picks_every_other() {
        let input: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let out = resample_linear(&input, 16000, 8000);
        assert_eq!(out.len(), 50);
        for (i, s) in out.iter().enumerate() {
            assert!((s - input[i * 2]).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_and_too_short() {
        assert!(resample_linear(&[], 44100, 8000).is_empty());
        // One frame at 44.1k is shorter than one output frame at 8k.
        assert!(resample_linear(&[0.5], 44100, 8000).is_empty());
    }
}
