//! Leading/trailing silence removal.

use crate::buffer::SampleBuffer;

/// Amplitude below which a sample counts as silence.
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// Trim near-silent frames from both ends using [`SILENCE_THRESHOLD`].
pub fn trim_silence(buffer: &SampleBuffer) -> SampleBuffer {
    trim_silence_with_threshold(buffer, SILENCE_THRESHOLD)
}

/// Trim frames whose channel-0 magnitude is below `threshold` from both ends.
///
/// Channel 0 alone decides the range; every channel is cut to the same
/// `[start, end)`. An all-silent reference yields an empty buffer with the
/// same channel count and sample rate.
pub fn trim_silence_with_threshold(buffer: &SampleBuffer, threshold: f32) -> SampleBuffer {
    let (start, end) = audible_range(buffer.channel(0), threshold);
    log::debug!(
        "trim: keeping frames {start}..{end} of {} ({start} leading, {} trailing removed)",
        buffer.len(),
        buffer.len() - end
    );
    buffer.slice(start, end)
}

/// `(start, end)` such that `reference[start..end]` spans the first through
/// last sample at or above `threshold`. `start == end` when none is.
pub fn audible_range(reference: &[f32], threshold: f32) -> (usize, usize) {
    let mut start = 0;
    let mut end = reference.len();
    while start < end && reference[start].abs() < threshold {
        start += 1;
    }
    while end > start && reference[end - 1].abs() < threshold {
        end -= 1;
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_both_ends() {
        let buf = SampleBuffer::from_mono(vec![0.0, 0.00005, 0.5, 0.0, -0.3, 0.0, 0.0], 8000)
            .unwrap();
        let out = trim_silence(&buf);
        assert_eq!(out.channel(0), &[0.5, 0.0, -0.3]);
        assert_eq!(out.sample_rate(), 8000);
    }

    #[test]
    fn threshold_is_inclusive() {
        let buf = SampleBuffer::from_mono(vec![0.0, SILENCE_THRESHOLD, 0.0], 8000).unwrap();
        assert_eq!(trim_silence(&buf).channel(0), &[SILENCE_THRESHOLD]);
    }

    #[test]
    fn all_silent_trims_to_empty() {
        let buf = SampleBuffer::silent(2, 64, 8000).unwrap();
        let out = trim_silence(&buf);
        assert!(out.is_empty());
        assert_eq!(out.channel_count(), 2);
        assert_eq!(out.sample_rate(), 8000);
    }

    #[test]
    fn empty_input_stays_empty() {
        let buf = SampleBuffer::from_mono(vec![], 8000).unwrap();
        assert!(trim_silence(&buf).is_empty());
    }

    #[test]
    fn channel_zero_is_the_only_reference() {
        let buf = SampleBuffer::new(
            vec![vec![0.0, 0.0, 0.4, 0.0], vec![0.9, 0.9, 0.9, 0.9]],
            8000,
        )
        .unwrap();
        let out = trim_silence(&buf);
        assert_eq!(out.channel(0), &[0.4]);
        assert_eq!(out.channel(1), &[0.9]);
    }

    #[test]
    fn idempotent() {
        let buf = SampleBuffer::new(
            vec![vec![0.0, 0.2, 0.0, 0.3, 0.0], vec![0.1, 0.2, 0.3, 0.4, 0.5]],
            8000,
        )
        .unwrap();
        let once = trim_silence(&buf);
        let twice = trim_silence(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn input_is_untouched() {
        let buf = SampleBuffer::from_mono(vec![0.0, 0.5, 0.0], 8000).unwrap();
        let copy = buf.clone();
        let _ = trim_silence(&buf);
        assert_eq!(buf, copy);
    }
}
