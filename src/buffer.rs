//! Planar multi-channel sample buffer.

use crate::error::{Result, RetroError};

/// A fully materialized block of audio: one `Vec<f32>` per channel, all of
/// equal length, at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from planar channel data.
    ///
    /// Rejects zero channels, a zero sample rate, more channels than a WAV
    /// header can describe, and channels of differing length.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(RetroError::InvalidBuffer("no channels".into()));
        }
        if channels.len() > u16::MAX as usize {
            return Err(RetroError::InvalidBuffer(format!(
                "{} channels exceeds {}",
                channels.len(),
                u16::MAX
            )));
        }
        if sample_rate == 0 {
            return Err(RetroError::InvalidBuffer("sample rate is zero".into()));
        }
        let len = channels[0].len();
        if let Some(idx) = channels.iter().position(|c| c.len() != len) {
            return Err(RetroError::InvalidBuffer(format!(
                "channel {idx} has {} samples, channel 0 has {len}",
                channels[idx].len()
            )));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Single-channel buffer.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Split interleaved frames (`L, R, L, R, ...`) into planar channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], channel_count: u16, sample_rate: u32) -> Result<Self> {
        if channel_count == 0 {
            return Err(RetroError::InvalidBuffer("no channels".into()));
        }
        let n = channel_count as usize;
        let mut channels = vec![Vec::with_capacity(samples.len() / n); n];
        for frame in samples.chunks_exact(n) {
            for (ch, &s) in channels.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
        Self::new(channels, sample_rate)
    }

    /// All-zero buffer of the given shape.
    pub fn silent(channel_count: u16, len: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![vec![0.0; len]; channel_count as usize], sample_rate)
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the channel count.
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel. Panics if `idx` is out of range.
    pub fn channel(&self, idx: usize) -> &[f32] {
        &self.channels[idx]
    }

    /// All channels, in order.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Consume the buffer, returning its planar channels.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Frame-major copy: frame 0 of every channel, then frame 1, ...
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * self.channels.len());
        for i in 0..self.len() {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }

    /// New buffer holding frames `[start, end)` of every channel.
    pub fn slice(&self, start: usize, end: usize) -> SampleBuffer {
        let end = end.min(self.len());
        let start = start.min(end);
        Self {
            channels: self
                .channels
                .iter()
                .map(|c| c[start..end].to_vec())
                .collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Up- or down-mix to `channel_count` channels.
    ///
    /// Mono fans out to every output, anything folds down to mono by
    /// averaging, and other combinations copy the shared channels and
    /// leave the rest silent.
    pub fn remix(&self, channel_count: u16) -> Result<SampleBuffer> {
        if channel_count == 0 {
            return Err(RetroError::InvalidBuffer("no channels".into()));
        }
        let target = channel_count as usize;
        let source = self.channels.len();
        if target == source {
            return Ok(self.clone());
        }

        let channels = if source == 1 {
            vec![self.channels[0].clone(); target]
        } else if target == 1 {
            let scale = 1.0 / source as f32;
            let mixed = (0..self.len())
                .map(|i| self.channels.iter().map(|c| c[i]).sum::<f32>() * scale)
                .collect();
            vec![mixed]
        } else {
            (0..target)
                .map(|idx| {
                    self.channels
                        .get(idx)
                        .cloned()
                        .unwrap_or_else(|| vec![0.0; self.len()])
                })
                .collect()
        };

        Self::new(channels, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_channel_list() {
        assert!(matches!(
            SampleBuffer::new(vec![], 8000),
            Err(RetroError::InvalidBuffer(_))
        ));
    }

    #[test]
    fn new_rejects_zero_rate() {
        assert!(SampleBuffer::from_mono(vec![0.0], 0).is_err());
    }

    #[test]
    fn new_rejects_ragged_channels() {
        let err = SampleBuffer::new(vec![vec![0.0; 4], vec![0.0; 3]], 8000).unwrap_err();
        assert!(err.to_string().contains("channel 1"));
    }

    #[test]
    fn zero_length_channels_are_allowed() {
        let buf = SampleBuffer::new(vec![vec![], vec![]], 8000).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.channel_count(), 2);
    }

    #[test]
    fn interleave_round_trip() {
        let buf = SampleBuffer::new(vec![vec![0.1, 0.2], vec![-0.1, -0.2]], 44100).unwrap();
        let inter = buf.interleaved();
        assert_eq!(inter, vec![0.1, -0.1, 0.2, -0.2]);
        let back = SampleBuffer::from_interleaved(&inter, 2, 44100).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn from_interleaved_drops_partial_frame() {
        let buf = SampleBuffer::from_interleaved(&[1.0, 2.0, 3.0], 2, 8000).unwrap();
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn duration_from_length_and_rate() {
        let buf = SampleBuffer::silent(1, 4000, 8000).unwrap();
        assert!((buf.duration_secs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn slice_is_clamped() {
        let buf = SampleBuffer::from_mono(vec![1.0, 2.0, 3.0], 8000).unwrap();
        assert_eq!(buf.slice(1, 10).channel(0), &[2.0, 3.0]);
        assert!(buf.slice(3, 1).is_empty());
    }

    #[test]
    fn remix_stereo_to_mono_averages() {
        let buf = SampleBuffer::new(vec![vec![0.8, -0.4], vec![0.2, -0.6]], 8000).unwrap();
        let mono = buf.remix(1).unwrap();
        assert_eq!(mono.channel_count(), 1);
        assert!((mono.channel(0)[0] - 0.5).abs() < 1e-6);
        assert!((mono.channel(0)[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn remix_mono_to_stereo_duplicates() {
        let buf = SampleBuffer::from_mono(vec![0.3, 0.4], 8000).unwrap();
        let stereo = buf.remix(2).unwrap();
        assert_eq!(stereo.channel(0), stereo.channel(1));
    }

    #[test]
    fn remix_discrete_zero_fills() {
        let buf = SampleBuffer::new(vec![vec![0.1], vec![0.2]], 8000).unwrap();
        let quad = buf.remix(4).unwrap();
        assert_eq!(quad.channel(1), &[0.2]);
        assert_eq!(quad.channel(3), &[0.0]);
    }
}
