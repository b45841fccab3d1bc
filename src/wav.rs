//! 16-bit PCM WAV encoding and WAV decoding.
//!
//! Encoding writes the canonical 44-byte header by hand so the layout is
//! fixed regardless of channel count. Decoding goes through `hound`.

use std::io::{Read, Seek};
use std::path::Path;

use crate::buffer::SampleBuffer;
use crate::error::{Result, RetroError};

/// Size of the RIFF/WAVE header in bytes.
pub const HEADER_LEN: usize = 44;

/// Bit depth of every encoded container.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "retro_output.wav";

const BYTES_PER_SAMPLE: u32 = (BITS_PER_SAMPLE / 8) as u32;

/// Float sample to PCM16 code: clamp to `[-1, 1]`, scale negatives by 32768
/// and the rest by 32767, truncate toward zero.
#[inline]
pub fn sample_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Serialize `buffer` as a 16-bit PCM WAV container.
///
/// Fails only with [`RetroError::EncodingOverflow`] when the data does not
/// fit the 32-bit size fields.
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let channels = buffer.channel_count();
    let sample_rate = buffer.sample_rate();
    let frames = buffer.len();

    let data_len = (frames as u64) * channels as u64 * BYTES_PER_SAMPLE as u64;
    let riff_len = 36 + data_len;
    if riff_len > u32::MAX as u64 {
        return Err(RetroError::EncodingOverflow(format!(
            "{data_len} data bytes exceed the RIFF size limit"
        )));
    }
    let byte_rate = sample_rate as u64 * channels as u64 * BYTES_PER_SAMPLE as u64;
    let byte_rate = u32::try_from(byte_rate).map_err(|_| {
        RetroError::EncodingOverflow(format!("byte rate {byte_rate} exceeds 32 bits"))
    })?;
    let block_align = u16::try_from(channels as u32 * BYTES_PER_SAMPLE).map_err(|_| {
        RetroError::EncodingOverflow(format!("{channels} channels exceed the block align field"))
    })?;

    let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(riff_len as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());

    let planes = buffer.channels();
    for i in 0..frames {
        for plane in planes {
            out.extend_from_slice(&sample_to_pcm16(plane[i]).to_le_bytes());
        }
    }

    debug_assert_eq!(out.len(), HEADER_LEN + data_len as usize);
    Ok(out)
}

/// Encode `buffer` and write it to `path`.
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<()> {
    let bytes = encode_wav(buffer)?;
    std::fs::write(path, bytes)?;
    log::info!(
        "wrote {} ({} frames, {} ch, {} Hz)",
        path.display(),
        buffer.len(),
        buffer.channel_count(),
        buffer.sample_rate()
    );
    Ok(())
}

/// Decode a WAV stream into planar `f32` channels.
///
/// Integer formats are scaled by `2^(bits - 1)`; float data is taken as is.
///
/// The divisor is the same for both polarities while [`encode_wav`] scales
/// non-negative samples by 32767, so decoding our own output is off by at
/// most `1/16384` near full scale. Reading positive codes back over 32767
/// keeps it within `1/32767`.
pub fn decode_wav<R: Read + Seek>(reader: R) -> Result<SampleBuffer> {
    let wav = hound::WavReader::new(reader)?;
    let spec = wav.spec();
    let channels = spec.channels;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            if bits == 0 || bits > 32 {
                return Err(RetroError::Decode(format!("unsupported bit depth {bits}")));
            }
            let max_val = (1u64 << (bits - 1)) as f32;
            wav.into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, _>>()?
        }
        hound::SampleFormat::Float => wav
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()?,
    };

    if samples.is_empty() {
        return Err(RetroError::Decode("WAV file contains no samples".into()));
    }

    SampleBuffer::from_interleaved(&samples, channels, spec.sample_rate)
        .map_err(|e| RetroError::Decode(e.to_string()))
}
