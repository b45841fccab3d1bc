//! Sample-level DSP: crusher, distortion curve, waveshaper, lowpass,
//! resampler and silence trimming.

pub mod crusher;
pub mod curve;
pub mod filter;
pub mod resample;
pub mod shaper;
pub mod trim;

pub use crusher::{CrushMode, CrusherBank, CrusherSettings, SampleCrusher, RENDER_QUANTUM};
pub use curve::{DistortionCurve, CURVE_LEN};
pub use filter::Biquad;
pub use resample::resample_linear;
pub use shaper::WaveShaper;
pub use trim::{trim_silence, trim_silence_with_threshold, SILENCE_THRESHOLD};
