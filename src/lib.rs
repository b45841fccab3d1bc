//! retrofy: offline lo-fi renderer.
//!
//! Decodes a recording, renders it down to a low sample rate, crushes bit
//! depth, adds waveshaper distortion, trims silence and writes a 16-bit WAV.

pub mod buffer;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod playback;
pub mod session;
pub mod wav;

pub use buffer::SampleBuffer;
pub use config::RetroConfig;
pub use engine::{MediaEngine, OfflineEngine, Playback, StageChain};
pub use error::{Result, RetroError};
pub use pipeline::{RetroOutput, RetroPipeline};
pub use session::{Session, Ticket};
