//! Error types shared by every stage of the render pipeline.

/// Errors produced while configuring, rendering, encoding or playing audio.
#[derive(Debug, thiserror::Error)]
pub enum RetroError {
    /// A parameter is outside its contracted range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A sample buffer violates its shape invariants.
    #[error("invalid sample buffer: {0}")]
    InvalidBuffer(String),

    /// Input bytes could not be decoded as audio.
    #[error("decode error: {0}")]
    Decode(String),

    /// The render graph could not be built or executed.
    #[error("render error: {0}")]
    Render(String),

    /// The WAV container does not fit the 32-bit RIFF size fields.
    #[error("encoding overflow: {0}")]
    EncodingOverflow(String),

    /// The audio output device failed.
    #[error("playback error: {0}")]
    Playback(String),

    /// A newer request took over the session, or it was cancelled.
    #[error("render superseded by a newer request")]
    Superseded,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for RetroError {
    fn from(e: hound::Error) -> Self {
        RetroError::Decode(e.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RetroError>;
