use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("provider returned an empty transcript")]
    EmptyTranscript,

    #[error("input exceeds maximum size: {len} bytes (limit: {limit} bytes)")]
    InputTooLarge { len: usize, limit: usize },
}

/// A pipeline step that calls an external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcription,
    Synthesis,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transcription => "transcription",
            Self::Synthesis => "synthesis",
        }
    }

    /// Message shown to the client when this stage fails.
    ///
    /// Provider detail stays in the logs.
    pub fn client_message(self) -> &'static str {
        match self {
            Self::Transcription => "Transcription failed. Please try again.",
            Self::Synthesis => "Voice synthesis failed. Please try again.",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider failure attributed to the stage that made the call.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: VoiceError,
}

impl StageError {
    pub fn new(stage: Stage, source: VoiceError) -> Self {
        Self { stage, source }
    }
}
