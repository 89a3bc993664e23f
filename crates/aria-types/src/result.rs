//! The single response contract returned by the transform pipeline.

use serde::{Deserialize, Serialize};

/// Outcome of one transform request.
///
/// Serializes to exactly `{transcript, personaId, audioBase64}` or
/// `{error}`. The failure shape only carries `transcript` when the server is
/// configured to keep it on a synthesis failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformResult {
    Success {
        transcript: String,
        #[serde(rename = "personaId")]
        persona_id: String,
        #[serde(rename = "audioBase64")]
        audio_base64: String,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transcript: Option<String>,
    },
}

impl TransformResult {
    /// Builds a failure carrying only a client-facing message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            transcript: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the client-facing error message, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Returns the transcript, if this result carries one.
    pub fn transcript(&self) -> Option<&str> {
        match self {
            Self::Success { transcript, .. } => Some(transcript),
            Self::Failure { transcript, .. } => transcript.as_deref(),
        }
    }
}
