//! Shared types, error definitions, and constants for the Aria relay.
//!
//! This crate provides the foundational types used across all Aria crates:
//! the static persona registry, accent identifiers, voice parameter ranges,
//! the validated transform request, and the single response contract
//! returned to clients.
//!
//! Nothing in here performs I/O. Provider clients and the request
//! orchestrator live in `aria-voice`; the HTTP surface lives in
//! `aria-server`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod persona;
pub mod request;
pub mod result;
pub mod voice;

pub use persona::{find_persona, persona_ids, Persona, PERSONAS};
pub use request::{
    normalize_mime_type, AudioPayload, RawTransformForm, TranscriptSource, TransformRequest,
    ValidationError, DEFAULT_AUDIO_MIME_TYPE,
};
pub use result::TransformResult;
pub use voice::{ResolvedVoiceSettings, VoiceOverrides};

/// Regional voice selector.
///
/// Only used as a key into a persona's accent-voice mapping. Personas that
/// have no entry for an accent fall back to their default voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    /// The baseline accent.
    #[default]
    American,
    British,
    Australian,
    Indian,
}

impl Accent {
    /// Every accent, baseline first.
    pub const ALL: [Accent; 4] = [
        Accent::American,
        Accent::British,
        Accent::Australian,
        Accent::Indian,
    ];

    /// Returns the wire identifier for this accent.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::American => "american",
            Self::British => "british",
            Self::Australian => "australian",
            Self::Indian => "indian",
        }
    }

    /// Resolves a client-supplied accent, falling back to the baseline.
    ///
    /// Missing, blank, and unrecognized values all resolve to
    /// [`Accent::American`]; an accent is never a reason to reject a request.
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown accent identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown accent: {0}")]
pub struct UnknownAccent(pub String);

impl FromStr for Accent {
    type Err = UnknownAccent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "american" => Ok(Self::American),
            "british" => Ok(Self::British),
            "australian" => Ok(Self::Australian),
            "indian" => Ok(Self::Indian),
            _ => Err(UnknownAccent(s.to_string())),
        }
    }
}
