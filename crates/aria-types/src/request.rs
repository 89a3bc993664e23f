//! Inbound transform requests and their validation.
//!
//! [`RawTransformForm`] is what the HTTP layer collects from a multipart
//! submission, field by field, with no interpretation. [`TransformRequest`]
//! is the validated, normalized form the pipeline consumes.

use crate::persona::{find_persona, persona_ids, Persona};
use crate::voice::VoiceOverrides;
use crate::Accent;
use std::fmt;
use thiserror::Error;

/// MIME type assumed when an upload declares none.
pub const DEFAULT_AUDIO_MIME_TYPE: &str = "audio/webm";

/// Unvalidated transform form fields.
#[derive(Default, Clone)]
pub struct RawTransformForm {
    pub persona_id: Option<String>,
    pub accent: Option<String>,
    pub transcript: Option<String>,
    pub style: Option<String>,
    pub stability: Option<String>,
    pub speaking_rate: Option<String>,
    pub audio: Option<Vec<u8>>,
    pub audio_content_type: Option<String>,
}

impl fmt::Debug for RawTransformForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawTransformForm")
            .field("persona_id", &self.persona_id)
            .field("accent", &self.accent)
            .field("transcript", &self.transcript)
            .field("style", &self.style)
            .field("stability", &self.stability)
            .field("speaking_rate", &self.speaking_rate)
            .field("audio_len", &self.audio.as_ref().map(Vec::len))
            .field("audio_content_type", &self.audio_content_type)
            .finish()
    }
}

/// Request rejected before any provider is called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown personaId. Valid values: {}", .valid.join(", "))]
    UnknownPersona { valid: Vec<String> },

    #[error("Missing 'audio' field. Provide an audio upload or a non-empty 'transcript'.")]
    MissingAudio,
}

/// Uploaded audio with its normalized MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl fmt::Debug for AudioPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioPayload")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Where the transcript comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptSource {
    /// Caller-supplied text, already trimmed and non-empty.
    Override(String),
    /// Audio that must go through the transcription provider.
    Audio(AudioPayload),
}

/// A validated transform request.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub persona: &'static Persona,
    pub accent: Accent,
    pub source: TranscriptSource,
    pub overrides: VoiceOverrides,
}

impl TransformRequest {
    /// Validates and normalizes raw form fields.
    ///
    /// The persona is checked first so an unknown persona is always reported
    /// as such, regardless of what else is missing. Accent and numeric
    /// overrides never fail: they fall back or clamp.
    pub fn resolve(form: RawTransformForm) -> Result<Self, ValidationError> {
        let persona = form
            .persona_id
            .as_deref()
            .and_then(find_persona)
            .ok_or_else(|| ValidationError::UnknownPersona {
                valid: persona_ids().map(str::to_string).collect(),
            })?;

        let override_text = form
            .transcript
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());

        let source = match (override_text, form.audio) {
            (Some(text), _) => TranscriptSource::Override(text.to_string()),
            (None, Some(bytes)) if !bytes.is_empty() => TranscriptSource::Audio(AudioPayload {
                bytes,
                mime_type: normalize_mime_type(form.audio_content_type.as_deref()),
            }),
            (None, _) => return Err(ValidationError::MissingAudio),
        };

        Ok(Self {
            persona,
            accent: Accent::resolve(form.accent.as_deref()),
            source,
            overrides: VoiceOverrides::parse(
                form.style.as_deref(),
                form.stability.as_deref(),
                form.speaking_rate.as_deref(),
            ),
        })
    }
}

/// Strips MIME parameters (e.g. `;codecs=opus`) from a declared content type.
///
/// Falls back to [`DEFAULT_AUDIO_MIME_TYPE`] when nothing usable is declared.
pub fn normalize_mime_type(declared: Option<&str>) -> String {
    declared
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_AUDIO_MIME_TYPE)
        .to_ascii_lowercase()
}
