//! Voice pipeline for the Aria relay.
//!
//! Resolves persona voice settings, talks to the speech-to-text,
//! text-to-speech, and persona rewrite providers, and sequences them into a
//! single transform operation.
//!
//! Providers sit behind the [`Transcriber`], [`Synthesizer`], and
//! [`PersonaRewriter`] traits so the orchestrator can be exercised without
//! network access.

pub mod config;
pub mod error;
pub mod rewrite;
pub mod service;
pub mod settings;
pub mod stt;
pub mod tts;

pub use config::{RewriteConfig, SynthesisConfig, TranscriptionConfig};
pub use error::{Stage, StageError, VoiceError};
pub use rewrite::{FeatherlessRewriter, PassthroughRewriter, PersonaRewriter};
pub use service::{PipelinePolicy, TransformService};
pub use settings::{resolve_voice, resolve_voice_id, SmoothingRule, VoiceSelection, SMOOTHING_RULES};
pub use stt::{GeminiTranscriber, Transcriber, MAX_STT_INPUT_BYTES};
pub use tts::{ElevenLabsSynthesizer, Synthesizer};

/// Returns at most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
