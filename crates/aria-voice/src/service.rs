//! The request orchestrator.
//!
//! Runs settings resolution, transcription, the optional persona rewrite, and
//! synthesis strictly in that order, stopping at the first stage failure.
//! Every outcome is a [`TransformResult`]; provider errors never escape.

use crate::error::{Stage, StageError};
use crate::rewrite::{PassthroughRewriter, PersonaRewriter};
use crate::settings::{resolve_voice, VoiceSelection};
use crate::stt::Transcriber;
use crate::truncate_chars;
use crate::tts::Synthesizer;
use aria_types::{TranscriptSource, TransformRequest, TransformResult};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Characters of transcript included in log lines.
const LOGGED_TRANSCRIPT_CHARS: usize = 50;

/// Tunable pipeline behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePolicy {
    /// Keep the transcript in the response when synthesis fails.
    /// Default: false (the transcript is discarded).
    #[serde(default)]
    pub include_transcript_on_synthesis_failure: bool,
}

/// Sequences the transform stages for one request at a time.
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Clone)]
pub struct TransformService {
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn Synthesizer>,
    rewriter: Arc<dyn PersonaRewriter>,
    policy: PipelinePolicy,
}

impl TransformService {
    /// Creates a service with persona rewriting disabled and the default policy.
    pub fn new(transcriber: Arc<dyn Transcriber>, synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self {
            transcriber,
            synthesizer,
            rewriter: Arc::new(PassthroughRewriter),
            policy: PipelinePolicy::default(),
        }
    }

    pub fn with_rewriter(mut self, rewriter: Arc<dyn PersonaRewriter>) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn with_policy(mut self, policy: PipelinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PipelinePolicy {
        self.policy
    }

    /// Runs the full pipeline for a validated request.
    pub async fn transform(&self, request: TransformRequest) -> TransformResult {
        let persona = request.persona;
        let selection = resolve_voice(persona, request.accent, &request.overrides);

        info!(
            persona = persona.id,
            accent = request.accent.as_str(),
            voice_id = selection.voice_id,
            stability = selection.settings.stability,
            style = selection.settings.style,
            speaking_rate = ?selection.settings.speaking_rate,
            "resolved voice settings"
        );

        let transcript = match self.obtain_transcript(&request).await {
            Ok(transcript) => transcript,
            Err(e) => {
                error!(persona = persona.id, stage = %e.stage, "{}", e);
                return TransformResult::failure(e.stage.client_message());
            }
        };

        info!(
            persona = persona.id,
            transcript = truncate_chars(&transcript, LOGGED_TRANSCRIPT_CHARS),
            "transcript ready"
        );

        let audio = match self.synthesize(&transcript, &selection).await {
            Ok(audio) => audio,
            Err(e) => {
                error!(
                    persona = persona.id,
                    stage = %e.stage,
                    transcript = truncate_chars(&transcript, LOGGED_TRANSCRIPT_CHARS),
                    "{}",
                    e
                );
                return TransformResult::Failure {
                    error: e.stage.client_message().to_string(),
                    transcript: self
                        .policy
                        .include_transcript_on_synthesis_failure
                        .then_some(transcript),
                };
            }
        };

        TransformResult::Success {
            transcript,
            persona_id: persona.id.to_string(),
            audio_base64: base64::engine::general_purpose::STANDARD.encode(audio),
        }
    }

    /// Uses the override verbatim, or transcribes and then rewrites the audio.
    async fn obtain_transcript(&self, request: &TransformRequest) -> Result<String, StageError> {
        match &request.source {
            TranscriptSource::Override(text) => {
                info!(
                    persona = request.persona.id,
                    "using transcript override, skipping transcription"
                );
                Ok(text.clone())
            }
            TranscriptSource::Audio(audio) => {
                let transcript = self
                    .transcriber
                    .transcribe(&audio.bytes, &audio.mime_type)
                    .await
                    .map_err(|e| StageError::new(Stage::Transcription, e))?;
                Ok(self.rewriter.rewrite(&transcript, request.persona).await)
            }
        }
    }

    async fn synthesize(
        &self,
        transcript: &str,
        selection: &VoiceSelection,
    ) -> Result<Vec<u8>, StageError> {
        self.synthesizer
            .synthesize(transcript, selection.voice_id, &selection.settings)
            .await
            .map_err(|e| StageError::new(Stage::Synthesis, e))
    }
}
