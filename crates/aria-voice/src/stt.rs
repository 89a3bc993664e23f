use crate::config::TranscriptionConfig;
use crate::error::VoiceError;
use crate::truncate_chars;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Maximum audio input size for STT (20 MiB). Larger payloads are rejected
/// before any bytes leave the process.
pub const MAX_STT_INPUT_BYTES: usize = 20 * 1024 * 1024;

/// Longest provider error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Speech-to-text collaborator.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes `audio`, declared as the bare MIME type `mime_type`.
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, VoiceError>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Transcription through a Gemini `generateContent` endpoint with inline audio.
#[derive(Debug, Clone)]
pub struct GeminiTranscriber {
    config: TranscriptionConfig,
    client: reqwest::Client,
}

impl GeminiTranscriber {
    pub fn new(config: TranscriptionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, VoiceError> {
        if audio.len() > MAX_STT_INPUT_BYTES {
            return Err(VoiceError::InputTooLarge {
                len: audio.len(),
                limit: MAX_STT_INPUT_BYTES,
            });
        }
        if !self.is_configured() {
            return Err(VoiceError::Config(
                "transcription api_key is not set (GEMINI_API_KEY)".to_string(),
            ));
        }

        let body = GenerateContentRequest {
            contents: [Content {
                parts: [
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(audio),
                        },
                    },
                    Part::Text {
                        text: &self.config.prompt,
                    },
                ],
            }],
        };

        tracing::debug!(
            bytes = audio.len(),
            mime_type,
            model = %self.config.model,
            "sending audio for transcription"
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VoiceError::Provider {
                status: status.as_u16(),
                body: truncate_chars(&text, MAX_ERROR_BODY_CHARS).to_string(),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::MalformedResponse(e.to_string()))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| VoiceError::MalformedResponse("no candidates".to_string()))?;

        let transcript: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");
        let transcript = transcript.trim();

        if transcript.is_empty() {
            return Err(VoiceError::EmptyTranscript);
        }
        Ok(transcript.to_string())
    }
}
