use crate::config::SynthesisConfig;
use crate::error::VoiceError;
use crate::truncate_chars;
use aria_types::ResolvedVoiceSettings;
use async_trait::async_trait;
use serde::Serialize;

/// Maximum text input size for TTS (64 KiB). Prevents resource exhaustion from
/// oversized synthesis requests.
const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

/// Longest provider error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Text-to-speech collaborator.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes `text` with `voice_id`, returning encoded audio bytes.
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &ResolvedVoiceSettings,
    ) -> Result<Vec<u8>, VoiceError>;
}

#[derive(Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettingsBody,
}

/// Provider parameter names for [`ResolvedVoiceSettings`].
#[derive(Serialize)]
struct VoiceSettingsBody {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

impl From<&ResolvedVoiceSettings> for VoiceSettingsBody {
    fn from(settings: &ResolvedVoiceSettings) -> Self {
        Self {
            stability: settings.stability,
            similarity_boost: settings.similarity_boost,
            style: settings.style,
            speed: settings.speaking_rate,
        }
    }
}

/// Synthesis through the ElevenLabs text-to-speech REST API.
#[derive(Debug, Clone)]
pub struct ElevenLabsSynthesizer {
    config: SynthesisConfig,
    client: reqwest::Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn url(&self, voice_id: &str) -> String {
        format!(
            "{}/text-to-speech/{}?output_format={}",
            self.config.endpoint.trim_end_matches('/'),
            voice_id,
            self.config.output_format
        )
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &ResolvedVoiceSettings,
    ) -> Result<Vec<u8>, VoiceError> {
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::InputTooLarge {
                len: text.len(),
                limit: MAX_TTS_INPUT_BYTES,
            });
        }
        if !self.is_configured() {
            return Err(VoiceError::Config(
                "synthesis api_key is not set (ELEVENLABS_API_KEY)".to_string(),
            ));
        }

        let body = TextToSpeechRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: settings.into(),
        };

        let response = self
            .client
            .post(self.url(voice_id))
            .header("xi-api-key", &self.config.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
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

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(VoiceError::MalformedResponse(
                "synthesis returned no audio".to_string(),
            ));
        }

        tracing::debug!(voice_id, bytes = audio.len(), "synthesized speech");
        Ok(audio.to_vec())
    }
}
