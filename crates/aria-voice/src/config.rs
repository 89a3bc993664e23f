use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const DEFAULT_TRANSCRIPTION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TRANSCRIPTION_PROMPT: &str =
    "Transcribe this audio exactly. Return only the spoken words, no labels or timestamps.";

const DEFAULT_SYNTHESIS_ENDPOINT: &str = "https://api.elevenlabs.io/v1";
const DEFAULT_SYNTHESIS_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";

const DEFAULT_REWRITE_ENDPOINT: &str = "https://api.featherless.ai/v1";
const DEFAULT_REWRITE_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct";

fn default_provider_timeout_secs() -> u64 {
    60
}

fn default_transcription_endpoint() -> String {
    DEFAULT_TRANSCRIPTION_ENDPOINT.to_string()
}

fn default_transcription_model() -> String {
    DEFAULT_TRANSCRIPTION_MODEL.to_string()
}

fn default_transcription_prompt() -> String {
    DEFAULT_TRANSCRIPTION_PROMPT.to_string()
}

fn default_synthesis_endpoint() -> String {
    DEFAULT_SYNTHESIS_ENDPOINT.to_string()
}

fn default_synthesis_model() -> String {
    DEFAULT_SYNTHESIS_MODEL.to_string()
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_rewrite_endpoint() -> String {
    DEFAULT_REWRITE_ENDPOINT.to_string()
}

fn default_rewrite_model() -> String {
    DEFAULT_REWRITE_MODEL.to_string()
}

fn default_rewrite_timeout_ms() -> u64 {
    12_000
}

fn default_rewrite_temperature() -> f32 {
    0.7
}

fn default_rewrite_max_tokens() -> u32 {
    300
}

/// Speech-to-text provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Base URL; the model path is appended per request.
    #[serde(default = "default_transcription_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
    /// Instruction sent alongside the audio.
    #[serde(default = "default_transcription_prompt")]
    pub prompt: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_transcription_endpoint(),
            model: default_transcription_model(),
            prompt: default_transcription_prompt(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TranscriptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Text-to-speech provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_synthesis_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_synthesis_model")]
    pub model_id: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_synthesis_endpoint(),
            model_id: default_synthesis_model(),
            output_format: default_output_format(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl fmt::Debug for SynthesisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesisConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model_id", &self.model_id)
            .field("output_format", &self.output_format)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SynthesisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Persona rewrite provider settings. Disabled unless `enabled` is set.
#[derive(Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_rewrite_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_rewrite_model")]
    pub model: String,
    /// Hard bound on the whole rewrite call, in milliseconds. Default: 12000.
    #[serde(default = "default_rewrite_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_rewrite_temperature")]
    pub temperature: f32,
    #[serde(default = "default_rewrite_max_tokens")]
    pub max_tokens: u32,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            endpoint: default_rewrite_endpoint(),
            model: default_rewrite_model(),
            timeout_ms: default_rewrite_timeout_ms(),
            temperature: default_rewrite_temperature(),
            max_tokens: default_rewrite_max_tokens(),
        }
    }
}

impl fmt::Debug for RewriteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl RewriteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
