//! Optional persona restyling of a transcript.
//!
//! A rewriter never fails outward: any problem (no credentials, timeout,
//! provider error, empty completion) hands back the original text.

use crate::config::RewriteConfig;
use crate::error::VoiceError;
use crate::truncate_chars;
use aria_types::Persona;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You are a voice persona director for an app called Aria. \
Rewrite the transcript to match the persona identity. Keep the exact same meaning. \
Only change phrasing, energy, word choice and sentence structure. \
The output must not be identical to the input unless the input is a single short fragment. \
Return ONLY the rewritten text. No explanations, no labels, no quotes.";

/// Persona rewrite collaborator.
#[async_trait]
pub trait PersonaRewriter: Send + Sync {
    /// Restyles `text` for `persona`, or returns it unchanged.
    async fn rewrite(&self, text: &str, persona: &Persona) -> String;
}

/// Rewriter used when the feature is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRewriter;

#[async_trait]
impl PersonaRewriter for PassthroughRewriter {
    async fn rewrite(&self, text: &str, _persona: &Persona) -> String {
        text.to_string()
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Rewriter backed by an OpenAI-compatible chat completions endpoint
/// (Featherless by default).
#[derive(Debug, Clone)]
pub struct FeatherlessRewriter {
    config: RewriteConfig,
    client: reqwest::Client,
}

impl FeatherlessRewriter {
    pub fn new(config: RewriteConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    async fn try_rewrite(&self, text: &str, persona: &Persona) -> Result<String, VoiceError> {
        if self.config.api_key.is_empty() {
            return Err(VoiceError::Config(
                "rewrite api_key is not set (FEATHERLESS_API_KEY)".to_string(),
            ));
        }

        let body = ChatCompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Persona: {}\nCharacter: {}\n\nOriginal: {}\n\n\
                         Rewrite to sound natural for this persona. \
                         Same meaning, same length, different voice identity.",
                        persona.name, persona.description, text
                    ),
                },
            ],
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.endpoint.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Provider {
                status: status.as_u16(),
                body: truncate_chars(&body, 200).to_string(),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| VoiceError::MalformedResponse("empty completion".to_string()))
    }
}

#[async_trait]
impl PersonaRewriter for FeatherlessRewriter {
    async fn rewrite(&self, text: &str, persona: &Persona) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        match self.try_rewrite(text, persona).await {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::warn!(
                    persona = persona.id,
                    "persona rewrite failed, using original transcript: {}",
                    e
                );
                text.to_string()
            }
        }
    }
}
