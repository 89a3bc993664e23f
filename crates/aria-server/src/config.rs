//! Server configuration loading from file and environment variables.

use aria_voice::{PipelinePolicy, RewriteConfig, SynthesisConfig, TranscriptionConfig};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Speech-to-text provider.
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Text-to-speech provider.
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Optional persona rewrite provider.
    #[serde(default)]
    pub rewrite: RewriteConfig,

    /// Pipeline behavior switches.
    #[serde(default)]
    pub pipeline: PipelinePolicy,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Body limit for `POST /api/transform`, in bytes. Capped at the
    /// transcriber's audio limit when the state is built.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "aria_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    aria_voice::MAX_STT_INPUT_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ARIA_HOST` overrides `server.host`
/// - `ARIA_PORT` overrides `server.port`
/// - `ARIA_MAX_UPLOAD_BYTES` overrides `server.max_upload_bytes`
/// - `ARIA_LOG_LEVEL` overrides `logging.level`
/// - `ARIA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `GEMINI_API_KEY` overrides `transcription.api_key`
/// - `ELEVENLABS_API_KEY` overrides `synthesis.api_key`
/// - `FEATHERLESS_API_KEY` overrides `rewrite.api_key`
/// - `ARIA_REWRITE_ENABLED` overrides `rewrite.enabled`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Applies environment overrides read through `lookup`.
fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("ARIA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("ARIA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(limit) = lookup("ARIA_MAX_UPLOAD_BYTES") {
        if let Ok(parsed) = limit.parse() {
            config.server.max_upload_bytes = parsed;
        }
    }
    if let Some(level) = lookup("ARIA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("ARIA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(key) = lookup("GEMINI_API_KEY") {
        config.transcription.api_key = key;
    }
    if let Some(key) = lookup("ELEVENLABS_API_KEY") {
        config.synthesis.api_key = key;
    }
    if let Some(key) = lookup("FEATHERLESS_API_KEY") {
        config.rewrite.api_key = key;
    }
    if let Some(enabled) = lookup("ARIA_REWRITE_ENABLED") {
        config.rewrite.enabled = enabled == "true" || enabled == "1";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
        assert!(!config.rewrite.enabled);
        assert!(!config.pipeline.include_transcript_on_synthesis_failure);
    }

    #[test]
    fn file_sections_are_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "0.0.0.0"
port = 8080

[logging]
level = "debug"
json = true

[synthesis]
model_id = "eleven_turbo_v2_5"

[rewrite]
enabled = true
timeout_ms = 5000

[pipeline]
include_transcript_on_synthesis_failure = true
"#
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.synthesis.model_id, "eleven_turbo_v2_5");
        assert_eq!(config.synthesis.output_format, "mp3_44100_128");
        assert!(config.rewrite.enabled);
        assert_eq!(config.rewrite.timeout_ms, 5000);
        assert!(config.pipeline.include_transcript_on_synthesis_failure);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            load_config(file.path().to_str()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ARIA_PORT", "4000"),
            ("ARIA_HOST", "not-an-ip"),
            ("ARIA_LOG_JSON", "1"),
            ("GEMINI_API_KEY", "g-key"),
            ("ELEVENLABS_API_KEY", "e-key"),
            ("FEATHERLESS_API_KEY", "f-key"),
            ("ARIA_REWRITE_ENABLED", "true"),
        ]);
        let mut config = Config::default();
        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.server.port, 4000);
        // Unparsable host keeps the previous value.
        assert_eq!(config.server.host, default_host());
        assert!(config.logging.json);
        assert_eq!(config.transcription.api_key, "g-key");
        assert_eq!(config.synthesis.api_key, "e-key");
        assert_eq!(config.rewrite.api_key, "f-key");
        assert!(config.rewrite.enabled);
    }
}
