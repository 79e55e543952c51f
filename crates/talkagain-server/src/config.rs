//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use talkagain_llm::LlmConfig;
use talkagain_types::{default_catalog, Character};
use talkagain_voice::{RealtimeConfig, TtsConfig};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Chat-completion provider.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Speech-synthesis provider and the character voice table.
    #[serde(default)]
    pub tts: TtsConfig,

    /// Real-time voice provider credentials.
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// Character catalog offered to the client.
    #[serde(default = "default_catalog")]
    pub characters: Vec<Character>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            llm: LlmConfig::default(),
            tts: TtsConfig::default(),
            realtime: RealtimeConfig::default(),
            characters: default_catalog(),
        }
    }
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

    /// Directory holding the built browser client.
    #[serde(default = "default_client_dir")]
    pub client_dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "talkagain_server=debug,info").
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

fn default_client_dir() -> String {
    "client/dist".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_dir: default_client_dir(),
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

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides.
///
/// Environment variable overrides:
/// - `TALKAGAIN_HOST` overrides `server.host`
/// - `TALKAGAIN_PORT` overrides `server.port`
/// - `TALKAGAIN_CLIENT_DIR` overrides `server.client_dir`
/// - `TALKAGAIN_LOG_LEVEL` overrides `logging.level`
/// - `TALKAGAIN_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `OPENAI_API_KEY` sets the LLM key and, unless `tts.api_key` is set, the synthesis key
/// - `OPENAI_BASE_URL` overrides `llm.base_url` and `tts.base_url`
/// - `HUME_API_KEY` / `HUME_SECRET_KEY` set the real-time voice credentials
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
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

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Applies overrides from `lookup`, which maps a variable name to its value.
pub fn apply_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(host) = lookup("TALKAGAIN_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("TALKAGAIN_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(dir) = lookup("TALKAGAIN_CLIENT_DIR") {
        config.server.client_dir = dir;
    }
    if let Some(level) = lookup("TALKAGAIN_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("TALKAGAIN_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(base_url) = lookup("OPENAI_BASE_URL") {
        config.llm.base_url = base_url.clone();
        config.tts.base_url = base_url;
    }
    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.llm.api_key = key;
    }
    if let Some(key) = lookup("HUME_API_KEY") {
        config.realtime.api_key = key;
    }
    if let Some(secret) = lookup("HUME_SECRET_KEY") {
        config.realtime.secret_key = secret;
    }

    // One key serves both chat and synthesis unless synthesis has its own.
    if config.tts.api_key.trim().is_empty() {
        config.tts.api_key = config.llm.api_key.clone();
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.characters.len(), 2);
        assert_eq!(config.llm.max_tokens, 500);
    }

    #[test]
    fn file_sections_are_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[llm]
model = "gpt-4o-mini"
temperature = 0.5

[tts.voices]
Maya = "shimmer"

[[characters]]
name = "Sam"
age = "15-17"
personality = "Observant"
"#
        )
        .unwrap();

        let config: Config =
            toml::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 500);
        assert_eq!(config.tts.voices.get("Maya").map(String::as_str), Some("shimmer"));
        assert_eq!(config.characters.len(), 1);
        assert_eq!(config.characters[0].name, "Sam");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        let result = load_config(file.path().to_str());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_overrides_apply() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[
                ("TALKAGAIN_PORT", "4000"),
                ("TALKAGAIN_LOG_JSON", "1"),
                ("OPENAI_API_KEY", "sk-env"),
                ("HUME_API_KEY", "hk"),
                ("HUME_SECRET_KEY", "hs"),
            ]),
        );
        assert_eq!(config.server.port, 4000);
        assert!(config.logging.json);
        assert_eq!(config.llm.api_key, "sk-env");
        assert_eq!(config.tts.api_key, "sk-env");
        assert!(config.realtime.is_configured());
    }

    #[test]
    fn dedicated_tts_key_is_kept() {
        let mut base = Config::default();
        base.tts.api_key = "sk-tts".into();
        let config = apply_env_overrides(base, env(&[("OPENAI_API_KEY", "sk-llm")]));
        assert_eq!(config.tts.api_key, "sk-tts");
        assert_eq!(config.llm.api_key, "sk-llm");
    }

    #[test]
    fn unparseable_port_is_ignored() {
        let config = apply_env_overrides(Config::default(), env(&[("TALKAGAIN_PORT", "abc")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn example_config_parses() {
        let config: Config = toml::from_str(include_str!("../../../config.example.toml")).unwrap();
        assert_eq!(config.characters.len(), 2);
        assert_eq!(
            config.characters[1].realtime_config_id.as_deref(),
            Some("73434079-1628-428f-8ee1-32e6df35ce5f")
        );
        assert_eq!(config.tts.voices.len(), 4);
        assert!(config.llm.api_key.is_empty());
    }
}
