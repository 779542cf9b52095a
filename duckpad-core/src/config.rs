//! Configuration for duckpad.
//!
//! Everything is read from a single TOML file. Every key is optional; a missing
//! file or missing key falls back to the defaults below, so a fresh install
//! works with nothing but `OPENAI_API_KEY` in the environment.
//!
//! ```toml
//! theme = "dark"
//! prompt = "Ask one question a first-time reader would have."
//!
//! [annotator]
//! model = "gpt-4o-mini"
//! request_timeout_secs = 30
//!
//! [monitor]
//! dead_band = 100
//! failure_policy = "retain-previous"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

/// Environment variable that overrides `annotator.api_key`.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Instruction used until the user edits the prompt field.
pub const DEFAULT_PROMPT: &str = "Imagine you are a capable undergraduate student. However, you do not know the topic of the text in depth, you act as a Rubber duck reading the text for the first time. Ask an in-depth, detailed and specific question that is raised when you read the text, and a question about what might follow the text.";

/// Top-level configuration file contents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub theme: String,
    /// Initial instruction prompt.
    pub prompt: String,
    pub annotator: AnnotatorConfig,
    pub monitor: MonitorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            prompt: DEFAULT_PROMPT.to_owned(),
            annotator: AnnotatorConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

/// Settings for the text-completion endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Base URL; `/chat/completions` is appended.
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on questions requested and kept from one response.
    pub max_questions: usize,
    pub api_key: Option<String>,
    /// Whole-request timeout. Unset leaves the HTTP client default in place.
    pub request_timeout_secs: Option<u64>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_owned(),
            model: "gpt-4o-mini".to_owned(),
            temperature: 0.7,
            max_tokens: 100,
            max_questions: 3,
            api_key: None,
            request_timeout_secs: None,
        }
    }
}

/// What happens to the displayed comments when a request fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Replace the comment set with an empty one.
    #[default]
    ClearComments,
    /// Keep the last successfully published comment set.
    RetainPrevious,
}

/// Throttling parameters for the change monitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Initial value of the last sampled length.
    pub baseline: usize,
    /// Changes of at most this many units in either direction are ignored.
    pub dead_band: usize,
    /// Blocks whose content length does not exceed this are left out of the excerpt.
    pub min_block_len: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            baseline: 200,
            dead_band: 100,
            min_block_len: 5,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Config {
    /// Parses a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Loads the config at `path`. A file that does not exist yields defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read { path: path.to_owned(), source });
            }
        };
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Like [`Config::load`], but logs errors and falls back to defaults.
    ///
    /// Applies the `OPENAI_API_KEY` override either way.
    pub fn load_or_default(path: &Path) -> Self {
        let config = Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "using default configuration");
            Self::default()
        });
        config.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    /// Replaces the configured API key with `key` when it is non-empty.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.annotator.api_key = Some(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.monitor.baseline, 200);
        assert_eq!(config.monitor.dead_band, 100);
        assert_eq!(config.annotator.max_tokens, 100);
        assert_eq!(config.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            theme = "dark"

            [annotator]
            model = "gpt-4o"
            request_timeout_secs = 15

            [monitor]
            failure_policy = "retain-previous"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.annotator.model, "gpt-4o");
        assert_eq!(config.annotator.request_timeout_secs, Some(15));
        assert_eq!(config.annotator.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.monitor.failure_policy, FailurePolicy::RetainPrevious);
        assert_eq!(config.monitor.dead_band, 100);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = Config::from_toml_str("[monitor]\nfailure_policy = \"sometimes\"");
        assert!(err.is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = [").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn api_key_override_ignores_blank_values() {
        let mut base = Config::default();
        base.annotator.api_key = Some("from-file".to_owned());

        let kept = base.clone().with_api_key_override(Some("  ".to_owned()));
        assert_eq!(kept.annotator.api_key.as_deref(), Some("from-file"));

        let replaced = base.with_api_key_override(Some("from-env".to_owned()));
        assert_eq!(replaced.annotator.api_key.as_deref(), Some("from-env"));
    }
}
