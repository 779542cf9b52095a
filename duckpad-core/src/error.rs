use std::path::PathBuf;

use reqwest::StatusCode;

/// Failures inside the annotation request path.
///
/// None of these escape [`crate::requester::Requester::annotate`]; they are
/// logged there and folded into `AnnotationOutcome::Failed`.
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("No API key configured (set OPENAI_API_KEY or annotator.api_key)")]
    MissingApiKey,

    #[error("Failed to initialise the HTTP client")]
    BuildHttpClient(#[source] reqwest::Error),

    #[error("Completion request failed")]
    Http(#[from] reqwest::Error),

    #[error("Completion endpoint returned {}: {}", status, body)]
    Status { status: StatusCode, body: String },

    #[error("Could not parse completion envelope")]
    Envelope(#[source] serde_json::Error),

    #[error("Completion response contained no choices")]
    EmptyChoices,

    #[error("Completion choice has no message content")]
    MissingContent,
}

/// Failures while loading the TOML config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
