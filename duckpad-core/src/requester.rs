//! Annotation requester: document text + instruction in, short comment list out.
//!
//! The request asks the model for a JSON object `{"questions": [...]}`. That
//! shape is the contract between the prompt text built here and
//! [`parse_questions`]; both refer to [`QuestionsV1`] so they change together.
//!
//! [`Requester::annotate`] never fails. Transport and envelope errors are
//! logged and become [`AnnotationOutcome::Failed`]; content that does not
//! match the schema is passed through as [`AnnotationOutcome::Raw`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AnnotatorConfig;
use crate::error::AnnotateError;
use crate::types::AnnotationOutcome;

/// Anything that can turn text plus an instruction into an outcome.
///
/// The monitor depends only on this trait; the HTTP client is one implementation.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, text: &str, prompt: &str) -> AnnotationOutcome;
}

/// Expected message content, version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionsV1 {
    pub questions: Vec<String>,
}

const EXAMPLE_QUESTIONS: [&str; 2] = [
    "What evidence supports the claim made in the second paragraph?",
    "How will the argument address the counterexample it raises?",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct Requester {
    client: Client,
    api_key: String,
    config: AnnotatorConfig,
}

impl std::fmt::Debug for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl Requester {
    /// Builds the client from config.
    ///
    /// # Errors
    ///
    /// `MissingApiKey` when no key is configured, `BuildHttpClient` if the
    /// underlying client cannot be constructed.
    pub fn new(config: AnnotatorConfig) -> Result<Self, AnnotateError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AnnotateError::MissingApiKey)?;

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(AnnotateError::BuildHttpClient)?;

        Ok(Self { client, api_key, config })
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Builds the request body for `text` under `prompt`.
    pub fn build_request(&self, text: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                content: build_user_message(text, prompt, self.config.max_questions),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Sends `request` and returns the first choice's message content.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, unparseable envelope, empty
    /// `choices` array, or a first choice without message content.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, AnnotateError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AnnotateError::Status { status, body });
        }

        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(AnnotateError::Envelope)?;
        let choice = envelope
            .choices
            .into_iter()
            .next()
            .ok_or(AnnotateError::EmptyChoices)?;
        // `null`, absent, and blank content all carry nothing to show.
        choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(AnnotateError::MissingContent)
    }
}

#[async_trait]
impl Annotator for Requester {
    async fn annotate(&self, text: &str, prompt: &str) -> AnnotationOutcome {
        let request = self.build_request(text, prompt);
        info!(
            model = %self.config.model,
            text_chars = text.chars().count(),
            "sending annotation request"
        );
        match self.complete(&request).await {
            Ok(content) => {
                let outcome = parse_questions(&content, self.config.max_questions);
                if let AnnotationOutcome::Raw(_) = &outcome {
                    warn!("annotation response did not match the questions schema; keeping raw text");
                }
                outcome
            }
            Err(e) => {
                warn!(error = %e, "annotation request failed");
                AnnotationOutcome::Failed
            }
        }
    }
}

/// Composes the single user message: instruction, format directive, example, text.
pub fn build_user_message(text: &str, prompt: &str, max_questions: usize) -> String {
    let example = QuestionsV1 {
        questions: EXAMPLE_QUESTIONS.iter().map(|q| (*q).to_owned()).collect(),
    };
    let example = serde_json::to_string(&example).unwrap_or_default();
    format!(
        "{prompt}\n\n\
         Respond ONLY with a JSON object of the form {{\"questions\": [string, ...]}} \
         containing at most {max_questions} questions and nothing else.\n\
         Example: {example}\n\n\
         Text:\n\"{text}\""
    )
}

/// Interprets message content against [`QuestionsV1`].
///
/// One surrounding Markdown code fence is tolerated. Lists longer than
/// `max_questions` are truncated. Anything else is returned as `Raw` with the
/// original, untrimmed content.
pub fn parse_questions(content: &str, max_questions: usize) -> AnnotationOutcome {
    match serde_json::from_str::<QuestionsV1>(strip_code_fence(content)) {
        Ok(mut parsed) => {
            if parsed.questions.len() > max_questions {
                debug!(
                    received = parsed.questions.len(),
                    kept = max_questions,
                    "truncating questions"
                );
                parsed.questions.truncate(max_questions);
            }
            AnnotationOutcome::Questions(parsed.questions)
        }
        Err(e) => {
            debug!(error = %e, "message content is not QuestionsV1");
            AnnotationOutcome::Raw(content.to_owned())
        }
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requester() -> Requester {
        Requester::new(AnnotatorConfig {
            api_key: Some("test-key".to_owned()),
            ..AnnotatorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn parses_well_formed_questions() {
        let outcome = parse_questions(r#"{"questions": ["Q1", "Q2"]}"#, 3);
        assert_eq!(
            outcome,
            AnnotationOutcome::Questions(vec!["Q1".to_owned(), "Q2".to_owned()])
        );
    }

    #[test]
    fn prose_falls_back_to_raw() {
        let prose = "Why does the author assume the reader knows Rust?";
        assert_eq!(parse_questions(prose, 3), AnnotationOutcome::Raw(prose.to_owned()));
    }

    #[test]
    fn missing_field_falls_back_to_raw() {
        let body = r#"{"answers": ["A"]}"#;
        assert_eq!(parse_questions(body, 3), AnnotationOutcome::Raw(body.to_owned()));
    }

    #[test]
    fn fenced_json_is_accepted() {
        let fenced = "```json\n{\"questions\": [\"Q1\"]}\n```";
        assert_eq!(
            parse_questions(fenced, 3),
            AnnotationOutcome::Questions(vec!["Q1".to_owned()])
        );
    }

    #[test]
    fn long_lists_are_truncated() {
        let body = r#"{"questions": ["a", "b", "c", "d"]}"#;
        assert_eq!(
            parse_questions(body, 3),
            AnnotationOutcome::Questions(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = Requester::new(AnnotatorConfig::default()).unwrap_err();
        assert!(matches!(err, AnnotateError::MissingApiKey));
    }

    #[test]
    fn request_body_matches_wire_contract() {
        let req = requester().build_request("Some text.", "Be curious.");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 100);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");

        let content = json["messages"][0]["content"].as_str().unwrap();
        assert!(content.starts_with("Be curious."));
        assert!(content.contains("\"questions\""));
        assert!(content.contains("at most 3 questions"));
        assert!(content.ends_with("\"Some text.\""));
    }

    #[test]
    fn example_in_directive_parses_as_schema() {
        let message = build_user_message("t", "p", 3);
        let example_line = message
            .lines()
            .find_map(|l| l.strip_prefix("Example: "))
            .unwrap();
        assert!(matches!(
            parse_questions(example_line, 3),
            AnnotationOutcome::Questions(q) if q.len() == 2
        ));
    }
}
