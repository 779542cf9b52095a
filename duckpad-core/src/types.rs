use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A single question or remark shown in the side panel.
///
/// Comments are created in bulk from one analysis response and replaced as a
/// whole by the next one. `replies` is never populated by the analysis flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub replies: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment with a fresh v4 id and the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            replies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Wraps every content string into its own `Comment`, preserving order.
    pub fn batch<I, S>(contents: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        contents.into_iter().map(Comment::new).collect()
    }
}

/// What the annotator produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationOutcome {
    /// The response matched `{"questions": [...]}`.
    Questions(Vec<String>),
    /// The response arrived but did not match the schema; kept verbatim.
    Raw(String),
    /// Transport, status, or envelope failure. No content.
    Failed,
}

impl AnnotationOutcome {
    /// Returns the comment-content list this outcome publishes.
    pub fn into_contents(self) -> Vec<String> {
        match self {
            AnnotationOutcome::Questions(questions) => questions,
            AnnotationOutcome::Raw(raw) => vec![raw],
            AnnotationOutcome::Failed => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnnotationOutcome::Failed)
    }
}

/// Work item handed from the monitor to whoever runs the annotator.
///
/// `prompt` is a snapshot of the instruction at dispatch time; later prompt
/// edits do not affect a request already in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub prompt: String,
    pub content_size: usize,
}

/// Completion of an [`AnalysisRequest`], fed back into the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationResult {
    /// Content size sampled when the request was dispatched.
    pub content_size: usize,
    pub outcome: AnnotationOutcome,
}
