//! Document change monitor.
//!
//! Decides on every change event whether the document moved far enough from
//! the last analysed size to justify a new annotation request, and owns the
//! comment set that requests publish into.
//!
//! # Dispatch protocol
//!
//! The host calls [`ChangeMonitor::observe`] synchronously inside its change
//! handler. When that returns `Some(request)` the in-flight flag is already
//! set, so any further change events are dropped until the host feeds the
//! result back through [`ChangeMonitor::complete`]. Running the annotator
//! between the two calls is the host's job (a spawned task in the TUI,
//! [`ChangeMonitor::run_cycle`] for sequential callers).
//!
//! Edits that arrive while a request is in flight are not queued. They are
//! only reconsidered when a later change event arrives after completion.

use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, MonitorConfig};
use crate::document::Document;
use crate::requester::Annotator;
use crate::types::{AnalysisRequest, AnnotationResult, Comment};

/// Per-session throttling state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    /// Content size at the last completed request (or the configured baseline).
    pub last_sampled_length: usize,
    /// True between a dispatched request and its completion.
    pub request_in_flight: bool,
    /// Instruction sent with every future request.
    pub current_prompt: String,
}

/// Session-scoped monitor: throttling state plus the published comment set.
#[derive(Debug, Clone)]
pub struct ChangeMonitor {
    config: MonitorConfig,
    state: MonitorState,
    comments: Vec<Comment>,
}

impl ChangeMonitor {
    pub fn new(config: MonitorConfig, prompt: impl Into<String>) -> Self {
        let state = MonitorState {
            last_sampled_length: config.baseline,
            request_in_flight: false,
            current_prompt: prompt.into(),
        };
        Self { config, state, comments: Vec::new() }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// The currently published comments, in response order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn prompt(&self) -> &str {
        &self.state.current_prompt
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.request_in_flight
    }

    pub fn last_sampled_length(&self) -> usize {
        self.state.last_sampled_length
    }

    /// Overwrites the instruction for subsequent requests. Empty is allowed.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.state.current_prompt = prompt.into();
    }

    /// True when `content_size` lies strictly outside the dead-band around
    /// the last sampled length.
    pub fn exceeds_dead_band(&self, content_size: usize) -> bool {
        content_size.abs_diff(self.state.last_sampled_length) > self.config.dead_band
    }

    /// Handles one change event.
    ///
    /// Returns the request to dispatch, with the in-flight flag already set, or
    /// `None` when the change is inside the dead-band or a request is pending.
    pub fn observe(&mut self, doc: &Document) -> Option<AnalysisRequest> {
        let content_size = doc.content_size();

        if self.state.request_in_flight {
            debug!(content_size, "change dropped: request in flight");
            return None;
        }
        if !self.exceeds_dead_band(content_size) {
            debug!(
                content_size,
                last = self.state.last_sampled_length,
                "change within dead-band"
            );
            return None;
        }

        self.state.request_in_flight = true;
        info!(
            content_size,
            last = self.state.last_sampled_length,
            "dead-band crossed; dispatching annotation"
        );
        Some(AnalysisRequest {
            text: doc.flatten_text(self.config.min_block_len),
            prompt: self.state.current_prompt.clone(),
            content_size,
        })
    }

    /// Applies a finished request: publishes comments, advances the sampled
    /// length, and clears the in-flight flag.
    ///
    /// Failures advance the sampled length too; the failed attempt is not retried.
    pub fn complete(&mut self, result: AnnotationResult) {
        if !self.state.request_in_flight {
            warn!("annotation result arrived with no request in flight; applying anyway");
        }

        let failed = result.outcome.is_failed();
        if failed && self.config.failure_policy == FailurePolicy::RetainPrevious {
            info!(kept = self.comments.len(), "annotation failed; keeping previous comments");
        } else {
            self.comments = Comment::batch(result.outcome.into_contents());
            info!(count = self.comments.len(), failed, "published comments");
        }

        self.state.last_sampled_length = result.content_size;
        self.state.request_in_flight = false;
    }

    /// Observes `doc` and, if that triggers, awaits `annotator` and completes.
    ///
    /// Returns whether a request was made. Holds `&mut self` across the await,
    /// so it suits sequential hosts; event-loop hosts should split
    /// [`observe`](Self::observe) and [`complete`](Self::complete) instead.
    pub async fn run_cycle<A>(&mut self, doc: &Document, annotator: &A) -> bool
    where
        A: Annotator + ?Sized,
    {
        let Some(request) = self.observe(doc) else {
            return false;
        };
        let outcome = annotator.annotate(&request.text, &request.prompt).await;
        self.complete(AnnotationResult { content_size: request.content_size, outcome });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;
    use crate::types::AnnotationOutcome;

    /// A document whose content size is exactly `size`.
    fn doc_of_size(size: usize) -> Document {
        Document::new(vec![Node::paragraph("x".repeat(size))])
    }

    fn monitor() -> ChangeMonitor {
        ChangeMonitor::new(MonitorConfig::default(), "prompt")
    }

    #[test]
    fn starts_at_baseline() {
        let m = monitor();
        assert_eq!(m.last_sampled_length(), 200);
        assert!(!m.is_in_flight());
        assert!(m.comments().is_empty());
    }

    #[test]
    fn dead_band_boundaries() {
        let m = monitor();
        assert!(!m.exceeds_dead_band(300));
        assert!(m.exceeds_dead_band(301));
        assert!(!m.exceeds_dead_band(100));
        assert!(m.exceeds_dead_band(99));
        assert!(!m.exceeds_dead_band(200));
    }

    #[test]
    fn observe_sets_in_flight_and_snapshots_prompt() {
        let mut m = monitor();
        let req = m.observe(&doc_of_size(350)).unwrap();
        assert!(m.is_in_flight());
        assert_eq!(req.content_size, 350);
        assert_eq!(req.prompt, "prompt");
        assert_eq!(req.text, format!("\n{}", "x".repeat(350)));
        // Baseline is untouched until completion.
        assert_eq!(m.last_sampled_length(), 200);
    }

    #[test]
    fn second_observe_is_dropped_while_in_flight() {
        let mut m = monitor();
        assert!(m.observe(&doc_of_size(350)).is_some());
        assert!(m.observe(&doc_of_size(10)).is_none());
        assert!(m.observe(&doc_of_size(900)).is_none());
    }

    #[test]
    fn complete_publishes_and_advances() {
        let mut m = monitor();
        let req = m.observe(&doc_of_size(350)).unwrap();
        m.complete(AnnotationResult {
            content_size: req.content_size,
            outcome: AnnotationOutcome::Questions(vec!["Q1".into(), "Q2".into()]),
        });
        assert!(!m.is_in_flight());
        assert_eq!(m.last_sampled_length(), 350);
        let contents: Vec<_> = m.comments().iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["Q1", "Q2"]);
    }

    #[test]
    fn failure_clears_by_default() {
        let mut m = monitor();
        m.observe(&doc_of_size(350)).unwrap();
        m.complete(AnnotationResult {
            content_size: 350,
            outcome: AnnotationOutcome::Raw("kept".into()),
        });
        m.observe(&doc_of_size(500)).unwrap();
        m.complete(AnnotationResult { content_size: 500, outcome: AnnotationOutcome::Failed });
        assert!(m.comments().is_empty());
        assert_eq!(m.last_sampled_length(), 500);
    }

    #[test]
    fn failure_retains_when_configured() {
        let config = MonitorConfig {
            failure_policy: FailurePolicy::RetainPrevious,
            ..MonitorConfig::default()
        };
        let mut m = ChangeMonitor::new(config, "");
        m.observe(&doc_of_size(350)).unwrap();
        m.complete(AnnotationResult {
            content_size: 350,
            outcome: AnnotationOutcome::Questions(vec!["Q".into()]),
        });
        m.observe(&doc_of_size(500)).unwrap();
        m.complete(AnnotationResult { content_size: 500, outcome: AnnotationOutcome::Failed });
        assert_eq!(m.comments().len(), 1);
        assert_eq!(m.last_sampled_length(), 500);
        assert!(!m.is_in_flight());
    }

    #[test]
    fn prompt_updates_apply_to_next_request() {
        let mut m = monitor();
        m.set_prompt("");
        assert_eq!(m.prompt(), "");
        m.set_prompt("Ask about methods");
        let req = m.observe(&doc_of_size(350)).unwrap();
        assert_eq!(req.prompt, "Ask about methods");
    }
}
