//! Integration test for the change monitor driving an annotator.
//!
//! Exercises: observe, complete, run_cycle, set_prompt, failure policies, and
//! the in-flight guard under rapid change events.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use duckpad_core::{
    AnnotationOutcome, AnnotationResult, Annotator, ChangeMonitor, Document, MonitorConfig, Node,
};

/// Annotator that replays canned outcomes and records every call.
#[derive(Default)]
struct Scripted {
    outcomes: Mutex<VecDeque<AnnotationOutcome>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl Scripted {
    fn with(outcomes: impl IntoIterator<Item = AnnotationOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Annotator for Scripted {
    async fn annotate(&self, text: &str, prompt: &str) -> AnnotationOutcome {
        self.calls.lock().unwrap().push((text.to_owned(), prompt.to_owned()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(AnnotationOutcome::Questions(Vec::new()))
    }
}

/// Two paragraphs whose combined content size is `size` (size >= 10).
fn doc_of_size(size: usize) -> Document {
    let first = size / 2;
    Document::new(vec![
        Node::paragraph("a".repeat(first)),
        Node::paragraph("b".repeat(size - first)),
    ])
}

#[tokio::test]
async fn trigger_sequence_follows_dead_band() {
    let annotator = Scripted::default();
    let mut monitor = ChangeMonitor::new(MonitorConfig::default(), "p");

    let sizes: [usize; 12] = [210, 300, 301, 350, 402, 402, 301, 300, 150, 50, 49, 1000];
    let mut last = 200usize;
    let mut expected_calls = 0;

    for size in sizes {
        let should_fire = size.abs_diff(last) > 100;
        let fired = monitor.run_cycle(&doc_of_size(size), &annotator).await;
        assert_eq!(fired, should_fire, "size {size} against last {last}");
        if fired {
            last = size;
            expected_calls += 1;
        }
        assert_eq!(monitor.last_sampled_length(), last);
        assert!(!monitor.is_in_flight());
    }
    assert_eq!(annotator.calls().len(), expected_calls);
}

#[tokio::test]
async fn exact_band_does_not_trigger_but_one_more_does() {
    let annotator = Scripted::default();
    let mut monitor = ChangeMonitor::new(MonitorConfig::default(), "p");

    assert!(!monitor.run_cycle(&doc_of_size(300), &annotator).await);
    assert!(monitor.run_cycle(&doc_of_size(301), &annotator).await);

    // Shrinking: 301 - 100 = 201 is inside, 200 is outside.
    assert!(!monitor.run_cycle(&doc_of_size(201), &annotator).await);
    assert!(monitor.run_cycle(&doc_of_size(200), &annotator).await);
}

#[test]
fn rapid_changes_dispatch_once_while_in_flight() {
    let mut monitor = ChangeMonitor::new(MonitorConfig::default(), "p");

    let first = monitor.observe(&doc_of_size(400));
    assert!(first.is_some());
    for size in [10, 500, 1200, 40, 400] {
        assert!(monitor.observe(&doc_of_size(size)).is_none());
    }
    assert!(monitor.is_in_flight());

    monitor.complete(AnnotationResult {
        content_size: 400,
        outcome: AnnotationOutcome::Questions(vec!["Q".into()]),
    });
    assert!(!monitor.is_in_flight());
    assert_eq!(monitor.last_sampled_length(), 400);
}

#[test]
fn edits_during_flight_wait_for_next_change_event() {
    // Known staleness window: the edit to 1200 made mid-request is not
    // re-evaluated on completion; only the next change event picks it up.
    let mut monitor = ChangeMonitor::new(MonitorConfig::default(), "p");

    let req = monitor.observe(&doc_of_size(400)).unwrap();
    assert!(monitor.observe(&doc_of_size(1200)).is_none());
    monitor.complete(AnnotationResult {
        content_size: req.content_size,
        outcome: AnnotationOutcome::Questions(vec!["stale".into()]),
    });

    assert_eq!(monitor.comments()[0].content, "stale");
    assert_eq!(monitor.last_sampled_length(), 400);

    let next = monitor.observe(&doc_of_size(1201)).unwrap();
    assert_eq!(next.content_size, 1201);
}

#[tokio::test]
async fn prompt_edit_reaches_next_request() {
    let annotator = Scripted::default();
    let mut monitor = ChangeMonitor::new(MonitorConfig::default(), "first prompt");

    monitor.run_cycle(&doc_of_size(400), &annotator).await;
    monitor.set_prompt("second prompt");
    monitor.run_cycle(&doc_of_size(600), &annotator).await;

    let prompts: Vec<_> = annotator.calls().into_iter().map(|(_, p)| p).collect();
    assert_eq!(prompts, ["first prompt", "second prompt"]);
}

#[tokio::test]
async fn text_sent_is_flattened_excerpt() {
    let annotator = Scripted::default();
    let mut monitor = ChangeMonitor::new(MonitorConfig::default(), "p");
    let doc = Document::new(vec![
        Node::heading(1, "Notes"),
        Node::paragraph("x".repeat(150)),
        Node::paragraph("short"),
        Node::paragraph("y".repeat(160)),
    ]);

    assert!(monitor.run_cycle(&doc, &annotator).await);
    let (text, _) = annotator.calls().remove(0);
    assert_eq!(text, format!("\n{}\n{}", "x".repeat(150), "y".repeat(160)));
    assert_eq!(monitor.last_sampled_length(), 5 + 150 + 5 + 160);
}

#[tokio::test]
async fn results_replace_rather_than_append() {
    let annotator = Scripted::with([
        AnnotationOutcome::Questions(vec!["Q1".into(), "Q2".into()]),
        AnnotationOutcome::Raw("plain prose".into()),
        AnnotationOutcome::Failed,
    ]);
    let mut monitor = ChangeMonitor::new(MonitorConfig::default(), "p");

    monitor.run_cycle(&doc_of_size(400), &annotator).await;
    let first_ids: Vec<_> = monitor.comments().iter().map(|c| c.id).collect();
    assert_eq!(first_ids.len(), 2);
    assert_ne!(first_ids[0], first_ids[1]);

    monitor.run_cycle(&doc_of_size(600), &annotator).await;
    assert_eq!(monitor.comments().len(), 1);
    assert_eq!(monitor.comments()[0].content, "plain prose");

    monitor.run_cycle(&doc_of_size(800), &annotator).await;
    assert!(monitor.comments().is_empty());
    assert_eq!(monitor.last_sampled_length(), 800);
}
