//! Background annotation task.
//!
//! The main loop owns the `ChangeMonitor`; this module only runs the network
//! call off the loop. A request goes in, exactly one `AppEvent::Annotation`
//! comes back, whatever the outcome, so the monitor's in-flight flag is always
//! cleared.

use std::sync::Arc;

use duckpad_core::{AnalysisRequest, AnnotationResult, Annotator};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::event::AppEvent;

/// Runs `annotator` for `request` on a tokio task and reports back on `event_tx`.
///
/// The request cannot be cancelled; its result is delivered even if the
/// document has changed in the meantime.
pub fn spawn_annotation(
    annotator: Arc<dyn Annotator>,
    request: AnalysisRequest,
    event_tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = annotator.annotate(&request.text, &request.prompt).await;
        let result = AnnotationResult { content_size: request.content_size, outcome };
        // Receiver gone means the app is shutting down.
        let _ = event_tx.send(AppEvent::Annotation(Box::new(result)));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use duckpad_core::AnnotationOutcome;

    struct Echo;

    #[async_trait]
    impl Annotator for Echo {
        async fn annotate(&self, text: &str, prompt: &str) -> AnnotationOutcome {
            AnnotationOutcome::Questions(vec![format!("{prompt}:{text}")])
        }
    }

    #[tokio::test]
    async fn result_carries_request_size_and_outcome() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let request = AnalysisRequest {
            text: "body".to_owned(),
            prompt: "ask".to_owned(),
            content_size: 321,
        };

        spawn_annotation(Arc::new(Echo), request, tx).await.unwrap();

        match rx.recv().await {
            Some(AppEvent::Annotation(result)) => {
                assert_eq!(result.content_size, 321);
                assert_eq!(
                    result.outcome,
                    AnnotationOutcome::Questions(vec!["ask:body".to_owned()])
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
