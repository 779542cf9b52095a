//! Event bus for duckpad.
//!
//! Terminal input, timer ticks, and annotation results all arrive as one
//! `AppEvent` on a tokio unbounded channel. The main loop is the only
//! consumer and the only place `AppState` is mutated, which is what keeps
//! the monitor's in-flight check and its set in the same critical section.
//!
//! Timers:
//! - render every 33 ms (about 30 FPS), one `terminal.draw()` each;
//! - tick every 250 ms, used to animate the "analyzing" indicator.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use duckpad_core::AnnotationResult;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::interval;

const RENDER_PERIOD: Duration = Duration::from_millis(33);
const TICK_PERIOD: Duration = Duration::from_millis(250);

/// Everything the main loop reacts to.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// Key press (press events only; release/repeat are filtered out).
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    Tick,
    Render,
    /// A finished annotation request, boxed to keep the enum small.
    Annotation(Box<AnnotationResult>),
    Quit,
}

/// Sender and receiver halves of the event channel.
///
/// Clone `tx` for producers; `rx` belongs to the main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that forwards terminal input and timer ticks onto `tx`.
///
/// The crossterm stream future is fused so `select!` never polls it after it
/// completes. The task ends once the receiver is gone and a send fails.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick = interval(TICK_PERIOD);
        let mut render = interval(RENDER_PERIOD);
        let mut reader = EventStream::new();

        loop {
            let event = tokio::select! {
                _ = tick.tick() => Some(AppEvent::Tick),
                _ = render.tick() => Some(AppEvent::Render),
                maybe = reader.next().fuse() => match maybe {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        Some(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Mouse(mouse))) => Some(AppEvent::Mouse(mouse)),
                    Some(Ok(Event::Resize(w, h))) => Some(AppEvent::Resize(w, h)),
                    // Input stream closed: nothing more can drive the UI.
                    None => Some(AppEvent::Quit),
                    _ => None,
                },
            };

            if let Some(event) = event {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });
}
