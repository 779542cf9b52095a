//! duckpad: a terminal writing pad with a rubber-duck reviewer.
//!
//! While you write, the document is sampled on every edit. Once its size has
//! drifted far enough from the last sample, the text is sent to a chat
//! completions endpoint and the questions that come back replace the side
//! panel.
//!
//! # Startup sequence
//!
//! 1. Parse arguments (clap) and read the optional initial file.
//! 2. Create `.duckpad/` and start file logging.
//! 3. Load config from XDG, apply the `OPENAI_API_KEY` override.
//! 4. Build the requester. A missing key is reported on stderr and the
//!    process exits before the terminal is touched.
//! 5. `install_panic_hook()`, `register_sigterm()`, `init_tui()`.
//! 6. Spawn the event task and enter the loop.
//!
//! `restore_tui()` runs at the single exit point after the loop. Inside the
//! loop `?` is only used in the Render arm, so a draw error breaks out of the
//! closure and still reaches the restore below.

mod annotate;
mod app;
mod cli;
mod editor;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use duckpad_core::{Annotator, ChangeMonitor, Config, Requester};
use tracing::{error, info};

use crate::app::AppState;
use crate::cli::Cli;
use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

const STATE_DIR: &str = ".duckpad";

/// `$XDG_CONFIG_HOME/duckpad/config.toml`, falling back to `~/.config`.
fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("duckpad").join("config.toml")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Read before touching the working directory so a bad path leaves no trace.
    let buffer = match cli.initial_buffer() {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("duckpad: cannot read initial file: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::create_dir_all(STATE_DIR)
        .and_then(|()| logging::init(&PathBuf::from(STATE_DIR).join("duckpad.log")))
    {
        eprintln!("duckpad: cannot set up {STATE_DIR}/: {e}");
        return ExitCode::FAILURE;
    }

    let config = Config::load_or_default(&config_path());
    let theme = theme::Theme::from_name(&config.theme);

    if let Some(path) = &cli.file {
        info!(path = %path.display(), lines = buffer.lines().len(), "loaded initial content");
    }

    let annotator: Arc<dyn Annotator> = match Requester::new(config.annotator.clone()) {
        Ok(requester) => {
            info!(?requester, "annotator ready");
            Arc::new(requester)
        }
        Err(e) => {
            error!(error = %e, "cannot build annotator");
            eprintln!("duckpad: {e}");
            return ExitCode::FAILURE;
        }
    };

    let monitor = ChangeMonitor::new(config.monitor.clone(), config.prompt.clone());
    let mut state = AppState::new(monitor, buffer);

    match run(&mut state, annotator, &theme).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "terminal error");
            eprintln!("duckpad: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Owns the terminal from init to restore and drives the event loop.
async fn run(
    state: &mut AppState,
    annotator: Arc<dyn Annotator>,
    theme: &theme::Theme,
) -> std::io::Result<()> {
    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let tx = handler.tx;
    let mut rx = handler.rx;

    let result = event_loop(&mut terminal, state, &annotator, theme, &tx, &mut rx, &term_flag).await;

    tui::restore_tui()?;
    info!("shutdown");
    result
}

async fn event_loop(
    terminal: &mut tui::Tui,
    state: &mut AppState,
    annotator: &Arc<dyn Annotator>,
    theme: &theme::Theme,
    tx: &tokio::sync::mpsc::UnboundedSender<AppEvent>,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    term_flag: &std::sync::atomic::AtomicBool,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even with no other events.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        terminal.draw(|frame| ui::render(frame, state, theme))?;
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => handle_key(key, state),
                    Some(AppEvent::Mouse(mouse)) => handle_mouse(mouse, state),
                    Some(AppEvent::Annotation(result)) => {
                        state.apply_annotation(*result);
                        KeyAction::Continue
                    }
                    Some(AppEvent::Tick) => {
                        state.tick();
                        KeyAction::Continue
                    }
                    // The next Render picks up the new size.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Quit) | None => KeyAction::Quit,
                };

                if action == KeyAction::Quit {
                    return Ok(());
                }

                if let Some(request) = state.take_pending_request() {
                    annotate::spawn_annotation(Arc::clone(annotator), request, tx.clone());
                }
            }
        }

        if term_flag.load(Ordering::Relaxed) {
            info!("SIGTERM received");
            return Ok(());
        }
    }
}
