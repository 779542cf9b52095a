//! UI rendering for duckpad.
//!
//! `render()` is the single entry point, called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel has its own renderer module.

mod comments;
mod editor_view;
mod layout;
mod overlay;
mod wrap;
pub mod keybindings;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: document, questions, prompt, status bar, overlays.
///
/// Viewport heights and panel rects are written back into `state` before the
/// panels are drawn, so the next keypress pages and hit-tests against what
/// is on screen.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [editor, comments, prompt, status_bar] = compute_layout(frame, state);

    state.editor_viewport_height = inner_rect(editor).height;
    state.comments_viewport_height = inner_rect(comments).height;
    state.panel_rects = [editor, comments, prompt];
    state.follow_cursor();

    let focus = state.focus;

    editor_view::render_editor(frame, editor, focus, state, theme);

    // Collapsed on narrow terminals.
    if comments.width > 0 {
        comments::render_comments(frame, comments, focus, state, theme);
    }
    if prompt.width > 0 {
        comments::render_prompt(frame, prompt, focus, state, theme);
    }

    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::HelpOverlay => overlay::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmQuit => overlay::render_confirm_quit(frame, theme),
        Mode::Normal | Mode::Insert | Mode::Prompt => {}
    }
}
