//! Keybinding dispatcher for duckpad.
//!
//! Translates crossterm key and mouse events into `AppState` mutations and
//! returns a `KeyAction` telling the event loop whether to keep going. The
//! dispatcher branches on `state.mode` first so each mode has its own handler.
//!
//! Every handler that edits the document calls `AppState::document_changed`
//! before returning, so the change monitor sees each edit exactly once.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

const TAB_WIDTH: usize = 4;

/// Control-flow signal returned from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event to the handler for the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
        Mode::Prompt => handle_prompt(key, state),
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('H') => state.focus = state.focus.prev(),
        KeyCode::Char('L') => state.focus = state.focus.next(),

        KeyCode::Char('i') => {
            state.focus = PanelFocus::Editor;
            state.mode = Mode::Insert;
        }
        KeyCode::Char('p') => enter_prompt(state),
        KeyCode::Enter if state.focus == PanelFocus::Prompt => enter_prompt(state),

        KeyCode::Char('<') => state.shrink_editor_panel(),
        KeyCode::Char('>') => state.grow_editor_panel(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            // Leaving with a request in flight discards its result.
            if state.is_busy() {
                state.mode = Mode::ConfirmQuit;
            } else {
                return KeyAction::Quit;
            }
        }

        _ => {}
    }
    KeyAction::Continue
}

fn enter_prompt(state: &mut AppState) {
    state.focus = PanelFocus::Prompt;
    state.mode = Mode::Prompt;
}

/// Handles j / k / g / G and the Ctrl half-page keys.
///
/// Returns `None` when the key is not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.scroll_top(),
        KeyCode::Char('G') => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Edits the document buffer. Only keys that change the text notify the monitor.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let changed = match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            false
        }
        KeyCode::Char(c) if !ctrl => {
            state.buffer.insert_char(c);
            true
        }
        // Spaces, so every char stays one cell wide for cursor placement.
        KeyCode::Tab => {
            for _ in 0..TAB_WIDTH {
                state.buffer.insert_char(' ');
            }
            true
        }
        KeyCode::Enter => {
            state.buffer.insert_newline();
            true
        }
        KeyCode::Backspace => state.buffer.backspace(),
        KeyCode::Delete => state.buffer.delete(),
        KeyCode::Left => {
            state.buffer.move_left();
            false
        }
        KeyCode::Right => {
            state.buffer.move_right();
            false
        }
        KeyCode::Up => {
            state.buffer.move_up();
            false
        }
        KeyCode::Down => {
            state.buffer.move_down();
            false
        }
        KeyCode::Home => {
            state.buffer.move_home();
            false
        }
        KeyCode::End => {
            state.buffer.move_end();
            false
        }
        _ => false,
    };

    if changed {
        state.document_changed();
    }
    state.follow_cursor();
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Prompt mode
// ---------------------------------------------------------------------------

fn handle_prompt(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Char('u') if ctrl => state.clear_prompt(),
        KeyCode::Char(c) if !ctrl => state.push_prompt_char(c),
        KeyCode::Enter => state.push_prompt_char('\n'),
        KeyCode::Backspace => state.pop_prompt_char(),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

/// `y` quits; `n` or `Esc` returns to Normal. Other keys are ignored.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses the panel under the pointer; the wheel scrolls 3 lines.
///
/// Clicks are ignored outside Normal mode so an overlay or an active text
/// input keeps its focus.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if state.mode == Mode::Normal => {
            focus_at(Position { x: mouse.column, y: mouse.row }, state);
        }
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else {
                state.scroll_up(3);
            }
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else {
                state.scroll_down(3);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

fn focus_at(pos: Position, state: &mut AppState) {
    let [editor, comments, prompt] = state.panel_rects;

    if editor.contains(pos) {
        state.focus = PanelFocus::Editor;
    } else if comments.width > 0 && comments.contains(pos) {
        state.focus = PanelFocus::Comments;
    } else if prompt.width > 0 && prompt.contains(pos) {
        state.focus = PanelFocus::Prompt;
    }
}
