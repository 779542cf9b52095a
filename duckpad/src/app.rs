//! Central application state for duckpad.
//!
//! Owns everything the UI reads and the keybinding dispatcher mutates: mode,
//! focus, the text buffer, the prompt input, scroll offsets, and the
//! `ChangeMonitor` session. No rendering happens here.
//!
//! The monitor lives inside `AppState` so its in-flight check runs in the same
//! synchronous handler as the edit that triggered it. A triggered request is
//! parked in `pending_request` until the main loop hands it to a task.

use duckpad_core::{AnalysisRequest, AnnotationResult, ChangeMonitor};
use ratatui::layout::Rect;

use crate::editor::TextBuffer;

/// Active keybinding set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and commands (default).
    #[default]
    Normal,
    /// Typing into the document.
    Insert,
    /// Typing into the instruction prompt.
    Prompt,
    HelpOverlay,
    /// Shown when quitting while a request is in flight.
    ConfirmQuit,
}

/// Which panel receives navigation keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Editor,
    Comments,
    Prompt,
}

impl PanelFocus {
    /// Cycle order: `Editor` → `Comments` → `Prompt` → `Editor`.
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Editor => PanelFocus::Comments,
            PanelFocus::Comments => PanelFocus::Prompt,
            PanelFocus::Prompt => PanelFocus::Editor,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Editor => PanelFocus::Prompt,
            PanelFocus::Comments => PanelFocus::Editor,
            PanelFocus::Prompt => PanelFocus::Comments,
        }
    }
}

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,

    pub buffer: TextBuffer,
    /// Content size of `buffer` as of the last `document_changed`.
    pub content_size: usize,
    /// Mirror of the monitor's prompt that the prompt panel edits.
    pub prompt_input: String,
    pub monitor: ChangeMonitor,
    /// Request triggered by the last edit, waiting to be spawned.
    pub pending_request: Option<AnalysisRequest>,
    /// True when the most recent completed request failed.
    pub last_request_failed: bool,

    /// First visible buffer line in the editor panel.
    pub editor_scroll: usize,
    pub comments_scroll: u16,
    /// First visible wrapped row of the prompt box outside Prompt mode.
    pub prompt_scroll: u16,
    pub help_scroll: u16,

    /// Inner heights cached after each render for paging and cursor follow.
    pub editor_viewport_height: u16,
    pub comments_viewport_height: u16,

    /// Editor width in percent when the side panel is shown. Default: 70.
    pub editor_pct: u16,
    /// Editor, comments, and prompt rects from the last render (mouse hit-testing).
    pub panel_rects: [Rect; 3],

    spinner_frame: usize,
}

impl AppState {
    pub fn new(monitor: ChangeMonitor, buffer: TextBuffer) -> Self {
        let prompt_input = monitor.prompt().to_owned();
        let content_size = buffer.to_document().content_size();
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            buffer,
            content_size,
            prompt_input,
            monitor,
            pending_request: None,
            last_request_failed: false,
            editor_scroll: 0,
            comments_scroll: 0,
            prompt_scroll: 0,
            help_scroll: 0,
            editor_viewport_height: 0,
            comments_viewport_height: 0,
            editor_pct: 70,
            panel_rects: [Rect::default(); 3],
            spinner_frame: 0,
        }
    }

    /// Runs the change monitor against the current buffer.
    ///
    /// Call after every document edit. A triggered request is stored in
    /// `pending_request`; changes dropped by the monitor leave it untouched.
    pub fn document_changed(&mut self) {
        let doc = self.buffer.to_document();
        self.content_size = doc.content_size();
        if let Some(request) = self.monitor.observe(&doc) {
            self.pending_request = Some(request);
        }
    }

    pub fn take_pending_request(&mut self) -> Option<AnalysisRequest> {
        self.pending_request.take()
    }

    /// Publishes a finished request into the monitor.
    pub fn apply_annotation(&mut self, result: AnnotationResult) {
        self.last_request_failed = result.outcome.is_failed();
        self.monitor.complete(result);
        self.comments_scroll = 0;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        self.prompt_input.push(c);
        self.monitor.set_prompt(self.prompt_input.clone());
    }

    pub fn pop_prompt_char(&mut self) {
        self.prompt_input.pop();
        self.monitor.set_prompt(self.prompt_input.clone());
    }

    pub fn clear_prompt(&mut self) {
        self.prompt_input.clear();
        self.monitor.set_prompt(String::new());
    }

    pub fn is_busy(&self) -> bool {
        self.monitor.is_in_flight()
    }

    /// Advances the status-bar spinner while a request is in flight.
    pub fn tick(&mut self) {
        if self.is_busy() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
    }

    pub fn spinner(&self) -> char {
        SPINNER[self.spinner_frame]
    }

    /// Adjusts `editor_scroll` so the cursor row is within the viewport.
    pub fn follow_cursor(&mut self) {
        let height = usize::from(self.editor_viewport_height.max(1));
        let (row, _) = self.buffer.cursor();
        if row < self.editor_scroll {
            self.editor_scroll = row;
        } else if row >= self.editor_scroll + height {
            self.editor_scroll = row + 1 - height;
        }
    }

    /// Moves down by `lines` in the focused panel (cursor rows in the editor).
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => {
                for _ in 0..lines {
                    self.buffer.move_down();
                }
                self.follow_cursor();
            }
            PanelFocus::Comments => {
                self.comments_scroll = self.comments_scroll.saturating_add(lines);
            }
            PanelFocus::Prompt => {
                self.prompt_scroll = self.prompt_scroll.saturating_add(lines);
            }
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => {
                for _ in 0..lines {
                    self.buffer.move_up();
                }
                self.follow_cursor();
            }
            PanelFocus::Comments => {
                self.comments_scroll = self.comments_scroll.saturating_sub(lines);
            }
            PanelFocus::Prompt => {
                self.prompt_scroll = self.prompt_scroll.saturating_sub(lines);
            }
        }
    }

    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Editor => {
                let rows = u16::try_from(self.buffer.lines().len()).unwrap_or(u16::MAX);
                self.scroll_up(rows);
            }
            PanelFocus::Comments => self.comments_scroll = 0,
            PanelFocus::Prompt => self.prompt_scroll = 0,
        }
    }

    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Editor => {
                let rows = u16::try_from(self.buffer.lines().len()).unwrap_or(u16::MAX);
                self.scroll_down(rows);
            }
            // Clamped by the renderer.
            PanelFocus::Comments => self.comments_scroll = u16::MAX,
            PanelFocus::Prompt => self.prompt_scroll = u16::MAX,
        }
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Editor => self.editor_viewport_height,
            PanelFocus::Comments | PanelFocus::Prompt => self.comments_viewport_height,
        }
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    /// Gives 5% of the width to the side panel. The editor keeps at least 40%.
    pub fn shrink_editor_panel(&mut self) {
        const MIN_EDITOR: u16 = 40;
        const STEP: u16 = 5;
        self.editor_pct = self.editor_pct.saturating_sub(STEP).max(MIN_EDITOR);
    }

    /// Takes 5% of the width from the side panel. The side panel keeps at least 15%.
    pub fn grow_editor_panel(&mut self) {
        const MAX_EDITOR: u16 = 85;
        const STEP: u16 = 5;
        self.editor_pct = (self.editor_pct + STEP).min(MAX_EDITOR);
    }
}
