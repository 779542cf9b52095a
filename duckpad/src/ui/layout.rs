//! Responsive layout for duckpad.
//!
//! Pure layout arithmetic, recomputed inside every `terminal.draw()`.
//!
//! At `>= 80` columns the editor takes `AppState.editor_pct` of the width and
//! the side panel the rest, split vertically into comments (fill) and the
//! prompt box (fixed height). Narrower terminals collapse the side panel.
//! Adjacent borders overlap by one cell and merge with `MergeStrategy::Fuzzy`.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Minimum terminal width at which the side panel is shown.
pub const SIDE_PANEL_MIN_WIDTH: u16 = 80;
/// Outer height of the prompt box, borders included.
const PROMPT_HEIGHT: u16 = 8;

/// Returns `[editor, comments, prompt, status_bar]` for the current frame.
///
/// Comments and prompt have zero width when the side panel is collapsed.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    if frame.area().width < SIDE_PANEL_MIN_WIDTH {
        let collapsed = Rect { x: main_area.right(), width: 0, ..main_area };
        return [main_area, collapsed, collapsed, status_bar];
    }

    let horizontal = Layout::horizontal([
        Constraint::Percentage(state.editor_pct),
        Constraint::Fill(1),
    ])
    .spacing(Spacing::Overlap(1));
    let [editor, side] = main_area.layout(&horizontal);

    let [comments, prompt] = side.layout(
        &Layout::vertical([Constraint::Fill(1), Constraint::Length(PROMPT_HEIGHT)])
            .spacing(Spacing::Overlap(1)),
    );

    [editor, comments, prompt, status_bar]
}

/// Strips the 1-cell border from a panel rect.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered panel block: thick and `border_active` when focused, plain otherwise.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let (border_type, color) = if is_focused {
        (BorderType::Thick, theme.border_active)
    } else {
        (BorderType::Plain, theme.border_inactive)
    };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the one-row status bar: mode, request state, comment count.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Prompt => (" PROMPT ", theme.status_mode_prompt),
        Mode::Normal | Mode::HelpOverlay | Mode::ConfirmQuit => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    if state.is_busy() {
        spans.push(Span::styled(
            format!(" {} analyzing… ", state.spinner()),
            Style::default().fg(theme.status_busy),
        ));
    } else if state.last_request_failed {
        spans.push(Span::raw(" last request failed "));
    }

    let count = state.monitor.comments().len();
    spans.push(Span::raw(format!(
        " {count} question{} │ {} chars ",
        if count == 1 { "" } else { "s" },
        state.content_size,
    )));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
