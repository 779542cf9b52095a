//! Side panel renderers: the question list and the instruction prompt box.

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::wrap::{cursor_in_rows, slice_chars, wrap_ranges};

/// Renders the current comment batch, newest response only.
///
/// Each comment is a bullet line followed by a dimmed local timestamp. The
/// panel scrolls by `comments_scroll`, clamped to the content height so `G`
/// can jump to the end with `u16::MAX`.
pub fn render_comments(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &AppState,
    theme: &Theme,
) {
    let title = format!("Questions ({})", state.monitor.comments().len());
    let block = panel_block(&title, focus == PanelFocus::Comments, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let comments = state.monitor.comments();
    if comments.is_empty() {
        let hint = if state.is_busy() {
            "Thinking about your text…"
        } else {
            "Keep writing. Questions appear here."
        };
        frame.render_widget(
            Paragraph::new(Line::styled(hint, Style::default().fg(theme.placeholder)))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let mut lines = Vec::with_capacity(comments.len() * 3);
    for comment in comments {
        lines.push(Line::from(vec![
            Span::styled("• ", Style::default().fg(theme.border_active)),
            Span::styled(comment.content.as_str(), Style::default().fg(theme.comment_text)),
        ]));
        let stamp = comment.created_at.with_timezone(&Local).format("%H:%M:%S");
        lines.push(Line::styled(
            format!("  {stamp}"),
            Style::default().fg(theme.comment_meta).add_modifier(Modifier::ITALIC),
        ));
        lines.push(Line::default());
    }

    let total = u16::try_from(wrapped_height(&lines, inner.width)).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(inner.height);
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((state.comments_scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, inner);
}

/// Rows `lines` occupy when wrapped at `width`, ignoring word boundaries.
fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum()
}

/// Renders the editable instruction prompt.
///
/// The input soft-wraps at the panel width. In Prompt mode the view follows
/// the cursor, which sits after the last character of the input.
pub fn render_prompt(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &AppState,
    theme: &Theme,
) {
    let editing = state.mode == Mode::Prompt;
    let title = if editing { "Prompt (Esc to finish)" } else { "Prompt" };
    let block = panel_block(title, focus == PanelFocus::Prompt || editing, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if state.prompt_input.is_empty() && !editing {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No instruction. Press p to write one.",
                Style::default().fg(theme.placeholder),
            )),
            inner,
        );
        return;
    }

    let width = usize::from(inner.width);
    let height = usize::from(inner.height);
    if width == 0 || height == 0 {
        return;
    }

    let style = Style::default().fg(theme.prompt_text);
    let mut rows: Vec<Line> = Vec::new();
    let mut cursor = (0, 0);
    for line in state.prompt_input.split('\n') {
        let ranges = wrap_ranges(line, width);
        let (r, x) = cursor_in_rows(&ranges, line.chars().count(), width);
        cursor = (rows.len() + r, x);
        rows.extend(
            ranges
                .into_iter()
                .map(|range| Line::styled(slice_chars(line, range), style)),
        );
    }

    // Editing keeps the cursor (end of input) visible; browsing follows `prompt_scroll`.
    let skip = if editing {
        cursor.0.saturating_sub(height - 1)
    } else {
        usize::from(state.prompt_scroll).min(rows.len().saturating_sub(height))
    };
    let visible: Vec<Line> = rows.into_iter().skip(skip).take(height).collect();
    frame.render_widget(Paragraph::new(visible), inner);

    if editing {
        let y = inner.y + u16::try_from(cursor.0 - skip).unwrap_or(0);
        let x = inner.x + u16::try_from(cursor.1).unwrap_or(0);
        frame.set_cursor_position(Position { x, y });
    }
}
