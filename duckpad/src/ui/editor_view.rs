//! Editor panel renderer.
//!
//! Rendering starts at buffer line `editor_scroll`. Long lines soft-wrap at
//! the panel width, and the view scrolls within the wrapped rows so the
//! cursor is always on screen.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::wrap::{cursor_in_rows, slice_chars, wrap_ranges};

/// Renders the document panel and, in Insert mode, places the terminal cursor.
pub fn render_editor(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &AppState,
    theme: &Theme,
) {
    let block = panel_block("Document", focus == PanelFocus::Editor, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if state.buffer.is_empty() && state.mode != Mode::Insert {
        let hint = Line::styled("Press i to start writing.", Style::default().fg(theme.placeholder));
        frame.render_widget(Paragraph::new(hint), inner);
        return;
    }

    let width = usize::from(inner.width);
    let height = usize::from(inner.height);
    if width == 0 || height == 0 {
        return;
    }

    let lines = state.buffer.lines();
    let (cursor_row, cursor_col) = state.buffer.cursor();
    let first = state.editor_scroll.min(lines.len().saturating_sub(1));

    // Visual rows from `first` until the viewport is full and the cursor line is laid out.
    let mut rows: Vec<Line> = Vec::new();
    let mut cursor = None;
    for (idx, line) in lines.iter().enumerate().skip(first) {
        if rows.len() >= height && idx > cursor_row {
            break;
        }
        let ranges = wrap_ranges(line, width);
        if idx == cursor_row {
            let (r, x) = cursor_in_rows(&ranges, cursor_col, width);
            cursor = Some((rows.len() + r, x));
        }
        let style = line_style(line, theme);
        rows.extend(
            ranges
                .into_iter()
                .map(|range| Line::styled(slice_chars(line, range), style)),
        );
    }

    // Scroll within the laid-out rows so the cursor row is on screen.
    let skip = cursor.map_or(0, |(r, _)| r.saturating_sub(height - 1));
    let visible: Vec<Line> = rows.into_iter().skip(skip).take(height).collect();
    frame.render_widget(Paragraph::new(visible), inner);

    if state.mode == Mode::Insert {
        if let Some((r, x)) = cursor {
            let y = inner.y + u16::try_from(r - skip).unwrap_or(0);
            let x = inner.x + u16::try_from(x).unwrap_or(0);
            frame.set_cursor_position(Position { x, y });
        }
    }
}

fn line_style(line: &str, theme: &Theme) -> Style {
    if line.starts_with('#') {
        Style::default().fg(theme.editor_heading).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.editor_text)
    }
}
