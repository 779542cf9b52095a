//! Modal overlays drawn on top of the panel layout.
//!
//! Both overlays erase their area with `Clear` before drawing, inside the same
//! `terminal.draw()` call as the panels.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the keybinding reference, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 50 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 50 {
        return;
    }

    let area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Help (j/k scroll, ? or Esc to close) ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        area,
    );
}

fn help_text(theme: &Theme) -> Text<'static> {
    let section = Style::default().fg(theme.editor_heading).add_modifier(Modifier::BOLD);
    Text::from(vec![
        Line::styled("Normal", section),
        Line::from("  i             Write in the document"),
        Line::from("  p             Edit the instruction prompt"),
        Line::from("  H / L         Move focus to previous / next panel"),
        Line::from("  j / k         Move cursor (document) or scroll (questions, prompt)"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  < / >         Shrink / grow the document panel"),
        Line::from("  ?             Toggle this help"),
        Line::from("  q / Esc       Quit"),
        Line::from(""),
        Line::styled("Insert", section),
        Line::from("  Arrows        Move the cursor"),
        Line::from("  Home / End    Start / end of line"),
        Line::from("  Tab           Insert four spaces"),
        Line::from("  Esc           Back to Normal"),
        Line::from(""),
        Line::styled("Prompt", section),
        Line::from("  Enter         New line"),
        Line::from("  Ctrl-u        Clear the prompt"),
        Line::from("  Esc           Back to Normal"),
        Line::from(""),
        Line::from("Questions refresh after the document grows or shrinks by"),
        Line::from("more than the configured dead-band (100 characters by default)."),
    ])
}

/// Asks for confirmation before quitting with a request in flight.
pub fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = frame
        .area()
        .centered(Constraint::Length(44), Constraint::Length(5));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Quit? ")
        .border_style(Style::default().fg(theme.status_busy));

    let body = Text::from(vec![
        Line::from("An analysis is still running."),
        Line::from("Quit anyway?  y / n"),
    ]);
    frame.render_widget(Paragraph::new(body).block(block).centered(), area);
}
