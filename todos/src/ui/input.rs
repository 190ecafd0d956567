//! New-task input and error banner.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Mode};
use crate::controller::TodoView;

/// Render the new-task input box.
pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &TodoView) {
    let focused = app.mode == Mode::Compose;
    let marker = if view.all_completed { "[✓] " } else { "[ ] " };

    let text = if view.new_title.is_empty() && !focused {
        Span::styled("What needs to be done? (a)", theme::dimmed())
    } else if view.input_locked {
        Span::styled(view.new_title.as_str(), theme::dimmed())
    } else {
        Span::styled(view.new_title.as_str(), theme::normal())
    };

    let mut spans = vec![Span::styled(marker, theme::dimmed()), text];
    if focused && !view.input_locked {
        spans.push(Span::styled("▏", theme::highlighted()));
    }

    let block = Block::default()
        .title(Span::styled("todos", theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Render the one-line error banner.
pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(vec![
        Span::raw(" ⚠ "),
        Span::raw(message),
        Span::raw("   (x to dismiss)"),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme::error_banner()), area);
}
