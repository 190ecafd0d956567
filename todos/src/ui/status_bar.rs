//! Footer with counts, filter, and key hints.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use todos_proto::filter::Filter;

use super::theme;
use crate::app::{App, Mode};
use crate::controller::TodoView;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &TodoView) {
    let help_text = match app.mode {
        Mode::Browse => {
            "jk: move | space: toggle | enter: edit | d: delete | a: add | t: all | c: clear | 1-3/f: filter | q: quit"
        }
        Mode::Compose => "enter: add | esc: back",
        Mode::Edit(_) => "enter/↑↓: save | esc: cancel | empty title deletes",
    };

    let left = if view.active_count == 1 {
        "1 item left".to_string()
    } else {
        format!("{} items left", view.active_count)
    };

    let mut spans = vec![Span::styled(left, theme::bold()), Span::raw(" | ")];
    for filter in Filter::ALL {
        let style = if filter == view.filter {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(filter.label(), style));
        spans.push(Span::raw(" "));
    }
    if view.completed_count > 0 {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            format!("{} completed", view.completed_count),
            theme::dimmed(),
        ));
    }
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(help_text, theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
