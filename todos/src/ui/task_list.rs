//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::theme;
use crate::app::{App, Mode};
use crate::controller::{RowView, TodoView};

/// Render the visible rows, the pending row, and busy markers.
pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &TodoView) {
    let items: Vec<ListItem> = view.rows.iter().map(row_item).collect();

    let block = Block::default()
        .title(format!("{} ", view.filter.label()))
        .borders(Borders::ALL)
        .border_style(if matches!(app.mode, Mode::Browse | Mode::Edit(_)) {
            theme::highlighted()
        } else {
            theme::normal()
        });

    if items.is_empty() {
        let empty = List::new([ListItem::new(Span::styled("Nothing here", theme::dimmed()))])
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(block).highlight_style(theme::selected());
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn row_item(row: &RowView) -> ListItem<'static> {
    let checkbox = if row.task.completed { "[✓]" } else { "[ ]" };
    let check_style = if row.task.completed {
        theme::normal().fg(theme::SUCCESS)
    } else {
        theme::normal()
    };

    let title = match &row.draft {
        Some(draft) => Span::styled(format!("{draft}▏"), theme::editor()),
        None if row.is_pending() => Span::styled(row.task.title.clone(), theme::pending()),
        None if row.task.completed => Span::styled(row.task.title.clone(), theme::completed()),
        None => Span::styled(row.task.title.clone(), theme::normal()),
    };

    let mut spans = vec![Span::styled(checkbox, check_style), Span::raw(" "), title];
    if row.busy {
        spans.push(Span::styled("  ⋯", theme::normal().fg(theme::WARNING)));
    }
    ListItem::new(Line::from(spans))
}
