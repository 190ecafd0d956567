//! Colors and styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (completed rows, hints).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for the selected row and focused input.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Checked checkbox color.
pub const SUCCESS: Color = Color::Green;

/// Busy marker color.
pub const WARNING: Color = Color::Yellow;

/// Error banner color.
pub const ERROR: Color = Color::Red;

/// Panel title color for the task list.
pub const TASKS_TITLE: Color = Color::Green;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style.
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Focused border style.
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected row style.
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Completed task title: dimmed and struck through.
#[must_use]
pub fn completed() -> Style {
    dimmed().add_modifier(Modifier::CROSSED_OUT)
}

/// The pending create row.
#[must_use]
pub fn pending() -> Style {
    dimmed().add_modifier(Modifier::ITALIC)
}

/// Inline editor text.
#[must_use]
pub fn editor() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Error banner.
#[must_use]
pub fn error_banner() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(ERROR)
        .add_modifier(Modifier::BOLD)
}

/// Status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Panel title with a given color.
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
