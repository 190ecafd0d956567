//! Terminal UI rendering.
//!
//! Rendering is a pure function of the [`App`] presentation state and a
//! [`TodoView`] snapshot taken from the controller each frame.

pub mod input;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;
use crate::controller::TodoView;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App, view: &TodoView) {
    let banner_height = u16::from(view.error.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // New-task input
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(3),                // Task list
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    input::render(frame, chunks[0], app, view);
    if let Some(message) = &view.error {
        input::render_error(frame, chunks[1], message);
    }
    task_list::render(frame, chunks[2], app, view);
    status_bar::render(frame, chunks[3], app, view);
}
