//! Terminal UI rendering.

pub mod board;
pub mod popup;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::{App, Mode};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Board above, status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    board::render(frame, main_chunks[0], app);
    status_bar::render(frame, main_chunks[1], app);

    match &app.mode {
        Mode::Creating => popup::render_create_form(frame, &app.draft),
        Mode::ConfirmDelete { title, .. } => popup::render_confirm_delete(frame, title),
        Mode::Board | Mode::Editing { .. } => {}
    }

    if let Some(alert) = &app.alert {
        popup::render_alert(frame, alert);
    }
}
