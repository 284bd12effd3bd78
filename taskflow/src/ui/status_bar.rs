//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Mode};
use crate::cache::QueryKey;

/// Key help for the active mode.
#[must_use]
pub const fn help_text(mode: &Mode) -> &'static str {
    match mode {
        Mode::Board => "←→/hl: column | ↑↓/jk: card | n: new | e: edit | d: delete | q: quit",
        Mode::Creating | Mode::Editing { .. } => {
            "Tab: next field | ←→: change | Enter: save | Esc: cancel"
        }
        Mode::ConfirmDelete { .. } => "y: delete | n: keep",
    }
}

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (synced_at, fetching) = {
        let cache = app.cache.lock();
        (
            cache.fetched_at(QueryKey::AllTasks),
            cache.is_fetching(QueryKey::AllTasks),
        )
    };

    let (dot_color, sync_text) = match synced_at {
        Some(at) if !fetching => (
            theme::SUCCESS,
            format!("synced {}", at.format(&app.timestamp_format)),
        ),
        Some(at) => (
            theme::WARNING,
            format!("syncing (last {})", at.format(&app.timestamp_format)),
        ),
        None if fetching => (theme::WARNING, "syncing".to_string()),
        None => (theme::ERROR, "not synced".to_string()),
    };

    let status_line = Line::from(vec![
        Span::styled("TaskFlow", theme::bold()),
        Span::raw(" | "),
        Span::raw(app.server_label.clone()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {sync_text}")),
        Span::raw(" | "),
        Span::styled(help_text(&app.mode), theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
