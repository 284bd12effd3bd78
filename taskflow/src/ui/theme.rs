//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};
use taskflow_proto::task::Priority;

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for the focused column and card.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success color (last sync indicator).
pub const SUCCESS: Color = Color::Green;

/// Warning color (stale data, pending fetch).
pub const WARNING: Color = Color::Yellow;

/// Error color (failed load, alerts).
pub const ERROR: Color = Color::Red;

/// Title colors of the TODO, IN PROGRESS and DONE columns.
pub const COLUMN_TITLES: [Color; 3] = [Color::Blue, Color::Yellow, Color::Green];

/// Color of a priority badge. Unknown priorities render gray.
#[must_use]
pub const fn priority_color(priority: &Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
        Priority::Other(_) => FG_SECONDARY,
    }
}

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (descriptions, busy cards).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused column borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected card style.
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for a card with a request in flight.
#[must_use]
pub fn busy() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for the focused input of a form.
#[must_use]
pub fn input_focused() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}
