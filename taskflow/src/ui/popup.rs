//! Modal popups: the creation form, the delete confirmation, and alerts.

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::theme;
use crate::board::{FormField, TaskForm};

/// Prompt shown before deleting a task.
#[must_use]
pub fn delete_prompt(title: &str) -> String {
    format!("Delete \"{title}\"? This cannot be undone.")
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Render the creation form.
pub fn render_create_form(frame: &mut Frame, form: &TaskForm) {
    let area = centered(frame.area(), 60, 10);

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let value = form.value_of(field);
            let value = match field {
                FormField::Status | FormField::Priority => format!("< {value} >"),
                FormField::Title | FormField::Description => format!("{value}_"),
            };
            let style = if form.submitting {
                theme::dimmed()
            } else if field == form.focus {
                theme::input_focused()
            } else {
                theme::normal()
            };
            Line::from(vec![
                Span::styled(format!("{:>12}: ", field.label()), theme::dimmed()),
                Span::styled(value, style),
            ])
        })
        .collect();

    lines.push(Line::raw(""));
    lines.push(if form.submitting {
        Line::styled("Adding Task...", theme::normal().fg(theme::WARNING))
    } else {
        Line::styled(
            "Tab: next field | ←→: change | Enter: add task | Esc: close",
            theme::dimmed(),
        )
    });

    let block = Block::default()
        .title(Span::styled(" New Task ", theme::panel_title(theme::HIGHLIGHT)))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the delete confirmation for the task titled `title`.
pub fn render_confirm_delete(frame: &mut Frame, title: &str) {
    let area = centered(frame.area(), 50, 6);
    let text = vec![
        Line::raw(delete_prompt(title)),
        Line::raw(""),
        Line::styled("y/Enter: delete | n/Esc: keep", theme::dimmed()),
    ];
    let block = Block::default()
        .title(Span::styled(" Confirm ", theme::panel_title(theme::WARNING)))
        .borders(Borders::ALL)
        .border_style(theme::normal().fg(theme::WARNING));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Render a blocking alert.
pub fn render_alert(frame: &mut Frame, message: &str) {
    let area = centered(frame.area(), 50, 6);
    let text = vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::styled("Press any key", theme::dimmed()),
    ];
    let block = Block::default()
        .title(Span::styled(" Alert ", theme::panel_title(theme::ERROR)))
        .borders(Borders::ALL)
        .border_style(theme::normal().fg(theme::ERROR));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
