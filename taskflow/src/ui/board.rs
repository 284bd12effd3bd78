//! Board rendering: three status columns of task cards.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use taskflow_proto::task::Task;

use super::theme;
use crate::app::{App, Mode};
use crate::board::{self, COLUMN_COUNT, FormField, TaskForm};
use crate::cache::{QueryKey, QueryView};

/// Text of an empty column.
pub const EMPTY_COLUMN: &str = "No tasks in this column.";
/// Text shown in every column when the list could not be loaded.
pub const LOAD_FAILED: &str = "Failed to load tasks.";

/// Render the board into `area`.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); COLUMN_COUNT])
        .split(area);

    let cache = app.cache.lock();
    match cache.view(QueryKey::AllTasks) {
        QueryView::Loading => {
            for (col, column_area) in areas.iter().enumerate() {
                render_message(frame, *column_area, app, col, "Loading tasks...", theme::dimmed());
            }
        }
        QueryView::Error(error) => {
            tracing::trace!(error, "rendering load failure");
            for (col, column_area) in areas.iter().enumerate() {
                render_message(
                    frame,
                    *column_area,
                    app,
                    col,
                    LOAD_FAILED,
                    theme::normal().fg(theme::ERROR),
                );
            }
        }
        QueryView::Loaded(tasks) => {
            let columns = board::group_columns(tasks);
            for (col, (column_area, cards)) in areas.iter().zip(columns).enumerate() {
                render_column(frame, *column_area, app, col, &cards);
            }
        }
    }
}

fn column_block(app: &App, col: usize, count: Option<usize>) -> Block<'static> {
    let heading = board::column_status(col).map_or_else(String::new, |s| s.heading());
    let title = match count {
        Some(n) => format!(" {heading} ({n}) "),
        None => format!(" {heading} "),
    };
    let color = theme::COLUMN_TITLES
        .get(col)
        .copied()
        .unwrap_or(theme::FG_PRIMARY);
    let border_style = if col == app.selected_column && app.mode == Mode::Board {
        theme::highlighted()
    } else {
        theme::normal()
    };

    Block::default()
        .title(Span::styled(title, theme::panel_title(color)))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_message(frame: &mut Frame, area: Rect, app: &App, col: usize, text: &str, style: Style) {
    let paragraph = Paragraph::new(Span::styled(text.to_string(), style))
        .block(column_block(app, col, None))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_column(frame: &mut Frame, area: Rect, app: &App, col: usize, cards: &[&Task]) {
    if cards.is_empty() {
        render_message(frame, area, app, col, EMPTY_COLUMN, theme::dimmed());
        return;
    }
    let block = column_block(app, col, Some(cards.len()));

    let items: Vec<ListItem> = cards.iter().map(|task| card_item(app, task)).collect();

    let mut state = ListState::default();
    if col == app.selected_column {
        state.select(app.selected_row.get(col).copied());
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item(app: &App, task: &Task) -> ListItem<'static> {
    if let Mode::Editing { task_id, form } = &app.mode
        && task_id == &task.id
    {
        return ListItem::new(edit_lines(form));
    }

    let busy = app.busy_kind(&task.id);
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("[{}] ", task.priority),
            theme::normal().fg(theme::priority_color(&task.priority)),
        ),
        Span::styled(task.title.clone(), theme::bold()),
    ])];
    if !task.description.is_empty() {
        lines.push(Line::styled(task.description.clone(), theme::dimmed()));
    }
    if let Some(kind) = busy {
        lines.push(Line::raw(kind.label()));
    }
    lines.push(Line::raw(""));

    let item = ListItem::new(lines);
    if busy.is_some() {
        item.style(theme::busy())
    } else {
        item
    }
}

/// Inline edit form lines for the card being edited.
fn edit_lines(form: &TaskForm) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = FormField::ALL
        .iter()
        .map(|&field| {
            let value = form.value_of(field).to_string();
            let value = match field {
                FormField::Status | FormField::Priority => format!("< {value} >"),
                FormField::Title | FormField::Description => value,
            };
            let style = if form.submitting {
                theme::busy()
            } else if field == form.focus {
                theme::input_focused()
            } else {
                theme::normal()
            };
            Line::from(vec![
                Span::styled(format!("{}: ", field.label()), theme::dimmed()),
                Span::styled(value, style),
            ])
        })
        .collect();

    lines.push(if form.submitting {
        Line::styled("Saving...", theme::busy())
    } else {
        Line::styled("Enter: save | Esc: cancel", theme::dimmed())
    });
    lines.push(Line::raw(""));
    lines
}
