//! Board model: status columns and the task forms.
//!
//! Columns are derived from the full task list on every render by filtering
//! on status; nothing is cached per column.

pub mod form;

pub use form::{FormAction, FormError, FormField, TaskForm};

use taskflow_proto::task::{Task, TaskStatus};

/// Number of columns on the board.
pub const COLUMN_COUNT: usize = TaskStatus::COLUMNS.len();

static BOARD_COLUMNS: [TaskStatus; COLUMN_COUNT] = TaskStatus::COLUMNS;

/// Tasks whose status is `status`, in list order.
#[must_use]
pub fn tasks_in<'a>(tasks: &'a [Task], status: &TaskStatus) -> Vec<&'a Task> {
    tasks.iter().filter(|t| &t.status == status).collect()
}

/// Splits `tasks` into the three board columns (TODO, IN PROGRESS, DONE).
///
/// Tasks with an unrecognized status land in no column.
#[must_use]
pub fn group_columns(tasks: &[Task]) -> [Vec<&Task>; COLUMN_COUNT] {
    BOARD_COLUMNS.each_ref().map(|status| tasks_in(tasks, status))
}

/// The status shown in column `index`, if it exists.
#[must_use]
pub fn column_status(index: usize) -> Option<&'static TaskStatus> {
    BOARD_COLUMNS.get(index)
}
