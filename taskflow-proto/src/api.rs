//! HTTP routes and response bodies of the task API.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Collection route: `GET` lists, `POST` creates.
pub const TASKS_PATH: &str = "/api/task";

/// Item route: `PUT` updates, `DELETE` removes.
pub const TASK_PATH: &str = "/api/task/{id}";

/// Error message returned when an id does not match any task.
pub const TASK_NOT_FOUND: &str = "Task not found";

/// Confirmation message returned by a successful delete.
pub const DELETED: &str = "Deleted";

/// Body of a successful `DELETE /api/task/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always [`DELETED`].
    pub message: String,
    /// The task that was removed.
    pub task: Task,
}

impl DeleteResponse {
    /// Wraps a removed task in the standard confirmation body.
    #[must_use]
    pub fn deleted(task: Task) -> Self {
        Self {
            message: DELETED.to_string(),
            task,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorBody {
    /// The body sent with a 404 for an unknown task id.
    #[must_use]
    pub fn task_not_found() -> Self {
        Self {
            error: TASK_NOT_FOUND.to_string(),
        }
    }
}
