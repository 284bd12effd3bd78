//! Task model shared by the `TaskFlow` server and client.
//!
//! A [`Task`] is the only entity on the board. The server assigns its
//! [`TaskId`]; clients send a [`NewTask`] to create one and a [`TaskUpdate`]
//! to change any subset of its fields. Status and priority accept any JSON
//! value outside the known set and carry it through unchanged.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Opaque task identifier, generated by the store on creation.
///
/// Freshly generated ids are UUID v7 strings, so they are time-ordered and
/// never repeat. Any string is accepted when parsing a request path; a lookup
/// for an id that was never issued simply finds nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Board column a task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
    /// Any other value a client sent (`null` and numbers included); stored
    /// verbatim and shown in no column.
    Other(Value),
}

impl TaskStatus {
    /// The three board columns, left to right.
    pub const COLUMNS: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire representation (`TODO`, `IN_PROGRESS`, `DONE`, or the raw value).
    #[must_use]
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Self::Todo => Cow::Borrowed("TODO"),
            Self::InProgress => Cow::Borrowed("IN_PROGRESS"),
            Self::Done => Cow::Borrowed("DONE"),
            Self::Other(raw) => raw_text(raw),
        }
    }

    /// Column heading, e.g. `IN PROGRESS`.
    #[must_use]
    pub fn heading(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<Value> for TaskStatus {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("TODO") => Self::Todo,
            Some("IN_PROGRESS") => Self::InProgress,
            Some("DONE") => Self::Done,
            _ => Self::Other(value),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        Self::from(Value::String(value))
    }
}

impl From<TaskStatus> for Value {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Other(raw) => raw,
            known => Self::String(known.as_str().into_owned()),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Display-only priority of a task. No ordering is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (the creation-form default).
    #[default]
    Medium,
    /// High priority.
    High,
    /// Any other value a client sent; stored verbatim.
    Other(Value),
}

impl Priority {
    /// Known priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire representation (`LOW`, `MEDIUM`, `HIGH`, or the raw value).
    #[must_use]
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Self::Low => Cow::Borrowed("LOW"),
            Self::Medium => Cow::Borrowed("MEDIUM"),
            Self::High => Cow::Borrowed("HIGH"),
            Self::Other(raw) => raw_text(raw),
        }
    }
}

impl From<Value> for Priority {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("LOW") => Self::Low,
            Some("MEDIUM") => Self::Medium,
            Some("HIGH") => Self::High,
            _ => Self::Other(value),
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::from(Value::String(value))
    }
}

impl From<Priority> for Value {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Other(raw) => raw,
            known => Self::String(known.as_str().into_owned()),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Display text of a raw enum value: strings unquoted, anything else as JSON.
fn raw_text(raw: &Value) -> Cow<'_, str> {
    match raw {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// A task as stored by the server and returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier, immutable after creation.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Free-form description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Column placement.
    pub status: TaskStatus,
    /// Display priority.
    pub priority: Priority,
}

impl Task {
    /// Builds a stored task from creation data and a freshly issued id.
    #[must_use]
    pub fn from_new(id: TaskId, data: NewTask) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
        }
    }

    /// Shallow-merges an update into this task.
    ///
    /// Fields present in `update` overwrite (an empty string included);
    /// absent fields keep their value. The id never changes.
    pub fn apply_update(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
    }
}

/// Payload for creating a task: a [`Task`] without its id.
///
/// Missing fields fall back to the creation-form defaults. An `id` field in
/// the body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewTask {
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Initial column (`TODO` by default).
    pub status: TaskStatus,
    /// Initial priority (`MEDIUM` by default).
    pub priority: Priority,
}

/// Partial update: only the fields that are `Some` are applied.
///
/// A JSON `null` is treated the same as an absent field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskUpdate {
    /// New title, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskUpdate {
    /// An update that sets every field from a full form.
    #[must_use]
    pub fn from_fields(fields: NewTask) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            status: Some(fields.status),
            priority: Some(fields.priority),
        }
    }

    /// Returns `true` if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}
