//! Editable task form used both for creating and for editing a task.

use std::borrow::Cow;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskflow_proto::task::{NewTask, Priority, Task, TaskStatus, TaskUpdate};

/// Client-side validation failures. These never reach the server.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    /// The title is empty or only whitespace.
    #[error("task title cannot be empty")]
    TitleEmpty,
}

/// Which input of the form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    /// Title text input.
    #[default]
    Title,
    /// Description text input.
    Description,
    /// Status selector.
    Status,
    /// Priority selector.
    Priority,
}

impl FormField {
    /// All fields in tab order.
    pub const ALL: [Self; 4] = [Self::Title, Self::Description, Self::Status, Self::Priority];

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Status => "Status",
            Self::Priority => "Priority",
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Status,
            Self::Status => Self::Priority,
            Self::Priority => Self::Title,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Priority,
            Self::Description => Self::Title,
            Self::Status => Self::Description,
            Self::Priority => Self::Status,
        }
    }
}

/// What the owner of a form should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Keep editing.
    Continue,
    /// The user asked to submit.
    Submit,
    /// The user asked to close the form without saving.
    Cancel,
}

/// Draft task fields plus editing state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskForm {
    /// Current field values.
    pub fields: NewTask,
    /// Focused input.
    pub focus: FormField,
    /// A request for this form is in flight; input is disabled.
    pub submitting: bool,
}

impl TaskForm {
    /// An empty creation draft (status TODO, priority MEDIUM).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form seeded from an existing task, for inline editing.
    #[must_use]
    pub fn seeded(task: &Task) -> Self {
        Self {
            fields: NewTask {
                title: task.title.clone(),
                description: task.description.clone(),
                status: task.status.clone(),
                priority: task.priority.clone(),
            },
            ..Self::default()
        }
    }

    /// Clears the draft back to creation defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Checks the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::TitleEmpty`] if the trimmed title is empty.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.fields.title.trim().is_empty() {
            return Err(FormError::TitleEmpty);
        }
        Ok(())
    }

    /// Payload for `POST /api/task`.
    #[must_use]
    pub fn to_new_task(&self) -> NewTask {
        self.fields.clone()
    }

    /// Payload for `PUT /api/task/{id}`; the edit form sends every field.
    #[must_use]
    pub fn to_update(&self) -> TaskUpdate {
        TaskUpdate::from_fields(self.fields.clone())
    }

    /// Applies a key press to the form.
    ///
    /// Keys are ignored while a submission is in flight.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.submitting {
            return FormAction::Continue;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => return FormAction::Cancel,
            (KeyCode::Enter, _) => return FormAction::Submit,
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) | (KeyCode::Up, _) => {
                self.focus = self.focus.prev();
            }
            (KeyCode::Tab | KeyCode::Down, _) => self.focus = self.focus.next(),
            (KeyCode::Left, _) => self.cycle_choice(false),
            (KeyCode::Right, _) => self.cycle_choice(true),
            (KeyCode::Backspace, _) => {
                if let Some(text) = self.focused_text_mut() {
                    text.pop();
                }
            }
            (KeyCode::Char(c), _) => {
                if let Some(text) = self.focused_text_mut() {
                    text.push(c);
                } else if c == ' ' {
                    self.cycle_choice(true);
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    /// Display text of a field's current value.
    #[must_use]
    pub fn value_of(&self, field: FormField) -> Cow<'_, str> {
        match field {
            FormField::Title => Cow::Borrowed(&self.fields.title),
            FormField::Description => Cow::Borrowed(&self.fields.description),
            FormField::Status => status_label(&self.fields.status),
            FormField::Priority => priority_label(&self.fields.priority),
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.fields.title),
            FormField::Description => Some(&mut self.fields.description),
            FormField::Status | FormField::Priority => None,
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            FormField::Status => {
                self.fields.status = cycle(&TaskStatus::COLUMNS, &self.fields.status, forward);
            }
            FormField::Priority => {
                self.fields.priority = cycle(&Priority::ALL, &self.fields.priority, forward);
            }
            FormField::Title | FormField::Description => {}
        }
    }
}

/// Selector label for a status.
#[must_use]
pub fn status_label(status: &TaskStatus) -> Cow<'_, str> {
    match status {
        TaskStatus::Todo => Cow::Borrowed("To Do"),
        TaskStatus::InProgress => Cow::Borrowed("In Progress"),
        TaskStatus::Done => Cow::Borrowed("Done"),
        TaskStatus::Other(_) => status.as_str(),
    }
}

/// Selector label for a priority.
#[must_use]
pub fn priority_label(priority: &Priority) -> Cow<'_, str> {
    match priority {
        Priority::Low => Cow::Borrowed("Low"),
        Priority::Medium => Cow::Borrowed("Medium"),
        Priority::High => Cow::Borrowed("High"),
        Priority::Other(_) => priority.as_str(),
    }
}

/// Steps to the neighbouring option, wrapping around. A value outside
/// `options` steps to the first option.
fn cycle<T: Clone + PartialEq>(options: &[T], current: &T, forward: bool) -> T {
    let len = options.len();
    let next = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options.get(next).cloned().unwrap_or_else(|| current.clone())
}
