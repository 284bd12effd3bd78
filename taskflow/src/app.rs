//! Application state and event handling.
//!
//! [`App`] owns everything the board needs between frames: which card is
//! selected, which modal is open, which cards have a request in flight, and
//! the alert to show. Key presses and worker events go in; [`ApiCommand`]s
//! come out for the main loop to dispatch.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskflow_proto::task::{Task, TaskId};

use crate::board::{self, COLUMN_COUNT, FormAction, TaskForm};
use crate::cache::{QueryKey, QueryView, SharedCache};
use crate::net::{ApiCommand, ApiEvent};

/// Alert shown when the creation form is submitted without a title.
pub const TITLE_REQUIRED: &str = "Task title is required!";
/// Alert shown when an edited card is saved without a title.
pub const TITLE_EMPTY: &str = "Title cannot be empty!";

/// Which modal, if any, has keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigating the board.
    #[default]
    Board,
    /// The creation form is open; its state lives in [`App::draft`].
    Creating,
    /// A card is being edited in place.
    Editing {
        /// Card being edited.
        task_id: TaskId,
        /// Edit form seeded from the card.
        form: TaskForm,
    },
    /// Waiting for the user to confirm a delete.
    ConfirmDelete {
        /// Card to delete.
        task_id: TaskId,
        /// Its title, for the prompt.
        title: String,
    },
}

/// The kind of request in flight for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyKind {
    /// An update is in flight.
    Saving,
    /// A delete is in flight.
    Deleting,
}

impl BusyKind {
    /// Label rendered on the dimmed card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Saving => "Saving...",
            Self::Deleting => "Deleting...",
        }
    }
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Task cache shared with the request worker.
    pub cache: SharedCache,
    /// Active modal.
    pub mode: Mode,
    /// Creation draft. Kept across open/close until a create succeeds.
    pub draft: TaskForm,
    /// Blocking alert; the next key press dismisses it.
    pub alert: Option<String>,
    /// Cards with a mutation in flight.
    pub busy: HashMap<TaskId, BusyKind>,
    /// Selected column index.
    pub selected_column: usize,
    /// Selected card index per column.
    pub selected_row: [usize; COLUMN_COUNT],
    /// Server the board talks to, for the status bar.
    pub server_label: String,
    /// chrono format for the last-sync time.
    pub timestamp_format: String,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a board over `cache`, talking to `server_label`.
    #[must_use]
    pub fn new(cache: SharedCache, server_label: impl Into<String>) -> Self {
        Self {
            cache,
            mode: Mode::Board,
            draft: TaskForm::new(),
            alert: None,
            busy: HashMap::new(),
            selected_column: 0,
            selected_row: [0; COLUMN_COUNT],
            server_label: server_label.into(),
            timestamp_format: "%H:%M:%S".to_string(),
            should_quit: false,
        }
    }

    /// Sets the status bar's timestamp format.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Begins fetches for every query the board shows that needs one.
    pub fn poll_queries(&self) -> Vec<ApiCommand> {
        let mut cache = self.cache.lock();
        if cache.needs_fetch(QueryKey::AllTasks) {
            vec![ApiCommand::Fetch(cache.begin_fetch(QueryKey::AllTasks))]
        } else {
            Vec::new()
        }
    }

    /// Tasks in column `col`, in list order. Empty until the list loads.
    #[must_use]
    pub fn column_tasks(&self, col: usize) -> Vec<Task> {
        let Some(status) = board::column_status(col) else {
            return Vec::new();
        };
        let cache = self.cache.lock();
        match cache.view(QueryKey::AllTasks) {
            QueryView::Loaded(tasks) => board::tasks_in(tasks, status)
                .into_iter()
                .cloned()
                .collect(),
            QueryView::Loading | QueryView::Error(_) => Vec::new(),
        }
    }

    /// The card under the cursor, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<Task> {
        let row = self.selected_row.get(self.selected_column).copied()?;
        self.column_tasks(self.selected_column).into_iter().nth(row)
    }

    /// Handles a key press. Returns a command when the press starts a request.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        if self.alert.take().is_some() {
            return None;
        }

        match std::mem::take(&mut self.mode) {
            Mode::Board => self.handle_board_key(key),
            Mode::Creating => self.handle_create_key(key),
            Mode::Editing { task_id, form } => self.handle_edit_key(key, task_id, form),
            Mode::ConfirmDelete { task_id, title } => self.handle_confirm_key(key, task_id, title),
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column = (self.selected_column + 1).min(COLUMN_COUNT - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_row(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_row(true),
            KeyCode::Char('n') => {
                self.draft.focus = board::FormField::Title;
                self.mode = Mode::Creating;
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_idle_task() {
                    self.mode = Mode::Editing {
                        form: TaskForm::seeded(&task),
                        task_id: task.id,
                    };
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_idle_task() {
                    self.mode = Mode::ConfirmDelete {
                        task_id: task.id,
                        title: task.title,
                    };
                }
            }
            _ => {}
        }
        None
    }

    fn handle_create_key(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        self.mode = Mode::Creating;
        match self.draft.handle_key(key) {
            FormAction::Continue => None,
            FormAction::Cancel => {
                self.mode = Mode::Board;
                None
            }
            FormAction::Submit => {
                if self.draft.validate().is_err() {
                    self.alert = Some(TITLE_REQUIRED.to_string());
                    return None;
                }
                self.draft.submitting = true;
                Some(ApiCommand::Create(self.draft.to_new_task()))
            }
        }
    }

    fn handle_edit_key(
        &mut self,
        key: KeyEvent,
        task_id: TaskId,
        mut form: TaskForm,
    ) -> Option<ApiCommand> {
        let action = form.handle_key(key);
        let command = match action {
            FormAction::Continue => None,
            FormAction::Cancel => return None,
            FormAction::Submit => {
                if form.validate().is_err() {
                    self.alert = Some(TITLE_EMPTY.to_string());
                    None
                } else {
                    form.submitting = true;
                    self.busy.insert(task_id.clone(), BusyKind::Saving);
                    Some(ApiCommand::Update {
                        id: task_id.clone(),
                        update: form.to_update(),
                    })
                }
            }
        };
        self.mode = Mode::Editing { task_id, form };
        command
    }

    fn handle_confirm_key(
        &mut self,
        key: KeyEvent,
        task_id: TaskId,
        title: String,
    ) -> Option<ApiCommand> {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                self.busy.insert(task_id.clone(), BusyKind::Deleting);
                Some(ApiCommand::Delete { id: task_id })
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => None,
            _ => {
                self.mode = Mode::ConfirmDelete { task_id, title };
                None
            }
        }
    }

    /// Applies a request worker event.
    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Fetched(key) => {
                tracing::debug!(?key, "query refreshed");
                self.close_vanished_target();
                self.clamp_selection();
            }
            ApiEvent::Created(Ok(task)) => {
                tracing::info!(task_id = %task.id, "task created");
                self.draft.reset();
                if self.mode == Mode::Creating {
                    self.mode = Mode::Board;
                }
            }
            ApiEvent::Created(Err(e)) => {
                self.draft.submitting = false;
                self.alert = Some(format!("Failed to create task: {e}"));
            }
            ApiEvent::Updated { id, result } => {
                self.busy.remove(&id);
                match result {
                    Ok(task) => {
                        tracing::info!(task_id = %task.id, "task updated");
                        if self.is_editing(&id) {
                            self.mode = Mode::Board;
                        }
                    }
                    Err(e) => {
                        self.release_edit_form(&id);
                        self.alert = Some(format!("Failed to update task: {e}"));
                    }
                }
            }
            ApiEvent::Deleted { id, result } => {
                self.busy.remove(&id);
                match result {
                    Ok(response) => {
                        tracing::info!(task_id = %response.task.id, "task deleted");
                    }
                    Err(e) => self.alert = Some(format!("Failed to delete task: {e}")),
                }
            }
        }
    }

    /// Rolls back the UI for a command the worker never received.
    pub fn dispatch_failed(&mut self, command: ApiCommand, reason: &str) {
        tracing::warn!(?command, reason, "command not dispatched");
        match command {
            ApiCommand::Fetch(token) => {
                self.cache.lock().complete_fetch(token, Err(reason.to_string()));
            }
            ApiCommand::Create(_) => {
                self.draft.submitting = false;
                self.alert = Some(format!("Failed to create task: {reason}"));
            }
            ApiCommand::Update { id, .. } => {
                self.busy.remove(&id);
                self.release_edit_form(&id);
                self.alert = Some(format!("Failed to update task: {reason}"));
            }
            ApiCommand::Delete { id } => {
                self.busy.remove(&id);
                self.alert = Some(format!("Failed to delete task: {reason}"));
            }
            ApiCommand::Shutdown => {}
        }
    }

    /// Busy state of a card.
    #[must_use]
    pub fn busy_kind(&self, id: &TaskId) -> Option<BusyKind> {
        self.busy.get(id).copied()
    }

    fn is_editing(&self, id: &TaskId) -> bool {
        matches!(&self.mode, Mode::Editing { task_id, .. } if task_id == id)
    }

    fn release_edit_form(&mut self, id: &TaskId) {
        if let Mode::Editing { task_id, form } = &mut self.mode
            && task_id == id
        {
            form.submitting = false;
        }
    }

    /// Leaves an edit or delete prompt whose card is no longer in the list.
    fn close_vanished_target(&mut self) {
        let target = match &self.mode {
            Mode::Editing { task_id, .. } | Mode::ConfirmDelete { task_id, .. } => task_id,
            Mode::Board | Mode::Creating => return,
        };
        let present = self
            .cache
            .lock()
            .data(QueryKey::AllTasks)
            .is_some_and(|tasks| tasks.iter().any(|t| &t.id == target));
        if !present {
            tracing::info!(task_id = %target, "card left the board, closing its form");
            self.mode = Mode::Board;
        }
    }

    fn selected_idle_task(&self) -> Option<Task> {
        self.selected_task()
            .filter(|task| !self.busy.contains_key(&task.id))
    }

    fn move_row(&mut self, down: bool) {
        let len = self.column_tasks(self.selected_column).len();
        if let Some(row) = self.selected_row.get_mut(self.selected_column) {
            *row = if down {
                (*row + 1).min(len.saturating_sub(1))
            } else {
                row.saturating_sub(1)
            };
        }
    }

    fn clamp_selection(&mut self) {
        for col in 0..COLUMN_COUNT {
            let len = self.column_tasks(col).len();
            if let Some(row) = self.selected_row.get_mut(col) {
                *row = (*row).min(len.saturating_sub(1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::client::ClientError;
    use taskflow_proto::api::DeleteResponse;
    use taskflow_proto::task::{Priority, TaskStatus};

    fn task(id: &str, title: &str, status: TaskStatus) -> Task {
        Task {
            id: TaskId::from(id),
            title: title.to_string(),
            description: String::new(),
            status,
            priority: Priority::Medium,
        }
    }

    fn app_with(tasks: Vec<Task>) -> App {
        let cache = QueryCache::shared();
        {
            let mut guard = cache.lock();
            let token = guard.begin_fetch(QueryKey::AllTasks);
            guard.complete_fetch(token, Ok(tasks));
        }
        App::new(cache, "http://127.0.0.1:3000")
    }

    fn press(app: &mut App, code: KeyCode) -> Option<ApiCommand> {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn transport_error() -> ClientError {
        ClientError::Transport("connection refused".to_string())
    }

    #[test]
    fn first_poll_begins_fetch_once() {
        let app = App::new(QueryCache::shared(), "x");
        let commands = app.poll_queries();
        assert!(matches!(commands.as_slice(), [ApiCommand::Fetch(_)]));
        assert!(app.poll_queries().is_empty());
    }

    #[test]
    fn loaded_list_needs_no_fetch() {
        let app = app_with(vec![]);
        assert!(app.poll_queries().is_empty());
    }

    #[test]
    fn columns_group_by_status() {
        let app = app_with(vec![
            task("1", "a", TaskStatus::Todo),
            task("2", "b", TaskStatus::Done),
            task("3", "c", TaskStatus::Todo),
            task("4", "d", TaskStatus::from("BLOCKED".to_string())),
        ]);
        let titles = |col| {
            app.column_tasks(col)
                .into_iter()
                .map(|t| t.title)
                .collect::<Vec<_>>()
        };
        assert_eq!(titles(0), vec!["a", "c"]);
        assert!(titles(1).is_empty());
        assert_eq!(titles(2), vec!["b"]);
    }

    #[test]
    fn navigation_moves_selection() {
        let mut app = app_with(vec![
            task("1", "a", TaskStatus::Todo),
            task("2", "b", TaskStatus::Todo),
            task("3", "c", TaskStatus::InProgress),
        ]);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_task().unwrap().title, "b");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_task().unwrap().title, "b");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_task().unwrap().title, "c");
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.selected_column, 2);
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn quit_keys() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = app_with(vec![]);
        app.mode = Mode::Creating;
        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    fn refetch(app: &mut App, tasks: Vec<Task>) {
        let token = app.cache.lock().begin_fetch(QueryKey::AllTasks);
        app.cache.lock().complete_fetch(token, Ok(tasks));
        app.apply_event(ApiEvent::Fetched(QueryKey::AllTasks));
    }

    #[test]
    fn edit_closes_when_card_leaves_the_list() {
        let mut app = app_with(vec![task("1", "a", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.mode, Mode::Editing { .. }));

        refetch(&mut app, vec![]);
        assert_eq!(app.mode, Mode::Board);
        assert!(press(&mut app, KeyCode::Enter).is_none());
    }

    #[test]
    fn delete_prompt_closes_when_card_leaves_the_list() {
        let mut app = app_with(vec![task("1", "a", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.mode, Mode::ConfirmDelete { .. }));

        refetch(&mut app, vec![task("2", "b", TaskStatus::Todo)]);
        assert_eq!(app.mode, Mode::Board);
    }

    #[test]
    fn edit_survives_refetch_that_keeps_the_card() {
        let mut app = app_with(vec![task("1", "a", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('e'));
        refetch(&mut app, vec![task("1", "a", TaskStatus::Done)]);
        assert!(matches!(app.mode, Mode::Editing { .. }));
    }

    #[test]
    fn empty_title_blocks_create() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Creating);

        let command = press(&mut app, KeyCode::Enter);
        assert!(command.is_none());
        assert_eq!(app.alert.as_deref(), Some(TITLE_REQUIRED));
        assert_eq!(app.mode, Mode::Creating);
        assert!(!app.draft.submitting);
    }

    #[test]
    fn create_submits_draft_and_resets_on_success() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Write spec");

        let command = press(&mut app, KeyCode::Enter);
        let Some(ApiCommand::Create(new)) = command else {
            panic!("expected create, got {command:?}");
        };
        assert_eq!(new.title, "Write spec");
        assert_eq!(new.status, TaskStatus::Todo);
        assert_eq!(new.priority, Priority::Medium);
        assert!(app.draft.submitting);

        app.apply_event(ApiEvent::Created(Ok(task("1", "Write spec", TaskStatus::Todo))));
        assert_eq!(app.mode, Mode::Board);
        assert_eq!(app.draft, TaskForm::new());
    }

    #[test]
    fn failed_create_keeps_form_open_with_data() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Write spec");
        press(&mut app, KeyCode::Enter);

        app.apply_event(ApiEvent::Created(Err(transport_error())));
        assert_eq!(app.mode, Mode::Creating);
        assert_eq!(app.draft.fields.title, "Write spec");
        assert!(!app.draft.submitting);
        assert_eq!(
            app.alert.as_deref(),
            Some("Failed to create task: request failed: connection refused")
        );
    }

    #[test]
    fn any_key_dismisses_alert_without_acting() {
        let mut app = app_with(vec![]);
        app.alert = Some("boom".to_string());
        assert!(press(&mut app, KeyCode::Char('q')).is_none());
        assert!(app.alert.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn cancelled_draft_is_kept_for_next_open() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "half");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Board);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.draft.fields.title, "half");
    }

    #[test]
    fn edit_sends_all_fields_and_exits_on_success() {
        let mut app = app_with(vec![task("1", "Write spec", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.mode, Mode::Editing { .. }));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        let command = press(&mut app, KeyCode::Enter);
        let Some(ApiCommand::Update { id, update }) = command else {
            panic!("expected update, got {command:?}");
        };
        assert_eq!(id, TaskId::from("1"));
        assert_eq!(update.title.as_deref(), Some("Write spec"));
        assert_eq!(update.description.as_deref(), Some(""));
        assert_eq!(update.status, Some(TaskStatus::InProgress));
        assert_eq!(update.priority, Some(Priority::Medium));
        assert_eq!(app.busy_kind(&id), Some(BusyKind::Saving));

        // Input is ignored while saving.
        assert!(press(&mut app, KeyCode::Esc).is_none());
        assert!(matches!(app.mode, Mode::Editing { .. }));

        app.apply_event(ApiEvent::Updated {
            id: id.clone(),
            result: Ok(task("1", "Write spec", TaskStatus::InProgress)),
        });
        assert_eq!(app.mode, Mode::Board);
        assert!(app.busy_kind(&id).is_none());
    }

    #[test]
    fn edit_with_empty_title_alerts() {
        let mut app = app_with(vec![task("1", "x", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Backspace);
        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert_eq!(app.alert.as_deref(), Some(TITLE_EMPTY));
        assert!(matches!(app.mode, Mode::Editing { .. }));
        assert!(app.busy.is_empty());
    }

    #[test]
    fn failed_update_keeps_edit_form() {
        let mut app = app_with(vec![task("1", "x", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "y");
        press(&mut app, KeyCode::Enter);

        app.apply_event(ApiEvent::Updated {
            id: TaskId::from("1"),
            result: Err(transport_error()),
        });
        let Mode::Editing { form, .. } = &app.mode else {
            panic!("expected edit mode");
        };
        assert_eq!(form.fields.title, "xy");
        assert!(!form.submitting);
        assert!(app.busy.is_empty());
        assert!(app.alert.as_deref().unwrap().starts_with("Failed to update task: "));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app_with(vec![task("1", "Write spec", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.mode, Mode::ConfirmDelete { ref title, .. } if title == "Write spec"));

        assert!(press(&mut app, KeyCode::Char('n')).is_none());
        assert_eq!(app.mode, Mode::Board);

        press(&mut app, KeyCode::Char('d'));
        let command = press(&mut app, KeyCode::Char('y'));
        assert!(matches!(command, Some(ApiCommand::Delete { ref id }) if id.as_str() == "1"));
        assert_eq!(app.busy_kind(&TaskId::from("1")), Some(BusyKind::Deleting));
        assert_eq!(app.mode, Mode::Board);
    }

    #[test]
    fn busy_card_ignores_edit_and_delete() {
        let mut app = app_with(vec![task("1", "a", TaskStatus::Todo)]);
        app.busy.insert(TaskId::from("1"), BusyKind::Deleting);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, Mode::Board);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Board);
    }

    #[test]
    fn delete_outcomes_clear_busy() {
        let mut app = app_with(vec![task("1", "a", TaskStatus::Todo)]);
        let id = TaskId::from("1");

        app.busy.insert(id.clone(), BusyKind::Deleting);
        app.apply_event(ApiEvent::Deleted {
            id: id.clone(),
            result: Err(transport_error()),
        });
        assert!(app.busy.is_empty());
        assert!(app.alert.as_deref().unwrap().starts_with("Failed to delete task: "));

        app.alert = None;
        app.busy.insert(id.clone(), BusyKind::Deleting);
        app.apply_event(ApiEvent::Deleted {
            id,
            result: Ok(DeleteResponse::deleted(task("1", "a", TaskStatus::Todo))),
        });
        assert!(app.busy.is_empty());
        assert!(app.alert.is_none());
    }

    #[test]
    fn undispatched_fetch_surfaces_as_error() {
        let app_cache = QueryCache::shared();
        let mut app = App::new(app_cache, "x");
        let mut commands = app.poll_queries();
        let command = commands.pop().unwrap();
        app.dispatch_failed(command, "worker stopped");
        assert_eq!(
            app.cache.lock().view(QueryKey::AllTasks),
            QueryView::Error("worker stopped")
        );
    }

    #[test]
    fn undispatched_update_restores_card() {
        let mut app = app_with(vec![task("1", "a", TaskStatus::Todo)]);
        press(&mut app, KeyCode::Char('e'));
        let command = press(&mut app, KeyCode::Enter).unwrap();
        app.dispatch_failed(command, "channel full");
        assert!(app.busy.is_empty());
        assert_eq!(
            app.alert.as_deref(),
            Some("Failed to update task: channel full")
        );
    }

    #[test]
    fn selection_clamped_after_refetch() {
        let mut app = app_with(vec![
            task("1", "a", TaskStatus::Todo),
            task("2", "b", TaskStatus::Todo),
        ]);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_row[0], 1);

        {
            let mut cache = app.cache.lock();
            cache.invalidate(QueryKey::AllTasks);
            let token = cache.begin_fetch(QueryKey::AllTasks);
            cache.complete_fetch(token, Ok(vec![task("1", "a", TaskStatus::Todo)]));
        }
        app.apply_event(ApiEvent::Fetched(QueryKey::AllTasks));
        assert_eq!(app.selected_row[0], 0);
    }
}
