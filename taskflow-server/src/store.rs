//! In-memory task store.
//!
//! The [`TaskStore`] holds the authoritative, insertion-ordered list of tasks
//! for the lifetime of the process. Nothing is persisted: a new store (and a
//! restarted server) is empty.

use taskflow_proto::task::{NewTask, Task, TaskId, TaskUpdate};
use tokio::sync::RwLock;

/// Errors returned by store mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No live task has the given id.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Ordered in-memory collection of tasks.
///
/// Thread-safe via [`RwLock`]. Every operation acquires the lock once, so the
/// lookup and the mutation of a single call can never interleave with
/// another call.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every task in insertion order.
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Stores a new task under a freshly generated id and returns it.
    pub async fn insert(&self, data: NewTask) -> Task {
        let task = Task::from_new(TaskId::new(), data);
        self.tasks.write().await.push(task.clone());
        task
    }

    /// Returns the position of the task with `id`, or `None` if absent.
    pub async fn find_index(&self, id: &TaskId) -> Option<usize> {
        let tasks = self.tasks.read().await;
        position(&tasks, id)
    }

    /// Merges the provided fields into the task with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has that id; the store is
    /// left untouched.
    pub async fn merge(&self, id: &TaskId, partial: TaskUpdate) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = position(&tasks, id)
            .and_then(|index| tasks.get_mut(index))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        task.apply_update(partial);
        Ok(task.clone())
    }

    /// Removes the task with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has that id.
    pub async fn remove(&self, id: &TaskId) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let index = position(&tasks, id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(tasks.remove(index))
    }

    /// Number of live tasks.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Returns `true` if the store holds no tasks.
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

fn position(tasks: &[Task], id: &TaskId) -> Option<usize> {
    tasks.iter().position(|t| &t.id == id)
}
