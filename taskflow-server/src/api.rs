//! HTTP API: shared state, route handlers, and server startup.
//!
//! Four handlers implement the task CRUD contract against the injected
//! [`TaskStore`]:
//!
//! | Method   | Path             | Success                          | Failure |
//! |----------|------------------|----------------------------------|---------|
//! | `GET`    | `/api/task`      | 200, all tasks                   | -       |
//! | `POST`   | `/api/task`      | 200, created task                | -       |
//! | `PUT`    | `/api/task/{id}` | 200, updated task                | 404     |
//! | `DELETE` | `/api/task/{id}` | 200, `{message, task}`           | 404     |
//!
//! The server performs no validation of titles or enum values.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskflow_proto::api::{DeleteResponse, ErrorBody, TASK_PATH, TASKS_PATH};
use taskflow_proto::task::{NewTask, Task, TaskId, TaskUpdate};

use crate::store::{StoreError, TaskStore};

/// Shared server state handed to every handler.
#[derive(Debug, Default)]
pub struct AppState {
    /// The single task collection behind all routes.
    pub store: TaskStore,
}

impl AppState {
    /// Creates state around an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Errors a handler can answer with.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// The path id does not match a live task.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::TaskNotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::TaskNotFound(_) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::task_not_found())).into_response()
            }
        }
    }
}

/// `GET /api/task`: every task in insertion order.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    let tasks = state.store.list().await;
    tracing::debug!(count = tasks.len(), "listing tasks");
    Json(tasks)
}

/// `POST /api/task`: store a new task under a generated id.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(data): Json<NewTask>,
) -> Json<Task> {
    let task = state.store.insert(data).await;
    tracing::info!(task_id = %task.id, status = %task.status, "task created");
    Json(task)
}

/// `PUT /api/task/{id}`: merge the provided fields into a task.
///
/// # Errors
///
/// Returns [`ApiError::TaskNotFound`] (404) if the id is unknown.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId::from(id);
    match state.store.merge(&id, update).await {
        Ok(task) => {
            tracing::info!(task_id = %id, status = %task.status, "task updated");
            Ok(Json(task))
        }
        Err(e) => {
            tracing::warn!(task_id = %id, error = %e, "update rejected");
            Err(e.into())
        }
    }
}

/// `DELETE /api/task/{id}`: remove a task and echo it back.
///
/// # Errors
///
/// Returns [`ApiError::TaskNotFound`] (404) if the id is unknown.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = TaskId::from(id);
    match state.store.remove(&id).await {
        Ok(task) => {
            tracing::info!(task_id = %id, "task deleted");
            Ok(Json(DeleteResponse::deleted(task)))
        }
        Err(e) => {
            tracing::warn!(task_id = %id, error = %e, "delete rejected");
            Err(e.into())
        }
    }
}

/// Builds the axum router for the task API around the given state.
pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route(
            TASKS_PATH,
            axum::routing::get(list_tasks).post(create_task),
        )
        .route(
            TASK_PATH,
            axum::routing::put(update_task).delete(delete_task),
        )
        .with_state(state)
}

/// Starts the server with a fresh, empty store and returns the bound address
/// and a join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(AppState::new())).await
}

/// Starts the server with a pre-built [`AppState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Starts the server in-process for testing on an OS-assigned port.
#[cfg(test)]
pub async fn start_test_server() -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
    start_server("127.0.0.1:0")
        .await
        .expect("failed to start test server")
}
