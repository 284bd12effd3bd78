//! Request worker bridging the TUI event loop to the blocking API client.
//!
//! The main thread sends [`ApiCommand`]s and drains [`ApiEvent`]s on each
//! tick of its poll loop. Every command runs on its own tokio task so a slow
//! request never holds up the others; the HTTP call itself runs on the
//! blocking pool because [`ApiClient`] is synchronous.
//!
//! ```text
//! TUI (main thread)  ←── ApiEvent ───  request worker
//!                     ─── ApiCommand →        │
//!                                             └─ writes fetch results and
//!                                                invalidations to the cache
//! ```
//!
//! Fetch results are written straight into the [`SharedCache`]. A successful
//! mutation invalidates its keys before its event is sent, so by the time the
//! UI sees the event, the next poll already re-fetches the list.

use taskflow_proto::api::DeleteResponse;
use taskflow_proto::task::{NewTask, Task, TaskId, TaskUpdate};
use tokio::sync::mpsc;

use crate::cache::{FetchToken, Mutation, QueryKey, SharedCache};
use crate::client::{ApiClient, ClientError};

/// Commands sent from the TUI to the request worker.
#[derive(Debug)]
pub enum ApiCommand {
    /// Fetch a query whose fetch was begun in the cache.
    Fetch(FetchToken),
    /// `POST /api/task`.
    Create(NewTask),
    /// `PUT /api/task/{id}`.
    Update {
        /// Task to update.
        id: TaskId,
        /// Fields to merge.
        update: TaskUpdate,
    },
    /// `DELETE /api/task/{id}`.
    Delete {
        /// Task to delete.
        id: TaskId,
    },
    /// Stop accepting commands.
    Shutdown,
}

/// Outcomes sent from the request worker back to the TUI.
#[derive(Debug)]
pub enum ApiEvent {
    /// A fetch finished and its result is in the cache.
    Fetched(QueryKey),
    /// A create request finished.
    Created(Result<Task, ClientError>),
    /// An update request finished.
    Updated {
        /// Task that was targeted.
        id: TaskId,
        /// Server response.
        result: Result<Task, ClientError>,
    },
    /// A delete request finished.
    Deleted {
        /// Task that was targeted.
        id: TaskId,
        /// Server response.
        result: Result<DeleteResponse, ClientError>,
    },
}

/// Spawns the request worker and returns its channel handles.
///
/// Must be called from within a tokio runtime.
pub fn spawn_worker(
    client: ApiClient,
    cache: SharedCache,
    capacity: usize,
) -> (mpsc::Sender<ApiCommand>, mpsc::Receiver<ApiEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<ApiEvent>(capacity);

    tokio::spawn(async move {
        command_loop(client, cache, cmd_rx, evt_tx).await;
    });

    (cmd_tx, evt_rx)
}

/// Receives commands until shutdown or until the TUI drops its sender.
async fn command_loop(
    client: ApiClient,
    cache: SharedCache,
    mut cmd_rx: mpsc::Receiver<ApiCommand>,
    evt_tx: mpsc::Sender<ApiEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, ApiCommand::Shutdown) {
            tracing::info!("request worker shutting down");
            break;
        }
        let client = client.clone();
        let cache = SharedCache::clone(&cache);
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            if let Some(event) = execute(client, &cache, cmd).await
                && evt_tx.send(event).await.is_err()
            {
                tracing::debug!("event receiver dropped");
            }
        });
    }
}

/// Runs one command to completion and produces the event to report.
async fn execute(client: ApiClient, cache: &SharedCache, cmd: ApiCommand) -> Option<ApiEvent> {
    match cmd {
        ApiCommand::Fetch(token) => {
            let result = run_blocking(move || client.list_tasks()).await;
            let applied = cache
                .lock()
                .complete_fetch(token, result.map_err(|e| e.to_string()));
            applied.then_some(ApiEvent::Fetched(token.key))
        }
        ApiCommand::Create(task) => {
            let result = run_blocking(move || client.create_task(&task)).await;
            settle(cache, Mutation::CreateTask, result.is_ok());
            Some(ApiEvent::Created(result))
        }
        ApiCommand::Update { id, update } => {
            let target = id.clone();
            let result = run_blocking(move || client.update_task(&target, &update)).await;
            settle(cache, Mutation::UpdateTask, result.is_ok());
            Some(ApiEvent::Updated { id, result })
        }
        ApiCommand::Delete { id } => {
            let target = id.clone();
            let result = run_blocking(move || client.delete_task(&target)).await;
            settle(cache, Mutation::DeleteTask, result.is_ok());
            Some(ApiEvent::Deleted { id, result })
        }
        ApiCommand::Shutdown => None,
    }
}

/// Invalidates the mutation's keys if it succeeded. Failures leave the
/// cache untouched.
fn settle(cache: &SharedCache, mutation: Mutation, succeeded: bool) {
    if succeeded {
        cache.lock().apply_mutation(mutation);
    } else {
        tracing::debug!(?mutation, "mutation failed; cache unchanged");
    }
}

/// Runs a blocking client call on the blocking thread pool.
async fn run_blocking<T, F>(call: F) -> Result<T, ClientError>
where
    F: FnOnce() -> Result<T, ClientError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .unwrap_or_else(|e| Err(ClientError::Transport(format!("request task failed: {e}"))))
}
