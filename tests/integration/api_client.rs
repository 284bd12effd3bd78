//! Integration tests for the blocking API client against an in-process server.
//!
//! Covers the full create → update → delete lifecycle, the not-found
//! contract for unknown ids, and transport failures.
//!
//! Verification command: `cargo test --test api_client`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use taskflow::client::{ApiClient, ClientError};
use taskflow_proto::task::{NewTask, Priority, TaskId, TaskStatus, TaskUpdate};

/// Start the task server in-process and return its base URL.
async fn start_server() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskflow_server::api::start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    (format!("http://{addr}"), handle)
}

/// Run blocking client calls off the async runtime.
async fn blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(f).await.unwrap()
}

fn write_spec() -> NewTask {
    NewTask {
        title: "Write spec".to_string(),
        description: String::new(),
        status: TaskStatus::Todo,
        priority: Priority::High,
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn create_update_delete_lifecycle() {
    let (url, _handle) = start_server().await;
    let client = ApiClient::new(&url).unwrap();

    blocking(move || {
        let created = client.create_task(&write_spec()).unwrap();
        assert!(!created.id.as_str().is_empty());
        assert_eq!(created.title, "Write spec");
        assert_eq!(created.status, TaskStatus::Todo);
        assert_eq!(created.priority, Priority::High);

        let update = TaskUpdate {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        let updated = client.update_task(&created.id, &update).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.title, "Write spec");

        let deleted = client.delete_task(&created.id).unwrap();
        assert_eq!(deleted.message, "Deleted");
        assert_eq!(deleted.task.status, TaskStatus::InProgress);
        assert_eq!(deleted.task.id, created.id);

        let remaining = client.list_tasks().unwrap();
        assert!(remaining.iter().all(|t| t.id != created.id));
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn ids_are_unique_and_not_reused_after_delete() {
    let (url, _handle) = start_server().await;
    let client = ApiClient::new(&url).unwrap();

    blocking(move || {
        let first = client.create_task(&write_spec()).unwrap();
        client.delete_task(&first.id).unwrap();
        let second = client.create_task(&write_spec()).unwrap();
        let third = client.create_task(&write_spec()).unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.id, third.id);
        assert_ne!(second.id, third.id);

        let ids: Vec<TaskId> = client.list_tasks().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, third.id]);
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn description_defaults_to_empty() {
    let (url, _handle) = start_server().await;
    let client = ApiClient::new(&url).unwrap();

    let created = blocking(move || {
        client
            .create_task(&NewTask {
                title: "No description".to_string(),
                ..Default::default()
            })
            .unwrap()
    })
    .await;

    assert_eq!(created.description, "");
    assert_eq!(created.status, TaskStatus::Todo);
    assert_eq!(created.priority, Priority::Medium);
}

// =============================================================================
// Not found
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn update_unknown_id_is_404_and_store_unchanged() {
    let (url, _handle) = start_server().await;
    let client = ApiClient::new(&url).unwrap();

    blocking(move || {
        client.create_task(&write_spec()).unwrap();
        let before = client.list_tasks().unwrap();

        let err = client
            .update_task(
                &TaskId::from("nonexistent-1"),
                &TaskUpdate {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(err.is_not_found());
        let ClientError::Status { status, message } = err else {
            panic!("expected status error");
        };
        assert_eq!(status, 404);
        assert_eq!(message, "Task not found");
        assert_eq!(client.list_tasks().unwrap(), before);
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_id_is_404() {
    let (url, _handle) = start_server().await;
    let client = ApiClient::new(&url).unwrap();

    let err = blocking(move || client.delete_task(&TaskId::from("nonexistent-1")).unwrap_err())
        .await;
    assert!(err.is_not_found());
}

// =============================================================================
// Transport failure
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = ApiClient::new(&format!("http://127.0.0.1:{port}")).unwrap();

    let err = blocking(move || client.list_tasks().unwrap_err()).await;
    assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
}
