//! Integration tests for the board's sync loop: request worker, query cache,
//! and app state against an in-process server.
//!
//! These tests validate:
//! - The first poll loads the task list into the cache
//! - A successful mutation invalidates the list and the next poll re-fetches it
//! - A deleted task appears in no column afterwards
//! - A failed mutation leaves the cached list untouched
//!
//! Verification command: `cargo test --test board_sync`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use taskflow::app::{App, Mode};
use taskflow::cache::{QueryCache, QueryKey, SharedCache};
use taskflow::client::ApiClient;
use taskflow::net::{self, ApiCommand, ApiEvent};
use taskflow_proto::task::TaskStatus;

struct Harness {
    app: App,
    cmd_tx: mpsc::Sender<ApiCommand>,
    evt_rx: mpsc::Receiver<ApiEvent>,
    _server: tokio::task::JoinHandle<()>,
}

impl Harness {
    async fn start() -> Self {
        let (addr, server) = taskflow_server::api::start_server("127.0.0.1:0")
            .await
            .expect("failed to start task server");
        let client = ApiClient::new(&format!("http://{addr}")).unwrap();
        let cache = QueryCache::shared();
        let (cmd_tx, evt_rx) = net::spawn_worker(client, SharedCache::clone(&cache), 16);
        Self {
            app: App::new(cache, format!("http://{addr}")),
            cmd_tx,
            evt_rx,
            _server: server,
        }
    }

    async fn send(&self, command: ApiCommand) {
        self.cmd_tx.send(command).await.unwrap();
    }

    /// Wait for the next worker event and apply it to the app.
    async fn next_event(&mut self) -> bool {
        let event = tokio::time::timeout(Duration::from_secs(5), self.evt_rx.recv())
            .await
            .expect("timeout waiting for worker event")
            .expect("worker stopped");
        let fetched = matches!(event, ApiEvent::Fetched(_));
        self.app.apply_event(event);
        fetched
    }

    /// Dispatch the fetches the app wants and wait until they land.
    async fn sync(&mut self) {
        let commands = self.app.poll_queries();
        let mut pending = commands.len();
        for command in commands {
            self.send(command).await;
        }
        while pending > 0 {
            if self.next_event().await {
                pending -= 1;
            }
        }
        assert!(!self.app.cache.lock().needs_fetch(QueryKey::AllTasks));
    }

    fn press(&mut self, code: KeyCode) -> Option<ApiCommand> {
        self.app
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn titles(&self, col: usize) -> Vec<String> {
        self.app.column_tasks(col).into_iter().map(|t| t.title).collect()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn first_poll_loads_empty_board() {
    let mut h = Harness::start().await;
    h.sync().await;

    assert_eq!(h.app.cache.lock().data(QueryKey::AllTasks), Some(&Vec::new()));
    assert!(h.app.cache.lock().fetched_at(QueryKey::AllTasks).is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn created_task_appears_after_invalidation() {
    let mut h = Harness::start().await;
    h.sync().await;

    h.press(KeyCode::Char('n'));
    h.type_text("Write spec");
    let command = h.press(KeyCode::Enter).expect("create command");
    h.send(command).await;
    h.next_event().await;

    assert_eq!(h.app.mode, Mode::Board);
    assert!(h.app.cache.lock().needs_fetch(QueryKey::AllTasks));

    h.sync().await;
    assert_eq!(h.titles(0), vec!["Write spec"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_moves_card_between_columns() {
    let mut h = Harness::start().await;
    h.sync().await;

    h.press(KeyCode::Char('n'));
    h.type_text("Write spec");
    let command = h.press(KeyCode::Enter).unwrap();
    h.send(command).await;
    h.next_event().await;
    h.sync().await;

    // Edit: focus Status and step TODO -> IN_PROGRESS.
    h.press(KeyCode::Char('e'));
    h.press(KeyCode::Tab);
    h.press(KeyCode::Tab);
    h.press(KeyCode::Right);
    let command = h.press(KeyCode::Enter).unwrap();
    h.send(command).await;
    h.next_event().await;
    assert_eq!(h.app.mode, Mode::Board);
    assert!(h.app.busy.is_empty());

    h.sync().await;
    assert!(h.titles(0).is_empty());
    assert_eq!(h.titles(1), vec!["Write spec"]);
    assert_eq!(
        h.app.column_tasks(1)[0].status,
        TaskStatus::InProgress
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_leaves_every_column() {
    let mut h = Harness::start().await;
    h.sync().await;

    for title in ["Keep", "Drop"] {
        h.press(KeyCode::Char('n'));
        h.type_text(title);
        let command = h.press(KeyCode::Enter).unwrap();
        h.send(command).await;
        h.next_event().await;
    }
    h.sync().await;
    assert_eq!(h.titles(0), vec!["Keep", "Drop"]);

    h.press(KeyCode::Down);
    h.press(KeyCode::Char('d'));
    let command = h.press(KeyCode::Char('y')).unwrap();
    h.send(command).await;
    h.next_event().await;
    assert!(h.app.busy.is_empty());
    assert!(h.app.alert.is_none());

    h.sync().await;
    for col in 0..3 {
        assert!(!h.titles(col).contains(&"Drop".to_string()));
    }
    assert_eq!(h.titles(0), vec!["Keep"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_mutation_keeps_cache_fresh() {
    let mut h = Harness::start().await;
    h.sync().await;

    h.send(ApiCommand::Delete {
        id: "nonexistent-1".into(),
    })
    .await;
    h.next_event().await;

    assert_eq!(
        h.app.alert.as_deref(),
        Some("Failed to delete task: server returned 404: Task not found")
    );
    assert!(!h.app.cache.lock().needs_fetch(QueryKey::AllTasks));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_title_never_reaches_server() {
    let mut h = Harness::start().await;
    h.sync().await;

    h.press(KeyCode::Char('n'));
    h.type_text("   ");
    assert!(h.press(KeyCode::Enter).is_none());
    assert_eq!(h.app.alert.as_deref(), Some("Task title is required!"));
    assert_eq!(h.app.mode, Mode::Creating);

    // Nothing was sent, so nothing was invalidated.
    assert!(!h.app.cache.lock().needs_fetch(QueryKey::AllTasks));
    assert!(h.app.column_tasks(0).is_empty());
}
