//! Client-side query cache with rule-driven invalidation.
//!
//! Each [`QueryKey`] names one logical query and maps to the result of its
//! last fetch. A key is fetched once and then served from the cache until it
//! is invalidated. Successful mutations invalidate keys through a declared
//! [`InvalidationRules`] table instead of hard-coding keys at every call site.
//!
//! A fetch is tracked by a [`FetchToken`]. Invalidating a key while its fetch
//! is in flight supersedes that fetch: its result is discarded on arrival and
//! the key is fetched again.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use taskflow_proto::task::Task;

/// Logical name of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full task list (`GET /api/task`).
    AllTasks,
}

/// A mutating operation whose success invalidates cached queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// A task was created.
    CreateTask,
    /// A task was updated.
    UpdateTask,
    /// A task was deleted.
    DeleteTask,
}

/// Declared mapping from mutations to the query keys they invalidate.
#[derive(Debug, Clone)]
pub struct InvalidationRules {
    rules: HashMap<Mutation, Vec<QueryKey>>,
}

impl InvalidationRules {
    /// A table with no rules: mutations invalidate nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Adds (or replaces) the keys invalidated by `mutation`.
    #[must_use]
    pub fn with_rule(
        mut self,
        mutation: Mutation,
        keys: impl IntoIterator<Item = QueryKey>,
    ) -> Self {
        self.rules.insert(mutation, keys.into_iter().collect());
        self
    }

    /// Keys invalidated by `mutation`.
    #[must_use]
    pub fn affected(&self, mutation: Mutation) -> &[QueryKey] {
        self.rules.get(&mutation).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for InvalidationRules {
    /// Every task mutation invalidates the task list.
    fn default() -> Self {
        Self::empty()
            .with_rule(Mutation::CreateTask, [QueryKey::AllTasks])
            .with_rule(Mutation::UpdateTask, [QueryKey::AllTasks])
            .with_rule(Mutation::DeleteTask, [QueryKey::AllTasks])
    }
}

/// Handle for one in-flight fetch of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken {
    /// The key being fetched.
    pub key: QueryKey,
    generation: u64,
}

/// What the UI should show for a key.
#[derive(Debug, PartialEq, Eq)]
pub enum QueryView<'a, T> {
    /// No data yet; a fetch is pending or in flight.
    Loading,
    /// The most recent fetch failed.
    Error(&'a str),
    /// Data is available (possibly stale while a re-fetch runs).
    Loaded(&'a T),
}

#[derive(Debug)]
struct CacheEntry<T> {
    data: Option<T>,
    error: Option<String>,
    stale: bool,
    in_flight: Option<u64>,
    generation: u64,
    fetched_at: Option<DateTime<Local>>,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            stale: false,
            in_flight: None,
            generation: 0,
            fetched_at: None,
        }
    }
}

impl<T> CacheEntry<T> {
    const fn never_fetched(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }
}

/// Query cache keyed by [`QueryKey`].
#[derive(Debug)]
pub struct QueryCache<T> {
    entries: HashMap<QueryKey, CacheEntry<T>>,
    rules: InvalidationRules,
}

/// The process-wide task cache shared by the UI and the request worker.
pub type SharedCache = Arc<Mutex<QueryCache<Vec<Task>>>>;

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryCache<T> {
    /// Creates an empty cache with the default invalidation rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(InvalidationRules::default())
    }

    /// Creates an empty cache with custom invalidation rules.
    #[must_use]
    pub fn with_rules(rules: InvalidationRules) -> Self {
        Self {
            entries: HashMap::new(),
            rules,
        }
    }

    /// Returns `true` if `key` should be fetched now.
    ///
    /// That is the case when it was never fetched or has been invalidated,
    /// and no fetch for it is currently in flight. A failed fetch is not
    /// retried until the key is invalidated.
    #[must_use]
    pub fn needs_fetch(&self, key: QueryKey) -> bool {
        self.entries.get(&key).is_none_or(|entry| {
            entry.in_flight.is_none() && (entry.stale || entry.never_fetched())
        })
    }

    /// Marks a fetch of `key` as started and returns its token.
    pub fn begin_fetch(&mut self, key: QueryKey) -> FetchToken {
        let entry = self.entries.entry(key).or_default();
        entry.generation += 1;
        entry.in_flight = Some(entry.generation);
        FetchToken {
            key,
            generation: entry.generation,
        }
    }

    /// Records the outcome of a fetch.
    ///
    /// Returns `false` and discards the result if the fetch was superseded
    /// by an invalidation or a newer fetch.
    pub fn complete_fetch(&mut self, token: FetchToken, result: Result<T, String>) -> bool {
        let Some(entry) = self.entries.get_mut(&token.key) else {
            return false;
        };
        if entry.in_flight != Some(token.generation) {
            tracing::debug!(key = ?token.key, "discarding superseded fetch result");
            return false;
        }
        entry.in_flight = None;
        entry.stale = false;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.error = None;
                entry.fetched_at = Some(Local::now());
            }
            Err(e) => {
                tracing::warn!(key = ?token.key, error = %e, "query fetch failed");
                entry.error = Some(e);
            }
        }
        true
    }

    /// Marks `key` stale, superseding any in-flight fetch.
    pub fn invalidate(&mut self, key: QueryKey) {
        let entry = self.entries.entry(key).or_default();
        entry.stale = true;
        entry.in_flight = None;
    }

    /// Invalidates every key the rules map `mutation` to.
    ///
    /// Call only after the mutation succeeded. Returns the invalidated keys.
    pub fn apply_mutation(&mut self, mutation: Mutation) -> Vec<QueryKey> {
        let keys = self.rules.affected(mutation).to_vec();
        for key in &keys {
            self.invalidate(*key);
        }
        tracing::debug!(?mutation, ?keys, "invalidated queries after mutation");
        keys
    }

    /// What to render for `key`.
    #[must_use]
    pub fn view(&self, key: QueryKey) -> QueryView<'_, T> {
        let Some(entry) = self.entries.get(&key) else {
            return QueryView::Loading;
        };
        if let Some(error) = &entry.error {
            return QueryView::Error(error);
        }
        entry.data.as_ref().map_or(QueryView::Loading, QueryView::Loaded)
    }

    /// Last successfully fetched data for `key`, stale or not.
    #[must_use]
    pub fn data(&self, key: QueryKey) -> Option<&T> {
        self.entries.get(&key).and_then(|e| e.data.as_ref())
    }

    /// Returns `true` while a fetch of `key` is in flight.
    #[must_use]
    pub fn is_fetching(&self, key: QueryKey) -> bool {
        self.entries.get(&key).is_some_and(|e| e.in_flight.is_some())
    }

    /// When `key` last fetched successfully.
    #[must_use]
    pub fn fetched_at(&self, key: QueryKey) -> Option<DateTime<Local>> {
        self.entries.get(&key).and_then(|e| e.fetched_at)
    }
}

impl QueryCache<Vec<Task>> {
    /// Creates the shared task cache with the default rules.
    #[must_use]
    pub fn shared() -> SharedCache {
        Arc::new(Mutex::new(Self::new()))
    }
}
