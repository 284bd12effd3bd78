//! Typed HTTP client for the task API.
//!
//! Each method issues exactly one blocking request and returns the parsed
//! body, or the failure unchanged. There is no retry and no backoff; callers
//! on an async runtime should run these on a blocking thread (see
//! [`crate::net`]).

use taskflow_proto::api::{DeleteResponse, ErrorBody};
use taskflow_proto::task::{NewTask, Task, TaskId, TaskUpdate};
use url::Url;

/// Errors returned by [`ApiClient`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured server URL cannot be used as a base for API paths.
    #[error("invalid server url: {0}")]
    InvalidBaseUrl(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The server's `error` message, or a generic description.
        message: String,
    },

    /// The request never produced a response (connect, DNS, I/O).
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] std::io::Error),
}

impl ClientError {
    /// Returns `true` for a 404 from the server.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let message = response
                    .into_json::<ErrorBody>()
                    .map_or_else(|_| format!("HTTP {status}"), |body| body.error);
                Self::Status { status, message }
            }
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}

/// Blocking client for the `/api/task` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base: Url,
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the URL does not parse or
    /// cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            agent: ureq::AgentBuilder::new().build(),
            base,
        })
    }

    /// The server URL this client talks to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /api/task`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let url = self.endpoint(None);
        tracing::debug!(%url, "fetching tasks");
        Ok(self.agent.get(url.as_str()).call()?.into_json()?)
    }

    /// `POST /api/task`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        let url = self.endpoint(None);
        tracing::debug!(%url, title = %task.title, "creating task");
        Ok(self.agent.post(url.as_str()).send_json(task)?.into_json()?)
    }

    /// `PUT /api/task/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] with status 404 if the id is unknown,
    /// or another [`ClientError`] on transport or decode failure.
    pub fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> Result<Task, ClientError> {
        let url = self.endpoint(Some(id));
        tracing::debug!(%url, "updating task");
        Ok(self.agent.put(url.as_str()).send_json(update)?.into_json()?)
    }

    /// `DELETE /api/task/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] with status 404 if the id is unknown,
    /// or another [`ClientError`] on transport or decode failure.
    pub fn delete_task(&self, id: &TaskId) -> Result<DeleteResponse, ClientError> {
        let url = self.endpoint(Some(id));
        tracing::debug!(%url, "deleting task");
        Ok(self.agent.delete(url.as_str()).call()?.into_json()?)
    }

    /// Builds `<base>/api/task[/<id>]`, percent-encoding the id.
    fn endpoint(&self, id: Option<&TaskId>) -> Url {
        let mut url = self.base.clone();
        // `new` rejected cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "task"]);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }
}
