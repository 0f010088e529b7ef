//! Remote task-list abstraction.
//!
//! This module defines the interface the reconciliation engine consumes,
//! along with the wire records and error type shared by every implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod auth;
pub mod google;

/// Status string the remote uses for finished tasks.
pub const STATUS_COMPLETED: &str = "completed";
/// Status string the remote uses for open tasks.
pub const STATUS_NEEDS_ACTION: &str = "needsAction";

/// Common error types for remote operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The remote refused the credentials or their scope (HTTP 401/403).
    #[error("Authorization failed (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Client configuration error: {0}")]
    Config(String),

    #[error("Re-authorization failed: {0}")]
    Reauthorization(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl RemoteError {
    /// Whether the failure should trigger a forced re-authorization.
    pub fn is_authorization(&self) -> bool {
        matches!(self, RemoteError::Unauthorized { .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Unauthorized { status, .. } | RemoteError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A remote task list (`{id, title}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A remote task record as returned by the list call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// `"needsAction"` or `"completed"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    /// Completion time as sent by the remote, unparsed.
    #[serde(default)]
    pub completed: Option<String>,
}

impl RemoteTask {
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(STATUS_COMPLETED)
    }
}

/// Filters for [`TaskClient::list_tasks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListTasksOptions {
    pub include_completed: bool,
    pub include_hidden: bool,
}

impl ListTasksOptions {
    /// Everything the board needs: completed and hidden tasks included.
    pub fn all() -> Self {
        Self {
            include_completed: true,
            include_hidden: true,
        }
    }
}

impl Default for ListTasksOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// The remote mutation a move turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteOperation {
    Complete,
    Uncomplete,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::Complete => f.write_str("complete task"),
            RemoteOperation::Uncomplete => f.write_str("reopen task"),
        }
    }
}

/// Remote task-list service consumed by the reconciliation engine.
///
/// Implementations own authorization entirely; the engine only ever asks for
/// a forced re-authorization after an authorization failure.
#[async_trait]
pub trait TaskClient: Send + Sync {
    /// Returns the client type identifier (e.g., "google").
    fn client_type(&self) -> &str;

    async fn list_task_lists(&self) -> Result<Vec<TaskList>, RemoteError>;

    /// List every task in `task_list_id`, following pagination to the end.
    async fn list_tasks(&self, task_list_id: &str, options: ListTasksOptions) -> Result<Vec<RemoteTask>, RemoteError>;

    async fn complete_task(&self, task_list_id: &str, task_id: &str) -> Result<(), RemoteError>;
    async fn uncomplete_task(&self, task_list_id: &str, task_id: &str) -> Result<(), RemoteError>;

    /// Discard any cached authorization and run the interactive flow again.
    async fn force_reauthorize(&self) -> Result<(), RemoteError>;

    /// Dispatch a [`RemoteOperation`] to the matching call.
    async fn apply(&self, operation: RemoteOperation, task_list_id: &str, task_id: &str) -> Result<(), RemoteError> {
        match operation {
            RemoteOperation::Complete => self.complete_task(task_list_id, task_id).await,
            RemoteOperation::Uncomplete => self.uncomplete_task(task_list_id, task_id).await,
        }
    }
}
