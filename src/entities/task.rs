use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single card on the board.
///
/// Tasks that came from the remote list carry the remote `id`. Tasks created
/// locally have no id and are only ever matched by their exact title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    /// Remote completion time, only used to order the completed section.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a local-only task that has never been seen by the remote list.
    pub fn local(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            completed_at: None,
        }
    }

    pub fn is_local(&self) -> bool {
        self.remote_id().is_none()
    }

    /// Remote id, treating an empty string the same as a missing id.
    pub fn remote_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether this task is the one a [`TaskRef`] points at.
    ///
    /// A reference with an id only ever matches by id, even when another
    /// task happens to share its title.
    pub fn matches(&self, task_ref: &TaskRef) -> bool {
        match task_ref.remote_id() {
            Some(id) => self.remote_id() == Some(id),
            None => self.title == task_ref.title,
        }
    }
}

/// Reference to a task as carried by a UI gesture (the drag payload).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: Option<String>,
    pub title: String,
}

impl TaskRef {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
        }
    }

    pub fn by_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

impl From<&Task> for TaskRef {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
        }
    }
}
