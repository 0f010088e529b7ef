//! Conversion of a remote snapshot into the two board sections.

use crate::backend::RemoteTask;
use crate::constants::{COMPLETED_DISPLAY_LIMIT, UNTITLED_TASK};
use crate::entities::Task;
use crate::utils::datetime::parse_remote_timestamp;

/// Split remote records into `(active, completed)`.
///
/// Active keeps the order the remote returned. Completed is ordered by
/// completion time, newest first, with missing or unparsable timestamps last,
/// and capped at [`COMPLETED_DISPLAY_LIMIT`].
pub fn convert(remote_tasks: &[RemoteTask]) -> (Vec<Task>, Vec<Task>) {
    let mut active = Vec::new();
    let mut completed = Vec::new();

    for remote in remote_tasks {
        let task = to_task(remote);
        if remote.is_completed() {
            completed.push(task);
        } else {
            active.push(task);
        }
    }

    // Stable sort: ties keep remote order. `None` orders below any `Some`.
    completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    completed.truncate(COMPLETED_DISPLAY_LIMIT);

    (active, completed)
}

fn to_task(remote: &RemoteTask) -> Task {
    let title = remote
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED_TASK)
        .to_string();

    Task {
        id: remote.id.clone().filter(|id| !id.is_empty()),
        title,
        description: remote.notes.clone().unwrap_or_default(),
        completed_at: remote.completed.as_deref().and_then(parse_remote_timestamp),
    }
}
