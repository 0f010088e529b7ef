//! Messages handed from background workers to the UI loop.

use crate::sync::{MoveError, MovePlan, Snapshot, SyncError};

#[derive(Debug)]
pub enum Action {
    /// A background fetch finished. `Ok(None)` means the account has no lists.
    SyncFinished(Result<Option<Snapshot>, SyncError>),
    /// The remote half of a move finished; commit locally on success.
    MoveFinished {
        plan: MovePlan,
        result: Result<(), MoveError>,
    },
    /// The client needs the user to visit a consent URL.
    AuthPrompt(String),
}
