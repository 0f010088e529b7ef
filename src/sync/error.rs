use crate::backend::{RemoteError, RemoteOperation};

/// Failure of a background fetch. Never shown to the user; the next cycle
/// simply tries again.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(#[from] RemoteError),
}

/// Failure of a user-initiated move. Local state is unchanged whenever one
/// of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid destination section '{0}'")]
    InvalidDestination(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Failed to {operation} on the remote list: {source}")]
    RemoteRejected {
        operation: RemoteOperation,
        #[source]
        source: RemoteError,
    },
}

impl MoveError {
    /// True when the remote kept refusing authorization, or the forced
    /// re-authorization itself failed.
    pub fn is_authorization_failure(&self) -> bool {
        match self {
            MoveError::RemoteRejected { source, .. } => {
                source.is_authorization() || matches!(source, RemoteError::Reauthorization(_))
            }
            _ => false,
        }
    }
}
