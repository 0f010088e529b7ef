//! Reconciliation engine for the task board.
//!
//! This module provides the [`Reconciler`], which owns the board state (the
//! active and completed sections plus the id of the remote task list in use)
//! and folds remote snapshots and user intents into it.
//!
//! The engine is meant to live on a single state-owning context (the UI loop).
//! Remote I/O runs on spawned workers that never see the board state: they
//! send their result back through a channel, and the owning context applies it
//! with [`Reconciler::apply_snapshot`] or [`Reconciler::commit_move`].

pub mod convert;
pub mod error;
pub mod schedule;
pub mod single_flight;

use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::backend::{ListTasksOptions, RemoteError, RemoteOperation, TaskClient};
use crate::entities::{Section, Sections, Task, TaskRef};

pub use convert::convert;
pub use error::{MoveError, SyncError};
pub use schedule::SyncSchedule;
pub use single_flight::{FlightGuard, SingleFlight};

/// Result of one fetch-and-convert, ready to replace the board wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub task_list_id: String,
    /// Board generation current when the fetch started.
    pub generation: u64,
    pub active: Vec<Task>,
    pub completed: Vec<Task>,
}

/// Remote half of a move: which call to make, against which list and task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteStep {
    pub operation: RemoteOperation,
    pub task_list_id: String,
    pub task_id: String,
}

/// A validated move, produced by [`Reconciler::plan_move`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePlan {
    pub task: TaskRef,
    pub from: Section,
    pub to: Section,
    /// `None` for local-only tasks, or while no task list is known.
    pub remote: Option<RemoteStep>,
}

impl MovePlan {
    /// The task already sits in the destination section.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Cloneable handle to the remote client, for use on worker tasks.
#[derive(Clone)]
pub struct RemoteHandle {
    client: Arc<dyn TaskClient>,
    request_timeout: Duration,
}

impl RemoteHandle {
    pub fn new(client: Arc<dyn TaskClient>, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    /// Run the remote half of a move.
    ///
    /// On an authorization failure the client is forced to re-authorize once
    /// and the same call is retried once. Any other failure aborts at once.
    pub async fn execute(&self, plan: &MovePlan) -> Result<(), MoveError> {
        let Some(step) = plan.remote.as_ref() else {
            return Ok(());
        };
        let rejected = |source: RemoteError| MoveError::RemoteRejected {
            operation: step.operation,
            source,
        };

        let first = self.call(step).await;
        let err = match first {
            Ok(()) => return Ok(()),
            Err(e) if e.is_authorization() => e,
            Err(e) => {
                error!("❌ Failed to {} '{}': {e}", step.operation, plan.task.title);
                return Err(rejected(e));
            }
        };

        warn!(
            "Authorization refused while trying to {} '{}' ({err}), re-authorizing",
            step.operation, plan.task.title
        );
        if let Err(e) = self.client.force_reauthorize().await {
            error!("❌ Re-authorization failed: {e}");
            return Err(rejected(e));
        }

        self.call(step).await.map_err(|e| {
            error!("❌ Failed to {} '{}' after re-authorization: {e}", step.operation, plan.task.title);
            rejected(e)
        })
    }

    /// Fetch the remote list and convert it.
    ///
    /// `known_list_id` skips the listing call once the task list is known.
    /// `generation` is the board generation at the time of the call.
    /// Returns `Ok(None)` when the account has no task lists.
    pub async fn fetch_snapshot(
        &self,
        known_list_id: Option<String>,
        generation: u64,
    ) -> Result<Option<Snapshot>, SyncError> {
        let task_list_id = match known_list_id {
            Some(id) => id,
            None => {
                let lists = self.bounded(self.client.list_task_lists()).await?;
                match lists.into_iter().next() {
                    Some(first) => {
                        info!("Using task list '{}' ({})", first.title, first.id);
                        first.id
                    }
                    None => {
                        warn!("No task lists found on the remote");
                        return Ok(None);
                    }
                }
            }
        };

        let remote_tasks = self
            .bounded(self.client.list_tasks(&task_list_id, ListTasksOptions::all()))
            .await?;
        let (active, completed) = convert(&remote_tasks);
        info!(
            "✅ Fetched {} tasks ({} active, {} completed shown)",
            remote_tasks.len(),
            active.len(),
            completed.len()
        );

        Ok(Some(Snapshot {
            task_list_id,
            generation,
            active,
            completed,
        }))
    }

    async fn call(&self, step: &RemoteStep) -> Result<(), RemoteError> {
        self.bounded(self.client.apply(step.operation, &step.task_list_id, &step.task_id))
            .await
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T, RemoteError>>) -> Result<T, RemoteError> {
        tokio::time::timeout(self.request_timeout, fut)
            .await
            .unwrap_or_else(|_| Err(RemoteError::Timeout(self.request_timeout.as_secs())))
    }
}

/// Owner of the board state.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use taskboard::backend::TaskClient;
/// use taskboard::entities::{Section, TaskRef};
/// use taskboard::sync::Reconciler;
///
/// # async fn example(client: Arc<dyn TaskClient>) -> anyhow::Result<()> {
/// let mut engine = Reconciler::new(client, Duration::from_secs(30));
/// engine.load_from_remote().await?;
///
/// engine.add("Buy milk", "");
/// engine.move_task(&TaskRef::by_title("Buy milk"), Section::Completed).await?;
/// # Ok(())
/// # }
/// ```
pub struct Reconciler {
    remote: RemoteHandle,
    sections: Sections,
    task_list_id: Option<String>,
    /// Bumped by every committed move.
    generation: u64,
    flight: SingleFlight,
}

impl Reconciler {
    pub fn new(client: Arc<dyn TaskClient>, request_timeout: Duration) -> Self {
        Self {
            remote: RemoteHandle::new(client, request_timeout),
            sections: Sections::default(),
            task_list_id: None,
            generation: 0,
            flight: SingleFlight::new(),
        }
    }

    /// Start from an existing board, e.g. placeholder cards shown until the
    /// first fetch lands.
    pub fn with_sections(mut self, sections: Sections) -> Self {
        self.sections = sections;
        self
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn task_list_id(&self) -> Option<&str> {
        self.task_list_id.as_deref()
    }

    pub fn remote(&self) -> RemoteHandle {
        self.remote.clone()
    }

    /// Count of moves committed so far. Snapshots fetched under an older
    /// generation are discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a background fetch is outstanding.
    pub fn is_syncing(&self) -> bool {
        self.flight.is_busy()
    }

    /// Fetch and replace the board in place.
    ///
    /// Returns whether the board was replaced. On error, or when the account
    /// has no task lists, the board is left exactly as it was.
    pub async fn load_from_remote(&mut self) -> Result<bool, SyncError> {
        let Some(_guard) = self.flight.try_begin() else {
            debug!("Load skipped, a fetch is already in flight");
            return Ok(false);
        };
        match self
            .remote
            .fetch_snapshot(self.task_list_id.clone(), self.generation)
            .await?
        {
            Some(snapshot) => Ok(self.apply_snapshot(snapshot)),
            None => Ok(false),
        }
    }

    /// Launch a background fetch unless one is already in flight.
    ///
    /// The worker sends `wrap(result)` on `tx` when done; the owning context
    /// passes successful snapshots to [`Reconciler::apply_snapshot`]. Returns
    /// `false` when the trigger was skipped.
    pub fn spawn_sync<A, F>(&self, tx: &mpsc::UnboundedSender<A>, wrap: F) -> bool
    where
        A: Send + 'static,
        F: FnOnce(Result<Option<Snapshot>, SyncError>) -> A + Send + 'static,
    {
        let Some(guard) = self.flight.try_begin() else {
            debug!("Sync tick skipped, previous fetch still in flight");
            return false;
        };

        let remote = self.remote.clone();
        let known_list_id = self.task_list_id.clone();
        let generation = self.generation;
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = remote.fetch_snapshot(known_list_id, generation).await;
            if let Err(e) = &result {
                warn!("Background sync failed: {e}");
            }
            // Queue the result before releasing, so results arrive in the
            // order their fetches ran.
            let _ = tx.send(wrap(result));
            drop(guard);
        });
        true
    }

    /// Replace both sections with a fetched snapshot.
    ///
    /// A snapshot whose fetch started before the latest committed move is
    /// dropped; it may predate the remote change. Returns whether the board
    /// was replaced. The task list id is only adopted when none is known yet.
    /// Local-only tasks do not survive the replace.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if snapshot.generation < self.generation {
            debug!(
                "Dropping snapshot from generation {}, board is at {}",
                snapshot.generation, self.generation
            );
            return false;
        }
        if self.task_list_id.is_none() {
            self.task_list_id = Some(snapshot.task_list_id);
        }
        self.sections = Sections::new(snapshot.active, snapshot.completed);
        true
    }

    /// Validate a move and decide whether it needs a remote call.
    pub fn plan_move(&self, task_ref: &TaskRef, destination: Section) -> Result<MovePlan, MoveError> {
        let (from, task) = self
            .sections
            .find(task_ref)
            .ok_or_else(|| MoveError::TaskNotFound(describe(task_ref)))?;

        let remote = match (task.remote_id(), self.task_list_id.as_deref()) {
            (Some(task_id), Some(task_list_id)) if from != destination => Some(RemoteStep {
                operation: match destination {
                    Section::Completed => RemoteOperation::Complete,
                    Section::Active => RemoteOperation::Uncomplete,
                },
                task_list_id: task_list_id.to_string(),
                task_id: task_id.to_string(),
            }),
            _ => None,
        };

        Ok(MovePlan {
            task: TaskRef::from(task),
            from,
            to: destination,
            remote,
        })
    }

    /// Apply the local half of a move whose remote half already succeeded.
    ///
    /// Succeeds without change if the task is already in the destination
    /// (for instance because a sync landed in between).
    pub fn commit_move(&mut self, plan: &MovePlan) -> Result<(), MoveError> {
        let (section, index) = self
            .sections
            .locate(&plan.task)
            .ok_or_else(|| MoveError::TaskNotFound(describe(&plan.task)))?;
        if section == plan.to {
            return Ok(());
        }

        let task = self.sections.get_mut(section).remove(index);
        self.generation += 1;
        info!("Moved '{}' from {} to {}", task.title, section, plan.to);
        self.sections.get_mut(plan.to).push(task);
        Ok(())
    }

    /// Move a task between sections, remote first.
    ///
    /// Nothing local changes unless the remote call succeeded (or was not
    /// needed).
    pub async fn move_task(&mut self, task_ref: &TaskRef, destination: Section) -> Result<(), MoveError> {
        let plan = self.plan_move(task_ref, destination)?;
        if plan.is_noop() {
            return Ok(());
        }
        self.remote.execute(&plan).await?;
        self.commit_move(&plan)
    }

    /// Same as [`Reconciler::move_task`] with the destination given by name
    /// (`"active"` or `"completed"`).
    pub async fn move_task_to(&mut self, task_ref: &TaskRef, destination: &str) -> Result<(), MoveError> {
        let destination = parse_destination(destination)?;
        self.move_task(task_ref, destination).await
    }

    /// Append a local-only task to the active section.
    ///
    /// Returns `false` for an empty or all-whitespace title.
    pub fn add(&mut self, title: &str, description: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.sections.active.push(Task::local(title, description));
        debug!("Added local task '{title}'");
        true
    }

    /// Remove the first task titled exactly `title`, active section first.
    pub fn delete(&mut self, title: &str) -> bool {
        if title.is_empty() {
            return false;
        }
        let task_ref = TaskRef::by_title(title);
        match self.sections.locate(&task_ref) {
            Some((section, index)) => {
                self.sections.get_mut(section).remove(index);
                debug!("Deleted '{title}' from {section}");
                true
            }
            None => false,
        }
    }
}

/// Parse a section name coming from outside the type system.
pub fn parse_destination(name: &str) -> Result<Section, MoveError> {
    name.parse().map_err(MoveError::InvalidDestination)
}

fn describe(task_ref: &TaskRef) -> String {
    match task_ref.remote_id() {
        Some(id) => format!("'{}' ({id})", task_ref.title),
        None => format!("'{}'", task_ref.title),
    }
}
