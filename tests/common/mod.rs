//! In-memory `TaskClient` used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use taskboard::backend::{ListTasksOptions, RemoteError, RemoteTask, TaskClient, TaskList};
use tokio::sync::Notify;

#[derive(Default)]
pub struct Calls {
    pub list_task_lists: usize,
    pub list_tasks: usize,
    pub complete: Vec<(String, String)>,
    pub uncomplete: Vec<(String, String)>,
    pub reauthorize: usize,
}

#[derive(Default)]
pub struct FakeClient {
    pub lists: Mutex<Vec<TaskList>>,
    pub tasks: Mutex<Vec<RemoteTask>>,
    pub calls: Mutex<Calls>,
    /// Results handed out by complete/uncomplete, in order; `Ok` once empty.
    pub mutation_results: Mutex<VecDeque<Result<(), RemoteError>>>,
    pub list_error: Mutex<Option<RemoteError>>,
    pub reauthorize_error: Mutex<Option<RemoteError>>,
    /// When set, `list_tasks` waits for a notification before answering.
    pub gate: Option<Arc<Notify>>,
    /// When set, mutations never answer.
    pub hang_mutations: bool,
}

impl FakeClient {
    pub fn with_tasks(list_id: &str, tasks: Vec<RemoteTask>) -> Self {
        Self {
            lists: Mutex::new(vec![TaskList {
                id: list_id.to_string(),
                title: "My Tasks".to_string(),
            }]),
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    pub fn push_mutation_result(&self, result: Result<(), RemoteError>) {
        self.mutation_results.lock().unwrap().push_back(result);
    }

    pub fn set_tasks(&self, tasks: Vec<RemoteTask>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    pub fn fail_next_fetch(&self, error: RemoteError) {
        *self.list_error.lock().unwrap() = Some(error);
    }

    pub fn mutation_count(&self) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.complete.len() + calls.uncomplete.len()
    }

    pub fn reauthorize_count(&self) -> usize {
        self.calls.lock().unwrap().reauthorize
    }

    pub fn list_tasks_count(&self) -> usize {
        self.calls.lock().unwrap().list_tasks
    }

    fn next_mutation_result(&self) -> Result<(), RemoteError> {
        self.mutation_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait]
impl TaskClient for FakeClient {
    fn client_type(&self) -> &str {
        "fake"
    }

    async fn list_task_lists(&self) -> Result<Vec<TaskList>, RemoteError> {
        self.calls.lock().unwrap().list_task_lists += 1;
        if let Some(e) = self.list_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.lists.lock().unwrap().clone())
    }

    async fn list_tasks(&self, _task_list_id: &str, _options: ListTasksOptions) -> Result<Vec<RemoteTask>, RemoteError> {
        self.calls.lock().unwrap().list_tasks += 1;
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(e) = self.list_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn complete_task(&self, task_list_id: &str, task_id: &str) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .complete
            .push((task_list_id.to_string(), task_id.to_string()));
        if self.hang_mutations {
            std::future::pending::<()>().await;
        }
        self.next_mutation_result()
    }

    async fn uncomplete_task(&self, task_list_id: &str, task_id: &str) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .uncomplete
            .push((task_list_id.to_string(), task_id.to_string()));
        if self.hang_mutations {
            std::future::pending::<()>().await;
        }
        self.next_mutation_result()
    }

    async fn force_reauthorize(&self) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().reauthorize += 1;
        match self.reauthorize_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

pub fn remote_task(id: &str, title: &str, status: &str, completed: Option<&str>) -> RemoteTask {
    RemoteTask {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        notes: None,
        status: Some(status.to_string()),
        due: None,
        completed: completed.map(str::to_string),
    }
}

pub fn active(id: &str, title: &str) -> RemoteTask {
    remote_task(id, title, "needsAction", None)
}

pub fn done(id: &str, title: &str, completed: &str) -> RemoteTask {
    remote_task(id, title, "completed", Some(completed))
}

pub fn unauthorized() -> RemoteError {
    RemoteError::Unauthorized {
        status: 401,
        message: "Invalid Credentials".to_string(),
    }
}
