//! Google Tasks implementation of [`TaskClient`].

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::auth::Authorizer;
use super::{
    ListTasksOptions, RemoteError, RemoteTask, TaskClient, TaskList, STATUS_COMPLETED, STATUS_NEEDS_ACTION,
};

pub const TASKS_API: &str = "https://tasks.googleapis.com/tasks/v1";
const PAGE_SIZE: &str = "100";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskListsResponse {
    #[serde(default)]
    items: Vec<TaskList>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TasksResponse {
    #[serde(default)]
    items: Vec<RemoteTask>,
    next_page_token: Option<String>,
}

/// Body of the PATCH that flips a task's status. `completed` is always
/// serialized so reopening clears the remote completion time.
#[derive(Serialize)]
struct StatusPatch<'a> {
    status: &'a str,
    completed: Option<String>,
}

/// Async client for the Google Tasks REST API.
pub struct GoogleTasksClient {
    http: Client,
    auth: Authorizer,
    base_url: String,
}

impl GoogleTasksClient {
    pub fn new(http: Client, auth: Authorizer) -> Self {
        Self {
            http,
            auth,
            base_url: TASKS_API.to_string(),
        }
    }

    /// Build the shared HTTP client with a per-request timeout.
    pub fn http_client(request_timeout: Duration) -> Result<Client, RemoteError> {
        Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RemoteError::Config(format!("cannot build HTTP client: {e}")))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Obtain a token up front, running the consent flow if there is none.
    ///
    /// Requests never start the consent flow themselves; without a token
    /// they fail as unauthorized. Called before the board starts.
    pub async fn ensure_authorized(&self) -> Result<(), RemoteError> {
        self.auth.authorize().await.map(|_| ())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, RemoteError> {
        let token = self.auth.access_token().await?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(map_send_error)?;
        handle_response(resp).await
    }

    async fn patch_status(&self, task_list_id: &str, task_id: &str, patch: &StatusPatch<'_>) -> Result<(), RemoteError> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/lists/{task_list_id}/tasks/{task_id}", self.base_url);
        let resp = self
            .http
            .patch(url)
            .bearer_auth(token)
            .json(patch)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_response(status, resp).await)
        }
    }
}

#[async_trait]
impl TaskClient for GoogleTasksClient {
    fn client_type(&self) -> &str {
        "google"
    }

    async fn list_task_lists(&self) -> Result<Vec<TaskList>, RemoteError> {
        let url = format!("{}/users/@me/lists", self.base_url);
        let body: TaskListsResponse = self.get_json(&url, &[("maxResults", PAGE_SIZE)]).await?;
        debug!("Fetched {} task lists", body.items.len());
        Ok(body.items)
    }

    async fn list_tasks(&self, task_list_id: &str, options: ListTasksOptions) -> Result<Vec<RemoteTask>, RemoteError> {
        let url = format!("{}/lists/{task_list_id}/tasks", self.base_url);
        let show_completed = options.include_completed.to_string();
        let show_hidden = options.include_hidden.to_string();

        let mut tasks = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("maxResults", PAGE_SIZE),
                ("showCompleted", show_completed.as_str()),
                ("showHidden", show_hidden.as_str()),
                ("showDeleted", "false"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: TasksResponse = self.get_json(&url, &query).await?;
            tasks.extend(page.items);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!("Fetched {} tasks from list {}", tasks.len(), task_list_id);
        Ok(tasks)
    }

    async fn complete_task(&self, task_list_id: &str, task_id: &str) -> Result<(), RemoteError> {
        let patch = StatusPatch {
            status: STATUS_COMPLETED,
            completed: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        self.patch_status(task_list_id, task_id, &patch).await?;
        info!("Marked task {task_id} completed");
        Ok(())
    }

    async fn uncomplete_task(&self, task_list_id: &str, task_id: &str) -> Result<(), RemoteError> {
        let patch = StatusPatch {
            status: STATUS_NEEDS_ACTION,
            completed: None,
        };
        self.patch_status(task_list_id, task_id, &patch).await?;
        info!("Reopened task {task_id}");
        Ok(())
    }

    async fn force_reauthorize(&self) -> Result<(), RemoteError> {
        self.auth.force_reauthorize().await
    }
}

fn map_send_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Network(format!("request timed out: {e}"))
    } else {
        RemoteError::Network(e.to_string())
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| RemoteError::InvalidData(format!("json decode: {e}")))
    } else {
        Err(error_from_response(status, resp).await)
    }
}

async fn error_from_response(status: StatusCode, resp: reqwest::Response) -> RemoteError {
    let body = resp.text().await.unwrap_or_default();
    classify_status(status.as_u16(), &body)
}

/// Map an error status and Google's JSON error body to a [`RemoteError`].
pub(crate) fn classify_status(status: u16, body: &str) -> RemoteError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| super::auth::truncate_error(body.trim()));

    match status {
        401 | 403 => RemoteError::Unauthorized { status, message },
        _ => RemoteError::Http { status, message },
    }
}
