//! HTTP client for the Taskboard API
//!
//! Wraps the five task operations (plus the health probe) as one-shot
//! requests against a base URL. No retries, caching, or batching; every
//! non-2xx response surfaces the server's error body.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use tb_core::task::{NewTask, Task, TaskPatch};
use tb_core::Violation;

/// Error body as returned by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<Vec<Violation>>,
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection, timeout, decode)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server replied with a non-success status
    #[error("API error ({status}): {}", .body.error)]
    Api {
        status: StatusCode,
        body: ApiErrorBody,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Query parameters for listing tasks
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Status filter; unrecognized values are ignored server-side
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Health probe response
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
}

/// Client for the task API
pub struct TaskClient {
    http: Client,
    base_url: String,
}

impl TaskClient {
    /// Create a client for the given base URL (e.g. `http://localhost:3001`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Turn a non-success response into `ClientError::Api`
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or_else(|_| ApiErrorBody {
            error: if text.is_empty() {
                format!("HTTP {status}")
            } else {
                text
            },
            details: None,
        });
        tracing::debug!(%status, error = %body.error, "API call failed");
        Err(ClientError::Api { status, body })
    }

    async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// GET /api/tasks
    pub async fn list_tasks(&self, query: &ListQuery) -> Result<Vec<Task>> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(status) = &query.status {
            params.push(("status", status));
        }
        if let Some(sort_by) = &query.sort_by {
            params.push(("sortBy", sort_by));
        }
        if let Some(order) = &query.order {
            params.push(("order", order));
        }

        let response = self
            .http
            .get(self.url("/tasks"))
            .query(&params)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    /// GET /api/tasks/:id
    pub async fn get_task(&self, id: Uuid) -> Result<Task> {
        let response = self.http.get(self.url(&format!("/tasks/{id}"))).send().await?;
        Self::expect_json(response).await
    }

    /// POST /api/tasks
    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .json(task)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    /// PUT /api/tasks/:id
    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task> {
        let response = self
            .http
            .put(self.url(&format!("/tasks/{id}")))
            .json(patch)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    /// DELETE /api/tasks/:id
    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// GET /health (not under the /api prefix)
    pub async fn health(&self) -> Result<Health> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Self::expect_json(response).await
    }
}
