//! REST adapter. Implements TaskGateway against the backend's /api/todos
//! resource.
//!
//! Status-class mapping: request failure -> Transport, 404 -> NotFoundRemote,
//! 5xx -> Server (body text kept as detail), anything else -> Gateway.

use crate::domain::{DomainError, Task, TaskCreate, TaskUpdate};
use crate::ports::TaskGateway;
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// REST gateway for the remote todo service.
///
/// Routes mirror the backend resource: `GET /api/todos`, `POST /api/todos`,
/// `GET|PUT|DELETE /api/todos/{id}`, `PATCH /api/todos/{id}/complete`.
/// Completion is the single PATCH path; there is no PUT fallback.
pub struct RestGateway {
    client: reqwest::Client,
    /// Fully-qualified collection URL, no trailing slash.
    base: String,
}

impl RestGateway {
    /// Create a new REST gateway.
    ///
    /// # Arguments
    /// * `base_url` - Backend origin (e.g. "http://localhost:8080")
    /// * `timeout` - Per-request timeout; an elapsed timeout surfaces as `Transport`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Gateway(format!("HTTP client build failed: {e}")))?;
        Ok(Self {
            client,
            base: format!("{}/api/todos", base_url.trim_end_matches('/')),
        })
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }

    /// Map a settled non-success response to a DomainError, keeping the body
    /// text as detail when the server sent any.
    async fn check(res: Response) -> Result<Response, DomainError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let detail = res.text().await.unwrap_or_default();
        Err(map_status(status, detail))
    }

    fn transport(e: reqwest::Error) -> DomainError {
        if e.is_decode() {
            DomainError::Gateway(format!("Malformed response body: {e}"))
        } else {
            DomainError::Transport(format!("Request failed: {e}"))
        }
    }
}

fn map_status(status: StatusCode, detail: String) -> DomainError {
    let detail = if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {detail}")
    };
    if status == StatusCode::NOT_FOUND {
        DomainError::NotFoundRemote(detail)
    } else if status.is_server_error() {
        DomainError::Server(detail)
    } else {
        DomainError::Gateway(detail)
    }
}

#[async_trait::async_trait]
impl TaskGateway for RestGateway {
    async fn list_tasks(&self) -> Result<Vec<Task>, DomainError> {
        debug!(url = %self.base, "GET task list");
        let res = self
            .client
            .get(&self.base)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(res).await?.json().await.map_err(Self::transport)
    }

    async fn get_task(&self, id: &str) -> Result<Task, DomainError> {
        let url = self.item_url(id);
        debug!(url = %url, "GET task");
        let res = self.client.get(&url).send().await.map_err(Self::transport)?;
        Self::check(res).await?.json().await.map_err(Self::transport)
    }

    async fn create_task(&self, payload: &TaskCreate) -> Result<Task, DomainError> {
        debug!(url = %self.base, title = %payload.title, "POST create task");
        let res = self
            .client
            .post(&self.base)
            .json(payload)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(res).await?.json().await.map_err(Self::transport)
    }

    async fn update_task(&self, id: &str, payload: &TaskUpdate) -> Result<Task, DomainError> {
        let url = self.item_url(id);
        debug!(url = %url, "PUT update task");
        let res = self
            .client
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(res).await?.json().await.map_err(Self::transport)
    }

    async fn complete_task(&self, id: &str) -> Result<Task, DomainError> {
        let url = format!("{}/complete", self.item_url(id));
        debug!(url = %url, "PATCH complete task");
        // Empty JSON object body; the endpoint takes no payload.
        let res = self
            .client
            .patch(&url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(res).await?.json().await.map_err(Self::transport)
    }

    async fn delete_task(&self, id: &str) -> Result<(), DomainError> {
        let url = self.item_url(id);
        debug!(url = %url, "DELETE task");
        let res = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(res).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_remote_not_found() {
        let err = map_status(StatusCode::NOT_FOUND, "no todo with id 7".to_string());
        assert!(matches!(err, DomainError::NotFoundRemote(d) if d.contains("id 7")));
    }

    #[test]
    fn server_class_maps_to_server_error_with_detail() {
        let err = map_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert!(matches!(err, DomainError::Server(d) if d.contains("boom")));
        let err = map_status(StatusCode::SERVICE_UNAVAILABLE, String::new());
        assert!(matches!(err, DomainError::Server(_)));
    }

    #[test]
    fn other_non_success_maps_to_gateway() {
        let err = map_status(StatusCode::BAD_REQUEST, "title required".to_string());
        assert!(matches!(err, DomainError::Gateway(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let gw = RestGateway::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(gw.item_url("42"), "http://localhost:8080/api/todos/42");
    }
}
