//! Mock gateway for testing without a backend.
//!
//! In-memory task store with scripted failures, per-call counting and
//! simulated network latency. Also backs the offline demo mode.

use crate::domain::{DomainError, Task, TaskCreate, TaskUpdate};
use crate::ports::TaskGateway;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Which DomainError the mock returns while a failure is scripted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    NotFoundRemote,
    Server,
}

struct Store {
    tasks: Vec<Task>,
    next_id: u64,
    failure: Option<FailureKind>,
}

/// Mock task gateway.
///
/// Behaves like the remote service: ids and timestamps are assigned here, and
/// every returned record is the authoritative one. Once `fail_with` is set,
/// every call fails until `clear_failure`.
pub struct MockGateway {
    store: Mutex<Store>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockGateway {
    /// Empty store, no latency.
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Seed the store. Numeric ids among the seeds stay reserved so assigned
    /// ids never collide.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            store: Mutex::new(Store {
                tasks,
                next_id,
                failure: None,
            }),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Simulate network latency per call.
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = Duration::from_millis(delay_ms);
        self
    }

    /// Script all subsequent calls to fail with `kind`.
    pub fn fail_with(&self, kind: FailureKind) {
        // blocking_lock would panic inside a runtime; try_lock is safe here
        // because the store is only held across non-await sections.
        self.store
            .try_lock()
            .expect("mock store busy while scripting failure")
            .failure = Some(kind);
    }

    /// Back to normal operation.
    pub fn clear_failure(&self) {
        self.store
            .try_lock()
            .expect("mock store busy while clearing failure")
            .failure = None;
    }

    /// Total gateway calls observed, failures included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Count the call, sleep out the simulated latency, honor a scripted
    /// failure.
    async fn gate(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failure = self.store.lock().await.failure;
        match failure {
            Some(FailureKind::Transport) => {
                Err(DomainError::Transport("connection refused (mock)".into()))
            }
            Some(FailureKind::NotFoundRemote) => {
                Err(DomainError::NotFoundRemote("no such task (mock)".into()))
            }
            Some(FailureKind::Server) => {
                Err(DomainError::Server("500 Internal Server Error (mock)".into()))
            }
            None => Ok(()),
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Server-style ISO-8601 timestamp (what the remote would assign).
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[async_trait::async_trait]
impl TaskGateway for MockGateway {
    async fn list_tasks(&self) -> Result<Vec<Task>, DomainError> {
        self.gate().await?;
        Ok(self.store.lock().await.tasks.clone())
    }

    async fn get_task(&self, id: &str) -> Result<Task, DomainError> {
        self.gate().await?;
        self.store
            .lock()
            .await
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFoundRemote(format!("no task with id {id} (mock)")))
    }

    async fn create_task(&self, payload: &TaskCreate) -> Result<Task, DomainError> {
        self.gate().await?;
        let mut store = self.store.lock().await;
        let now = now_iso();
        let task = Task {
            id: store.next_id.to_string(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            completed: false,
            priority: payload.priority,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        store.next_id += 1;
        store.tasks.push(task.clone());
        info!(id = %task.id, "[MOCK] task created");
        Ok(task)
    }

    async fn update_task(&self, id: &str, payload: &TaskUpdate) -> Result<Task, DomainError> {
        self.gate().await?;
        let mut store = self.store.lock().await;
        let task = store
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DomainError::NotFoundRemote(format!("no task with id {id} (mock)")))?;
        if let Some(title) = &payload.title {
            task.title = title.clone();
        }
        if let Some(description) = &payload.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = payload.priority {
            task.priority = Some(priority);
        }
        if let Some(completed) = payload.completed {
            task.completed = completed;
        }
        task.updated_at = Some(now_iso());
        Ok(task.clone())
    }

    async fn complete_task(&self, id: &str) -> Result<Task, DomainError> {
        self.gate().await?;
        let mut store = self.store.lock().await;
        let task = store
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DomainError::NotFoundRemote(format!("no task with id {id} (mock)")))?;
        task.completed = true;
        task.updated_at = Some(now_iso());
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<(), DomainError> {
        self.gate().await?;
        let mut store = self.store.lock().await;
        let before = store.tasks.len();
        store.tasks.retain(|t| t.id != id);
        if store.tasks.len() == before {
            return Err(DomainError::NotFoundRemote(format!(
                "no task with id {id} (mock)"
            )));
        }
        Ok(())
    }
}
