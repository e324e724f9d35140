//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, Task, TaskCreate, TaskUpdate};

/// Remote task gateway. CRUD against the persistence service.
///
/// Every call settles exactly once: the returned future resolves to a single
/// success or a single `DomainError`, never both. Timeout and retry policy
/// belong to the implementing adapter; callers treat any failure uniformly.
#[async_trait::async_trait]
pub trait TaskGateway: Send + Sync {
    /// Fetch the full task collection.
    async fn list_tasks(&self) -> Result<Vec<Task>, DomainError>;

    /// Fetch a single task by id.
    async fn get_task(&self, id: &str) -> Result<Task, DomainError>;

    /// Create a task. Returns the authoritative record with server-assigned
    /// id and timestamps.
    async fn create_task(&self, payload: &TaskCreate) -> Result<Task, DomainError>;

    /// Partially update a task. Returns the updated record.
    async fn update_task(&self, id: &str, payload: &TaskUpdate) -> Result<Task, DomainError>;

    /// Mark a task completed. Returns the updated record so the caller can
    /// adopt any server-side fields.
    async fn complete_task(&self, id: &str) -> Result<Task, DomainError>;

    /// Delete a task permanently.
    async fn delete_task(&self, id: &str) -> Result<(), DomainError>;
}
