//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Rejected before reaching the gateway (e.g. empty title).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Id absent from the in-memory collection. Short-circuits without a
    /// network call, so stale UI state never produces a request.
    #[error("Task not found locally: {0}")]
    NotFoundLocal(String),

    /// Network unreachable or request failed in flight.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server reports the resource does not exist (404-class).
    #[error("Task not found on server: {0}")]
    NotFoundRemote(String),

    /// Server-side failure (5xx-class), with server detail when available.
    #[error("Server error: {0}")]
    Server(String),

    /// Any other non-success the gateway adapter cannot classify.
    #[error("Gateway error: {0}")]
    Gateway(String),
}
