//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod filter;

pub use entities::{
    FilterState, Notification, Priority, Severity, StatusFilter, Task, TaskCreate, TaskUpdate,
};
pub use errors::DomainError;
pub use filter::filter_tasks;
