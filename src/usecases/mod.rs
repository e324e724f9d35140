//! Application use cases. Orchestrate domain logic via ports.

pub mod task_list_service;

pub use task_list_service::{TaskListService, TaskListView};
