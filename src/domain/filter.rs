//! Status + priority filtering over the task collection.
//!
//! Pure and order-preserving. The controller recomputes its filtered view
//! through here after every state change; the UI never filters on its own.

use super::entities::{FilterState, StatusFilter, Task};

/// Returns the subset of `tasks` matching `filter`, preserving input order.
///
/// A task without a priority never matches a non-empty priority filter.
pub fn filter_tasks(tasks: &[Task], filter: &FilterState) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| matches_status(t, filter.status))
        .filter(|t| filter.priority.is_none_or(|p| t.priority == Some(p)))
        .cloned()
        .collect()
}

fn matches_status(task: &Task, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => !task.completed,
        StatusFilter::Completed => task.completed,
    }
}
