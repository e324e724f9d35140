//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Renders the controller's filtered view, prompts for the next action, and
//! dispatches into TaskListService. Operation outcomes reach the user through
//! the toast printer, so gateway errors are not re-reported here.

use crate::domain::{DomainError, FilterState, Priority, StatusFilter, Task, TaskCreate, TaskUpdate};
use crate::ports::InputPort;
use crate::usecases::{TaskListService, TaskListView};
use async_trait::async_trait;
use indicatif::ProgressBar;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::validator::ValueRequiredValidator;
use inquire::{Confirm, InquireError, Select, Text};
use std::sync::Arc;
use std::time::Duration;

const MENU: &[&str] = &[
    "Reload from server",
    "Add task",
    "Complete task",
    "Edit task",
    "Delete task",
    "Filter view",
    "Quit",
];

const NO_PRIORITY: &str = "(none)";

/// Applies the global inquire prompt theme.
pub fn apply_theme() {
    let mut cfg = RenderConfig::default_colored();
    cfg.prompt_prefix = Styled::new("»").with_fg(Color::LightCyan);
    cfg.highlighted_option_prefix = Styled::new("▸").with_fg(Color::LightCyan);
    inquire::set_global_render_config(cfg);
}

/// CLI adapter. Inquire prompts over the task list controller.
pub struct CliInputPort {
    service: Arc<TaskListService>,
}

impl CliInputPort {
    pub fn new(service: Arc<TaskListService>) -> Self {
        Self { service }
    }

    async fn reload(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Loading tasks...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        // failure is surfaced as a toast; prior collection stays intact
        let _ = self.service.load_all().await;
        spinner.finish_and_clear();
    }

    async fn add_task(&self) {
        let title = match Text::new("Title:")
            .with_validator(ValueRequiredValidator::default())
            .prompt()
        {
            Ok(t) => t,
            Err(_) => return,
        };
        let description = Text::new("Description (optional):")
            .prompt()
            .ok()
            .filter(|s| !s.trim().is_empty());
        let Some(priority) = prompt_priority("Priority:") else {
            return;
        };
        let _ = self
            .service
            .create(TaskCreate {
                title,
                description,
                priority,
            })
            .await;
    }

    async fn complete_task(&self) {
        let Some(id) = self.pick_task("Complete which task?", true) else {
            return;
        };
        let _ = self.service.complete(&id).await;
    }

    async fn edit_task(&self) {
        let Some(id) = self.pick_task("Edit which task?", false) else {
            return;
        };
        let current = self
            .service
            .view()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned();
        let Some(current) = current else {
            return;
        };

        let title = match Text::new("Title:")
            .with_initial_value(&current.title)
            .with_validator(ValueRequiredValidator::default())
            .prompt()
        {
            Ok(t) => t,
            Err(_) => return,
        };
        let description = Text::new("Description (optional):")
            .with_initial_value(current.description.as_deref().unwrap_or(""))
            .prompt()
            .ok()
            .filter(|s| !s.trim().is_empty());
        let Some(priority) = prompt_priority("Priority:") else {
            return;
        };
        let _ = self
            .service
            .update(
                &id,
                TaskUpdate {
                    title: Some(title),
                    description,
                    priority,
                    completed: None,
                },
            )
            .await;
    }

    async fn delete_task(&self) {
        let Some(id) = self.pick_task("Delete which task?", false) else {
            return;
        };
        let confirmed = Confirm::new("Delete permanently?")
            .with_default(false)
            .prompt()
            .unwrap_or(false);
        if confirmed {
            let _ = self.service.delete(&id).await;
        }
    }

    async fn filter_view(&self) {
        let status = match Select::new("Status:", vec!["All", "Active", "Completed"]).prompt() {
            Ok("Active") => StatusFilter::Active,
            Ok("Completed") => StatusFilter::Completed,
            Ok(_) => StatusFilter::All,
            Err(_) => return,
        };
        let Some(priority) = prompt_priority("Priority filter:") else {
            return;
        };
        self.service
            .apply_filter(FilterState { status, priority })
            .await;
    }

    /// Let the user pick a task from the full collection (optionally only the
    /// uncompleted ones). Returns the picked id, or None on cancel/empty.
    fn pick_task(&self, prompt: &str, only_active: bool) -> Option<String> {
        let view = self.service.view();
        let candidates: Vec<&Task> = view
            .tasks
            .iter()
            .filter(|t| !only_active || !t.completed)
            .collect();
        if candidates.is_empty() {
            println!("  (nothing to pick)");
            return None;
        }
        let options: Vec<String> = candidates.iter().map(|t| format_option(t)).collect();
        let selected = Select::new(prompt, options.clone()).prompt().ok()?;
        options
            .iter()
            .position(|o| *o == selected)
            .map(|i| candidates[i].id.clone())
    }
}

#[async_trait]
impl InputPort for CliInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            render_list(&self.service.view());
            let choice = match Select::new("Action:", MENU.to_vec()).prompt() {
                Ok(c) => c,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(DomainError::Validation(e.to_string())),
            };
            match choice {
                "Reload from server" => self.reload().await,
                "Add task" => self.add_task().await,
                "Complete task" => self.complete_task().await,
                "Edit task" => self.edit_task().await,
                "Delete task" => self.delete_task().await,
                "Filter view" => self.filter_view().await,
                _ => return Ok(()),
            }
        }
    }
}

fn format_option(task: &Task) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let priority = task
        .priority
        .map(|p| format!(" !{p}"))
        .unwrap_or_default();
    format!("{mark} {}{priority}  #{}", task.title, task.id)
}

fn render_list(view: &TaskListView) {
    println!();
    println!(
        "  Tasks: {} of {} shown{}",
        view.filtered.len(),
        view.tasks.len(),
        if view.loading { "  (loading…)" } else { "" }
    );
    for task in &view.filtered {
        println!("  {}", format_option(task));
        if let Some(description) = &task.description {
            println!("        {description}");
        }
    }
    if view.filtered.is_empty() {
        println!("  (no tasks match the current view)");
    }
    println!();
}

/// Priority picker. Outer None = prompt canceled; inner None = "(none)".
fn prompt_priority(prompt: &str) -> Option<Option<Priority>> {
    let mut options = vec![NO_PRIORITY.to_string()];
    options.extend(Priority::ALL.iter().map(|p| p.to_string()));
    let selected = Select::new(prompt, options).prompt().ok()?;
    Some(
        Priority::ALL
            .iter()
            .copied()
            .find(|p| p.to_string() == selected),
    )
}
