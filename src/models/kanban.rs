//! Dependency-aware kanban projection of a task list.
//!
//! Tasks are partitioned into four fixed columns by derived status. The
//! column split is purely a view; it never feeds back into execution order.

use crate::models::graph;
use crate::models::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// A single kanban column with its tasks in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanbanColumn {
    /// Column identity, one per derived status
    pub id: TaskStatus,
    /// Display title
    pub title: String,
    /// Display theme hint for renderers
    pub theme: String,
    /// Member tasks, statuses already derived
    pub tasks: Vec<Task>,
}

/// Partition tasks into the four kanban columns.
///
/// Statuses are derived first, so a task with an unmet dependency lands in
/// the blocked column regardless of its stored status. Column order is fixed;
/// task order within a column follows the input.
pub fn kanban_columns(tasks: &[Task]) -> Vec<KanbanColumn> {
    let derived = graph::derive_statuses(tasks);

    let column = |status: TaskStatus, title: &str, theme: &str| KanbanColumn {
        id: status,
        title: title.to_string(),
        theme: theme.to_string(),
        tasks: derived
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect(),
    };

    vec![
        column(TaskStatus::Ready, "Ready to Start", "green"),
        column(TaskStatus::Blocked, "Waiting for Dependencies", "yellow"),
        column(TaskStatus::InProgress, "In Progress", "blue"),
        column(TaskStatus::Completed, "Completed", "gray"),
    ]
}
