//! Data models for taskweave entities.
//!
//! This module defines the core data structures:
//! - `Task` - Work items with status, priority, dependencies, and estimate
//! - `Project` - Owner of a task set, with lifecycle status
//! - `graph` - Derived readiness status over the dependency DAG
//! - `kanban` - Dependency-aware column projection of a task list

pub mod graph;
pub mod kanban;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task status in the workflow.
///
/// `Ready` and `Blocked` are derived from dependency satisfaction;
/// `InProgress` and `Completed` are authoritative once set by execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Ready,
    Blocked,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Returns true if this status is authoritative (not recomputed from
    /// dependency satisfaction).
    pub fn is_authoritative(&self) -> bool {
        matches!(self, TaskStatus::InProgress | TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Ready => "ready",
            TaskStatus::Blocked => "blocked",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ready" => Ok(TaskStatus::Ready),
            "blocked" => Ok(TaskStatus::Blocked),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Parse a priority from untrusted text, tolerating case.
    ///
    /// Returns `None` for anything that is not exactly low/medium/high;
    /// callers supply the default.
    pub fn parse_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// A unit of work owned by a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (e.g., "tw-a1b2")
    pub id: String,

    /// Task title
    pub title: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Current status (ready/blocked are derived, see `models::graph`)
    #[serde(default)]
    pub status: TaskStatus,

    /// Priority level
    #[serde(default)]
    pub priority: TaskPriority,

    /// Task IDs this task depends on; each must complete before this starts
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Free-text duration label (e.g., "2 hours"); not machine-parsed
    #[serde(default)]
    pub estimated_time: String,

    /// Completion percentage (0-100), meaningful only while in progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    /// Owning project ID
    pub project_id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new ready task with the given ID, title, and project.
    pub fn new(id: String, title: String, project_id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            dependencies: Vec::new(),
            estimated_time: String::new(),
            progress: None,
            project_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        };
        write!(f, "{}", s)
    }
}

/// A project owning a set of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: String,

    /// Project name (possibly generator-assigned)
    pub name: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Technology tags (e.g., "rust", "postgres")
    #[serde(default)]
    pub tech_stack: Vec<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: ProjectStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new active project with the given ID and name.
    pub fn new(id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: String::new(),
            tech_stack: Vec::new(),
            status: ProjectStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
