//! Execution dispatch seam.
//!
//! Dispatching a task to the code-editor automation layer is OS glue that
//! lives outside this crate; the core only hands a task over and reads back
//! a status hint. [`ScriptedBackend`] provides canned outcomes for tests and
//! offline demos.

use crate::models::Task;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Status hint reported back by the automation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Completed,
    InProgress,
    Failed,
}

/// Result of one execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: DispatchStatus,
    /// Path of a generated file, when the backend produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ExecutionOutcome {
    pub fn completed(file_path: Option<String>) -> Self {
        Self {
            status: DispatchStatus::Completed,
            file_path,
        }
    }

    pub fn in_progress() -> Self {
        Self {
            status: DispatchStatus::InProgress,
            file_path: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: DispatchStatus::Failed,
            file_path: None,
        }
    }
}

/// Trait for execution automation backends.
pub trait ExecutionBackend: Send + Sync {
    /// Ask the automation layer to work on a task.
    fn request_execution(&mut self, task: &Task) -> Result<ExecutionOutcome>;
}

/// Backend returning queued canned outcomes, then `Completed`.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    outcomes: VecDeque<ExecutionOutcome>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next outcome to report.
    pub fn push(&mut self, outcome: ExecutionOutcome) {
        self.outcomes.push_back(outcome);
    }
}

impl ExecutionBackend for ScriptedBackend {
    fn request_execution(&mut self, _task: &Task) -> Result<ExecutionOutcome> {
        Ok(self
            .outcomes
            .pop_front()
            .unwrap_or_else(|| ExecutionOutcome::completed(None)))
    }
}
