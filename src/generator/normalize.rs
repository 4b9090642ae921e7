//! Task record normalizer.
//!
//! Repairs extracted [`RawTaskStub`]s into well-formed [`Task`] entities:
//! stable unique ids, coerced priority and estimate, and batch-relative
//! dependency indices resolved to ids. Out-of-range and self-referencing
//! indices are dropped (substituting a placeholder id would create a phantom
//! node that can never complete). Every repair is total - malformed stubs
//! produce a usable task, never an error.

use crate::generator::RawTaskStub;
use crate::models::{Task, TaskPriority, TaskStatus};
use crate::storage::generate_id;
use std::collections::HashSet;

/// Id prefix for generated tasks.
pub const TASK_ID_PREFIX: &str = "tw";

/// Inputs the normalizer needs beyond the stubs themselves.
#[derive(Debug)]
pub struct NormalizeContext<'a> {
    /// Owning project for every task in the batch
    pub project_id: &'a str,
    /// Estimate substituted when a stub carries none (e.g., "1 hour")
    pub fallback_estimate: &'a str,
    /// Ids already taken by the project's existing tasks
    pub existing_ids: &'a HashSet<String>,
}

/// Normalize a batch of stubs into tasks.
///
/// Ids are assigned first for the whole batch so dependency indices can
/// resolve forward references. Initial status is always `Ready`; the graph
/// derivation pass recomputes blocked states afterwards.
pub fn normalize(stubs: &[RawTaskStub], ctx: &NormalizeContext) -> Vec<Task> {
    let ids = assign_ids(stubs, ctx.existing_ids);

    stubs
        .iter()
        .enumerate()
        .map(|(position, stub)| {
            let title = match stub.title.as_deref() {
                Some(t) if !t.trim().is_empty() => t.to_string(),
                _ => "Untitled task".to_string(),
            };

            let priority = stub
                .priority
                .as_deref()
                .and_then(TaskPriority::parse_loose)
                .unwrap_or_default();

            let estimated_time = match stub.estimated_time.as_deref() {
                Some(e) if !e.trim().is_empty() => e.to_string(),
                _ => ctx.fallback_estimate.to_string(),
            };

            let mut task = Task::new(
                ids[position].clone(),
                title,
                ctx.project_id.to_string(),
            );
            task.description = stub.description.clone().unwrap_or_default();
            task.priority = priority;
            task.estimated_time = estimated_time;
            task.status = TaskStatus::Ready;
            task.dependencies = resolve_dependencies(stub, position, &ids);
            task
        })
        .collect()
}

/// Assign a unique id to every stub position.
///
/// A stub-provided id is kept when non-empty and not already taken by the
/// project or an earlier batch member; otherwise a fresh hash id is
/// generated, re-rolled until it collides with nothing.
fn assign_ids(stubs: &[RawTaskStub], existing_ids: &HashSet<String>) -> Vec<String> {
    let mut taken: HashSet<String> = existing_ids.clone();
    let mut ids = Vec::with_capacity(stubs.len());

    for (position, stub) in stubs.iter().enumerate() {
        let id = match stub.id.as_deref() {
            Some(given) if !given.trim().is_empty() && !taken.contains(given) => {
                given.to_string()
            }
            _ => {
                let seed_title = stub.title.as_deref().unwrap_or("untitled");
                let mut attempt = 0u32;
                loop {
                    let seed = format!("{}:{}:{}", seed_title, position, attempt);
                    let candidate = generate_id(TASK_ID_PREFIX, &seed);
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                    attempt += 1;
                }
            }
        };
        taken.insert(id.clone());
        ids.push(id);
    }

    ids
}

/// Resolve a stub's index dependencies against the batch id assignment.
///
/// Drops out-of-range indices, the stub's own position, and duplicates,
/// preserving first-occurrence order.
fn resolve_dependencies(stub: &RawTaskStub, position: usize, ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut deps = Vec::new();

    for &index in &stub.dependencies {
        if index >= ids.len() {
            tracing::debug!(index, position, "dropping out-of-range dependency index");
            continue;
        }
        if index == position {
            tracing::debug!(index, "dropping self-dependency");
            continue;
        }
        if seen.insert(index) {
            deps.push(ids[index].clone());
        }
    }

    deps
}
