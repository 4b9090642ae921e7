//! Application service gluing the seams together.
//!
//! A [`Workspace`] owns the injected store, generator, and execution
//! backend, and implements the two flows the surrounding application
//! triggers:
//!
//! - **generate**: free text -> generator payload -> validation boundary ->
//!   normalizer (template fallback on unusable payloads) -> persist ->
//!   reconcile by id. Persistence failure degrades to the in-memory list so
//!   the caller still reflects the user's intent.
//! - **execute**: mark in progress, dispatch to the automation backend,
//!   apply the outcome; dispatch failure reverts the task to ready.

use crate::executor::{DispatchStatus, ExecutionBackend};
use crate::generator::{normalize, parse_payload, templates, Parsed, RawTaskStub, TaskGenerator};
use crate::mindmap::layout::{position_cards, LayoutConfig};
use crate::mindmap::{build_mind_map, MindMapData, Size};
use crate::models::{graph, Task, TaskStatus};
use crate::storage::{reconcile_by_id, TaskStore};
use crate::{Error, Result};
use std::collections::HashSet;

/// Outcome of a generate flow.
#[derive(Debug)]
pub struct GenerateReport {
    /// The project's full task list after the flow
    pub tasks: Vec<Task>,
    /// Project name supplied by the generator, if any
    pub project_name: Option<String>,
    /// True when the template catalog replaced the generator's output
    pub used_fallback: bool,
    /// False when persistence failed and the list is in-memory only
    pub persisted: bool,
}

/// The application service over injected seams.
pub struct Workspace {
    store: Box<dyn TaskStore>,
    generator: Box<dyn TaskGenerator>,
    executor: Box<dyn ExecutionBackend>,
    fallback_estimate: String,
}

impl Workspace {
    pub fn new(
        store: Box<dyn TaskStore>,
        generator: Box<dyn TaskGenerator>,
        executor: Box<dyn ExecutionBackend>,
        fallback_estimate: impl Into<String>,
    ) -> Self {
        Self {
            store,
            generator,
            executor,
            fallback_estimate: fallback_estimate.into(),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    /// Access the underlying store, mutably.
    pub fn store_mut(&mut self) -> &mut dyn TaskStore {
        self.store.as_mut()
    }

    /// A project's tasks with statuses derived.
    pub fn tasks_with_status(&self, project_id: &str) -> Result<Vec<Task>> {
        Ok(graph::derive_statuses(&self.store.load_tasks(project_id)?))
    }

    /// A positioned mind-map snapshot for a project, plus the effective
    /// canvas size after adaptive growth.
    pub fn mind_map(
        &self,
        project_id: &str,
        project_name: &str,
        canvas: Size,
        layout: &LayoutConfig,
    ) -> Result<(MindMapData, Size)> {
        let tasks = self.store.load_tasks(project_id)?;
        let mut data = build_mind_map(&tasks, project_name);
        let effective = position_cards(&mut data, canvas, layout);
        Ok((data, effective))
    }

    /// Generate tasks for a project from free-text input.
    ///
    /// The input must be at least 3 characters. An unusable generator
    /// payload (error, non-list, empty) falls back to the template catalog
    /// and is only logged. A failed save returns the in-memory list with
    /// `persisted: false`; the caller owns the retry affordance.
    pub fn generate_tasks(&mut self, project_id: &str, input: &str) -> Result<GenerateReport> {
        if input.trim().len() < 3 {
            return Err(Error::InvalidInput(
                "input must be at least 3 characters long".to_string(),
            ));
        }

        let existing = self.store.load_tasks(project_id)?;
        let existing_ids: HashSet<String> = existing.iter().map(|t| t.id.clone()).collect();

        let (stubs, project_name, used_fallback) = self.generate_stubs(input);

        let normalized = normalize::normalize(
            &stubs,
            &normalize::NormalizeContext {
                project_id,
                fallback_estimate: &self.fallback_estimate,
                existing_ids: &existing_ids,
            },
        );

        let mut all: Vec<Task> = existing;
        all.extend(normalized);
        let all = graph::derive_statuses(&all);

        let (tasks, persisted) = match self.store.save_tasks(&all) {
            Ok(saved) => (reconcile_by_id(&all, &saved), true),
            Err(err) => {
                tracing::warn!(error = %err, "save failed, returning in-memory task list");
                (all, false)
            }
        };

        if let Some(name) = &project_name {
            self.rename_project(project_id, name);
        }

        Ok(GenerateReport {
            tasks,
            project_name,
            used_fallback,
            persisted,
        })
    }

    /// Run the generator and validation boundary, falling back to the
    /// template catalog on any unusable payload.
    fn generate_stubs(&mut self, input: &str) -> (Vec<RawTaskStub>, Option<String>, bool) {
        match self.generator.generate(input) {
            Ok(payload) => match parse_payload(&payload) {
                Parsed::Valid {
                    project_name,
                    stubs,
                } => (stubs, project_name, false),
                Parsed::Invalid { reason } => {
                    tracing::warn!(
                        generator = self.generator.name(),
                        reason = %reason,
                        "generator payload invalid, using template catalog"
                    );
                    (templates::template_stubs(input), None, true)
                }
            },
            Err(err) => {
                tracing::warn!(
                    generator = self.generator.name(),
                    error = %err,
                    "generator failed, using template catalog"
                );
                (templates::template_stubs(input), None, true)
            }
        }
    }

    fn rename_project(&mut self, project_id: &str, name: &str) {
        let project = match self.store.load_projects() {
            Ok(projects) => projects.into_iter().find(|p| p.id == project_id),
            Err(err) => {
                tracing::warn!(error = %err, "could not load projects for rename");
                return;
            }
        };
        let Some(mut project) = project else {
            return;
        };
        project.name = name.to_string();
        if let Err(err) = self.store.update_project(&project) {
            tracing::warn!(error = %err, "could not apply generated project name");
        }
    }

    /// Dispatch a task to the execution backend and apply the outcome.
    ///
    /// The task goes in-progress before dispatch. A backend error or
    /// `Failed` outcome reverts it to ready with progress cleared rather
    /// than leaving it stuck in progress.
    pub fn execute_task(&mut self, project_id: &str, task_id: &str) -> Result<Task> {
        let tasks = self.store.load_tasks(project_id)?;
        let mut task = tasks
            .into_iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;

        task.status = TaskStatus::InProgress;
        task.progress = Some(0);
        self.persist_task(&task);

        match self.executor.request_execution(&task) {
            Ok(outcome) => match outcome.status {
                DispatchStatus::Completed => {
                    task.status = TaskStatus::Completed;
                    task.progress = Some(100);
                }
                DispatchStatus::InProgress => {
                    // Leave in progress; the backend reports completion later.
                }
                DispatchStatus::Failed => {
                    tracing::warn!(task = %task.id, "execution failed, reverting to ready");
                    task.status = TaskStatus::Ready;
                    task.progress = None;
                }
            },
            Err(err) => {
                tracing::warn!(task = %task.id, error = %err, "execution dispatch unreachable, reverting to ready");
                task.status = TaskStatus::Ready;
                task.progress = None;
            }
        }

        self.persist_task(&task);
        Ok(task)
    }

    fn persist_task(&mut self, task: &Task) {
        if let Err(err) = self.store.save_tasks(std::slice::from_ref(task)) {
            tracing::warn!(task = %task.id, error = %err, "could not persist task update");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ExecutionOutcome, ScriptedBackend};
    use crate::generator::templates::TemplateGenerator;
    use crate::storage::MemoryStore;
    use serde_json::json;

    /// Generator that always errors.
    struct BrokenGenerator;

    impl TaskGenerator for BrokenGenerator {
        fn generate(&mut self, _input: &str) -> Result<serde_json::Value> {
            Err(Error::Generator("connection refused".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    /// Generator that returns a fixed payload.
    struct CannedGenerator(serde_json::Value);

    impl TaskGenerator for CannedGenerator {
        fn generate(&mut self, _input: &str) -> Result<serde_json::Value> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn workspace_with(
        store: MemoryStore,
        generator: Box<dyn TaskGenerator>,
        executor: ScriptedBackend,
    ) -> Workspace {
        Workspace::new(Box::new(store), generator, Box::new(executor), "1 hour")
    }

    #[test]
    fn test_generate_persists_and_derives() {
        let mut ws = workspace_with(
            MemoryStore::new(),
            Box::new(TemplateGenerator),
            ScriptedBackend::new(),
        );
        let report = ws.generate_tasks("p1", "build an api backend").unwrap();

        assert!(report.persisted);
        assert!(!report.used_fallback);
        assert_eq!(report.tasks.len(), 4);
        // Chain head is ready, the rest blocked behind it.
        assert_eq!(report.tasks[0].status, TaskStatus::Ready);
        assert!(report.tasks[1..]
            .iter()
            .all(|t| t.status == TaskStatus::Blocked));

        // The store saw the same rows.
        let stored = ws.tasks_with_status("p1").unwrap();
        assert_eq!(stored.len(), 4);
    }

    #[test]
    fn test_generate_rejects_tiny_input() {
        let mut ws = workspace_with(
            MemoryStore::new(),
            Box::new(TemplateGenerator),
            ScriptedBackend::new(),
        );
        assert!(matches!(
            ws.generate_tasks("p1", "hi"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generate_falls_back_on_generator_error() {
        let mut ws = workspace_with(
            MemoryStore::new(),
            Box::new(BrokenGenerator),
            ScriptedBackend::new(),
        );
        let report = ws.generate_tasks("p1", "some login feature").unwrap();
        assert!(report.used_fallback);
        // Auth template has five tasks.
        assert_eq!(report.tasks.len(), 5);
    }

    #[test]
    fn test_generate_falls_back_on_invalid_payload() {
        let mut ws = workspace_with(
            MemoryStore::new(),
            Box::new(CannedGenerator(json!({"tasks": []}))),
            ScriptedBackend::new(),
        );
        let report = ws.generate_tasks("p1", "plan my garden").unwrap();
        assert!(report.used_fallback);
        assert_eq!(report.tasks.len(), 4);
    }

    #[test]
    fn test_generate_save_failure_returns_in_memory() {
        let mut store = MemoryStore::new();
        store.fail_saves = true;
        let mut ws = workspace_with(store, Box::new(TemplateGenerator), ScriptedBackend::new());

        let report = ws.generate_tasks("p1", "frontend design pass").unwrap();
        assert!(!report.persisted);
        assert_eq!(report.tasks.len(), 4);
    }

    #[test]
    fn test_generate_applies_project_name() {
        let mut store = MemoryStore::new();
        let project = store.create_project("Untitled").unwrap();
        let payload = json!({
            "projectName": "Garden Planner",
            "tasks": [{"title": "Sketch beds", "dependencies": []}]
        });
        let mut ws = workspace_with(store, Box::new(CannedGenerator(payload)), ScriptedBackend::new());

        let report = ws.generate_tasks(&project.id, "plan my garden").unwrap();
        assert_eq!(report.project_name.as_deref(), Some("Garden Planner"));

        let projects = ws.store().load_projects().unwrap();
        assert_eq!(projects[0].name, "Garden Planner");
    }

    #[test]
    fn test_generate_appends_to_existing_tasks() {
        let existing = Task::new("tw-aaaa".into(), "Old task".into(), "p1".into());
        let store = MemoryStore::with_tasks(vec![existing]);
        let mut ws = workspace_with(store, Box::new(TemplateGenerator), ScriptedBackend::new());

        let report = ws.generate_tasks("p1", "api work").unwrap();
        assert_eq!(report.tasks.len(), 5);
        assert_eq!(report.tasks[0].id, "tw-aaaa");
    }

    #[test]
    fn test_execute_completed_outcome() {
        let task = Task::new("tw-aaaa".into(), "A".into(), "p1".into());
        let store = MemoryStore::with_tasks(vec![task]);
        let mut backend = ScriptedBackend::new();
        backend.push(ExecutionOutcome::completed(Some("src/a.rs".into())));
        let mut ws = workspace_with(store, Box::new(TemplateGenerator), backend);

        let updated = ws.execute_task("p1", "tw-aaaa").unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.progress, Some(100));

        let stored = ws.store().load_tasks("p1").unwrap();
        assert_eq!(stored[0].status, TaskStatus::Completed);
    }

    #[test]
    fn test_execute_failure_reverts_to_ready() {
        let task = Task::new("tw-aaaa".into(), "A".into(), "p1".into());
        let store = MemoryStore::with_tasks(vec![task]);
        let mut backend = ScriptedBackend::new();
        backend.push(ExecutionOutcome::failed());
        let mut ws = workspace_with(store, Box::new(TemplateGenerator), backend);

        let updated = ws.execute_task("p1", "tw-aaaa").unwrap();
        assert_eq!(updated.status, TaskStatus::Ready);
        assert_eq!(updated.progress, None);
    }

    #[test]
    fn test_execute_in_progress_outcome() {
        let task = Task::new("tw-aaaa".into(), "A".into(), "p1".into());
        let store = MemoryStore::with_tasks(vec![task]);
        let mut backend = ScriptedBackend::new();
        backend.push(ExecutionOutcome::in_progress());
        let mut ws = workspace_with(store, Box::new(TemplateGenerator), backend);

        let updated = ws.execute_task("p1", "tw-aaaa").unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.progress, Some(0));
    }

    #[test]
    fn test_execute_unknown_task() {
        let mut ws = workspace_with(
            MemoryStore::new(),
            Box::new(TemplateGenerator),
            ScriptedBackend::new(),
        );
        assert!(matches!(
            ws.execute_task("p1", "tw-none"),
            Err(Error::NotFound(_))
        ));
    }
}
