//! Command implementations for the taskweave CLI.
//!
//! Each command returns an [`Output`] carrying both a JSON value (the
//! default rendering) and a human-readable string (`-H`). Commands open the
//! file store under the resolved data directory and wire the template
//! generator plus scripted execution backend into a [`Workspace`].

use crate::config::Config;
use crate::executor::ScriptedBackend;
use crate::generator::templates::TemplateGenerator;
use crate::mindmap::sequencer::ExecutionSequencer;
use crate::mindmap::{build_mind_map, MindMapView, Size};
use crate::models::kanban::kanban_columns;
use crate::models::{graph, Task};
use crate::storage::{FileStore, TaskStore};
use crate::workspace::Workspace;
use crate::Result;
use serde_json::json;
use std::path::Path;

/// A command result in both renderings.
#[derive(Debug)]
pub struct Output {
    pub json: serde_json::Value,
    pub human: String,
}

impl Output {
    pub fn new(json: serde_json::Value, human: impl Into<String>) -> Self {
        Self {
            json,
            human: human.into(),
        }
    }

    /// Render for the requested output mode.
    pub fn render(&self, human: bool) -> String {
        if human {
            self.human.clone()
        } else {
            self.json.to_string()
        }
    }
}

fn open_workspace(data_dir: &Path, config: &Config) -> Result<Workspace> {
    let store = FileStore::open(data_dir)?;
    Ok(Workspace::new(
        Box::new(store),
        Box::new(TemplateGenerator),
        Box::new(ScriptedBackend::new()),
        config.fallback_estimate.clone(),
    ))
}

/// Project display name, falling back to a placeholder.
fn project_name(store: &dyn TaskStore, project_id: &str) -> String {
    store
        .load_projects()
        .ok()
        .and_then(|projects| projects.into_iter().find(|p| p.id == project_id))
        .map(|p| p.name)
        .unwrap_or_else(|| "Untitled Project".to_string())
}

fn task_line(task: &Task) -> String {
    format!(
        "{} [{}] {} ({}, {})",
        task.id, task.status, task.title, task.priority, task.estimated_time
    )
}

fn task_list_human(header: &str, tasks: &[Task]) -> String {
    let mut out = String::from(header);
    for task in tasks {
        out.push('\n');
        out.push_str("  ");
        out.push_str(&task_line(task));
    }
    out
}

/// Initialize storage under the data directory.
pub fn init(data_dir: &Path) -> Result<Output> {
    let already = FileStore::exists(data_dir);
    FileStore::init(data_dir)?;
    Ok(Output::new(
        json!({"initialized": !already, "path": data_dir.display().to_string()}),
        if already {
            format!("Already initialized at {}", data_dir.display())
        } else {
            format!("Initialized taskweave at {}", data_dir.display())
        },
    ))
}

/// Create a project.
pub fn project_create(data_dir: &Path, name: &str) -> Result<Output> {
    let mut store = FileStore::open(data_dir)?;
    let project = store.create_project(name)?;
    Ok(Output::new(
        serde_json::to_value(&project)?,
        format!("Created project {} \"{}\"", project.id, project.name),
    ))
}

/// List all projects.
pub fn project_list(data_dir: &Path) -> Result<Output> {
    let store = FileStore::open(data_dir)?;
    let projects = store.load_projects()?;
    let mut human = format!("{} project(s)", projects.len());
    for project in &projects {
        human.push_str(&format!(
            "\n  {} [{}] {}",
            project.id, project.status, project.name
        ));
    }
    Ok(Output::new(json!({"projects": projects}), human))
}

/// Generate tasks for a project from free-text input.
pub fn generate(data_dir: &Path, config: &Config, project_id: &str, input: &str) -> Result<Output> {
    let mut ws = open_workspace(data_dir, config)?;
    let report = ws.generate_tasks(project_id, input)?;

    let mut human = format!(
        "Generated {} task(s) for project {}",
        report.tasks.len(),
        project_id
    );
    if report.used_fallback {
        human.push_str(" (template fallback)");
    }
    if !report.persisted {
        human.push_str("\nWARNING: save failed, tasks were not persisted");
    }
    human = task_list_human(&human, &report.tasks);

    Ok(Output::new(
        json!({
            "tasks": report.tasks,
            "project_name": report.project_name,
            "used_fallback": report.used_fallback,
            "persisted": report.persisted,
        }),
        human,
    ))
}

/// List a project's tasks with derived statuses.
pub fn task_list(data_dir: &Path, project_id: &str) -> Result<Output> {
    let store = FileStore::open(data_dir)?;
    let tasks = graph::derive_statuses(&store.load_tasks(project_id)?);
    Ok(Output::new(
        json!({"tasks": tasks}),
        task_list_human(&format!("{} task(s)", tasks.len()), &tasks),
    ))
}

/// Dispatch a task to the execution backend.
pub fn task_execute(
    data_dir: &Path,
    config: &Config,
    project_id: &str,
    task_id: &str,
) -> Result<Output> {
    let mut ws = open_workspace(data_dir, config)?;
    let task = ws.execute_task(project_id, task_id)?;
    Ok(Output::new(
        serde_json::to_value(&task)?,
        format!("Task {} is now {}", task.id, task.status),
    ))
}

/// Tasks ready to work on.
pub fn ready(data_dir: &Path, project_id: &str) -> Result<Output> {
    let store = FileStore::open(data_dir)?;
    let tasks = store.load_tasks(project_id)?;
    let ready: Vec<Task> = graph::ready_tasks(&tasks).into_iter().cloned().collect();
    Ok(Output::new(
        json!({"tasks": ready}),
        task_list_human(&format!("{} ready task(s)", ready.len()), &ready),
    ))
}

/// Tasks waiting on dependencies.
pub fn blocked(data_dir: &Path, project_id: &str) -> Result<Output> {
    let store = FileStore::open(data_dir)?;
    let tasks = store.load_tasks(project_id)?;
    let blocked: Vec<Task> = graph::blocked_tasks(&tasks).into_iter().cloned().collect();
    Ok(Output::new(
        json!({"tasks": blocked}),
        task_list_human(&format!("{} blocked task(s)", blocked.len()), &blocked),
    ))
}

/// Dependency-aware kanban board.
pub fn board(data_dir: &Path, project_id: &str) -> Result<Output> {
    let store = FileStore::open(data_dir)?;
    let tasks = store.load_tasks(project_id)?;
    let columns = kanban_columns(&tasks);

    let mut human = String::new();
    for column in &columns {
        if !human.is_empty() {
            human.push('\n');
        }
        human.push_str(&format!("== {} ({}) ==", column.title, column.tasks.len()));
        for task in &column.tasks {
            human.push_str(&format!("\n  {}", task_line(task)));
        }
    }

    Ok(Output::new(json!({"columns": columns}), human))
}

/// Positioned mind-map snapshot.
pub fn map(
    data_dir: &Path,
    config: &Config,
    project_id: &str,
    width: f64,
    height: f64,
) -> Result<Output> {
    let ws = open_workspace(data_dir, config)?;
    let name = project_name(ws.store(), project_id);
    let (data, canvas) = ws.mind_map(project_id, &name, Size::new(width, height), &config.layout)?;

    let branches = data.branch_ids();
    let mut human = format!(
        "{}: {} card(s), {} branch(es) on a {:.0}x{:.0} canvas",
        data.project_name,
        data.cards.len(),
        branches.len(),
        canvas.width,
        canvas.height
    );
    for branch_id in &branches {
        if let Some(branch) = data.card(branch_id) {
            human.push_str(&format!(
                "\n  {} \"{}\" with {} task(s) at ({:.0}, {:.0})",
                branch.id,
                branch.title,
                branch.children.len(),
                branch.position.x,
                branch.position.y
            ));
        }
    }

    Ok(Output::new(
        json!({"mindmap": data, "canvas": canvas}),
        human,
    ))
}

/// Plan the execution animation toward the first ready task.
pub fn sequence(data_dir: &Path, config: &Config, project_id: &str) -> Result<Output> {
    let store = FileStore::open(data_dir)?;
    let tasks = store.load_tasks(project_id)?;
    let name = project_name(&store, project_id);

    let mut view = MindMapView::new(build_mind_map(&tasks, &name));
    let mut sequencer = ExecutionSequencer::new(config.sequencer);

    let not_started = || {
        Output::new(
            json!({"started": false, "reason": "no ready task"}),
            "No ready task; the sequence does not start.".to_string(),
        )
    };

    if !sequencer.start(&mut view, &tasks) {
        return Ok(not_started());
    }
    let Some(path) = sequencer.path().cloned() else {
        return Ok(not_started());
    };
    let steps: Vec<serde_json::Value> = sequencer
        .pending()
        .iter()
        .map(|s| json!({"at_ms": s.at_ms, "action": s.action.to_string()}))
        .collect();

    let mut human = format!(
        "Execution path: {} -> {} -> {}",
        view.data.root_id, path.branch_id, path.task_id
    );
    for step in sequencer.pending() {
        human.push_str(&format!("\n  t+{}ms {}", step.at_ms, step.action));
    }

    Ok(Output::new(
        json!({
            "started": true,
            "target_task": path.task_id,
            "branch": path.branch_id,
            "root_edge": path.root_edge,
            "task_edge": path.task_edge,
            "steps": steps,
        }),
        human,
    ))
}

/// Dependency health check.
pub fn doctor(data_dir: &Path, project_id: &str) -> Result<Output> {
    let store = FileStore::open(data_dir)?;
    let tasks = store.load_tasks(project_id)?;

    let dangling = graph::dangling_dependencies(&tasks);
    let cycle = graph::find_cycle(&tasks);
    let ok = dangling.is_empty() && cycle.is_none();

    let mut human = if ok {
        "Dependency graph is healthy.".to_string()
    } else {
        "Dependency graph has issues:".to_string()
    };
    for (task_id, missing) in &dangling {
        human.push_str(&format!("\n  {} depends on missing {}", task_id, missing));
    }
    if let Some(members) = &cycle {
        human.push_str(&format!("\n  cycle: {}", members.join(" -> ")));
    }

    let dangling_json: Vec<serde_json::Value> = dangling
        .iter()
        .map(|(task_id, missing)| json!({"task": task_id, "missing": missing}))
        .collect();

    Ok(Output::new(
        json!({"ok": ok, "dangling": dangling_json, "cycle": cycle}),
        human,
    ))
}
