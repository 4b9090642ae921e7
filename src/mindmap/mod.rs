//! Mind-map projection of a project's task graph.
//!
//! Tasks are projected into a three-level card tree (root project ->
//! category branches -> tasks) overlaid with dependency connections:
//! - `category` - keyword grouping of tasks into branches
//! - `layout` - deterministic radial positioning onto a canvas
//! - `visibility` - branch expand/collapse with cascade semantics
//! - `sequencer` - the staged execution animation state machine
//!
//! The card tree is presentational: hierarchy connections mirror the tree,
//! while dependency connections mirror `Task.dependencies` directly between
//! task cards and may cross branches.

pub mod category;
pub mod layout;
pub mod sequencer;
pub mod visibility;

use crate::models::graph;
use crate::models::{Task, TaskPriority, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Id of the single root card.
pub const ROOT_ID: &str = "root";

/// 2D position of a card center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Card dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Kind of mind-map card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Root,
    Branch,
    Task,
}

/// Kind of connection between two cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Mirrors the card tree (root->branch, branch->task)
    Hierarchy,
    /// Mirrors a task dependency edge; may cross branches
    Dependency,
}

/// A directed connection between two cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub kind: ConnectionKind,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: ConnectionKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    /// Connection id as keyed by the animation sets: `"{from}->{to}"`.
    pub fn id(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }
}

/// A mind-map card: the presentation projection of the project, a category
/// branch, or a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub kind: CardKind,
    pub title: String,
    pub description: String,
    pub position: Position,
    pub size: Size,
    /// Parent in the card tree; `None` only for the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Direct children in the card tree
    pub children: Vec<String>,
    /// Derived status (branch status is aggregated from children)
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Dependency ids, task cards only
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub visible: bool,
}

/// The positioned mind-map snapshot handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMapData {
    /// Cards in insertion order: root first, then each branch followed by
    /// its tasks
    pub cards: Vec<Card>,
    pub connections: Vec<Connection>,
    pub root_id: String,
    pub project_name: String,
}

impl MindMapData {
    /// Look up a card by id.
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Look up a card by id, mutably.
    pub fn card_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Ids of the root's branch cards, in insertion order.
    pub fn branch_ids(&self) -> Vec<String> {
        self.card(&self.root_id)
            .map(|root| root.children.clone())
            .unwrap_or_default()
    }
}

/// Per-branch completion statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchStats {
    pub task_count: usize,
    pub completed_tasks: usize,
}

/// Count a branch's tasks and how many are completed.
pub fn branch_stats(data: &MindMapData, branch_id: &str) -> BranchStats {
    let Some(branch) = data.card(branch_id) else {
        return BranchStats::default();
    };
    let tasks: Vec<&Card> = branch
        .children
        .iter()
        .filter_map(|id| data.card(id))
        .collect();
    BranchStats {
        task_count: tasks.len(),
        completed_tasks: tasks
            .iter()
            .filter(|c| c.status == TaskStatus::Completed)
            .count(),
    }
}

/// Aggregate a branch's status from its children's derived statuses.
///
/// Completed wins only when every child is completed; any in-progress child
/// marks the branch in progress; otherwise any blocked child marks it
/// blocked; else ready. An empty branch is ready.
fn branch_status(children: &[TaskStatus]) -> TaskStatus {
    if children.is_empty() {
        return TaskStatus::Ready;
    }
    if children.iter().all(|s| *s == TaskStatus::Completed) {
        return TaskStatus::Completed;
    }
    if children.iter().any(|s| *s == TaskStatus::InProgress) {
        return TaskStatus::InProgress;
    }
    if children.iter().any(|s| *s == TaskStatus::Blocked) {
        return TaskStatus::Blocked;
    }
    TaskStatus::Ready
}

/// Build the unpositioned mind-map card tree for a project's tasks.
///
/// Statuses are derived first, tasks are grouped into category branches,
/// and dependency connections are added for every dependency that resolves
/// to a task in the set. Branches start visible, tasks hidden.
pub fn build_mind_map(tasks: &[Task], project_name: &str) -> MindMapData {
    let derived = graph::derive_statuses(tasks);
    let groups = category::group_by_category(&derived);

    let mut cards: Vec<Card> = Vec::with_capacity(derived.len() + groups.len() + 1);
    let mut connections: Vec<Connection> = Vec::new();

    let mut root = Card {
        id: ROOT_ID.to_string(),
        kind: CardKind::Root,
        title: project_name.to_string(),
        description: format!("Main project with {} tasks organized into phases", derived.len()),
        position: Position::default(),
        size: Size::default(),
        parent_id: None,
        children: Vec::new(),
        status: TaskStatus::Ready,
        priority: None,
        estimated_time: None,
        progress: None,
        dependencies: Vec::new(),
        visible: true,
    };

    let mut branch_cards: Vec<Card> = Vec::new();
    let mut task_cards: Vec<Vec<Card>> = Vec::new();

    for (index, group) in groups.iter().enumerate() {
        let branch_id = format!("branch-{}", index);
        let statuses: Vec<TaskStatus> = group.tasks.iter().map(|t| t.status).collect();

        let mut branch = Card {
            id: branch_id.clone(),
            kind: CardKind::Branch,
            title: group.name.to_string(),
            description: format!("{} tasks in this phase", group.tasks.len()),
            position: Position::default(),
            size: Size::default(),
            parent_id: Some(ROOT_ID.to_string()),
            children: Vec::new(),
            status: branch_status(&statuses),
            priority: None,
            estimated_time: None,
            progress: None,
            dependencies: Vec::new(),
            visible: true,
        };

        root.children.push(branch_id.clone());
        connections.push(Connection::new(ROOT_ID, branch_id.clone(), ConnectionKind::Hierarchy));

        let mut members = Vec::with_capacity(group.tasks.len());
        for task in &group.tasks {
            branch.children.push(task.id.clone());
            connections.push(Connection::new(
                branch_id.clone(),
                task.id.clone(),
                ConnectionKind::Hierarchy,
            ));
            members.push(Card {
                id: task.id.clone(),
                kind: CardKind::Task,
                title: task.title.clone(),
                description: task.description.clone(),
                position: Position::default(),
                size: Size::default(),
                parent_id: Some(branch_id.clone()),
                children: Vec::new(),
                status: task.status,
                priority: Some(task.priority),
                estimated_time: Some(task.estimated_time.clone()),
                progress: task.progress,
                dependencies: task.dependencies.clone(),
                visible: false,
            });
        }

        branch_cards.push(branch);
        task_cards.push(members);
    }

    // Dependency connections, only for ids that resolve within the set.
    let known = graph::index_by_id(&derived);
    for task in &derived {
        for dep in &task.dependencies {
            if known.contains_key(dep.as_str()) {
                connections.push(Connection::new(
                    dep.clone(),
                    task.id.clone(),
                    ConnectionKind::Dependency,
                ));
            }
        }
    }

    cards.push(root);
    for (branch, members) in branch_cards.into_iter().zip(task_cards) {
        cards.push(branch);
        cards.extend(members);
    }

    MindMapData {
        cards,
        connections,
        root_id: ROOT_ID.to_string(),
        project_name: project_name.to_string(),
    }
}

/// A mind map plus the transient animation markers the renderer reads.
///
/// The marker sets are keyed by connection id (`"{from}->{to}"`) and card
/// id. Ordered sets keep serialized snapshots deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMapView {
    pub data: MindMapData,
    pub animated_connections: BTreeSet<String>,
    pub processing_connections: BTreeSet<String>,
    pub processing_cards: BTreeSet<String>,
}

impl MindMapView {
    pub fn new(data: MindMapData) -> Self {
        Self {
            data,
            animated_connections: BTreeSet::new(),
            processing_connections: BTreeSet::new(),
            processing_cards: BTreeSet::new(),
        }
    }

    /// Drop every transient animation marker.
    pub fn clear_transients(&mut self) {
        self.animated_connections.clear();
        self.processing_connections.clear();
        self.processing_cards.clear();
    }

    /// True if no transient marker is set.
    pub fn transients_empty(&self) -> bool {
        self.animated_connections.is_empty()
            && self.processing_connections.is_empty()
            && self.processing_cards.is_empty()
    }
}
