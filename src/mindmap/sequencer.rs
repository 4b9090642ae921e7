//! Staged execution animation over the mind map.
//!
//! A purely presentational "data flowing down the tree" effect: pick the
//! first ready task, collapse every branch, then walk the two-hop path
//! root -> branch -> task, animating each connection for a fixed travel
//! window before it settles into a processing glow. All timing lives in a
//! precomputed step schedule; the caller drives it with `advance(elapsed)`
//! against whatever clock it owns, so tests never sleep.
//!
//! Re-entrancy: a `start` while a sequence is in flight is ignored. A
//! `reset` clears all transient markers synchronously and bumps the epoch
//! counter, turning any stale scheduled step into a no-op.

use crate::mindmap::{visibility, MindMapView};
use crate::models::{graph, Task};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Sequencer timing knobs, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// How long the moving particle travels along one edge
    pub edge_travel_ms: u64,
    /// How long the processing glow lasts after the last edge lands
    pub glow_ms: u64,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            edge_travel_ms: 3000,
            glow_ms: 2000,
        }
    }
}

impl SequencerConfig {
    pub fn edge_travel(&self) -> Duration {
        Duration::from_millis(self.edge_travel_ms)
    }

    pub fn glow(&self) -> Duration {
        Duration::from_millis(self.glow_ms)
    }
}

/// Where the sequencer currently is in its walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerPhase {
    #[default]
    Idle,
    Collapsing,
    AnimatingRootEdge,
    BranchGlow,
    AnimatingTaskEdge,
    TaskGlow,
}

/// The resolved two-hop path for one sequence run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPath {
    pub task_id: String,
    pub branch_id: String,
    /// Connection id "root->{branch}"
    pub root_edge: String,
    /// Connection id "{branch}->{task}"
    pub task_edge: String,
}

/// One scheduled mutation of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// Start the particle on the root->branch edge
    AnimateRootEdge,
    /// Land the root->branch edge: glow, expand and mark the branch
    ProcessRootEdge,
    /// Start the particle on the branch->task edge
    AnimateTaskEdge,
    /// Land the branch->task edge: glow and mark the task
    ProcessTaskEdge,
    /// Clear every transient marker and return to idle
    Clear,
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepAction::AnimateRootEdge => "animate_root_edge",
            StepAction::ProcessRootEdge => "process_root_edge",
            StepAction::AnimateTaskEdge => "animate_task_edge",
            StepAction::ProcessTaskEdge => "process_task_edge",
            StepAction::Clear => "clear",
        };
        write!(f, "{}", s)
    }
}

/// A step with its offset from sequence start.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledStep {
    /// Offset from sequence start, in milliseconds
    pub at_ms: u64,
    pub action: StepAction,
    epoch: u64,
}

/// The execution animation state machine.
#[derive(Debug)]
pub struct ExecutionSequencer {
    config: SequencerConfig,
    phase: SequencerPhase,
    epoch: u64,
    path: Option<ExecutionPath>,
    schedule: Vec<ScheduledStep>,
}

impl ExecutionSequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            phase: SequencerPhase::Idle,
            epoch: 0,
            path: None,
            schedule: Vec::new(),
        }
    }

    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SequencerPhase::Idle
    }

    /// The path of the in-flight sequence, if any.
    pub fn path(&self) -> Option<&ExecutionPath> {
        self.path.as_ref()
    }

    /// Steps not yet applied, in firing order.
    pub fn pending(&self) -> &[ScheduledStep] {
        &self.schedule
    }

    /// Begin a sequence toward the first ready task.
    ///
    /// Returns `false` without touching the view when a sequence is already
    /// in flight, when no task is ready, or when the target has no card in
    /// the map. On success the view's branches are collapsed immediately and
    /// the step schedule is armed; the first `advance` call starts the
    /// root-edge animation.
    pub fn start(&mut self, view: &mut MindMapView, tasks: &[Task]) -> bool {
        if self.phase != SequencerPhase::Idle {
            tracing::debug!(phase = ?self.phase, "start ignored: sequence already in flight");
            return false;
        }

        // Tie-break: first ready task in input order.
        let ready = graph::ready_tasks(tasks);
        let Some(target) = ready.first() else {
            tracing::debug!("start aborted: no ready task");
            return false;
        };

        let Some(branch_id) = view
            .data
            .card(&target.id)
            .and_then(|card| card.parent_id.clone())
        else {
            tracing::debug!(task = %target.id, "start aborted: target has no card");
            return false;
        };

        let path = ExecutionPath {
            root_edge: format!("{}->{}", view.data.root_id, branch_id),
            task_edge: format!("{}->{}", branch_id, target.id),
            task_id: target.id.clone(),
            branch_id,
        };
        tracing::debug!(task = %path.task_id, branch = %path.branch_id, "execution sequence started");

        visibility::collapse_all_tasks(&mut view.data);
        self.phase = SequencerPhase::Collapsing;
        self.path = Some(path);

        let travel = self.config.edge_travel_ms;
        let glow = self.config.glow_ms;
        let epoch = self.epoch;
        let step = |at_ms: u64, action: StepAction| ScheduledStep {
            at_ms,
            action,
            epoch,
        };
        self.schedule = vec![
            step(0, StepAction::AnimateRootEdge),
            step(travel, StepAction::ProcessRootEdge),
            step(travel, StepAction::AnimateTaskEdge),
            step(2 * travel, StepAction::ProcessTaskEdge),
            // Fixed total from the start of the last edge's animation:
            // travel (particle) + glow.
            step(2 * travel + glow, StepAction::Clear),
        ];

        true
    }

    /// Apply every step due at `elapsed` since sequence start.
    ///
    /// Steps fire at most once; calling with the same elapsed twice is a
    /// no-op, as is any step minted before the last `reset`.
    pub fn advance(&mut self, view: &mut MindMapView, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis() as u64;
        while let Some(next) = self.schedule.first() {
            if next.at_ms > elapsed_ms {
                break;
            }
            let step = self.schedule.remove(0);
            if step.epoch != self.epoch {
                continue;
            }
            self.apply(view, step.action);
        }
    }

    /// Cancel any in-flight sequence and clear all transient markers.
    ///
    /// Synchronous: after this returns the view carries no animation state
    /// and previously minted steps can never fire.
    pub fn reset(&mut self, view: &mut MindMapView) {
        self.epoch += 1;
        self.schedule.clear();
        self.path = None;
        self.phase = SequencerPhase::Idle;
        view.clear_transients();
    }

    fn apply(&mut self, view: &mut MindMapView, action: StepAction) {
        let Some(path) = self.path.clone() else {
            return;
        };
        match action {
            StepAction::AnimateRootEdge => {
                view.animated_connections.insert(path.root_edge);
                self.phase = SequencerPhase::AnimatingRootEdge;
            }
            StepAction::ProcessRootEdge => {
                view.animated_connections.remove(&path.root_edge);
                view.processing_connections.insert(path.root_edge);
                visibility::show_children(&mut view.data, &path.branch_id);
                view.processing_cards.insert(path.branch_id);
                self.phase = SequencerPhase::BranchGlow;
            }
            StepAction::AnimateTaskEdge => {
                view.animated_connections.insert(path.task_edge);
                self.phase = SequencerPhase::AnimatingTaskEdge;
            }
            StepAction::ProcessTaskEdge => {
                view.animated_connections.remove(&path.task_edge);
                view.processing_connections.insert(path.task_edge);
                view.processing_cards.insert(path.task_id);
                self.phase = SequencerPhase::TaskGlow;
            }
            StepAction::Clear => {
                view.clear_transients();
                self.path = None;
                self.phase = SequencerPhase::Idle;
            }
        }
    }
}

impl Default for ExecutionSequencer {
    fn default() -> Self {
        Self::new(SequencerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mindmap::{build_mind_map, CardKind};
    use crate::models::TaskStatus;

    fn task(id: &str, title: &str, deps: &[&str], status: TaskStatus) -> Task {
        let mut t = Task::new(id.to_string(), title.to_string(), "p1".to_string());
        t.dependencies = deps.iter().map(|d| d.to_string()).collect();
        t.status = status;
        t
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn sample() -> (Vec<Task>, MindMapView) {
        let tasks = vec![
            task("a", "Setup project", &[], TaskStatus::Ready),
            task("b", "Write tests", &["a"], TaskStatus::Ready),
        ];
        let view = MindMapView::new(build_mind_map(&tasks, "Demo"));
        (tasks, view)
    }

    #[test]
    fn test_full_sequence_walkthrough() {
        let (tasks, mut view) = sample();
        let mut seq = ExecutionSequencer::default();

        assert!(seq.start(&mut view, &tasks));
        assert_eq!(seq.phase(), SequencerPhase::Collapsing);
        let path = seq.path().unwrap().clone();
        assert_eq!(path.task_id, "a");
        assert_eq!(path.root_edge, "root->branch-0");
        assert_eq!(path.task_edge, "branch-0->a");

        seq.advance(&mut view, ms(0));
        assert_eq!(seq.phase(), SequencerPhase::AnimatingRootEdge);
        assert!(view.animated_connections.contains("root->branch-0"));
        assert!(view.processing_connections.is_empty());

        seq.advance(&mut view, ms(3000));
        assert_eq!(seq.phase(), SequencerPhase::AnimatingTaskEdge);
        assert!(view.processing_connections.contains("root->branch-0"));
        assert!(view.animated_connections.contains("branch-0->a"));
        assert!(view.processing_cards.contains("branch-0"));
        // Reaching the branch expands it.
        assert!(view.data.card("a").unwrap().visible);

        seq.advance(&mut view, ms(6000));
        assert_eq!(seq.phase(), SequencerPhase::TaskGlow);
        assert!(view.processing_connections.contains("branch-0->a"));
        assert!(view.processing_cards.contains("a"));
        assert!(view.animated_connections.is_empty());

        seq.advance(&mut view, ms(8000));
        assert_eq!(seq.phase(), SequencerPhase::Idle);
        assert!(view.transients_empty());
        assert!(seq.path().is_none());
    }

    #[test]
    fn test_start_collapses_expanded_branches() {
        let (tasks, mut view) = sample();
        for branch in view.data.branch_ids() {
            crate::mindmap::visibility::toggle_children(&mut view.data, &branch);
        }
        let mut seq = ExecutionSequencer::default();
        assert!(seq.start(&mut view, &tasks));
        for card in &view.data.cards {
            if card.kind == CardKind::Task {
                assert!(!card.visible);
            }
        }
    }

    #[test]
    fn test_no_ready_task_is_noop() {
        // Everything blocked: nothing starts, nothing fires.
        let tasks = vec![
            task("a", "Setup", &["b"], TaskStatus::Ready),
            task("b", "Write tests", &["a"], TaskStatus::Ready),
        ];
        let mut view = MindMapView::new(build_mind_map(&tasks, "Demo"));
        let mut seq = ExecutionSequencer::default();

        assert!(!seq.start(&mut view, &tasks));
        assert!(seq.is_idle());
        assert!(view.transients_empty());
        assert!(seq.pending().is_empty());

        seq.advance(&mut view, ms(10_000));
        assert!(view.transients_empty());
        assert!(seq.is_idle());
    }

    #[test]
    fn test_reentrant_start_ignored() {
        let (tasks, mut view) = sample();
        let mut seq = ExecutionSequencer::default();
        assert!(seq.start(&mut view, &tasks));
        seq.advance(&mut view, ms(0));
        assert!(!seq.start(&mut view, &tasks));
        assert_eq!(seq.phase(), SequencerPhase::AnimatingRootEdge);
    }

    #[test]
    fn test_reset_clears_and_invalidates() {
        let (tasks, mut view) = sample();
        let mut seq = ExecutionSequencer::default();
        assert!(seq.start(&mut view, &tasks));
        seq.advance(&mut view, ms(3000));
        assert!(!view.transients_empty());

        seq.reset(&mut view);
        assert!(seq.is_idle());
        assert!(view.transients_empty());

        // Time marching past every old deadline resurrects nothing.
        seq.advance(&mut view, ms(60_000));
        assert!(view.transients_empty());
        assert_eq!(seq.phase(), SequencerPhase::Idle);
    }

    #[test]
    fn test_restart_after_reset() {
        let (tasks, mut view) = sample();
        let mut seq = ExecutionSequencer::default();
        assert!(seq.start(&mut view, &tasks));
        seq.reset(&mut view);
        assert!(seq.start(&mut view, &tasks));
        seq.advance(&mut view, ms(0));
        assert_eq!(seq.phase(), SequencerPhase::AnimatingRootEdge);
    }

    #[test]
    fn test_advance_is_idempotent() {
        let (tasks, mut view) = sample();
        let mut seq = ExecutionSequencer::default();
        assert!(seq.start(&mut view, &tasks));
        seq.advance(&mut view, ms(3000));
        let snapshot = view.processing_connections.clone();
        seq.advance(&mut view, ms(3000));
        assert_eq!(view.processing_connections, snapshot);
        assert_eq!(seq.phase(), SequencerPhase::AnimatingTaskEdge);
    }

    #[test]
    fn test_tie_break_is_input_order() {
        let tasks = vec![
            task("z", "Write tests", &[], TaskStatus::Ready),
            task("a", "Setup project", &[], TaskStatus::Ready),
        ];
        let mut view = MindMapView::new(build_mind_map(&tasks, "Demo"));
        let mut seq = ExecutionSequencer::default();
        assert!(seq.start(&mut view, &tasks));
        // "z" comes first in the task list even though "a" sorts lower.
        assert_eq!(seq.path().unwrap().task_id, "z");
    }

    #[test]
    fn test_custom_timing_shifts_schedule() {
        let (tasks, mut view) = sample();
        let mut seq = ExecutionSequencer::new(SequencerConfig {
            edge_travel_ms: 10,
            glow_ms: 5,
        });
        assert!(seq.start(&mut view, &tasks));
        let offsets: Vec<u64> = seq.pending().iter().map(|s| s.at_ms).collect();
        assert_eq!(offsets, vec![0, 10, 10, 20, 25]);
    }
}
