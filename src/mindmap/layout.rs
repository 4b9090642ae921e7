//! Radial layout for the mind-map card tree.
//!
//! Places the root at the canvas center, branches on a ring around it, and
//! each branch's tasks on a ring around the branch. Layout is a
//! deterministic pure function of the card tree and canvas size: no
//! randomness, no iteration, so re-rendering with unchanged inputs never
//! moves a card.

use crate::mindmap::{CardKind, MindMapData, Position, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometry knobs for the radial layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas is never smaller than this
    pub min_canvas: Size,
    /// Branch ring radius as a fraction of min(width, height)
    pub branch_radius_factor: f64,
    /// Base task ring radius around a branch
    pub task_ring_radius: f64,
    /// Adaptive height: base + max children in any branch * per_child_height
    pub base_height: f64,
    pub per_child_height: f64,
    pub root_size: Size,
    pub branch_size: Size,
    pub task_size: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_canvas: Size::new(1200.0, 800.0),
            branch_radius_factor: 0.3,
            task_ring_radius: 150.0,
            base_height: 600.0,
            per_child_height: 120.0,
            root_size: Size::new(300.0, 200.0),
            branch_size: Size::new(200.0, 120.0),
            task_size: Size::new(180.0, 100.0),
        }
    }
}

impl LayoutConfig {
    /// Task ring radius for a branch with `count` children.
    ///
    /// Grows past the base radius once the ring gets crowded: adjacent
    /// sibling centers are kept at least a task-card diagonal apart, which
    /// makes bounding-box overlap between siblings impossible.
    fn task_radius(&self, count: usize) -> f64 {
        if count < 2 {
            return self.task_ring_radius;
        }
        let diagonal =
            (self.task_size.width * self.task_size.width + self.task_size.height * self.task_size.height)
                .sqrt();
        let crowded = diagonal / (2.0 * (PI / count as f64).sin());
        self.task_ring_radius.max(crowded)
    }
}

/// Assign every card a center position and size for the given canvas.
///
/// The canvas grows to the configured minimum, and its height adapts to the
/// largest branch so crowded rings stay inside it. Returns the effective
/// canvas size.
pub fn position_cards(data: &mut MindMapData, canvas: Size, config: &LayoutConfig) -> Size {
    let branch_ids = data.branch_ids();

    let max_children = branch_ids
        .iter()
        .filter_map(|id| data.card(id))
        .map(|b| b.children.len())
        .max()
        .unwrap_or(0);

    let width = canvas.width.max(config.min_canvas.width);
    let height = canvas
        .height
        .max(config.min_canvas.height)
        .max(config.base_height + max_children as f64 * config.per_child_height);
    let effective = Size::new(width, height);

    let center = Position::new(width / 2.0, height / 2.0);

    // Sizes are fixed per kind.
    for card in &mut data.cards {
        card.size = match card.kind {
            CardKind::Root => config.root_size,
            CardKind::Branch => config.branch_size,
            CardKind::Task => config.task_size,
        };
    }

    let root_id = data.root_id.clone();
    if let Some(root) = data.card_mut(&root_id) {
        root.position = center;
    }

    let branch_radius = config.branch_radius_factor * width.min(height);
    let branch_count = branch_ids.len();

    for (index, branch_id) in branch_ids.iter().enumerate() {
        // First branch straight above the root, the rest clockwise.
        let angle = 2.0 * PI * index as f64 / branch_count as f64 - PI / 2.0;
        let branch_center = Position::new(
            center.x + angle.cos() * branch_radius,
            center.y + angle.sin() * branch_radius,
        );

        let task_ids = match data.card_mut(branch_id) {
            Some(branch) => {
                branch.position = branch_center;
                branch.children.clone()
            }
            None => continue,
        };

        let task_count = task_ids.len();
        let task_radius = config.task_radius(task_count);

        for (task_index, task_id) in task_ids.iter().enumerate() {
            let task_angle = 2.0 * PI * task_index as f64 / task_count.max(1) as f64;
            if let Some(task) = data.card_mut(task_id) {
                task.position = Position::new(
                    branch_center.x + task_angle.cos() * task_radius,
                    branch_center.y + task_angle.sin() * task_radius,
                );
            }
        }
    }

    effective
}
