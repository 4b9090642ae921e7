//! Branch expand/collapse state over the card tree.
//!
//! Toggling is an all-or-nothing group operation on a card's direct
//! children: if any child is currently visible the group collapses,
//! otherwise it expands. Collapse cascades to every descendant; expand
//! reveals direct children only, so grandchildren keep whatever visibility
//! they were left in. The root card is always visible and never toggled.

use crate::mindmap::MindMapData;

/// Flip the visibility of a card's direct children as a group.
///
/// New visibility is `!any_child_visible`. Unknown card ids are a no-op.
pub fn toggle_children(data: &mut MindMapData, card_id: &str) {
    let Some(parent) = data.card(card_id) else {
        return;
    };

    let children = parent.children.clone();
    let any_visible = children
        .iter()
        .any(|id| data.card(id).is_some_and(|c| c.visible));
    let show = !any_visible;

    for child_id in &children {
        if let Some(child) = data.card_mut(child_id) {
            child.visible = show;
        }
        if !show {
            hide_descendants(data, child_id);
        }
    }
}

/// Make a card's direct children visible without touching deeper levels.
///
/// Used by the execution sequencer when the animation reaches a branch.
pub fn show_children(data: &mut MindMapData, card_id: &str) {
    let children = match data.card(card_id) {
        Some(card) => card.children.clone(),
        None => return,
    };
    for child_id in &children {
        if let Some(child) = data.card_mut(child_id) {
            child.visible = true;
        }
    }
}

/// Hide every task-level card, leaving branches visible.
///
/// The sequencer's opening collapse: all branches fold regardless of prior
/// expansion state.
pub fn collapse_all_tasks(data: &mut MindMapData) {
    for branch_id in data.branch_ids() {
        let children = match data.card(&branch_id) {
            Some(branch) => branch.children.clone(),
            None => continue,
        };
        for child_id in &children {
            if let Some(child) = data.card_mut(child_id) {
                child.visible = false;
            }
            hide_descendants(data, child_id);
        }
    }
}

/// Force-hide all descendants of a card, at any depth.
fn hide_descendants(data: &mut MindMapData, card_id: &str) {
    let children = match data.card(card_id) {
        Some(card) => card.children.clone(),
        None => return,
    };
    for child_id in &children {
        if let Some(child) = data.card_mut(child_id) {
            child.visible = false;
        }
        hide_descendants(data, child_id);
    }
}
