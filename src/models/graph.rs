//! Derived readiness status over the task dependency graph.
//!
//! Tasks form a DAG via their `dependencies` lists. A task's displayed status
//! is derived: only an authoritative `Completed` dependency counts as
//! satisfied, so derivation is a single pass over the task set with no
//! fixpoint iteration. Dangling dependency ids count as unsatisfied, and a
//! dependency cycle simply leaves its members `Blocked` - neither condition
//! is an error here.

use crate::models::{Task, TaskStatus};
use std::collections::{HashMap, HashSet};

/// Compute the derived status of a single task.
///
/// `InProgress` and `Completed` are authoritative and pass through unchanged.
/// Otherwise the task is `Blocked` if any dependency is missing or not
/// completed, else `Ready`.
pub fn derive_status(task: &Task, tasks_by_id: &HashMap<&str, &Task>) -> TaskStatus {
    if task.status.is_authoritative() {
        return task.status;
    }

    let satisfied = task.dependencies.iter().all(|dep_id| {
        tasks_by_id
            .get(dep_id.as_str())
            .is_some_and(|dep| dep.status == TaskStatus::Completed)
    });

    if satisfied {
        TaskStatus::Ready
    } else {
        TaskStatus::Blocked
    }
}

/// Build an id -> task lookup for a task slice.
pub fn index_by_id(tasks: &[Task]) -> HashMap<&str, &Task> {
    tasks.iter().map(|t| (t.id.as_str(), t)).collect()
}

/// Return a copy of the task set with every status recomputed.
///
/// Pure: identical input always yields identical output, and applying it
/// twice is the same as applying it once.
pub fn derive_statuses(tasks: &[Task]) -> Vec<Task> {
    let by_id = index_by_id(tasks);
    tasks
        .iter()
        .map(|task| {
            let mut derived = task.clone();
            derived.status = derive_status(task, &by_id);
            derived
        })
        .collect()
}

/// Tasks whose derived status is `Ready`, in input order.
pub fn ready_tasks(tasks: &[Task]) -> Vec<&Task> {
    let by_id = index_by_id(tasks);
    tasks
        .iter()
        .filter(|t| derive_status(t, &by_id) == TaskStatus::Ready)
        .collect()
}

/// Tasks whose derived status is `Blocked`, in input order.
pub fn blocked_tasks(tasks: &[Task]) -> Vec<&Task> {
    let by_id = index_by_id(tasks);
    tasks
        .iter()
        .filter(|t| derive_status(t, &by_id) == TaskStatus::Blocked)
        .collect()
}

/// Dependency references that do not resolve to any task in the set.
///
/// Returns `(task_id, missing_dependency_id)` pairs in input order. These are
/// a data-integrity smell surfaced by `tw doctor`; status derivation already
/// treats them as unsatisfied.
pub fn dangling_dependencies(tasks: &[Task]) -> Vec<(String, String)> {
    let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let mut dangling = Vec::new();
    for task in tasks {
        for dep in &task.dependencies {
            if !ids.contains(dep.as_str()) {
                dangling.push((task.id.clone(), dep.clone()));
            }
        }
    }
    dangling
}

/// Find one dependency cycle, if any exists.
///
/// Iterative DFS with an explicit stack over the dependency edges. Returns
/// the member ids of the first cycle found, starting and ending at the same
/// task. Purely diagnostic: derivation never calls this.
pub fn find_cycle(tasks: &[Task]) -> Option<Vec<String>> {
    let by_id = index_by_id(tasks);

    // 0 = unvisited, 1 = on current path, 2 = fully explored
    let mut state: HashMap<&str, u8> = HashMap::new();

    for start in tasks {
        if state.get(start.id.as_str()).copied().unwrap_or(0) != 0 {
            continue;
        }

        // Stack of (task id, next dependency index to visit)
        let mut stack: Vec<(&str, usize)> = vec![(start.id.as_str(), 0)];
        state.insert(start.id.as_str(), 1);

        while let Some(frame) = stack.last_mut() {
            let (id, next) = (frame.0, frame.1);
            frame.1 += 1;

            let dep = by_id.get(id).and_then(|t| t.dependencies.get(next));

            match dep {
                Some(dep_id) => {
                    let dep_id = dep_id.as_str();
                    if !by_id.contains_key(dep_id) {
                        continue; // dangling, not a cycle edge
                    }
                    match state.get(dep_id).copied().unwrap_or(0) {
                        1 => {
                            // Found a back edge; unwind the path into a cycle.
                            let mut cycle: Vec<String> = stack
                                .iter()
                                .skip_while(|(sid, _)| *sid != dep_id)
                                .map(|(sid, _)| sid.to_string())
                                .collect();
                            cycle.push(dep_id.to_string());
                            return Some(cycle);
                        }
                        0 => {
                            state.insert(dep_id, 1);
                            stack.push((dep_id, 0));
                        }
                        _ => {}
                    }
                }
                None => {
                    state.insert(id, 2);
                    stack.pop();
                }
            }
        }
    }

    None
}
