//! Keyword grouping of tasks into named phases.
//!
//! Grouping only feeds the visual tree; execution order comes from the
//! dependency graph. Classification scans the lowercased title against a
//! fixed rule table - the table order is the precedence order, so a title
//! matching several rules ("Setup API testing") always lands in the first.

use crate::models::Task;

/// A category rule: name plus the title keywords that select it.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Classification rules in precedence order.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "Setup",
        keywords: &["setup", "config", "install"],
    },
    CategoryRule {
        name: "Frontend",
        keywords: &["frontend", "ui", "component"],
    },
    CategoryRule {
        name: "Backend",
        keywords: &["backend", "api", "server"],
    },
    CategoryRule {
        name: "Database",
        keywords: &["database", "db", "model"],
    },
    CategoryRule {
        name: "Testing",
        keywords: &["test", "testing"],
    },
    CategoryRule {
        name: "Deployment",
        keywords: &["deploy", "build", "production"],
    },
];

/// Category for tasks no rule matches.
pub const DEFAULT_CATEGORY: &str = "General";

/// Classify a single title.
pub fn categorize(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.name)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// A named group of tasks, in input-relative order.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub name: &'static str,
    pub tasks: Vec<&'a Task>,
}

/// Partition tasks into category groups.
///
/// Groups appear in first-encounter order over the input; tasks keep their
/// relative order within a group.
pub fn group_by_category(tasks: &[Task]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();

    for task in tasks {
        let name = categorize(&task.title);
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.tasks.push(task),
            None => groups.push(CategoryGroup {
                name,
                tasks: vec![task],
            }),
        }
    }

    groups
}
