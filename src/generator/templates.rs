//! Deterministic template task catalog.
//!
//! The fallback path when the configured generator is unavailable or its
//! payload fails validation: a fixed catalog keyed by keyword match on the
//! user's free text, with hard-coded dependency chains. Also usable as a
//! standalone [`TaskGenerator`] for offline operation.

use crate::generator::{RawTaskStub, TaskGenerator};
use crate::Result;
use serde_json::{json, Value};

/// One catalog entry before conversion to a stub.
struct TemplateTask {
    title: &'static str,
    description: &'static str,
    priority: &'static str,
    estimated_time: &'static str,
    dependencies: &'static [usize],
}

const AUTH_TEMPLATE: &[TemplateTask] = &[
    TemplateTask {
        title: "Setup Authentication Provider",
        description: "Configure the authentication service and credentials",
        priority: "high",
        estimated_time: "2 hours",
        dependencies: &[],
    },
    TemplateTask {
        title: "Create Login Component",
        description: "Build login form with email/password and social auth options",
        priority: "high",
        estimated_time: "3 hours",
        dependencies: &[0],
    },
    TemplateTask {
        title: "Create Signup Component",
        description: "Build registration form with validation and email confirmation",
        priority: "high",
        estimated_time: "3 hours",
        dependencies: &[0],
    },
    TemplateTask {
        title: "Implement Protected Routes",
        description: "Add middleware to protect authenticated pages and API routes",
        priority: "medium",
        estimated_time: "2 hours",
        dependencies: &[1, 2],
    },
    TemplateTask {
        title: "Setup User Profile Management",
        description: "Create user profile page with update functionality",
        priority: "low",
        estimated_time: "4 hours",
        dependencies: &[3],
    },
];

const API_TEMPLATE: &[TemplateTask] = &[
    TemplateTask {
        title: "Design API Architecture",
        description: "Plan REST API endpoints and data models",
        priority: "high",
        estimated_time: "3 hours",
        dependencies: &[],
    },
    TemplateTask {
        title: "Setup Database Schema",
        description: "Create database tables and relationships",
        priority: "high",
        estimated_time: "2 hours",
        dependencies: &[0],
    },
    TemplateTask {
        title: "Implement CRUD Operations",
        description: "Build create, read, update, delete operations for main entities",
        priority: "medium",
        estimated_time: "4 hours",
        dependencies: &[1],
    },
    TemplateTask {
        title: "Add API Validation",
        description: "Implement request validation and error handling",
        priority: "medium",
        estimated_time: "2 hours",
        dependencies: &[2],
    },
];

const UI_TEMPLATE: &[TemplateTask] = &[
    TemplateTask {
        title: "Create Design System",
        description: "Setup colors, typography, and component library",
        priority: "high",
        estimated_time: "4 hours",
        dependencies: &[],
    },
    TemplateTask {
        title: "Build Main Layout",
        description: "Create header, footer, and navigation components",
        priority: "high",
        estimated_time: "3 hours",
        dependencies: &[0],
    },
    TemplateTask {
        title: "Implement Responsive Design",
        description: "Ensure mobile-first responsive design across all screens",
        priority: "medium",
        estimated_time: "3 hours",
        dependencies: &[1],
    },
    TemplateTask {
        title: "Add Loading States",
        description: "Implement skeleton screens and loading indicators",
        priority: "low",
        estimated_time: "1 hour",
        dependencies: &[1],
    },
];

const GENERIC_TEMPLATE: &[TemplateTask] = &[
    TemplateTask {
        title: "Project Planning",
        description: "Plan and break down the requirements",
        priority: "high",
        estimated_time: "2 hours",
        dependencies: &[],
    },
    TemplateTask {
        title: "Setup Development Environment",
        description: "Configure tools, dependencies, and development workflow",
        priority: "medium",
        estimated_time: "1 hour",
        dependencies: &[0],
    },
    TemplateTask {
        title: "Implementation",
        description: "Implement the main functionality",
        priority: "high",
        estimated_time: "1 day",
        dependencies: &[1],
    },
    TemplateTask {
        title: "Testing & Documentation",
        description: "Write tests and update documentation",
        priority: "medium",
        estimated_time: "3 hours",
        dependencies: &[2],
    },
];

/// Named catalog entries, in match-precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Catalog {
    Auth,
    Api,
    Ui,
    Generic,
}

impl Catalog {
    fn tasks(&self) -> &'static [TemplateTask] {
        match self {
            Catalog::Auth => AUTH_TEMPLATE,
            Catalog::Api => API_TEMPLATE,
            Catalog::Ui => UI_TEMPLATE,
            Catalog::Generic => GENERIC_TEMPLATE,
        }
    }
}

/// Select the catalog for a free-text input.
///
/// Keyword groups are checked in order; the first match wins. Unmatched
/// input falls through to the generic plan.
fn select_catalog(input: &str) -> Catalog {
    let lower = input.to_lowercase();
    if contains_any(&lower, &["auth", "login", "signup"]) {
        Catalog::Auth
    } else if contains_any(&lower, &["api", "backend"]) {
        Catalog::Api
    } else if contains_any(&lower, &["ui", "frontend", "design"]) {
        Catalog::Ui
    } else {
        Catalog::Generic
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Produce template stubs for an input, bypassing JSON.
///
/// This is the direct recovery path: when a real generator's payload fails
/// validation, the caller swaps in these stubs without a second parse. The
/// generic plan's planning and implementation descriptions reference the
/// input text so the fallback still reflects what the user asked for.
pub fn template_stubs(input: &str) -> Vec<RawTaskStub> {
    let catalog = select_catalog(input);
    catalog
        .tasks()
        .iter()
        .map(|t| {
            let description = if catalog == Catalog::Generic
                && (t.title == "Project Planning" || t.title == "Implementation")
            {
                format!("{} for: {}", t.description, input)
            } else {
                t.description.to_string()
            };
            RawTaskStub {
                id: None,
                title: Some(t.title.to_string()),
                description: Some(description),
                priority: Some(t.priority.to_string()),
                dependencies: t.dependencies.to_vec(),
                estimated_time: Some(t.estimated_time.to_string()),
            }
        })
        .collect()
}

/// Offline generator backed by the template catalog.
#[derive(Debug, Default)]
pub struct TemplateGenerator;

impl TaskGenerator for TemplateGenerator {
    fn generate(&mut self, input: &str) -> Result<Value> {
        let tasks: Vec<Value> = template_stubs(input)
            .into_iter()
            .map(|s| {
                json!({
                    "title": s.title,
                    "description": s.description,
                    "priority": s.priority,
                    "dependencies": s.dependencies,
                    "estimatedTime": s.estimated_time,
                })
            })
            .collect();
        Ok(json!({ "tasks": tasks }))
    }

    fn name(&self) -> &'static str {
        "templates"
    }
}
