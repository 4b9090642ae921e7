//! Task generation boundary.
//!
//! A [`TaskGenerator`] produces an untrusted JSON payload from free text
//! (in production an LLM call, here also the deterministic template catalog).
//! [`parse_payload`] is the single validation boundary that turns that
//! payload into a tagged result, so the normalizer only ever sees checked
//! shapes:
//!
//! 1. **Parse**: payload must carry a non-empty task list
//! 2. **Extract**: each list element is read field-by-field, tolerating
//!    missing or mistyped fields
//! 3. **Normalize**: `normalize::normalize` repairs stubs into `Task` values

pub mod normalize;
pub mod templates;

use crate::Result;
use serde_json::Value;

/// Source of generated task payloads.
///
/// Implementations return raw JSON in whatever shape the backing service
/// emits; callers must pass it through [`parse_payload`] before use.
pub trait TaskGenerator: Send + Sync {
    /// Generate a task payload for the given free-text input.
    fn generate(&mut self, input: &str) -> Result<Value>;

    /// Generator name for diagnostics.
    fn name(&self) -> &'static str;
}

/// An unvalidated task stub extracted from generator output.
///
/// Dependencies are batch-relative indices, not ids; the normalizer resolves
/// them against the generated batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTaskStub {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub dependencies: Vec<usize>,
    pub estimated_time: Option<String>,
}

impl RawTaskStub {
    /// Extract a stub from one payload element.
    ///
    /// Returns `None` when the element is not a JSON object. Individual
    /// fields that are missing or mistyped are dropped, not fatal.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let string_field = |keys: &[&str]| -> Option<String> {
            keys.iter()
                .find_map(|k| obj.get(*k))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let dependencies = obj
            .get("dependencies")
            .and_then(Value::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(Value::as_u64)
                    .map(|i| i as usize)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            id: string_field(&["id"]),
            title: string_field(&["title"]),
            description: string_field(&["description"]),
            priority: string_field(&["priority"]),
            dependencies,
            estimated_time: string_field(&["estimatedTime", "estimated_time"]),
        })
    }
}

/// Outcome of the payload validation boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Payload carried at least one usable task stub.
    Valid {
        project_name: Option<String>,
        stubs: Vec<RawTaskStub>,
    },
    /// Payload was unusable; callers fall back to the template catalog.
    Invalid { reason: String },
}

/// Validate a raw generator payload.
///
/// Accepts either `{"projectName": ..., "tasks": [...]}` or a bare task
/// array. A payload whose task list is missing, not a list, or empty after
/// extraction is `Invalid` - the caller recovers via templates rather than
/// surfacing the failure.
pub fn parse_payload(payload: &Value) -> Parsed {
    let (project_name, list) = match payload {
        Value::Array(items) => (None, items),
        Value::Object(obj) => {
            let name = obj
                .get("projectName")
                .or_else(|| obj.get("project_name"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match obj.get("tasks").and_then(Value::as_array) {
                Some(items) => (name, items),
                None => {
                    return Parsed::Invalid {
                        reason: "payload has no task list".to_string(),
                    }
                }
            }
        }
        _ => {
            return Parsed::Invalid {
                reason: "payload is not a list or object".to_string(),
            }
        }
    };

    let stubs: Vec<RawTaskStub> = list.iter().filter_map(RawTaskStub::from_value).collect();

    if stubs.is_empty() {
        return Parsed::Invalid {
            reason: "task list is empty".to_string(),
        };
    }

    Parsed::Valid {
        project_name,
        stubs,
    }
}
