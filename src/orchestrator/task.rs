//! Subtask data model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::classify::TaskType;

/// Id given to the injected fetch subtask.
pub const INJECTED_FETCH_ID: &str = "task-fetch";

/// Display name of the injected fetch subtask.
pub const INJECTED_FETCH_NAME: &str = "Fetch Salesforce Data";

/// A normalized subtask, ready for dispatch.
///
/// Created once per goal execution and discarded after dispatch. The
/// quarter/year fields are stamped by the injector from the extracted
/// goal parameters; whatever the model put there is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    /// Ordinal id (`task-1`, `task-2`, ...) or the injected sentinel.
    pub task_id: String,
    /// Display name, as returned by the model.
    pub task_name: String,
    /// Category derived from the name, never supplied by the model.
    pub task_type: TaskType,
    /// Free-text description.
    pub description: String,
    /// Reporting quarter, e.g. `Q3`.
    pub quarter: String,
    /// Reporting year, e.g. `2024`.
    pub year: String,
}

/// One raw subtask as returned by the completion service.
///
/// `name` is kept as a raw JSON value: models occasionally emit non-string
/// names, which must classify as `unknown` rather than fail decomposition.
#[derive(Debug, Deserialize)]
pub struct RawSubtask {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// The decomposition shape the completion service must return.
#[derive(Debug, Deserialize)]
pub struct DecompositionPlan {
    pub subtasks: Vec<RawSubtask>,
}
