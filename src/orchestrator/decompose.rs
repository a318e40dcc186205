//! Goal decomposition via the completion service.
//!
//! Sends the goal with a fixed instruction prompt, validates the shape of
//! the response, and normalizes each raw subtask into a [`Subtask`]. The
//! three failure modes (transport, non-JSON output, JSON without a
//! `subtasks` array) collapse into one tagged error for the caller but are
//! logged separately for diagnosis.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::llm::{ChatMessage, ChatOptions, CompletionClient, LlmError, Role};

use super::classify::{classify_task_name, TaskType};
use super::task::{DecompositionPlan, RawSubtask, Subtask};

/// Fixed system instruction for the decomposition request.
const DECOMPOSE_INSTRUCTION: &str = "You are an AI that breaks down a user's goal into structured subtasks. \
Ensure that if a goal mentions a quarter (Q1, Q2, etc.) and a year (e.g., 2024), \
the fetch data subtask includes them. Return a JSON object with a 'subtasks' array, \
where each subtask is an object with 'name' and optionally 'description' or 'details'.";

/// Temperature for decomposition requests. Low, for reproducible plans.
const DECOMPOSE_TEMPERATURE: f64 = 0.2;

/// Placeholder name for subtasks the model returned without one.
const UNNAMED_TASK: &str = "Unnamed Task";

/// Errors from goal decomposition.
///
/// All variants present the same `{error}` shape to callers; the variant
/// only matters for logging.
#[derive(Debug, Error)]
pub enum DecomposeError {
    #[error("Failed to parse goal.")]
    Completion(#[source] LlmError),

    #[error("OpenAI response is not structured correctly.")]
    NotJson(#[source] serde_json::Error),

    #[error("OpenAI response is not structured correctly.")]
    MissingSubtasks(#[source] serde_json::Error),
}

/// Decomposes goals into normalized subtask lists.
pub struct GoalDecomposer {
    client: Arc<dyn CompletionClient>,
}

impl GoalDecomposer {
    /// Create a decomposer backed by the given completion client.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Break a goal down into subtasks.
    pub async fn decompose(&self, goal: &str) -> Result<Vec<Subtask>, DecomposeError> {
        let messages = [
            ChatMessage::new(Role::System, DECOMPOSE_INSTRUCTION),
            ChatMessage::new(
                Role::User,
                format!("Break down this goal into subtasks: {goal}"),
            ),
        ];
        let options = ChatOptions {
            temperature: Some(DECOMPOSE_TEMPERATURE),
            ..Default::default()
        };

        let response = self
            .client
            .chat_completion(&messages, options)
            .await
            .map_err(|e| {
                tracing::error!("Completion request for goal decomposition failed: {}", e);
                DecomposeError::Completion(e)
            })?;

        let raw = response.content.unwrap_or_default();
        let raw = raw.trim();
        tracing::debug!(response = %raw, "Raw decomposition response");

        // Models sometimes wrap the JSON in prose or code fences; parse
        // the outermost object.
        let json_str = extract_json(raw).unwrap_or(raw);

        let parsed: Value = serde_json::from_str(json_str).map_err(|e| {
            tracing::error!("Decomposition response is not JSON: {}", e);
            DecomposeError::NotJson(e)
        })?;

        let plan: DecompositionPlan = serde_json::from_value(parsed).map_err(|e| {
            tracing::error!("Decomposition response has no valid `subtasks` array: {}", e);
            DecomposeError::MissingSubtasks(e)
        })?;

        let subtasks: Vec<Subtask> = plan
            .subtasks
            .into_iter()
            .enumerate()
            .map(|(index, raw)| normalize(index, raw))
            .collect();

        tracing::info!(count = subtasks.len(), "Goal decomposed into subtasks");
        Ok(subtasks)
    }
}

/// Normalize one raw subtask: ordinal id, name placeholder, derived type,
/// description fallback. Quarter/year stay empty until injection stamps
/// the authoritative values.
fn normalize(index: usize, raw: RawSubtask) -> Subtask {
    let (task_name, task_type) = match raw.name {
        Some(Value::String(name)) => {
            let task_type = classify_task_name(&name);
            (name, task_type)
        }
        Some(other) => {
            tracing::error!(name = %other, "Subtask name is not a string");
            (other.to_string(), TaskType::Unknown)
        }
        None => (
            UNNAMED_TASK.to_string(),
            classify_task_name(UNNAMED_TASK),
        ),
    };

    let description = raw.description.unwrap_or_else(|| {
        raw.details
            .map(|d| d.to_string())
            .unwrap_or_else(|| "{}".to_string())
    });

    Subtask {
        task_id: format!("task-{}", index + 1),
        task_name,
        task_type,
        description,
        quarter: String::new(),
        year: String::new(),
    }
}

/// Extract the outermost JSON object from a response that may carry
/// conversational wrapping.
fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}
