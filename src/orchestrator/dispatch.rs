//! Subtask dispatch to task endpoints.
//!
//! The endpoint registry is an explicit immutable value injected into the
//! dispatcher, so tests can point task types at fake servers or leave
//! routes out entirely. Dispatch is sequential: later stub stages assume
//! prior stages completed, and the ordered 1:1 mapping between subtasks
//! and outcomes is an observable contract.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::classify::TaskType;
use super::task::Subtask;

/// Immutable task-type to endpoint mapping, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct TaskEndpoints {
    routes: HashMap<TaskType, String>,
}

impl TaskEndpoints {
    /// Build the standard route table against one base URL.
    pub fn for_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let routes = HashMap::from([
            (TaskType::FetchData, format!("{base}/fetch-salesforce-data")),
            (TaskType::ProcessData, format!("{base}/process-data")),
            (TaskType::AnalyzeData, format!("{base}/analyze-data")),
            (TaskType::GenerateReport, format!("{base}/generate-report")),
        ]);
        Self { routes }
    }

    /// Build a registry from explicit pairs. Primarily for tests that
    /// need partial or fake route tables.
    pub fn from_routes(routes: impl IntoIterator<Item = (TaskType, String)>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
        }
    }

    /// Look up the endpoint for a task type.
    pub fn get(&self, task_type: TaskType) -> Option<&str> {
        self.routes.get(&task_type).map(String::as_str)
    }
}

/// Outcome of dispatching one subtask.
///
/// Serializes as `{"result": "Success", "data": ...}` or
/// `{"result": "Failed", "error": "..."}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "result")]
pub enum TaskOutcome {
    Success { data: Value },
    Failed { error: String },
}

/// Sends subtasks to their registered endpoints, collecting one outcome
/// per subtask.
pub struct Dispatcher {
    client: reqwest::Client,
    endpoints: TaskEndpoints,
}

impl Dispatcher {
    /// Create a dispatcher over the given route table.
    pub fn new(client: reqwest::Client, endpoints: TaskEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Dispatch every subtask in order.
    ///
    /// Never aborts early: a missing route or a failed request records a
    /// `Failed` outcome and moves on. The returned list has the same
    /// length and order as the input.
    pub async fn dispatch_all(&self, subtasks: &[Subtask]) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::with_capacity(subtasks.len());

        for task in subtasks {
            outcomes.push(self.dispatch_one(task).await);
        }

        outcomes
    }

    async fn dispatch_one(&self, task: &Subtask) -> TaskOutcome {
        let Some(endpoint) = self.endpoints.get(task.task_type) else {
            let error = format!("No endpoint found for task type: {}", task.task_type);
            tracing::error!("{}", error);
            return TaskOutcome::Failed { error };
        };

        tracing::info!(
            task = %task.task_name,
            task_type = %task.task_type,
            endpoint,
            "Executing task"
        );

        let response = match self.client.post(endpoint).json(task).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error executing {}: {}", task.task_type, e);
                return TaskOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let error = format!(
                "Task endpoint returned status {}: {}",
                status.as_u16(),
                body
            );
            tracing::error!("Error executing {}: {}", task.task_type, error);
            return TaskOutcome::Failed { error };
        }

        let data = serde_json::from_str(&body).unwrap_or(Value::String(body));
        TaskOutcome::Success { data }
    }
}
