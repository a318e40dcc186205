//! Goal execution entry point.
//!
//! One execution walks a fixed state machine: extract parameters,
//! decompose, inject, dispatch. The first two stages short-circuit with a
//! terminal error before any subtask dispatch; once dispatch starts it
//! runs across every subtask regardless of individual failures.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::llm::CompletionClient;

use super::decompose::{DecomposeError, GoalDecomposer};
use super::dispatch::{Dispatcher, TaskEndpoints, TaskOutcome};
use super::inject::finalize_subtasks;
use super::params::extract_quarter_and_year;

/// Terminal failures of a goal execution. Neither issues any dispatch.
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("Invalid goal. Please specify a quarter (Q1-Q4) and year (e.g., 2024).")]
    InvalidGoal,

    #[error(transparent)]
    Decomposition(#[from] DecomposeError),
}

/// Result of a completed goal execution.
#[derive(Debug, Serialize)]
pub struct GoalResult {
    pub message: String,
    pub results: Vec<TaskOutcome>,
}

/// Composes the full pipeline: extract, decompose, inject, dispatch.
pub struct GoalExecutor {
    decomposer: GoalDecomposer,
    dispatcher: Dispatcher,
}

impl GoalExecutor {
    /// Build an executor from a completion client and an endpoint registry.
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        http: reqwest::Client,
        endpoints: TaskEndpoints,
    ) -> Self {
        Self {
            decomposer: GoalDecomposer::new(completion),
            dispatcher: Dispatcher::new(http, endpoints),
        }
    }

    /// Execute a goal end to end.
    pub async fn execute(&self, goal: &str) -> Result<GoalResult, GoalError> {
        tracing::info!(goal, "Received goal");

        let params = extract_quarter_and_year(goal);
        if !params.is_complete() {
            tracing::error!(goal, "Missing quarter or year in goal");
            return Err(GoalError::InvalidGoal);
        }
        tracing::info!(
            quarter = params.quarter.as_deref().unwrap_or(""),
            year = params.year.as_deref().unwrap_or(""),
            "Extracted goal parameters"
        );

        let mut subtasks = self.decomposer.decompose(goal).await?;
        finalize_subtasks(&mut subtasks, &params);

        tracing::info!(count = subtasks.len(), "Dispatching subtasks");
        let results = self.dispatcher.dispatch_all(&subtasks).await;

        Ok(GoalResult {
            message: "Goal execution completed".to_string(),
            results,
        })
    }
}
