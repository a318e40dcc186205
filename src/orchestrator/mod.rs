//! Goal-to-subtask orchestration pipeline.
//!
//! The pipeline runs in four stages, each a separate submodule:
//! parameter extraction (`params`), goal decomposition (`decompose`),
//! fetch-task injection (`inject`), and endpoint dispatch (`dispatch`).
//! `executor` composes them into the single "execute goal" operation.
//!
//! Every execution is independent: subtasks live only in memory for the
//! duration of one goal and nothing is shared between executions.

pub mod classify;
pub mod decompose;
pub mod dispatch;
pub mod executor;
pub mod inject;
pub mod params;
pub mod task;

pub use classify::{classify_task_name, TaskType};
pub use decompose::{DecomposeError, GoalDecomposer};
pub use dispatch::{Dispatcher, TaskEndpoints, TaskOutcome};
pub use executor::{GoalError, GoalExecutor, GoalResult};
pub use params::{extract_quarter_and_year, ExtractedParams};
pub use task::Subtask;
