//! Post-decomposition fixups.
//!
//! Two invariants hold after this stage: the list contains at least one
//! fetch-typed subtask, and every subtask carries the quarter/year taken
//! from the goal text. The extractor is the authoritative source of those
//! parameters; values the model put in are overwritten.

use super::classify::TaskType;
use super::params::ExtractedParams;
use super::task::{Subtask, INJECTED_FETCH_ID, INJECTED_FETCH_NAME};

/// Guarantee a data-fetch step and stamp the goal parameters onto every
/// subtask.
///
/// `params` must be complete; the executor validates this before
/// decomposition ever runs.
pub fn finalize_subtasks(subtasks: &mut Vec<Subtask>, params: &ExtractedParams) {
    let quarter = params.quarter.clone().unwrap_or_default();
    let year = params.year.clone().unwrap_or_default();

    let has_fetch = subtasks
        .iter()
        .any(|task| task.task_type == TaskType::FetchData);

    if !has_fetch {
        tracing::warn!("No fetchData subtask detected, injecting one");
        subtasks.insert(
            0,
            Subtask {
                task_id: INJECTED_FETCH_ID.to_string(),
                task_name: INJECTED_FETCH_NAME.to_string(),
                task_type: TaskType::FetchData,
                description: String::new(),
                quarter: quarter.clone(),
                year: year.clone(),
            },
        );
    }

    for task in subtasks.iter_mut() {
        task.quarter = quarter.clone();
        task.year = year.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ExtractedParams {
        ExtractedParams {
            quarter: Some("Q3".into()),
            year: Some("2024".into()),
        }
    }

    fn subtask(id: &str, name: &str, task_type: TaskType) -> Subtask {
        Subtask {
            task_id: id.into(),
            task_name: name.into(),
            task_type,
            description: String::new(),
            quarter: "Q9".into(), // model-supplied garbage, must be overwritten
            year: "1987".into(),
        }
    }

    #[test]
    fn injects_fetch_task_when_absent() {
        let mut subtasks = vec![
            subtask("task-1", "Analyze win rates", TaskType::AnalyzeData),
            subtask("task-2", "Draft summary", TaskType::GenerateReport),
        ];

        finalize_subtasks(&mut subtasks, &params());

        assert_eq!(subtasks.len(), 3);
        assert_eq!(subtasks[0].task_id, INJECTED_FETCH_ID);
        assert_eq!(subtasks[0].task_name, INJECTED_FETCH_NAME);
        assert_eq!(subtasks[0].task_type, TaskType::FetchData);
    }

    #[test]
    fn keeps_existing_fetch_task() {
        let mut subtasks = vec![
            subtask("task-1", "Retrieve opportunities", TaskType::FetchData),
            subtask("task-2", "Analyze win rates", TaskType::AnalyzeData),
        ];

        finalize_subtasks(&mut subtasks, &params());

        assert_eq!(subtasks.len(), 2);
        assert_eq!(subtasks[0].task_id, "task-1");
    }

    #[test]
    fn stamps_params_on_every_subtask_overwriting_model_values() {
        let mut subtasks = vec![
            subtask("task-1", "Analyze win rates", TaskType::AnalyzeData),
            subtask("task-2", "Draft summary", TaskType::GenerateReport),
        ];

        finalize_subtasks(&mut subtasks, &params());

        for task in &subtasks {
            assert_eq!(task.quarter, "Q3");
            assert_eq!(task.year, "2024");
        }
    }

    #[test]
    fn empty_list_still_gets_a_fetch_task() {
        let mut subtasks = Vec::new();
        finalize_subtasks(&mut subtasks, &params());

        assert_eq!(subtasks.len(), 1);
        assert_eq!(subtasks[0].task_type, TaskType::FetchData);
        assert_eq!(subtasks[0].quarter, "Q3");
        assert_eq!(subtasks[0].year, "2024");
    }
}
