//! Keyword-based subtask classification.
//!
//! Maps a free-text subtask name onto the fixed task taxonomy using an
//! ordered rule table. Declaration order is the tie-break: a name that
//! matches keywords from several categories resolves to the earliest one.

use serde::{Deserialize, Serialize};

/// The fixed task taxonomy.
///
/// `Unknown` is reserved for model-supplied names that were not strings;
/// it has no registered endpoint and fails at dispatch rather than here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    FetchData,
    ProcessData,
    AnalyzeData,
    GenerateReport,
    Unknown,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskType::FetchData => "fetchData",
            TaskType::ProcessData => "processData",
            TaskType::AnalyzeData => "analyzeData",
            TaskType::GenerateReport => "generateReport",
            TaskType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Ordered classification rules. First category with a matching keyword
/// wins, so earlier rows take priority ("Compile" appears in both the
/// process and report sets and resolves to process).
const RULES: &[(TaskType, &[&str])] = &[
    (
        TaskType::FetchData,
        &["identify", "gather", "retrieve", "fetch", "extract", "collect"],
    ),
    (
        TaskType::ProcessData,
        &[
            "sort",
            "organize",
            "clean",
            "structure",
            "filter",
            "categorize",
            "compile",
        ],
    ),
    (
        TaskType::AnalyzeData,
        &["calculate", "analyze", "evaluate", "compare", "assess"],
    ),
    (
        TaskType::GenerateReport,
        &[
            "prepare",
            "compile",
            "summarize",
            "draft",
            "review",
            "finalize",
            "submit",
            "adjust",
            "conclusions",
            "recommendations",
        ],
    ),
];

/// Classify a subtask name into a task type.
///
/// Case-insensitive substring match against the ordered rule table. Names
/// matching nothing default to `ProcessData`. TODO: revisit that default;
/// it silently routes unclassified names to the processing stage instead
/// of surfacing the classification gap.
pub fn classify_task_name(name: &str) -> TaskType {
    let lowered = name.to_lowercase();

    for (task_type, keywords) in RULES {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *task_type;
        }
    }

    TaskType::ProcessData
}
