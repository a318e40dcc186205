//! Quarter/year extraction from free-text goals.
//!
//! The backend extraction is authoritative. The UI may pre-validate goals
//! before submission, but nothing here trusts client-side checks.

use std::sync::OnceLock;

use regex::Regex;

/// Reporting parameters pulled out of a goal string.
///
/// Both fields must be present for a goal to be executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedParams {
    /// Quarter in normalized uppercase form, e.g. `Q3`.
    pub quarter: Option<String>,
    /// Four-digit year as matched, e.g. `2024`.
    pub year: Option<String>,
}

impl ExtractedParams {
    /// True when both quarter and year were found.
    pub fn is_complete(&self) -> bool {
        self.quarter.is_some() && self.year.is_some()
    }
}

fn quarter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Q([1-4])").unwrap())
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(20\d{2})\b").unwrap())
}

/// Extract a quarter token (Q1-Q4, any case) and a four-digit year
/// (2000-2099) from a goal string. Either may be absent; the quarter is
/// normalized to uppercase.
pub fn extract_quarter_and_year(goal: &str) -> ExtractedParams {
    let quarter = quarter_re()
        .captures(goal)
        .map(|c| format!("Q{}", &c[1]));
    let year = year_re().captures(goal).map(|c| c[1].to_string());

    ExtractedParams { quarter, year }
}
