//! Scalar metrics derived from the source text and the issue list.

use serde::{Deserialize, Serialize};

use crate::detect::{count_todo_markers, Issue};

/// Per-report metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Lines in the raw text, blank and comment lines included.
    pub lines_of_code: usize,
    pub todo_count: usize,
    /// Always equal to the length of the report's issue list.
    #[serde(rename = "num_issues")]
    pub issue_count: usize,
    /// Score supplied by the external linter, when one ran and reported it.
    #[serde(
        rename = "code_quality_score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_score: Option<f64>,
}

impl Metrics {
    /// Compute metrics for a source unit and its issues.
    pub fn collect(source: &str, issues: &[Issue]) -> Self {
        Self {
            lines_of_code: source.lines().count(),
            todo_count: count_todo_markers(source),
            issue_count: issues.len(),
            quality_score: None,
        }
    }

    /// Attach the external linter's score.
    pub fn with_quality_score(mut self, score: Option<f64>) -> Self {
        self.quality_score = score;
        self
    }
}
