//! Work-marker counting.
//!
//! Counts every case-insensitive occurrence of `todo` in the raw source:
//! `# TODO`, `#todo`, `TODO:` and markers inside strings all count, as do
//! words that merely contain the substring.

use lazy_static::lazy_static;
use regex::Regex;

use crate::parser::SyntaxTree;

use super::{Detector, Issue, IssueKind};

lazy_static! {
    /// Pattern to match TODO markers
    static ref TODO_PATTERN: Regex = Regex::new(r"(?i)todo").unwrap();
}

/// Count work markers in raw source text.
pub fn count_todo_markers(source: &str) -> usize {
    TODO_PATTERN.find_iter(source).count()
}

/// Emits a single issue carrying the total marker count.
pub struct TodoMarkerDetector;

impl Detector for TodoMarkerDetector {
    fn name(&self) -> &'static str {
        "todo_marker"
    }

    fn detect(&self, _tree: &SyntaxTree, source: &str) -> Vec<Issue> {
        let count = count_todo_markers(source);
        if count == 0 {
            return Vec::new();
        }

        let plural = if count != 1 { "s" } else { "" };
        vec![Issue::new(
            IssueKind::TodoMarker,
            format!("Found {} TODO marker{}", count, plural),
        )
        .with_count(count)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn test_count_todo_markers() {
        assert_eq!(count_todo_markers(""), 0);
        assert_eq!(count_todo_markers("x = 1\n"), 0);
        assert_eq!(count_todo_markers("# TODO: fix\n"), 1);
        assert_eq!(count_todo_markers("# todo\n#ToDo\nmsg = 'TODO'\n"), 3);
        assert_eq!(count_todo_markers("todotodo"), 2);
    }

    #[test]
    fn test_detector_reports_total_count() {
        let source = "\"\"\"Doc.\"\"\"\n# TODO one\nx = 1  # todo two\n";
        let tree = parser::parse(source).unwrap();
        let issues = TodoMarkerDetector.detect(&tree, source);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::TodoMarker);
        assert_eq!(issues[0].count, Some(2));
        assert!(issues[0].location.is_none());
    }

    #[test]
    fn test_no_markers_no_issue() {
        let source = "x = 1\n";
        let tree = parser::parse(source).unwrap();
        assert!(TodoMarkerDetector.detect(&tree, source).is_empty());
    }
}
