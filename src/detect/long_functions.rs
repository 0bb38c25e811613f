//! Detection of oversized functions.
//!
//! A function's end line is the largest start line of any node in its
//! subtree, not the line its block actually closes on. A function whose last
//! statement is itself a multi-line construct is measured to that
//! construct's last *starting* line. Reports depend on this measure, so it
//! is kept as is.

use crate::parser::SyntaxTree;

use super::{Detector, Issue, IssueKind, LineSpan};

/// Default maximum function length, in lines past the declaration.
pub const DEFAULT_MAX_FUNCTION_LINES: usize = 50;

/// Flags functions whose measured length exceeds a threshold.
pub struct LongFunctionDetector {
    threshold: usize,
}

impl LongFunctionDetector {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }
}

impl Default for LongFunctionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FUNCTION_LINES)
    }
}

impl Detector for LongFunctionDetector {
    fn name(&self) -> &'static str {
        "long_function"
    }

    fn detect(&self, tree: &SyntaxTree, _source: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for func in tree.functions() {
            let start_line = func.line;
            let end_line = func.max_line();
            let length = end_line - start_line;
            if length <= self.threshold {
                continue;
            }

            let name = func.name().unwrap_or("<anonymous>");
            issues.push(
                Issue::new(
                    IssueKind::LongFunction,
                    format!("Function '{}' is too long ({} lines)", name, length),
                )
                .named(name)
                .at(func.line, func.column)
                .with_span(LineSpan {
                    start_line,
                    end_line,
                    length,
                }),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    /// A function whose body statements occupy the `body_lines` lines
    /// directly after its declaration.
    fn function_with_body(body_lines: usize) -> String {
        let mut source = String::from("def big():\n");
        for i in 0..body_lines {
            source.push_str(&format!("    x{} = {}\n", i, i));
        }
        source
    }

    #[test]
    fn test_exactly_threshold_is_not_flagged() {
        let source = function_with_body(50);
        let tree = parser::parse(&source).unwrap();
        assert!(LongFunctionDetector::default().detect(&tree, &source).is_empty());
    }

    #[test]
    fn test_one_past_threshold_is_flagged() {
        let source = function_with_body(51);
        let tree = parser::parse(&source).unwrap();
        let issues = LongFunctionDetector::default().detect(&tree, &source);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name.as_deref(), Some("big"));
        assert_eq!(
            issues[0].span,
            Some(LineSpan {
                start_line: 1,
                end_line: 52,
                length: 51,
            })
        );
    }

    #[test]
    fn test_trailing_comments_do_not_count() {
        let mut source = function_with_body(3);
        for _ in 0..60 {
            source.push_str("    # padding\n");
        }
        let tree = parser::parse(&source).unwrap();
        assert!(LongFunctionDetector::new(10).detect(&tree, &source).is_empty());
    }

    #[test]
    fn test_last_multiline_statement_measured_to_its_last_starting_line() {
        // The call spans lines 3-7; its last argument starts on line 6.
        let source = "def f():\n    x = 1\n    call(\n        1,\n        2,\n        3,\n    )\n";
        let tree = parser::parse(source).unwrap();
        let func = tree.functions().next().unwrap();
        assert_eq!(func.max_line(), 6);

        let issues = LongFunctionDetector::new(4).detect(&tree, source);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].span.map(|s| s.length), Some(5));
    }

    #[test]
    fn test_implicit_concatenation_measured_from_its_first_line() {
        let source = "def f():\n    x = (\"a\"\n         \"b\"\n         \"c\")\n";
        let tree = parser::parse(source).unwrap();
        let func = tree.functions().next().unwrap();
        assert_eq!(func.max_line(), 2);

        let mut source = function_with_body(45);
        source.push_str("    msg = (\"first\"\n");
        for _ in 0..10 {
            source.push_str("           \"more\"\n");
        }
        source.push_str("    )\n");
        let tree = parser::parse(&source).unwrap();
        assert!(
            LongFunctionDetector::default().detect(&tree, &source).is_empty(),
            "a long concatenated message should count as its first line only"
        );
    }

    #[test]
    fn test_nested_functions_are_measured_separately() {
        let mut source = String::from("def outer():\n    def inner():\n");
        for i in 0..12 {
            source.push_str(&format!("        y{} = {}\n", i, i));
        }
        let tree = parser::parse(&source).unwrap();
        let issues = LongFunctionDetector::new(12).detect(&tree, &source);

        let names: Vec<_> = issues.iter().filter_map(|i| i.name.as_deref()).collect();
        assert_eq!(names, vec!["outer"]);
    }
}
