//! Detection of `try` statements without any `except` clause.
//!
//! An `except` clause whose body is only `pass` is still a handler and is
//! not reported.

use crate::parser::{NodeKind, SyntaxTree};

use super::{Detector, Issue, IssueKind};

pub struct EmptyExceptHandlerDetector;

impl Detector for EmptyExceptHandlerDetector {
    fn name(&self) -> &'static str {
        "empty_except_handler"
    }

    fn detect(&self, tree: &SyntaxTree, _source: &str) -> Vec<Issue> {
        tree.walk()
            .filter(|node| matches!(node.kind, NodeKind::Try { handlers: 0 }))
            .map(|node| {
                Issue::new(
                    IssueKind::EmptyExceptHandler,
                    "Try block without any except handler",
                )
                .at(node.line, node.column)
            })
            .collect()
    }
}
