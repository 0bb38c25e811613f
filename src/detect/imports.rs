//! Duplicate import detection.
//!
//! Only the first module of each `import` statement is considered, and
//! `from ... import` statements are ignored. A repeat produces one coarse
//! issue for the whole unit, not one per name.

use std::collections::HashSet;

use crate::parser::{NodeKind, SyntaxTree};

use super::{Detector, Issue, IssueKind};

pub struct DuplicateImportDetector;

impl Detector for DuplicateImportDetector {
    fn name(&self) -> &'static str {
        "duplicate_import"
    }

    fn detect(&self, tree: &SyntaxTree, _source: &str) -> Vec<Issue> {
        let mut seen = HashSet::new();

        for node in tree.walk() {
            let first = match &node.kind {
                NodeKind::Import { names } => names.first(),
                _ => None,
            };
            let Some(name) = first else {
                continue;
            };

            if !seen.insert(name.as_str()) {
                return vec![Issue::new(
                    IssueKind::DuplicateImport,
                    "Possible unused or duplicate imports",
                )
                .named(name.as_str())
                .at(node.line, node.column)];
            }
        }

        Vec::new()
    }
}
