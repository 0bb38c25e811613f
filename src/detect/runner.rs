//! Rule engine that runs every detector over one parsed unit.

use crate::parser::SyntaxTree;

use super::{
    DefinitionDocDetector, DuplicateImportDetector, EmptyExceptHandlerDetector, Issue,
    LongFunctionDetector, ModuleDocDetector, TodoMarkerDetector,
};

/// A single independent analysis rule.
///
/// Detectors see the same tree and text, never each other's output, and
/// emit issues in document order.
pub trait Detector {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// Inspect a parsed unit and return its findings.
    fn detect(&self, tree: &SyntaxTree, source: &str) -> Vec<Issue>;
}

/// Owns the fixed, ordered detector set.
///
/// Registration order: module docstring, definition docstrings, long
/// functions, TODO markers, duplicate imports, empty exception handlers.
/// Issues are concatenated in that order.
pub struct RuleEngine {
    detectors: Vec<Box<dyn Detector>>,
}

impl RuleEngine {
    /// Create the engine with the given long-function threshold.
    pub fn new(max_function_lines: usize) -> Self {
        Self {
            detectors: vec![
                Box::new(ModuleDocDetector),
                Box::new(DefinitionDocDetector),
                Box::new(LongFunctionDetector::new(max_function_lines)),
                Box::new(TodoMarkerDetector),
                Box::new(DuplicateImportDetector),
                Box::new(EmptyExceptHandlerDetector),
            ],
        }
    }

    /// Names of the registered detectors, in run order.
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run all detectors over a successfully parsed unit.
    pub fn run(&self, tree: &SyntaxTree, source: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for detector in &self.detectors {
            let found = detector.detect(tree, source);
            tracing::debug!("{}: {} issue(s)", detector.name(), found.len());
            issues.extend(found);
        }

        issues
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(super::DEFAULT_MAX_FUNCTION_LINES)
    }
}
