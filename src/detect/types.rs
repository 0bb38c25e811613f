//! Core types for detection results.

use serde::{Deserialize, Serialize};

/// The closed set of findings the rule engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "missing_module_docstring")]
    MissingModuleDoc,
    #[serde(rename = "missing_function_docstring")]
    MissingFunctionDoc,
    #[serde(rename = "missing_class_docstring")]
    MissingClassDoc,
    #[serde(rename = "long_function")]
    LongFunction,
    #[serde(rename = "todos_found")]
    TodoMarker,
    #[serde(rename = "duplicate_import")]
    DuplicateImport,
    #[serde(rename = "empty_except_handler")]
    EmptyExceptHandler,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingModuleDoc => "missing_module_docstring",
            IssueKind::MissingFunctionDoc => "missing_function_docstring",
            IssueKind::MissingClassDoc => "missing_class_docstring",
            IssueKind::LongFunction => "long_function",
            IssueKind::TodoMarker => "todos_found",
            IssueKind::DuplicateImport => "duplicate_import",
            IssueKind::EmptyExceptHandler => "empty_except_handler",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of a finding (1-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// Line extent of a function, as measured by the long-function rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub length: usize,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Name of the construct the finding is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<LineSpan>,
    /// Occurrence count, for counting rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl Issue {
    /// An issue with only a kind and message.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
            name: None,
            span: None,
            count: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.location = Some(Location { line, column });
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_span(mut self, span: LineSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Line of the finding, if it has one.
    pub fn line(&self) -> Option<usize> {
        self.location.map(|l| l.line)
    }
}
