//! bugdetect - rule-based static analysis for Python sources.
//!
//! A source file is parsed into a syntax tree, a fixed set of detectors
//! runs over it, simple metrics are collected, and the resulting report is
//! appended to a JSON history on disk. A file that does not parse produces
//! a report carrying only the syntax error.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter based Python parser lowered to a small owned tree
//! - `detect`: detectors and the rule engine that runs them in order
//! - `metrics`: line, TODO and issue counts
//! - `analyze`: the per-file pipeline
//! - `domain`: sector labels and the keyword classifier
//! - `linter`: optional pylint integration
//! - `store`: append-only report history
//! - `config`: YAML configuration file
//! - `report`: output formatting (JSON, pretty)

pub mod analyze;
pub mod cli;
pub mod config;
pub mod detect;
pub mod domain;
pub mod linter;
pub mod metrics;
pub mod parser;
pub mod report;
pub mod store;

pub use analyze::{AnalyzeError, Analyzer, SourceUnit};
pub use config::Config;
pub use detect::{Detector, Issue, IssueKind, RuleEngine};
pub use domain::{classify, Sector};
pub use linter::{ExternalLinter, LinterError, LinterOutcome, Pylint};
pub use metrics::Metrics;
pub use parser::{parse, Node, NodeKind, SyntaxErrorDescriptor, SyntaxTree};
pub use report::Report;
pub use store::{ReportStore, StoreError};
