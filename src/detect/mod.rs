//! Detection rules run over a parsed Python unit.

mod docstrings;
mod handlers;
mod imports;
mod long_functions;
mod runner;
mod todos;
mod types;

pub use docstrings::{DefinitionDocDetector, ModuleDocDetector};
pub use handlers::EmptyExceptHandlerDetector;
pub use imports::DuplicateImportDetector;
pub use long_functions::{LongFunctionDetector, DEFAULT_MAX_FUNCTION_LINES};
pub use runner::{Detector, RuleEngine};
pub use todos::{count_todo_markers, TodoMarkerDetector};
pub use types::{Issue, IssueKind, LineSpan, Location};
