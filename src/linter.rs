//! External linter integration.
//!
//! Runs pylint as a subprocess against the source path and collects its
//! JSON messages plus the "rated at X/10" score line. The subprocess has no
//! timeout. Failures are returned as `LinterError`; callers degrade to an
//! empty message list and no score.

use std::path::Path;
use std::process::Command;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default linter executable.
pub const DEFAULT_LINTER_COMMAND: &str = "pylint";

lazy_static! {
    static ref SCORE_PATTERN: Regex =
        Regex::new(r"rated at\s+(-?\d+(?:\.\d+)?)\s*/\s*10").unwrap();
}

/// Errors from running or reading the external linter.
#[derive(Error, Debug)]
pub enum LinterError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed linter output: {0}")]
    MalformedOutput(#[from] serde_json::Error),
}

/// One message from pylint's JSON output. Fields pylint adds beyond these
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterMessage {
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "message-id", default)]
    pub message_id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub obj: String,
    #[serde(default)]
    pub line: Option<usize>,
    #[serde(default)]
    pub column: Option<usize>,
}

/// Messages and score from one linter run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinterOutcome {
    pub messages: Vec<LinterMessage>,
    pub score: Option<f64>,
}

/// A linter that can be run against a source file.
pub trait ExternalLinter {
    fn name(&self) -> &str;

    fn lint(&self, path: &Path) -> Result<LinterOutcome, LinterError>;
}

/// Pylint invoked as `<command> --score=y --output-format=json <path>`.
pub struct Pylint {
    command: String,
}

impl Pylint {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for Pylint {
    fn default() -> Self {
        Self::new(DEFAULT_LINTER_COMMAND)
    }
}

impl ExternalLinter for Pylint {
    fn name(&self) -> &str {
        &self.command
    }

    fn lint(&self, path: &Path) -> Result<LinterOutcome, LinterError> {
        tracing::debug!("running {} on {}", self.command, path.display());
        let output = Command::new(&self.command)
            .args(["--score=y", "--output-format=json"])
            .arg(path)
            .output()
            .map_err(|source| LinterError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // pylint exits non-zero whenever it reports messages, so the status
        // is not an error signal.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_output(&stdout, &stderr)
    }
}

/// Parse pylint's streams: JSON messages on stdout, score line on stderr
/// (stdout is searched as a fallback).
pub fn parse_output(stdout: &str, stderr: &str) -> Result<LinterOutcome, LinterError> {
    let trimmed = stdout.trim();
    let messages = if trimmed.is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(trimmed)?
    };

    let score = parse_score(stderr).or_else(|| parse_score(stdout));
    Ok(LinterOutcome { messages, score })
}

/// Extract the numeric score from a "Your code has been rated at X/10" line.
pub fn parse_score(text: &str) -> Option<f64> {
    SCORE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYLINT_JSON: &str = r#"[
    {
        "type": "convention",
        "module": "app",
        "obj": "",
        "line": 1,
        "column": 0,
        "endLine": null,
        "endColumn": null,
        "path": "app.py",
        "symbol": "missing-module-docstring",
        "message": "Missing module docstring",
        "message-id": "C0114"
    }
]"#;

    #[test]
    fn test_parse_output() {
        let stderr = "\n------------------------------------\nYour code has been rated at 6.67/10\n";
        let outcome = parse_output(PYLINT_JSON, stderr).unwrap();

        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(outcome.messages[0].symbol, "missing-module-docstring");
        assert_eq!(outcome.messages[0].message_id, "C0114");
        assert_eq!(outcome.messages[0].line, Some(1));
        assert_eq!(outcome.score, Some(6.67));
    }

    #[test]
    fn test_empty_output() {
        let outcome = parse_output("", "").unwrap();
        assert!(outcome.messages.is_empty());
        assert_eq!(outcome.score, None);
    }

    #[test]
    fn test_malformed_output() {
        let err = parse_output("not json", "").unwrap_err();
        assert!(matches!(err, LinterError::MalformedOutput(_)));
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("Your code has been rated at 10.00/10"), Some(10.0));
        assert_eq!(
            parse_score("Your code has been rated at -2.50/10 (previous run: 1.00/10)"),
            Some(-2.5)
        );
        assert_eq!(parse_score("no score here"), None);
    }

    #[test]
    fn test_missing_executable() {
        let linter = Pylint::new("bugdetect-no-such-linter");
        let err = linter.lint(Path::new("app.py")).unwrap_err();
        assert!(matches!(err, LinterError::Spawn { .. }));
    }
}
