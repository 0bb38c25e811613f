//! Analysis pipeline for a single source unit.
//!
//! ```text
//! SourceUnit ─▶ parse ─┬─▶ RuleEngine ─▶ Metrics (+ linter) ─▶ Report
//!                      └─▶ syntax error ─────────────────────▶ Report
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::detect::RuleEngine;
use crate::domain::{self, Sector};
use crate::linter::ExternalLinter;
use crate::metrics::Metrics;
use crate::parser;
use crate::report::Report;

/// Errors that stop a run before any report exists.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The text of one source file and the path it was loaded from.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a UTF-8 source file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalyzeError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnalyzeError::SourceNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| AnalyzeError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, normalize_newlines(text)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Python reads `\r\n` and a lone `\r` as line ends; everything downstream
/// splits on `\n` only.
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Runs the rule engine and the optional external linter over source units.
pub struct Analyzer {
    engine: RuleEngine,
    linter: Option<Box<dyn ExternalLinter>>,
}

impl Analyzer {
    pub fn new(engine: RuleEngine) -> Self {
        Self {
            engine,
            linter: None,
        }
    }

    /// Also run an external linter on units that parse.
    pub fn with_linter(mut self, linter: Box<dyn ExternalLinter>) -> Self {
        self.linter = Some(linter);
        self
    }

    /// Analyze a unit. When `sector` is `None` it is classified from the
    /// source text.
    ///
    /// A syntax error is a normal outcome: the report carries the error and
    /// nothing else.
    pub fn analyze(&self, unit: &SourceUnit, sector: Option<Sector>) -> Report {
        let file = unit.path().to_string_lossy().to_string();
        let sector = sector.unwrap_or_else(|| domain::classify(unit.text()));

        let tree = match parser::parse(unit.text()) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::info!("{} has a syntax error: {}", file, err);
                return Report::syntax_failure(file, sector, err);
            }
        };

        let issues = self.engine.run(&tree, unit.text());
        let mut metrics = Metrics::collect(unit.text(), &issues);
        let mut report_external = Vec::new();

        if let Some(linter) = &self.linter {
            match linter.lint(unit.path()) {
                Ok(outcome) => {
                    metrics = metrics.with_quality_score(outcome.score);
                    report_external = outcome.messages;
                }
                Err(e) => {
                    tracing::warn!("{} failed, continuing without it: {}", linter.name(), e);
                }
            }
        }

        tracing::debug!("{}: {} issue(s)", file, issues.len());
        let mut report = Report::analyzed(file, sector, issues, metrics);
        report.external_issues = report_external;
        report
    }

    /// Load and analyze a file, stamping the report with the current time.
    pub fn analyze_file<P: AsRef<Path>>(
        &self,
        path: P,
        sector: Option<Sector>,
    ) -> Result<Report, AnalyzeError> {
        let unit = SourceUnit::load(path)?;
        Ok(self.analyze(&unit, sector).stamped())
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(RuleEngine::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::IssueKind;
    use crate::linter::{LinterError, LinterMessage, LinterOutcome};
    use tempfile::TempDir;

    struct FixedLinter(Option<f64>);

    impl ExternalLinter for FixedLinter {
        fn name(&self) -> &str {
            "fixed"
        }

        fn lint(&self, _path: &Path) -> Result<LinterOutcome, LinterError> {
            Ok(LinterOutcome {
                messages: vec![LinterMessage {
                    category: "convention".to_string(),
                    symbol: "missing-module-docstring".to_string(),
                    message: "Missing module docstring".to_string(),
                    message_id: "C0114".to_string(),
                    path: "f.py".to_string(),
                    obj: String::new(),
                    line: Some(1),
                    column: Some(0),
                }],
                score: self.0,
            })
        }
    }

    struct BrokenLinter;

    impl ExternalLinter for BrokenLinter {
        fn name(&self) -> &str {
            "broken"
        }

        fn lint(&self, _path: &Path) -> Result<LinterOutcome, LinterError> {
            Err(LinterError::Spawn {
                command: "broken".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }
    }

    #[test]
    fn test_undocumented_function_scenario() {
        let unit = SourceUnit::new("f.py", "def f():\n    pass\n");
        let report = Analyzer::default().analyze(&unit, Some(Sector::Education));

        let kinds: Vec<_> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::MissingModuleDoc, IssueKind::MissingFunctionDoc]
        );
        assert_eq!(report.issues[1].name.as_deref(), Some("f"));
        assert_eq!(report.metrics.lines_of_code, 2);
        assert_eq!(report.metrics.todo_count, 0);
        assert_eq!(report.metrics.issue_count, 2);
        assert!(report.syntax_error.is_none());
    }

    #[test]
    fn test_syntax_error_short_circuits() {
        let unit = SourceUnit::new("bad.py", "def f(:\n    pass\n");
        let analyzer = Analyzer::default().with_linter(Box::new(FixedLinter(Some(9.0))));
        let report = analyzer.analyze(&unit, Some(Sector::Health));

        assert!(report.syntax_error.is_some());
        assert!(report.issues.is_empty());
        assert!(report.external_issues.is_empty());
        assert_eq!(report.metrics, Metrics::default());
    }

    #[test]
    fn test_unindented_body_is_a_syntax_error() {
        let unit = SourceUnit::new("c.py", "class C:\npass\n");
        let report = Analyzer::default().analyze(&unit, Some(Sector::Education));

        let err = report.syntax_error.expect("unindented class body must not parse");
        assert_eq!(err.line, 2);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_sector_is_classified_when_not_given() {
        let unit = SourceUnit::new("h.py", "\"\"\"Tracks each patient.\"\"\"\n");
        let report = Analyzer::default().analyze(&unit, None);
        assert_eq!(report.sector, Sector::Health);
    }

    #[test]
    fn test_linter_results_are_attached() {
        let unit = SourceUnit::new("f.py", "x = 1\n");
        let analyzer = Analyzer::default().with_linter(Box::new(FixedLinter(Some(7.5))));
        let report = analyzer.analyze(&unit, Some(Sector::Education));

        assert_eq!(report.metrics.quality_score, Some(7.5));
        assert_eq!(report.external_issues.len(), 1);
        // Linter messages are not rule-engine issues.
        assert!(report.is_consistent());
    }

    #[test]
    fn test_linter_failure_degrades() {
        let unit = SourceUnit::new("f.py", "x = 1\n");
        let analyzer = Analyzer::default().with_linter(Box::new(BrokenLinter));
        let report = analyzer.analyze(&unit, Some(Sector::Education));

        assert_eq!(report.metrics.quality_score, None);
        assert!(report.external_issues.is_empty());
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = Analyzer::default()
            .analyze_file(temp.path().join("absent.py"), None)
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::SourceNotFound(_)));
    }

    #[test]
    fn test_analyze_file_is_stamped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ok.py");
        std::fs::write(&path, "\"\"\"Doc.\"\"\"\n").unwrap();

        let report = Analyzer::default().analyze_file(&path, None).unwrap();
        assert!(report.analyzed_on.is_some());
        assert!(report.issues.is_empty());
        assert_eq!(report.sector, Sector::Unknown);
    }

    #[test]
    fn test_load_normalizes_line_endings() {
        let temp = TempDir::new().unwrap();
        let old_mac = temp.path().join("cr.py");
        std::fs::write(&old_mac, "\"\"\"Doc.\"\"\"\rx = 1\r").unwrap();
        let windows = temp.path().join("crlf.py");
        std::fs::write(&windows, "\"\"\"Doc.\"\"\"\r\nx = 1\r\n").unwrap();

        for path in [old_mac, windows] {
            let unit = SourceUnit::load(&path).unwrap();
            assert_eq!(unit.text(), "\"\"\"Doc.\"\"\"\nx = 1\n");

            let report = Analyzer::default().analyze(&unit, Some(Sector::Education));
            assert!(report.syntax_error.is_none(), "{}", path.display());
            assert_eq!(report.metrics.lines_of_code, 2);
            assert!(report.issues.is_empty());
        }
    }
}
