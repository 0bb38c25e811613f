//! Analysis reports and their console output.
//!
//! Supports two output formats:
//! - JSON: the report exactly as it is persisted
//! - Pretty: colored terminal summary for human readability

use colored::*;
use serde::{Deserialize, Serialize};

use crate::detect::Issue;
use crate::domain::Sector;
use crate::linter::LinterMessage;
use crate::metrics::Metrics;
use crate::parser::SyntaxErrorDescriptor;

/// The result of analyzing one source unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Path of the analyzed file, as given by the caller.
    pub file: String,
    pub sector: Sector,
    /// Set when the unit failed to parse. No detector ran in that case.
    pub syntax_error: Option<SyntaxErrorDescriptor>,
    pub issues: Vec<Issue>,
    pub metrics: Metrics,
    /// RFC 3339 time of the analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_on: Option<String>,
    /// Messages from the external linter, if it ran.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_issues: Vec<LinterMessage>,
}

impl Report {
    /// Report for a unit that parsed and went through the rule engine.
    pub fn analyzed(file: impl Into<String>, sector: Sector, issues: Vec<Issue>, metrics: Metrics) -> Self {
        Self {
            file: file.into(),
            sector,
            syntax_error: None,
            issues,
            metrics,
            analyzed_on: None,
            external_issues: Vec::new(),
        }
    }

    /// Report for a unit that failed to parse: only the error is carried.
    pub fn syntax_failure(file: impl Into<String>, sector: Sector, error: SyntaxErrorDescriptor) -> Self {
        Self {
            file: file.into(),
            sector,
            syntax_error: Some(error),
            issues: Vec::new(),
            metrics: Metrics::default(),
            analyzed_on: None,
            external_issues: Vec::new(),
        }
    }

    /// Stamp the report with the current time.
    pub fn stamped(mut self) -> Self {
        self.analyzed_on = Some(
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        );
        self
    }

    pub fn has_syntax_error(&self) -> bool {
        self.syntax_error.is_some()
    }

    /// Whether the metrics agree with the issue list.
    pub fn is_consistent(&self) -> bool {
        self.metrics.issue_count == self.issues.len()
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Serialize a report the way it is persisted (2-space indent).
pub fn to_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write a report to stdout as JSON.
pub fn write_json(report: &Report) -> anyhow::Result<()> {
    println!("{}", to_json(report)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a report in pretty (human-readable) format.
pub fn write_pretty(report: &Report) {
    // Header
    println!();
    print!("  ");
    print!("{}", "bugdetect".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "File:     ".dimmed());
    println!("{}", report.file);
    print!("  {}", "Sector:   ".dimmed());
    println!("{}", report.sector);
    if let Some(ref when) = report.analyzed_on {
        print!("  {}", "Analyzed: ".dimmed());
        println!("{}", when);
    }
    println!();

    if let Some(ref err) = report.syntax_error {
        write_syntax_error(err);
        println!();
        return;
    }

    write_metrics(&report.metrics);
    println!();

    if !report.issues.is_empty() {
        write_issues(&report.issues);
        println!();
    }

    if !report.external_issues.is_empty() {
        write_external_issues(&report.external_issues);
        println!();
    }

    if report.issues.is_empty() {
        println!("  {}", "✓ No issues found".green());
        println!();
    }
}

fn write_syntax_error(err: &SyntaxErrorDescriptor) {
    print!("  {}", "✗ SYNTAX ERROR".red().bold());
    println!("  {}", format!("line {}, column {}", err.line, err.column).dimmed());
    println!("            {}", err.message);
    if !err.offending_text.is_empty() {
        println!("            {}", err.offending_text.yellow());
    }
}

fn write_metrics(metrics: &Metrics) {
    print!("  Lines: {}", metrics.lines_of_code);
    print!("  TODOs: ");
    if metrics.todo_count > 0 {
        print!("{}", metrics.todo_count.to_string().yellow());
    } else {
        print!("{}", metrics.todo_count.to_string().green());
    }
    print!("  Issues: ");
    if metrics.issue_count > 0 {
        print!("{}", metrics.issue_count.to_string().red());
    } else {
        print!("{}", metrics.issue_count.to_string().green());
    }
    if let Some(score) = metrics.quality_score {
        print!("  Score: ");
        write_colored_score(score);
    }
    println!();
}

fn write_colored_score(score: f64) {
    let text = format!("{:.2}/10", score);
    match score {
        s if s >= 8.0 => print!("{}", text.green().bold()),
        s if s >= 5.0 => print!("{}", text.yellow()),
        _ => print!("{}", text.red()),
    }
}

fn write_issues(issues: &[Issue]) {
    println!("  {} ({}):", "Issues".bold(), issues.len());
    println!();

    for issue in issues {
        print!("    {:<28}", issue.kind.as_str().dimmed());
        if let Some(ref name) = issue.name {
            print!("{}", name.blue());
        }
        if let Some(line) = issue.line() {
            print!("{}", format!(":{}", line).dimmed());
        }
        println!();

        // Message on next line, indented
        println!("            {}", issue.message);
        println!();
    }
}

fn write_external_issues(messages: &[LinterMessage]) {
    println!("  {} ({}):", "Linter".bold(), messages.len());

    for m in messages {
        let line = m.line.map(|l| format!(":{}", l)).unwrap_or_default();
        println!(
            "    {:<10} {:<28} {}",
            m.message_id.dimmed(),
            format!("{}{}", m.symbol, line),
            m.message
        );
    }
}

/// Write a table of stored reports, most recent last.
pub fn write_history(reports: &[Report], limit: Option<usize>) {
    let skip = match limit {
        Some(n) => reports.len().saturating_sub(n),
        None => 0,
    };

    println!("  {} ({}):", "Reports".bold(), reports.len());
    println!();

    for report in &reports[skip..] {
        let when = report.analyzed_on.as_deref().unwrap_or("-");
        print!("    {:<22}", when.dimmed());
        print!("{:<13}", report.sector.as_str());
        print!("{}", report.file.blue());
        if report.has_syntax_error() {
            println!("  {}", "syntax error".red());
        } else {
            println!("  {} issue(s)", report.issues.len());
        }
    }
}
