//! Command-line interface for bugdetect.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::analyze::Analyzer;
use crate::config::{self, Config, DEFAULT_CONFIG_NAMES};
use crate::detect::RuleEngine;
use crate::domain::Sector;
use crate::linter::Pylint;
use crate::report;
use crate::store::ReportStore;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_STORE_FAILED: i32 = 3;

/// Rule-based static analyzer for Python sources.
///
/// Parses a file, runs a fixed set of detectors (missing docstrings, long
/// functions, TODO markers, duplicate imports, try blocks without handlers),
/// collects simple metrics and appends the report to a JSON history.
#[derive(Parser)]
#[command(name = "bugdetect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a Python file and record the report
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),
    /// Show stored reports
    History(HistoryArgs),
    /// Create a bugdetect configuration file
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Python file to analyze
    #[arg(short, long)]
    pub file: PathBuf,

    /// Sector to file the report under (default: guessed from the source)
    #[arg(short, long, value_enum)]
    pub sector: Option<Sector>,

    /// Report store path (default: from config, else reports/bug_reports.json)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: json or pretty
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Maximum function length in lines before it is reported
    #[arg(short, long)]
    pub threshold: Option<usize>,

    /// Run the external linter (pylint)
    #[arg(long)]
    pub lint: bool,

    /// Print the report without appending it to the store
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for the history command.
#[derive(Parser)]
pub struct HistoryArgs {
    /// Report store path (default: from config, else reports/bug_reports.json)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show only the most recent N reports
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "bugdetect.yaml")]
    pub output: PathBuf,
}

const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Load the configuration named on the command line, or the first one found
/// in the working directory, or the defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let config = match explicit {
        Some(path) => Config::parse_file(path)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?,
        None => match Config::discover(Path::new("."))? {
            Some((path, config)) => {
                tracing::debug!("using config {}", path.display());
                config
            }
            None => Config::default(),
        },
    };
    config::validate(&config)?;
    Ok(config)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'json' or 'pretty'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    if args.threshold == Some(0) {
        eprintln!("Error: --threshold must be at least 1");
        return Ok(EXIT_ERROR);
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Flags override the config file.
    let threshold = args
        .threshold
        .unwrap_or_else(|| config.long_function_threshold());
    let engine = RuleEngine::new(threshold);
    tracing::debug!("detectors: {}", engine.detector_names().join(", "));
    let mut analyzer = Analyzer::new(engine);
    if args.lint || config.linter_enabled() {
        analyzer = analyzer.with_linter(Box::new(Pylint::new(config.linter_command())));
    }

    let report = match analyzer.analyze_file(&args.file, args.sector) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match args.format.as_str() {
        "json" => report::write_json(&report)?,
        _ => report::write_pretty(&report),
    }

    if args.no_save {
        return Ok(EXIT_SUCCESS);
    }

    let store_path = args.store.clone().unwrap_or_else(|| config.store_path());
    if let Err(e) = ReportStore::new(&store_path).append(&report) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_STORE_FAILED);
    }

    Ok(EXIT_SUCCESS)
}

/// Run the history command.
pub fn run_history(args: &HistoryArgs) -> anyhow::Result<i32> {
    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let store_path = args.store.clone().unwrap_or_else(|| config.store_path());
    let store = ReportStore::new(&store_path);
    let reports = store.load_reports();

    if reports.is_empty() {
        println!("No reports in {}", store.path().display());
        return Ok(EXIT_SUCCESS);
    }

    println!();
    report::write_history(&reports, args.limit);
    println!();
    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    if DEFAULT_CONFIG_NAMES
        .iter()
        .any(|name| args.output == Path::new(name))
    {
        println!("  2. Run: bugdetect analyze --file <path>");
    } else {
        println!(
            "  2. Run: bugdetect analyze --file <path> --config {}",
            args.output.display()
        );
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from([
            "bugdetect",
            "analyze",
            "--file",
            "app.py",
            "--sector",
            "health",
            "--threshold",
            "30",
            "--no-save",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.file, PathBuf::from("app.py"));
                assert_eq!(args.sector, Some(Sector::Health));
                assert_eq!(args.threshold, Some(30));
                assert_eq!(args.format, "json");
                assert!(args.no_save);
                assert!(!args.lint);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_unknown_sector_rejected() {
        let result = Cli::try_parse_from(["bugdetect", "analyze", "-f", "a.py", "-s", "unknown"]);
        assert!(result.is_err(), "classifier-only sector must not be accepted");
    }

    #[test]
    fn test_invalid_format() {
        let args = AnalyzeArgs {
            file: PathBuf::from("a.py"),
            sector: None,
            store: None,
            config: None,
            format: "sarif".to_string(),
            threshold: None,
            lint: false,
            no_save: true,
        };
        assert_eq!(run_analyze(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("conf/bugdetect.yaml");
        let args = InitArgs {
            output: output.clone(),
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert!(Config::parse_file(&output).is_ok());
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }
}
