//! Persisted report history.
//!
//! The store is one JSON array of report records. Every append reads the
//! whole array, pushes the new record and rewrites the file, so save cost
//! grows with the history. There is no locking: concurrent runs against
//! the same file are last-writer-wins.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::report::Report;

/// Default location of the report store, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "reports/bug_reports.json";

/// Mode given to a store file that does not exist yet.
#[cfg(unix)]
const NEW_STORE_MODE: u32 = 0o644;

/// Errors that prevent a report from being persisted.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report history: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write report store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A report history bound to a file path.
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the prior history as raw records.
    ///
    /// A missing file is an empty history. So is a file that cannot be read
    /// or does not hold a JSON array; its content is discarded on the next
    /// append.
    pub fn load_history(&self) -> Vec<Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    "cannot read report store {} ({}), starting a new history",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "report store {} is corrupt ({}), starting a new history",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Load the history as reports, skipping records that do not parse.
    pub fn load_reports(&self) -> Vec<Report> {
        self.load_history()
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::debug!("skipping store record {}: {}", i, e);
                    None
                }
            })
            .collect()
    }

    /// Append a report and rewrite the store.
    ///
    /// Records already in the store are written back unchanged, including
    /// ones this version cannot parse.
    pub fn append(&self, report: &Report) -> Result<(), StoreError> {
        let mut history = self.load_history();
        history.push(serde_json::to_value(report)?);
        self.save(&history)?;

        tracing::info!(
            "Saved report to {} ({} record(s))",
            self.path.display(),
            history.len()
        );
        Ok(())
    }

    /// Replace the store with `history` in a single rename.
    fn save(&self, history: &[Value]) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let json = serde_json::to_string_pretty(history)?;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;

        // The temp file is created private; the store keeps its own mode.
        if let Some(permissions) = self.target_permissions() {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(write_err)?;
        }
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    /// Permissions of the existing store, or the usual mode of a new file.
    fn target_permissions(&self) -> Option<fs::Permissions> {
        match fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => new_file_permissions(),
        }
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(NEW_STORE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}
