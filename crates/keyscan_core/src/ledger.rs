//! Durable set of already-processed gist identifiers.
//!
//! The ledger is the pipeline's idempotence guarantee: every processed
//! identifier is appended to a flat file before the run moves on, so a
//! crash or restart never reprocesses a gist. One identifier per line.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or appending to the ledger file.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file could not be read or written.
    #[error("ledger I/O failed for {path}: {source}")]
    Io {
        /// Path of the ledger file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// File-backed, append-only set of processed gist identifiers.
///
/// Loading tolerates a corrupted trailing entry (e.g. a line truncated by
/// a crash mid-write): blank or whitespace-only lines are skipped rather
/// than failing startup.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    file: File,
    seen: HashSet<String>,
}

impl Ledger {
    /// Loads the ledger from `path`, creating the file and any missing
    /// parent directories on first use.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let io_err = |source| LedgerError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;

        let contents = fs::read_to_string(&path).map_err(io_err)?;
        let seen = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self { path, file, seen })
    }

    /// Returns `true` if the identifier was processed by this or any
    /// earlier run.
    #[must_use]
    pub fn seen(&self, gist_id: &str) -> bool {
        self.seen.contains(gist_id)
    }

    /// Marks an identifier as processed, appending it durably before
    /// returning. Re-adding a known identifier is a no-op.
    pub fn add(&mut self, gist_id: &str) -> Result<(), LedgerError> {
        if self.seen.contains(gist_id) {
            return Ok(());
        }

        let io_err = |source| LedgerError::Io {
            path: self.path.clone(),
            source,
        };

        self.file
            .write_all(format!("{gist_id}\n").as_bytes())
            .map_err(io_err)?;
        self.file.flush().map_err(io_err)?;

        self.seen.insert(gist_id.to_string());
        Ok(())
    }

    /// Returns how many identifiers the ledger holds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if no identifier has ever been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
