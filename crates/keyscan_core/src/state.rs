//! Crawl progress snapshots for operator-driven resumption.
//!
//! The run state records the keyword and last completed page so an
//! interrupted crawl can be resumed manually with `--start-page`. It is a
//! resume point, not a history: each snapshot overwrites the previous one.
//! Correctness of reruns rests on the ledger, not on this file.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while writing a run-state snapshot.
#[derive(Debug, Error)]
pub enum StateError {
    /// The snapshot file could not be written.
    #[error("failed to write run state to {path}: {source}")]
    Io {
        /// Destination path of the snapshot.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be serialized.
    #[error("failed to serialize run state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A point-in-time snapshot of crawl progress for one keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// The keyword being crawled.
    pub keyword: String,
    /// The last fully completed page number.
    pub last_page: u32,
    /// RFC 3339 timestamp of when the snapshot was taken.
    pub updated_at: String,
}

impl RunState {
    /// Creates a snapshot stamped with the current time.
    #[must_use]
    pub fn new(keyword: impl Into<String>, last_page: u32) -> Self {
        Self {
            keyword: keyword.into(),
            last_page,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Writes the snapshot to `path`, replacing any previous snapshot.
    ///
    /// Written atomically (temp file plus rename) so an interrupt mid-write
    /// cannot leave a half-written resume point.
    pub fn write(&self, path: &Path) -> Result<(), StateError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StateError::Io { path, source }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err(path))?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(io_err(&temp_path))?;
        file.write_all(json.as_bytes()).map_err(io_err(&temp_path))?;
        file.sync_all().map_err(io_err(&temp_path))?;
        drop(file);

        fs::rename(&temp_path, path).map_err(io_err(path))?;
        Ok(())
    }
}
