//! Accepted findings and their on-disk record format.
//!
//! A [`Finding`] is created only after the decision policy accepts a
//! classification. It is written once as pretty-printed JSON under a
//! subdirectory named for its validity outcome, and never mutated.

use std::fs;
use std::path::{Path, PathBuf};

use keyscan_providers::{Provider, Validity};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::classify::Confidence;

const RECORD_DIGEST_LENGTH: usize = 12;
const RECORD_DIGEST_BYTES: usize = RECORD_DIGEST_LENGTH / 2;

/// Errors raised while persisting a finding record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record file or its directory could not be written.
    #[error("failed to write record to {path}: {source}")]
    Io {
        /// Destination path of the record.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A persisted credential-exposure record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Identifier of the gist the key was found in.
    pub gist_id: String,
    /// Account name of the gist's owner.
    pub owner: String,
    /// Generated human-readable disclosure message.
    pub message: String,
    /// The provider the classifier attributed the key to.
    pub provider: Provider,
    /// The classifier's confidence level.
    pub confidence: Confidence,
    /// The live verification outcome.
    pub validity: Validity,
    /// The normalized source line the key appeared on.
    pub line: String,
    /// RFC 3339 timestamp of when the finding was created.
    pub created_at: String,
}

impl Finding {
    /// Builds a finding, generating the disclosure message and timestamp.
    #[must_use]
    pub fn new(
        gist_id: impl Into<String>,
        owner: impl Into<String>,
        provider: Provider,
        confidence: Confidence,
        validity: Validity,
        line: impl Into<String>,
    ) -> Self {
        let gist_id = gist_id.into();
        let owner = owner.into();
        let message = disclosure_message(provider, &gist_id, &owner);

        Self {
            gist_id,
            owner,
            message,
            provider,
            confidence,
            validity,
            line: line.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Stable 12-hex-character digest of this finding's provider and line.
    ///
    /// Used as the record filename suffix so that reprocessing the same
    /// line can never scatter duplicate files.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.provider.as_label().as_bytes());
        hasher.update(self.line.as_bytes());
        let hash = hasher.finalize();
        hex::encode(&hash[..RECORD_DIGEST_BYTES])
    }
}

/// Generates the human-readable disclosure message for a finding.
fn disclosure_message(provider: Provider, gist_id: &str, owner: &str) -> String {
    format!(
        "Hello @{owner},\n\
         This is an automated message generated to inform you that we have \
         detected a potentially active {provider} API key exposed in your \
         GitHub Gist: https://gist.github.com/{owner}/{gist_id}.\n\
         Please revoke the key immediately and delete the gist."
    )
}

/// Writes a finding to `{output_dir}/{VALIDITY}/{owner}_{gist_id}_{digest}.json`.
///
/// Creates the validity subdirectory as needed and returns the path of the
/// written record.
pub fn write_record(output_dir: &Path, finding: &Finding) -> Result<PathBuf, RecordError> {
    let record_dir = output_dir.join(finding.validity.to_string());
    fs::create_dir_all(&record_dir).map_err(|source| RecordError::Io {
        path: record_dir.clone(),
        source,
    })?;

    let filename = format!("{}_{}_{}.json", finding.owner, finding.gist_id, finding.digest());
    let path = record_dir.join(filename);

    let json = serde_json::to_string_pretty(finding)?;
    fs::write(&path, json).map_err(|source| RecordError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for clearer failure messages")]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_finding() -> Finding {
        Finding::new(
            "deadbeefdeadbeefdeadbeef",
            "octocat",
            Provider::OpenAi,
            Confidence::High,
            Validity::Valid,
            "API_KEY=\"sk-live-abc\"",
        )
    }

    #[test]
    fn message_names_owner_provider_and_gist() {
        let finding = sample_finding();
        assert!(finding.message.contains("@octocat"));
        assert!(finding.message.contains("openai"));
        assert!(
            finding
                .message
                .contains("https://gist.github.com/octocat/deadbeefdeadbeefdeadbeef")
        );
    }

    #[test]
    fn digest_is_twelve_hex_characters() {
        let digest = sample_finding().digest();
        assert_eq!(digest.len(), 12);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_deterministic_per_provider_and_line() {
        assert_eq!(sample_finding().digest(), sample_finding().digest());

        let mut other = sample_finding();
        other.line = "API_KEY=\"sk-live-other\"".to_string();
        assert_ne!(sample_finding().digest(), other.digest());
    }

    #[test]
    fn record_lands_in_validity_subdirectory() {
        let dir = TempDir::new().unwrap();
        let finding = sample_finding();

        let path = write_record(dir.path(), &finding).unwrap();

        assert!(path.starts_with(dir.path().join("VALID")));
        assert!(path.exists());

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("octocat_deadbeefdeadbeefdeadbeef_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn record_round_trips_through_json() {
        let dir = TempDir::new().unwrap();
        let finding = sample_finding();

        let path = write_record(dir.path(), &finding).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        let back: Finding = serde_json::from_str(&contents).unwrap();

        assert_eq!(back.gist_id, finding.gist_id);
        assert_eq!(back.provider, Provider::OpenAi);
        assert_eq!(back.validity, Validity::Valid);
        assert_eq!(back.line, finding.line);
    }

    #[test]
    fn unknown_validity_gets_its_own_subdirectory() {
        let dir = TempDir::new().unwrap();
        let mut finding = sample_finding();
        finding.validity = Validity::Unknown;

        let path = write_record(dir.path(), &finding).unwrap();
        assert!(path.starts_with(dir.path().join("UNKNOWN")));
    }

    #[test]
    fn rewriting_the_same_finding_overwrites_one_file() {
        let dir = TempDir::new().unwrap();
        let finding = sample_finding();

        let first = write_record(dir.path(), &finding).unwrap();
        let second = write_record(dir.path(), &finding).unwrap();
        assert_eq!(first, second);

        let entries = fs::read_dir(dir.path().join("VALID")).unwrap().count();
        assert_eq!(entries, 1);
    }
}
