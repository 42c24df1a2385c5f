//! Core pipeline logic for keyscan.
//!
//! This crate holds everything in the search-classify-verify pipeline that
//! does not touch the network: content normalization, value extraction,
//! classifier output parsing, the persist/discard decision policy, the
//! durable ledger of processed gists, finding records, and run-state
//! snapshots.
//!
//! # Main Types
//!
//! - [`Classification`] - Parsed (confidence, provider) judgement for a line
//! - [`Ledger`] - Append-only set of already-processed gist identifiers
//! - [`Finding`] - An accepted exposure record, written once, never mutated
//! - [`FileFormat`] - The closed set of supported gist file formats
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors that library
//! consumers can match on. The CLI crate (`keyscan_cli`) uses `anyhow` for
//! error propagation.

/// Classifier output types and defensive model-response parsing.
pub mod classify;
/// Error types shared across the pipeline.
pub mod error;
/// Verifiable-value extraction per file format.
pub mod extract;
/// Durable set of already-processed gist identifiers.
pub mod ledger;
/// Comment and blank-line stripping for fetched file bodies.
pub mod normalize;
/// The persist/discard decision policy.
pub mod policy;
/// Common re-exports for internal use.
pub mod prelude;
/// Accepted findings and their on-disk record format.
pub mod record;
/// Crawl progress snapshots for operator-driven resumption.
pub mod state;

pub use classify::{Classification, Confidence};
pub use error::{FormatError, KeyscanError};
pub use extract::{FileFormat, extract_value};
pub use ledger::{Ledger, LedgerError};
pub use normalize::{normalize_all, normalize_content};
pub use policy::{accept, verification_gate};
pub use record::{Finding, RecordError, write_record};
pub use state::{RunState, StateError};
