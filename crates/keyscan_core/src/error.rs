use thiserror::Error;

/// Error returned when a file format name is not in the supported set.
///
/// Raised once at startup when arguments are parsed, never per line.
#[derive(Debug, Error)]
#[error("unsupported file format: {0}")]
pub struct FormatError(pub String);

/// Top-level error type for the keyscan pipeline.
///
/// Unifies errors from format parsing, ledger persistence, record writing,
/// and run-state snapshots into a single type for callers that orchestrate
/// the full workflow.
#[derive(Debug, Error)]
pub enum KeyscanError {
    /// An unsupported file format was requested.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The ledger file could not be loaded or appended to.
    #[error(transparent)]
    Ledger(#[from] crate::ledger::LedgerError),

    /// A finding record could not be written.
    #[error(transparent)]
    Record(#[from] crate::record::RecordError),

    /// A run-state snapshot could not be written.
    #[error(transparent)]
    State(#[from] crate::state::StateError),
}
