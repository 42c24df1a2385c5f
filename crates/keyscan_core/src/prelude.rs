//! Convenience re-exports of the most commonly used types.

pub use keyscan_providers::{ProbeRegistry, Provider, Validity};

pub use crate::classify::{Classification, Confidence};
pub use crate::error::{FormatError, KeyscanError};
pub use crate::extract::{FileFormat, extract_value};
pub use crate::ledger::{Ledger, LedgerError};
pub use crate::normalize::{normalize_all, normalize_content};
pub use crate::policy::{accept, verification_gate};
pub use crate::record::{Finding, RecordError, write_record};
pub use crate::state::{RunState, StateError};
