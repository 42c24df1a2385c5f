//! Provider catalogue and live verification probes for keyscan.
//!
//! This crate defines the closed set of API key providers the classifier may
//! name, and optional verification logic for checking whether a candidate
//! key is still active against the provider's own API.

mod provider;
mod registry;
mod verify;

pub use provider::Provider;
pub use registry::ProbeRegistry;
pub use verify::{AuthScheme, ProbeSpec, Validity, VerificationError};

/// HTTP `User-Agent` header sent during key verification requests.
pub(crate) const USER_AGENT: &str = concat!("keyscan/", env!("CARGO_PKG_VERSION"));
