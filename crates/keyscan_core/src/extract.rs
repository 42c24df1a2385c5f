//! Verifiable-value extraction per file format.
//!
//! Given a classified line, pulls out the raw value that can be sent to a
//! provider's verification endpoint. Extraction is polymorphic over the
//! configured [`FileFormat`]; asking for an unsupported format fails once
//! at argument-parsing time, never per line.

use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// The closed set of gist file formats keyscan can process.
///
/// The variant name doubles as the GitHub language tag used both in search
/// queries (`l=Dotenv`) and when filtering fetched gist files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    /// `.env` style `KEY=VALUE` files.
    #[default]
    Dotenv,
}

impl FileFormat {
    /// Returns the GitHub language tag for this format.
    #[must_use]
    pub const fn language_tag(self) -> &'static str {
        match self {
            Self::Dotenv => "Dotenv",
        }
    }
}

impl FromStr for FileFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dotenv" => Ok(Self::Dotenv),
            other => Err(FormatError(other.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.language_tag())
    }
}

/// Extracts the verifiable value from a candidate line.
///
/// Returns `None` when the line carries nothing worth probing.
#[must_use]
pub fn extract_value(line: &str, format: FileFormat) -> Option<String> {
    match format {
        FileFormat::Dotenv => dotenv_value(line),
    }
}

/// Everything after the first `=`, trimmed, with exactly one matching pair
/// of surrounding single or double quotes removed.
fn dotenv_value(line: &str) -> Option<String> {
    let (key, rest) = line.split_once('=')?;
    if key.is_empty() || rest.is_empty() {
        return None;
    }

    let value = strip_quote_pair(rest.trim());
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn strip_quote_pair(value: &str) -> &str {
    let bytes = value.as_bytes();
    if let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) {
        if (first == b'"' || first == b'\'') && first == last {
            // A lone quote character strips to the empty string.
            return value.get(1..value.len() - 1).unwrap_or("");
        }
    }
    value
}
