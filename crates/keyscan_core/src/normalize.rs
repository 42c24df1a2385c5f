//! Comment and blank-line stripping for fetched file bodies.
//!
//! Turns raw gist file contents into the flat ordered list of candidate
//! lines that get handed to the classifier. Pure string work, no I/O.

/// Line prefixes treated as comments and dropped during normalization.
const COMMENT_MARKERS: [&str; 2] = ["#", "//"];

/// Normalizes one file body into candidate lines.
///
/// Splits on line breaks, trims surrounding whitespace, and drops lines
/// that are empty or start with a comment marker. Relative order of the
/// surviving lines is preserved.
#[must_use]
pub fn normalize_content(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !COMMENT_MARKERS.iter().any(|m| line.starts_with(m)))
        .map(str::to_owned)
        .collect()
}

/// Normalizes several file bodies into a single candidate-line list.
///
/// Order is preserved within each body and across bodies.
#[must_use]
pub fn normalize_all(contents: &[String]) -> Vec<String> {
    contents
        .iter()
        .flat_map(|content| normalize_content(content))
        .collect()
}
