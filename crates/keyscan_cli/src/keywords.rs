//! Keyword list loading.

use std::fs;
use std::path::Path;

use anyhow::Context as _;

/// Loads search keywords from a flat file, one per line.
///
/// Lines are trimmed; blanks and `#` / `//` comment lines are skipped.
/// A missing or empty file is fatal at startup.
pub fn load_keywords(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read keywords file {}", path.display()))?;

    let keywords: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .map(str::to_owned)
        .collect();

    if keywords.is_empty() {
        anyhow::bail!("keywords file {} contains no keywords", path.display());
    }

    Ok(keywords)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for clearer failure messages")]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn skips_comments_and_blanks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keywords.txt");
        fs::write(&path, "# header\nOPENAI_API_KEY\n\n// note\n  ANTHROPIC_API_KEY  \n").unwrap();

        let keywords = load_keywords(&path).unwrap();
        assert_eq!(keywords, vec!["OPENAI_API_KEY", "ANTHROPIC_API_KEY"]);
    }

    #[test]
    fn missing_file_is_fatal() {
        assert!(load_keywords(Path::new("/definitely/not/here.txt")).is_err());
    }

    #[test]
    fn all_comments_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keywords.txt");
        fs::write(&path, "# nothing here\n").unwrap();

        assert!(load_keywords(&path).is_err());
    }
}
