//! The gist document source.
//!
//! Fetches gist contents through the GitHub API and keeps only files whose
//! language tag matches the configured format and that were not truncated.
//! Books have been published as untruncated gists, so a truncated env file
//! is effectively never legitimate.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context as _;
use keyscan_core::extract::FileFormat;
use serde::Deserialize;

use crate::http::BROWSER_USER_AGENT;

/// Timeout for gist fetches, longer than the verification probe timeout.
const DOCUMENT_TIMEOUT: Duration = Duration::from_secs(20);

/// Owner name reported for gists without an attributed account.
const ANONYMOUS_OWNER: &str = "anonymous";

/// One file inside a gist, as reported by the API.
#[derive(Debug, Deserialize)]
pub struct GistFile {
    /// GitHub's detected language tag, if any.
    pub language: Option<String>,
    /// Whether the API truncated the content.
    #[serde(default)]
    pub truncated: bool,
    /// The file body.
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    #[serde(default)]
    files: HashMap<String, GistFile>,
    owner: Option<GistOwner>,
}

#[derive(Debug, Deserialize)]
struct GistOwner {
    login: String,
}

/// A fetched gist, reduced to what the pipeline consumes.
///
/// Exists only for the duration of one pipeline pass over one identifier.
#[derive(Debug)]
pub struct GistDocument {
    /// The gist's identifier.
    pub gist_id: String,
    /// Owning account name, or `"anonymous"`.
    pub owner: String,
    /// Bodies of the files that matched the configured format.
    pub contents: Vec<String>,
}

/// HTTP client for the gist API.
#[derive(Debug)]
pub struct GistClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GistClient {
    /// Creates a client for the given API base URL.
    ///
    /// `token` is an optional GitHub token used as a bearer credential to
    /// raise the unauthenticated rate limit.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOCUMENT_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("failed to build gist HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    /// Fetches a gist and filters its files down to the configured format.
    ///
    /// Transport errors and non-2xx statuses propagate; the caller treats
    /// them as fatal for the keyword being scanned.
    pub async fn fetch(&self, gist_id: &str, format: FileFormat) -> anyhow::Result<GistDocument> {
        let url = format!("{}/{gist_id}", self.base_url);

        let mut request = self.client.get(&url).header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let gist: GistResponse = request
            .send()
            .await
            .with_context(|| format!("gist request failed for {gist_id}"))?
            .error_for_status()
            .with_context(|| format!("gist fetch returned an error status for {gist_id}"))?
            .json()
            .await
            .with_context(|| format!("gist response for {gist_id} was not valid JSON"))?;

        let contents = gist
            .files
            .into_values()
            .filter(|file| file.language.as_deref() == Some(format.language_tag()) && !file.truncated)
            .map(|file| file.content)
            .collect();

        Ok(GistDocument {
            gist_id: gist_id.to_string(),
            owner: gist.owner.map_or_else(|| ANONYMOUS_OWNER.to_string(), |o| o.login),
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gist_json(language: &str, truncated: bool, content: &str) -> serde_json::Value {
        serde_json::json!({
            "html_url": "https://gist.github.com/octocat/aaaa",
            "owner": { "login": "octocat" },
            "files": {
                ".env": {
                    "language": language,
                    "size": content.len(),
                    "truncated": truncated,
                    "content": content,
                }
            }
        })
    }

    async fn client_for(server: &MockServer) -> GistClient {
        GistClient::new(format!("{}/gists", server.uri()), None)
            .unwrap_or_else(|_| unreachable!("client should build"))
    }

    #[tokio::test]
    async fn keeps_matching_untruncated_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gists/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gist_json("Dotenv", false, "API_KEY=sk-x")))
            .mount(&server)
            .await;

        let document = client_for(&server)
            .await
            .fetch("abc123", FileFormat::Dotenv)
            .await
            .unwrap_or_else(|_| unreachable!("fetch should succeed"));

        assert_eq!(document.owner, "octocat");
        assert_eq!(document.contents, vec!["API_KEY=sk-x"]);
    }

    #[tokio::test]
    async fn drops_files_of_other_languages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gist_json("Python", false, "print('x')")))
            .mount(&server)
            .await;

        let document = client_for(&server)
            .await
            .fetch("abc123", FileFormat::Dotenv)
            .await
            .unwrap_or_else(|_| unreachable!("fetch should succeed"));

        assert!(document.contents.is_empty());
    }

    #[tokio::test]
    async fn drops_truncated_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gist_json("Dotenv", true, "API_KEY=sk-x")))
            .mount(&server)
            .await;

        let document = client_for(&server)
            .await
            .fetch("abc123", FileFormat::Dotenv)
            .await
            .unwrap_or_else(|_| unreachable!("fetch should succeed"));

        assert!(document.contents.is_empty());
    }

    #[tokio::test]
    async fn missing_owner_falls_back_to_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "files": {} })))
            .mount(&server)
            .await;

        let document = client_for(&server)
            .await
            .fetch("abc123", FileFormat::Dotenv)
            .await
            .unwrap_or_else(|_| unreachable!("fetch should succeed"));

        assert_eq!(document.owner, "anonymous");
    }

    #[tokio::test]
    async fn error_status_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch("missing", FileFormat::Dotenv).await;
        assert!(result.is_err());
    }
}
