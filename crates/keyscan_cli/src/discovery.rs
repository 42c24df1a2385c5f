//! Rate-limited search pagination over GitHub Gist search.
//!
//! The paginator walks search result pages for one keyword, one page at a
//! time, under a process-wide minimum delay between discovery requests.
//! Termination is driven by GitHub's "no results" marker, which ends the
//! sequence without yielding the page it appeared on.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use keyscan_core::extract::FileFormat;
use regex::Regex;

use crate::http::BROWSER_ACCEPT;
use crate::http::BROWSER_USER_AGENT;

/// The marker GitHub renders into an empty search result page. Note the
/// curly apostrophe.
const NO_RESULTS_MARKER: &str = "We couldn\u{2019}t find any gists matching";

/// Total-request timeout for search page fetches.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Builds the HTTP client used for search page requests.
///
/// A stalled search server must surface as a per-keyword error, never hang
/// the run, so the client carries a total-request timeout like every other
/// outbound client in the pipeline.
pub fn build_search_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(SEARCH_TIMEOUT).build()
}

/// Anchor tags, scanned for gist-shaped hrefs.
static ANCHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "static regex is known-valid at compile time")]
    Regex::new(r"(?is)<a\b[^>]*>").unwrap()
});

/// The identifier shape inside a gist link: `/{username}/{20+ hex chars}`.
static GIST_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "static regex is known-valid at compile time")]
    Regex::new(r#"(?i)href="/[^/"]+/([0-9a-f]{20,})""#).unwrap()
});

/// Enforces a process-wide minimum spacing between discovery requests.
///
/// One limiter is shared across every keyword in a run; the lock is the
/// single ordering point, so concurrent callers cannot collectively exceed
/// the rate limit.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    last_request: tokio::sync::Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter with the given minimum inter-request delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: tokio::sync::Mutex::new(None),
        }
    }

    /// Sleeps until the configured delay since the previous request has
    /// elapsed, then claims the current instant as the new request time.
    pub async fn wait(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}

/// One yielded page of search results.
#[derive(Debug)]
pub struct SearchPage {
    /// 1-based page number within the search.
    pub number: u32,
    /// Identifiers found on the page; duplicate links collapse.
    pub gist_ids: HashSet<String>,
}

/// Walks search result pages for one keyword.
///
/// Restartable from any page via `start_page`; page numbers increase by
/// exactly one per yielded page. Transport errors and non-2xx statuses
/// propagate to the caller as fatal for this keyword.
#[derive(Debug)]
pub struct SearchPaginator {
    client: reqwest::Client,
    base_url: String,
    keyword: String,
    format: FileFormat,
    limiter: Arc<RateLimiter>,
    page: u32,
    done: bool,
}

impl SearchPaginator {
    /// Creates a paginator positioned at `start_page`.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        keyword: impl Into<String>,
        format: FileFormat,
        start_page: u32,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            keyword: keyword.into(),
            format,
            limiter,
            page: start_page,
            done: false,
        }
    }

    /// Fetches the next page, or `None` once the no-results marker is seen.
    ///
    /// The marker page itself is never yielded, and a finished paginator
    /// stays finished.
    pub async fn next_page(&mut self) -> anyhow::Result<Option<SearchPage>> {
        if self.done {
            return Ok(None);
        }

        self.limiter.wait().await;

        let page_number = self.page;
        let page_param = page_number.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("l", self.format.language_tag()),
                ("q", self.keyword.as_str()),
                ("p", page_param.as_str()),
            ])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", BROWSER_ACCEPT)
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .with_context(|| format!("search request failed for page {page_number}"))?
            .error_for_status()
            .with_context(|| format!("search returned an error status on page {page_number}"))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read search page {page_number}"))?;

        if body.contains(NO_RESULTS_MARKER) {
            self.done = true;
            return Ok(None);
        }

        self.page += 1;
        Ok(Some(SearchPage {
            number: page_number,
            gist_ids: extract_gist_ids(&body),
        }))
    }
}

/// Extracts the set of gist identifiers linked from a search page body.
fn extract_gist_ids(body: &str) -> HashSet<String> {
    ANCHOR_PATTERN
        .find_iter(body)
        .filter_map(|anchor| {
            GIST_ID_PATTERN
                .captures(anchor.as_str())
                .and_then(|captures| captures.get(1))
        })
        .map(|id| id.as_str().to_string())
        .collect()
}
