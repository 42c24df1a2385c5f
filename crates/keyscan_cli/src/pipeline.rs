//! The pipeline driver.
//!
//! Strictly sequential: one keyword, one page, one gist, one line at a
//! time. Each gist identifier is marked in the ledger only after its
//! findings have been written, so a crash can never record "processed"
//! ahead of the durable evidence. Cancellation is honoured between pages
//! and between gists, always flushing a run-state snapshot first.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use keyscan_core::prelude::*;

use crate::discovery::{RateLimiter, SearchPaginator};
use crate::gists::GistClient;
use crate::llm::Classifier;
use crate::ui::{self, colors, pluralise_word, validity_style};

/// Cooperative cancellation flag, set by the Ctrl-C handler and polled by
/// the driver between units of work.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Aggregate counters reported at the end of a run.
#[derive(Debug, Default)]
pub struct RunTotals {
    /// Gists fully processed and marked in the ledger.
    pub gists_processed: usize,
    /// Finding records written to disk.
    pub findings_written: usize,
    /// Keywords abandoned because of an unrecoverable error.
    pub keyword_errors: usize,
    /// Whether the run ended on a user interrupt.
    pub interrupted: bool,
}

/// Everything the sequential pipeline needs, wired up once at startup.
#[derive(Debug)]
pub struct Pipeline {
    /// Document source for gist contents.
    pub gists: GistClient,
    /// The LLM classifier adapter.
    pub classifier: Classifier,
    /// Live verification probes.
    pub registry: ProbeRegistry,
    /// Durable set of already-processed gist identifiers.
    pub ledger: Ledger,
    /// Process-wide discovery rate limiter, shared across keywords.
    pub limiter: Arc<RateLimiter>,
    /// Client used for search page requests.
    pub search_client: reqwest::Client,
    /// Base URL of the gist search endpoint.
    pub search_base_url: String,
    /// The gist file format being scanned.
    pub format: FileFormat,
    /// Directory finding records are written under.
    pub output_dir: PathBuf,
    /// Run-state snapshot path.
    pub state_path: PathBuf,
    /// First search page per keyword.
    pub start_page: u32,
    /// Optional cap on pages per keyword.
    pub max_pages: Option<u32>,
    /// Cooperative cancellation flag.
    pub cancel: CancelFlag,
}

impl Pipeline {
    /// Runs the full pipeline over every keyword.
    ///
    /// A failed keyword is reported and counted, and the run moves on to
    /// the next keyword; only cancellation stops the whole run early.
    pub async fn run(&mut self, keywords: &[String]) -> RunTotals {
        let mut totals = RunTotals::default();

        for keyword in keywords {
            if totals.interrupted {
                break;
            }

            match self.scan_keyword(keyword, &mut totals).await {
                Ok(interrupted) => totals.interrupted = interrupted,
                Err(error) => {
                    ui::print_error(&format!("keyword \"{keyword}\" failed: {error:#}"));
                    totals.keyword_errors += 1;
                }
            }
        }

        totals
    }

    /// Scans every page for one keyword. Returns `true` when the scan was
    /// cut short by cancellation.
    async fn scan_keyword(&mut self, keyword: &str, totals: &mut RunTotals) -> anyhow::Result<bool> {
        println!(
            "{} searching \"{}\"",
            colors::accent().apply_to("keyscan"),
            colors::secondary().apply_to(keyword)
        );

        let mut paginator = SearchPaginator::new(
            self.search_client.clone(),
            self.search_base_url.clone(),
            keyword,
            self.format,
            self.start_page,
            Arc::clone(&self.limiter),
        );

        let mut pages_fetched = 0u32;
        let mut last_page = self.start_page;

        loop {
            if self.cancel.is_cancelled() {
                self.snapshot(keyword, last_page)?;
                return Ok(true);
            }

            let Some(page) = paginator.next_page().await? else {
                break;
            };
            last_page = page.number;

            println!(
                "  page {}: {} {}",
                page.number,
                page.gist_ids.len(),
                pluralise_word(page.gist_ids.len(), "gist", "gists")
            );

            for gist_id in &page.gist_ids {
                if self.cancel.is_cancelled() {
                    self.snapshot(keyword, page.number)?;
                    return Ok(true);
                }

                if self.ledger.seen(gist_id) {
                    println!("  {} {gist_id} already scanned", colors::muted().apply_to("·"));
                    continue;
                }

                totals.findings_written += self.process_gist(gist_id).await?;
                self.ledger.add(gist_id)?;
                totals.gists_processed += 1;
            }

            self.snapshot(keyword, page.number)?;

            pages_fetched += 1;
            if self.max_pages.is_some_and(|max_pages| pages_fetched >= max_pages) {
                println!("  reached page limit for \"{keyword}\"");
                break;
            }
        }

        // A keyword whose first page is already empty still leaves a
        // resume point.
        self.snapshot(keyword, last_page)?;

        Ok(false)
    }

    /// Processes one gist: fetch, normalize, classify, verify, record.
    ///
    /// Returns the number of finding records written. A given extracted
    /// value is probed at most once per gist, even when several classified
    /// lines carry the same value.
    async fn process_gist(&self, gist_id: &str) -> anyhow::Result<usize> {
        let document = self.gists.fetch(gist_id, self.format).await?;
        let lines = normalize_all(&document.contents);

        let mut checked_values: HashSet<String> = HashSet::new();
        let mut written = 0;

        for line in &lines {
            let classification = self.classifier.classify_line(line).await;

            let Some((confidence, provider)) = verification_gate(&classification) else {
                continue;
            };
            let Some(value) = extract_value(line, self.format) else {
                continue;
            };
            if !checked_values.insert(value.clone()) {
                continue;
            }

            let validity = self.registry.verify(provider, &value).await;

            if accept(confidence, validity) {
                let finding = Finding::new(
                    gist_id,
                    &document.owner,
                    provider,
                    confidence,
                    validity,
                    line.clone(),
                );
                let path = write_record(&self.output_dir, &finding)?;

                println!(
                    "  {} {} key ({}, {}) in {} -> {}",
                    colors::success().apply_to(ui::indicators::SUCCESS),
                    colors::accent().apply_to(provider.as_label()),
                    confidence,
                    validity_style(validity).apply_to(validity),
                    gist_id,
                    colors::muted().apply_to(path.display())
                );
                written += 1;
            }
        }

        Ok(written)
    }

    fn snapshot(&self, keyword: &str, last_page: u32) -> anyhow::Result<()> {
        RunState::new(keyword, last_page)
            .write(&self.state_path)
            .map_err(Into::into)
    }
}
