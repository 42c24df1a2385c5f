//! # keyscan
//!
//! Searches GitHub Gists for exposed API keys: paginated keyword search,
//! LLM classification of candidate lines, live verification against
//! provider endpoints, and JSON finding records partitioned by validity.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod discovery;
mod gists;
mod http;
mod keywords;
mod llm;
mod pipeline;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{CommandFactory, FromArgMatches, Parser};
use console::style;
use keyscan_core::prelude::*;

use crate::discovery::RateLimiter;
use crate::gists::GistClient;
use crate::llm::Classifier;
use crate::pipeline::{CancelFlag, Pipeline, RunTotals};
use crate::ui::colors;

const REPO_URL: &str = "https://github.com/keyscan/keyscan";

/// Environment variable holding the classifier endpoint base URL.
const LLM_BASE_URL_VAR: &str = "KEYSCAN_LLM_BASE_URL";
/// Environment variable holding the classifier API key.
const LLM_API_KEY_VAR: &str = "KEYSCAN_LLM_API_KEY";
/// Environment variable holding a GitHub token for the gist API.
const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Parser)]
#[command(name = "keyscan", version, styles = ui::clap_styles())]
struct Cli {
    /// File of search keywords, one per line (`#` comments allowed).
    #[arg(short, long, value_name = "PATH")]
    keywords_file: PathBuf,

    /// Model identifier sent to the classifier endpoint.
    #[arg(short, long)]
    model: String,

    /// Classifier endpoint base URL (e.g. `http://localhost:8000/v1`).
    #[arg(long, value_name = "URL")]
    llm_base_url: Option<String>,

    /// Gist file format to search for.
    #[arg(short, long, default_value = "Dotenv")]
    file_type: FileFormat,

    /// Search page to start each keyword from.
    #[arg(long, default_value_t = 1)]
    start_page: u32,

    /// Stop each keyword after this many pages.
    #[arg(long)]
    max_pages: Option<u32>,

    /// Minimum seconds between search requests.
    #[arg(long, default_value_t = 2.0)]
    delay: f64,

    /// Directory finding records are written under.
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Ledger of already-processed gist identifiers.
    #[arg(long, default_value = "output/scanned.txt")]
    ledger: PathBuf,

    /// Run-state snapshot file.
    #[arg(long, default_value = "output/state.json")]
    state_file: PathBuf,

    /// Gist search endpoint override.
    #[arg(long, hide = true, default_value = "https://gist.github.com/search")]
    search_base_url: String,

    /// Gist API endpoint override.
    #[arg(long, hide = true, default_value = "https://api.github.com/gists")]
    gist_api_url: String,

    /// Route every verification probe to this base URL instead of the
    /// real provider endpoints.
    #[arg(long, hide = true, value_name = "URL")]
    verify_base_url: Option<String>,
}

fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).without_time())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let cli = parse_cli();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::print_error(&format!("{e:#}"));
            std::process::exit(ui::exit::ERROR);
        }
    }
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    Cli::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let keywords = keywords::load_keywords(&cli.keywords_file)?;

    let llm_base_url = cli
        .llm_base_url
        .or_else(|| env_var(LLM_BASE_URL_VAR))
        .with_context(|| format!("no classifier endpoint: pass --llm-base-url or set {LLM_BASE_URL_VAR}"))?;
    let classifier = Classifier::new(llm_base_url, env_var(LLM_API_KEY_VAR), cli.model.as_str())?;

    let registry = build_registry(cli.verify_base_url.as_deref())?;
    let gists = GistClient::new(&cli.gist_api_url, env_var(GITHUB_TOKEN_VAR))?;
    let ledger = Ledger::load(&cli.ledger)?;
    let search_client = discovery::build_search_client().context("failed to build search HTTP client")?;

    ui::print_info(&format!(
        "scanning {} {} for {} files",
        keywords.len(),
        ui::pluralise_word(keywords.len(), "keyword", "keywords"),
        cli.file_type
    ));

    let mut pipeline = Pipeline {
        gists,
        classifier,
        registry,
        ledger,
        limiter: Arc::new(RateLimiter::new(Duration::from_secs_f64(cli.delay))),
        search_client,
        search_base_url: cli.search_base_url,
        format: cli.file_type,
        output_dir: cli.output_dir,
        state_path: cli.state_file,
        start_page: cli.start_page,
        max_pages: cli.max_pages,
        cancel: CancelFlag::new(),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create async runtime")?;

    let totals: RunTotals = rt.block_on(async {
        let cancel = pipeline.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        pipeline.run(&keywords).await
    });

    println!(
        "{} processed {} {}, wrote {} {}",
        colors::success().apply_to(ui::indicators::SUCCESS),
        totals.gists_processed,
        ui::pluralise_word(totals.gists_processed, "gist", "gists"),
        totals.findings_written,
        ui::pluralise_word(totals.findings_written, "finding", "findings"),
    );

    if totals.interrupted {
        ui::print_info("interrupted; run state saved");
        return Ok(ui::exit::INTERRUPT);
    }
    if totals.keyword_errors > 0 {
        ui::print_error(&format!(
            "{} {} failed",
            totals.keyword_errors,
            ui::pluralise_word(totals.keyword_errors, "keyword", "keywords")
        ));
        return Ok(ui::exit::ERROR);
    }

    println!("{}", colors::secondary().apply_to("search finished"));
    Ok(0)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Builds the verification registry, rerouting every probe to a single
/// base URL when an override is given.
fn build_registry(override_base: Option<&str>) -> anyhow::Result<ProbeRegistry> {
    use keyscan_providers::ProbeSpec;

    let registry = match override_base {
        None => ProbeRegistry::builtin(),
        Some(base) => {
            let base = base.trim_end_matches('/');
            ProbeRegistry::with_probes(
                Provider::all()
                    .iter()
                    .map(|p| (*p, ProbeSpec::bearer(format!("{base}/probe/{p}")))),
            )
        }
    };

    registry.map_err(|e| anyhow::anyhow!("failed to initialize verifier: {e}"))
}

fn build_about() -> String {
    format!(
        r"
  {} hunts for exposed API keys in public GitHub Gists.

  Classifies candidate lines with an LLM, verifies extracted keys
  against live provider endpoints, and records findings as JSON.",
        colors::accent().apply_to("keyscan").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    keyscan -k keywords.txt -m gpt-4o-mini      Scan with defaults
    keyscan -k kw.txt -m llama3 --max-pages 3   Cap pages per keyword
    keyscan -k kw.txt -m llama3 --delay 5       Slow down discovery

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}
