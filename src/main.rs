//! CLI entry point for the sitepulse analyzer.
//!
//! Provides subcommands for analyzing a single site, batch-analyzing a
//! list of URLs, and querying the traffic model directly.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use sitepulse::analyzers::fingerprint::Fingerprinter;
use sitepulse::analyzers::orchestrator::{Dependencies, Orchestrator};
use sitepulse::analyzers::rank_resolver::DomainRankResolver;
use sitepulse::analyzers::rank_table::RankTable;
use sitepulse::analyzers::traffic::RankEstimator;
use sitepulse::config::Config;
use sitepulse::fetch::BasicClient;
use sitepulse::output::{print_json, write_reports};
use sitepulse::services::crux::CruxClient;
use sitepulse::services::diffbot::DiffbotClient;
use sitepulse::services::geo::{DnsResolver, IpApiClient};
use sitepulse::services::page::HttpPageProvider;
use sitepulse::services::pagespeed::PageSpeedClient;
use sitepulse::services::similarweb::SimilarWebClient;

#[derive(Parser)]
#[command(name = "sitepulse")]
#[command(about = "Aggregates website quality signals into one report per URL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single site
    Analyze {
        /// URL to analyze (scheme optional)
        #[arg(value_name = "URL")]
        url: String,

        /// Optional JSON file to write the report to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Analyze many sites from a file (one URL per line)
    Batch {
        /// Path to the URL list
        #[arg(value_name = "FILE")]
        file: String,

        /// Optional JSON file to write the reports to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Estimate traffic for a known rank without any network calls
    Traffic {
        /// Domain rank (1 = most trafficked)
        #[arg(value_name = "RANK")]
        rank: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sitepulse.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sitepulse.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Analyze { url, output } => {
            let orchestrator = build_orchestrator(&config)?;
            let report = orchestrator.analyze(&url).await?;

            match output {
                Some(path) => write_reports(&path, std::slice::from_ref(&report))?,
                None => print_json(&report)?,
            }
        }
        Commands::Batch { file, output } => {
            let urls = read_url_list(&file)?;
            info!(url_count = urls.len(), file, "URL list loaded");

            let orchestrator = build_orchestrator(&config)?;
            let reports = orchestrator.analyze_batch(urls).await?;

            match output {
                Some(path) => write_reports(&path, &reports)?,
                None => {
                    for report in &reports {
                        print_json(report)?;
                    }
                }
            }
        }
        Commands::Traffic { rank } => {
            let estimator = RankEstimator::new();
            let range = estimator.estimate_range(Some(rank));
            let visits = estimator.estimate_monthly_visits(Some(rank));
            let confidence = estimator.confidence(Some(rank));

            println!(
                "{}",
                serde_json::json!({
                    "rank": rank,
                    "range": { "low": range.low, "high": range.high },
                    "monthly_visits": visits,
                    "confidence": confidence,
                })
            );
        }
    }

    Ok(())
}

/// Constructs every provider client and the orchestrator from config.
/// Rank-table load failure is fatal: without the fallback table the
/// resolver contract cannot be served.
fn build_orchestrator(config: &Config) -> Result<Arc<Orchestrator>> {
    let rank_table = Arc::new(
        RankTable::load(Path::new(&config.rank_table_path))
            .context("rank table is required at startup")?,
    );

    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
    let probe_timeout = Duration::from_secs(config.probe_timeout_secs);
    let client = || BasicClient::new(request_timeout, connect_timeout);

    let page = Arc::new(HttpPageProvider::new(
        client(),
        BasicClient::new(probe_timeout, connect_timeout),
    ));

    let fingerprinter = Arc::new(Fingerprinter::new(
        page,
        Arc::new(DnsResolver),
        Arc::new(IpApiClient::new(BasicClient::new(probe_timeout, connect_timeout))),
    ));

    let rank_resolver = Arc::new(DomainRankResolver::new(
        Arc::new(SimilarWebClient::new(config.similarweb_api_key.clone(), client())),
        rank_table,
    ));

    let deps = Dependencies {
        metrics: Arc::new(CruxClient::new(config.crux_api_key.clone(), client())),
        lab: Arc::new(PageSpeedClient::new(config.psi_api_key.clone(), client())),
        firmographics: Arc::new(DiffbotClient::new(config.diffbot_token.clone(), client())),
        fingerprinter,
        rank_resolver,
    };

    // The orchestrator-level timeout caps a whole provider call including
    // client-side retries (PageSpeed can spend 3 × request_timeout).
    let call_timeout = Duration::from_secs(config.request_timeout_secs * 4);

    Ok(Arc::new(Orchestrator::new(
        deps,
        config.chunk_size,
        call_timeout,
    )))
}

fn read_url_list(path: &str) -> Result<Vec<String>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading URL list {path}"))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
