//! check_solr_search
//!
//! Nagios plugin: runs one Solr search and reports a verdict on hit count,
//! query time and freshness of the most recent document.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use nagiosplugin::ServiceState;
use tracing_subscriber::EnvFilter;

use solr_check::check;
use solr_check::cli::config::CheckConfig;
use solr_check::cli::output::{OutputFormat, OutputFormatter};
use solr_check::monitoring::health::Verdict;
use solr_check::utils::constants::*;

/// Monitor a Solr collection through a search query
#[derive(Parser, Debug)]
#[command(name = "check_solr_search")]
#[command(version = solr_check::VERSION)]
#[command(about = "Nagios plugin alerting on Solr hit count, query time and document freshness", long_about = None)]
struct Cli {
    /// HTTP host of the Solr service
    #[arg(long, env = "SOLR_CHECK_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// HTTP port of the Solr service
    #[arg(long, env = "SOLR_CHECK_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Solr core name
    #[arg(long, env = "SOLR_CHECK_CORE", default_value = "")]
    core: String,

    /// Search query in the form key:value
    #[arg(long, env = "SOLR_CHECK_QUERY", default_value = DEFAULT_QUERY)]
    query: String,

    /// Search result sort key (descending order), must be a date field
    #[arg(long, env = "SOLR_CHECK_SORTKEY", default_value = "")]
    sortkey: String,

    /// Number of expected hits in the response
    #[arg(long, env = "SOLR_CHECK_MINHITS", default_value_t = DEFAULT_MIN_HITS)]
    minhits: u64,

    /// Max query processing time (ms)
    #[arg(long, env = "SOLR_CHECK_MAXQTIME", default_value_t = DEFAULT_MAX_QTIME_MS)]
    maxqtime: u64,

    /// Max age of the most recent document (minutes)
    #[arg(long, env = "SOLR_CHECK_STALE_AFTER", default_value_t = DEFAULT_STALE_AFTER_MINS)]
    stale_after: u64,

    /// HTTP request timeout (ms)
    #[arg(long, env = "SOLR_CHECK_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// Attempts on connection failures or timeouts
    #[arg(long, env = "SOLR_CHECK_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    attempts: u32,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Log request details to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> CheckConfig {
        CheckConfig {
            host: self.host.clone(),
            port: self.port,
            core: self.core.clone(),
            query: self.query.clone(),
            sort_key: self.sortkey.clone(),
            min_hits: self.minhits,
            max_qtime_ms: self.maxqtime,
            stale_after_mins: self.stale_after,
            timeout_ms: self.timeout,
            max_attempts: self.attempts,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

/// Message for a command line clap could not parse
const MSG_INVALID_ARGUMENTS: &str = "Invalid command line arguments";

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(ServiceState::Ok.exit_code());
        }
        Err(e) => std::process::exit(OutputFormatter::default().emit(&argument_failure(&e))),
    };

    init_logging(cli.verbose);

    let verdict = run(&cli).unwrap_or_else(|e| {
        tracing::error!(error = %format!("{:#}", e), "check aborted");
        Verdict::unknown(check::MSG_QUERY_FAILED).with_detail(format!("{:#}", e))
    });

    let code = OutputFormatter::new(cli.format).emit(&verdict);
    std::process::exit(code);
}

/// UNKNOWN verdict for a rejected command line; clap's own exit code 2 would
/// read as CRITICAL
fn argument_failure(err: &clap::Error) -> Verdict {
    Verdict::unknown(MSG_INVALID_ARGUMENTS).with_detail(err.to_string().trim_end())
}

/// `-v` forces `debug`; otherwise `RUST_LOG` applies, falling back to `warn`
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) if !verbose => EnvFilter::new(directives),
        _ if verbose => EnvFilter::new("debug"),
        _ => EnvFilter::new("warn"),
    }
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    // stdout is reserved for the plugin output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<Verdict> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let config = cli.config();
    tracing::debug!(?config, "starting check");

    Ok(runtime.block_on(check::execute(&config)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
