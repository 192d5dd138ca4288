use anyhow::{bail, Result};
use certora_ci::cancel::{install_handler, CancelFlag};
use certora_ci::changeset::{self, Range};
use certora_ci::config::{Config, DEFAULT_CONFIG_FILE};
use certora_ci::executor::RuleExecutor;
use certora_ci::present::{self, Format};
use certora_ci::report::build_report;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "certora-ci")]
#[command(about = "Run Certora prover rules for changed contracts", long_about = None)]
#[command(version)]
struct Cli {
    /// Which contracts to check
    #[arg(short, long, value_enum, default_value_t = Range::Diff)]
    range: Range,

    /// Path to the contract/rule catalog
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the rule script directory from the config file
    #[arg(long)]
    rule_dir: Option<PathBuf>,

    /// Give up on a rule after this many seconds without output
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Exit non-zero if any rule did not submit a job
    #[arg(long)]
    fail_on_error: bool,

    /// Log progress (info level)
    #[arg(short, long)]
    verbose: bool,

    /// Log everything (debug level)
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);
    debug!(?cli, "Parsed arguments");

    let mut config = Config::load(&cli.config)?;
    if let Some(rule_dir) = cli.rule_dir {
        config.executor.rule_dir = rule_dir;
    }
    if let Some(secs) = cli.timeout {
        config.executor.read_timeout = Some(Duration::from_secs(secs));
    }

    let contracts = changeset::resolve(cli.range, &config.catalog, Path::new("."))?;

    let cancel = CancelFlag::new();
    install_handler(&cancel)?;

    let executor = RuleExecutor::new(config.executor).with_cancel(cancel);
    let report = build_report(&contracts, &config.catalog, &executor);

    println!("{}", present::render(&report, cli.format)?);

    let summary = report.summary();
    info!(?summary, "Run complete");

    if cli.fail_on_error && report.has_failures() {
        bail!(
            "{} of {} rules did not submit a prover job",
            summary.failures(),
            summary.total()
        );
    }

    Ok(())
}

/// Initialize tracing based on CLI flags; `RUST_LOG` takes precedence.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
