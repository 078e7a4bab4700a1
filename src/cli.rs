//! CLI definition and run orchestration.
//!
//! Stages: load config, build notifier, open ledger, fetch, digest, dispatch.
//! Configuration problems abort before the ledger is touched; any fatal error
//! is logged and mapped to a non-zero exit code.

use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::email_notifier::EmailNotifier;
use crate::adapters::env_config_adapter::EnvConfigAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sheets_ledger_adapter::SheetsLedgerAdapter;
use crate::adapters::sms_notifier::SmsNotifier;
use crate::domain::config_validation::{
    ChannelConfig, DigestConfig, LedgerConfig, LedgerLocation, NotifyConfig, build_digest_config,
    build_notify_config,
};
use crate::domain::date_filter::utc_today;
use crate::domain::digest::{Digest, DigestOptions, build_digest};
use crate::domain::error::DigestError;
use crate::domain::summary::RenderPolicy;
use crate::ports::config_port::ConfigPort;
use crate::ports::notifier::{DeliveryReceipt, Notifier};
use crate::ports::row_source::RowSource;

pub const DEFAULT_CONFIG_FILE: &str = "tradedigest.ini";

#[derive(Parser, Debug)]
#[command(name = "tradedigest", about = "Daily trading-ledger summary notifier")]
pub struct Cli {
    /// INI config file (defaults to ./tradedigest.ini when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Rendering policy: none, verbose, suppressed-loss, subject-only
    #[arg(long)]
    pub policy: Option<RenderPolicy>,
    /// Summarize this UTC date instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Render and log the summary without sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub digest: Digest,
    /// `None` for dry runs.
    pub receipt: Option<DeliveryReceipt>,
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: &Cli) -> Result<RunReport, DigestError> {
    execute_with_env(cli, |name| std::env::var(name).ok())
}

/// Like [`execute`], with `lookup` standing in for the process environment.
pub fn execute_with_env(
    cli: &Cli,
    lookup: impl Fn(&str) -> Option<String> + 'static,
) -> Result<RunReport, DigestError> {
    let port = EnvConfigAdapter::with_lookup(load_config(cli.config.as_deref())?, lookup);
    let config = resolve_config(&port, cli)?;

    let notifier = if config.dry_run {
        None
    } else {
        Some(build_notifier(&build_notify_config(&port)?)?)
    };
    let source = open_row_source(&config.ledger)?;

    let options = DigestOptions {
        today: cli.date.unwrap_or_else(utc_today),
        date_match: config.ledger.date_match,
        policy: config.policy,
    };
    run_digest(source.as_ref(), notifier.as_deref(), &options)
}

/// Loads the INI file. Without an explicit path the default file is optional.
/// An unreadable explicit file is an I/O error.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, DigestError> {
    let path = match path {
        Some(p) => p,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
        None => {
            info!("No config file, using environment only");
            return Ok(FileConfigAdapter::empty());
        }
    };

    info!("Loading config from {}", path.display());
    FileConfigAdapter::load(path)
}

/// Builds the digest config and applies command-line overrides.
pub fn resolve_config(port: &dyn ConfigPort, cli: &Cli) -> Result<DigestConfig, DigestError> {
    let mut config = build_digest_config(port)?;
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    config.dry_run |= cli.dry_run;
    Ok(config)
}

pub fn build_notifier(config: &NotifyConfig) -> Result<Box<dyn Notifier>, DigestError> {
    let notifier: Box<dyn Notifier> = match &config.channel {
        ChannelConfig::Sms(sms) => Box::new(SmsNotifier::new(sms.clone(), config.timeout)?),
        ChannelConfig::Email(email) => Box::new(EmailNotifier::new(email.clone(), config.timeout)?),
    };
    Ok(notifier)
}

pub fn open_row_source(config: &LedgerConfig) -> Result<Box<dyn RowSource>, DigestError> {
    match &config.location {
        LedgerLocation::Directory(dir) => Ok(Box::new(CsvLedgerAdapter::new(
            dir.clone(),
            &config.store,
            &config.tab,
        ))),
        LedgerLocation::Database(file) => open_sqlite(file, &config.tab),
        LedgerLocation::Spreadsheet(sheets) => Ok(Box::new(SheetsLedgerAdapter::new(
            sheets.clone(),
            &config.store,
            &config.tab,
        )?)),
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(file: &Path, table: &str) -> Result<Box<dyn RowSource>, DigestError> {
    use crate::adapters::sqlite_ledger_adapter::SqliteLedgerAdapter;
    Ok(Box::new(SqliteLedgerAdapter::open(file, table)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_file: &Path, _table: &str) -> Result<Box<dyn RowSource>, DigestError> {
    Err(DigestError::invalid(
        "ledger",
        "backend",
        "sqlite feature is required for the sqlite backend",
    ))
}

/// Fetch, digest, log, then dispatch. Dispatch is skipped when `notifier` is `None`.
pub fn run_digest(
    source: &dyn RowSource,
    notifier: Option<&dyn Notifier>,
    options: &DigestOptions,
) -> Result<RunReport, DigestError> {
    info!("Fetching ledger {}", source.describe());
    let snapshot = source.fetch_all()?;

    let digest = build_digest(&snapshot, options);
    for warning in &digest.warnings {
        warn!("{warning}");
    }
    info!(
        date = %digest.today,
        rows = digest.rows_today,
        buys = digest.metrics.buy_count,
        sells = digest.metrics.sell_count,
        proceeds = digest.metrics.proceeds,
        cost = digest.metrics.cost,
        net_profit = digest.metrics.net_profit,
        policy = %options.policy,
        "computed daily metrics"
    );
    info!("Subject: {}", digest.summary.subject);
    info!("Body: {}", digest.summary.body);

    let receipt = match notifier {
        Some(n) => {
            info!("Sending summary via {}", n.channel());
            Some(n.send(Some(&digest.summary.subject), &digest.summary.body)?)
        }
        None => {
            info!("Dry run: summary not sent");
            None
        }
    };

    Ok(RunReport { digest, receipt })
}
