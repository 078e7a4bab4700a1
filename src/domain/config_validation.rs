//! Configuration building and validation.
//!
//! Turns a [`ConfigPort`] into immutable config values once, before any
//! ledger fetch, so a missing credential aborts the run up front.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::date_filter::DateMatch;
use crate::domain::error::DigestError;
use crate::domain::summary::RenderPolicy;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_STORE: &str = "Trading Log";
pub const DEFAULT_TAB: &str = "log";
pub const DEFAULT_TIMEOUT_SECS: i64 = 30;
pub const DEFAULT_SMS_API_BASE: &str = "https://api.twilio.com";
pub const DEFAULT_EMAIL_API_BASE: &str = "https://api.sendgrid.com";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    Csv,
    Sqlite,
    Sheets,
}

/// Where the ledger lives, per backend.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerLocation {
    /// Base directory holding `<store>/<tab>.csv`.
    Directory(PathBuf),
    /// SQLite database file; the tab is a table.
    Database(PathBuf),
    Spreadsheet(SheetsConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub location: LedgerLocation,
    pub store: String,
    pub tab: String,
    pub date_match: DateMatch,
}

impl LedgerConfig {
    pub fn backend(&self) -> LedgerBackend {
        match self.location {
            LedgerLocation::Directory(_) => LedgerBackend::Csv,
            LedgerLocation::Database(_) => LedgerBackend::Sqlite,
            LedgerLocation::Spreadsheet(_) => LedgerBackend::Sheets,
        }
    }
}

/// Google Sheets values API access. One of `access_token` (OAuth bearer) or
/// `api_key` (link-shared sheets) is always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DigestConfig {
    pub ledger: LedgerConfig,
    pub policy: RenderPolicy,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub api_key: String,
    pub from: String,
    pub to: String,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelConfig {
    Sms(SmsConfig),
    Email(EmailConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    pub channel: ChannelConfig,
    pub timeout: Duration,
}

pub fn build_digest_config(config: &dyn ConfigPort) -> Result<DigestConfig, DigestError> {
    Ok(DigestConfig {
        ledger: build_ledger_config(config)?,
        policy: parse_setting(config, "summary", "policy")?.unwrap_or_default(),
        dry_run: typed(config.get_bool("notify", "dry_run"), "notify", "dry_run")?
            .unwrap_or(false),
    })
}

pub fn build_ledger_config(config: &dyn ConfigPort) -> Result<LedgerConfig, DigestError> {
    let backend = match optional(config, "ledger", "backend") {
        None => LedgerBackend::Csv,
        Some(b) => match b.to_lowercase().as_str() {
            "csv" => LedgerBackend::Csv,
            "sqlite" => LedgerBackend::Sqlite,
            "sheets" => LedgerBackend::Sheets,
            other => {
                return Err(DigestError::invalid(
                    "ledger",
                    "backend",
                    format!("unknown backend {other:?}, expected csv, sqlite or sheets"),
                ));
            }
        },
    };

    let location = match backend {
        LedgerBackend::Csv => LedgerLocation::Directory(ledger_path(config)?),
        LedgerBackend::Sqlite => LedgerLocation::Database(ledger_path(config)?),
        LedgerBackend::Sheets => LedgerLocation::Spreadsheet(build_sheets_config(config)?),
    };

    Ok(LedgerConfig {
        location,
        store: optional(config, "ledger", "store").unwrap_or_else(|| DEFAULT_STORE.to_string()),
        tab: optional(config, "ledger", "tab").unwrap_or_else(|| DEFAULT_TAB.to_string()),
        date_match: parse_setting(config, "ledger", "date_match")?.unwrap_or_default(),
    })
}

fn ledger_path(config: &dyn ConfigPort) -> Result<PathBuf, DigestError> {
    required(config, "ledger", "path").map(PathBuf::from)
}

fn build_sheets_config(config: &dyn ConfigPort) -> Result<SheetsConfig, DigestError> {
    let access_token = optional(config, "sheets", "access_token");
    let api_key = optional(config, "sheets", "api_key");
    if access_token.is_none() && api_key.is_none() {
        return Err(DigestError::missing("sheets", "access_token"));
    }

    Ok(SheetsConfig {
        spreadsheet_id: required(config, "sheets", "spreadsheet_id")?,
        access_token,
        api_key,
        api_base: api_base(config, "sheets", DEFAULT_SHEETS_API_BASE),
        timeout: timeout(config, "sheets")?,
    })
}

pub fn build_notify_config(config: &dyn ConfigPort) -> Result<NotifyConfig, DigestError> {
    let timeout = timeout(config, "notify")?;

    let channel = match required(config, "notify", "channel")?.to_lowercase().as_str() {
        "sms" => ChannelConfig::Sms(SmsConfig {
            account_sid: required(config, "sms", "account_sid")?,
            auth_token: required(config, "sms", "auth_token")?,
            from: required(config, "sms", "from")?,
            to: required(config, "sms", "to")?,
            api_base: api_base(config, "sms", DEFAULT_SMS_API_BASE),
        }),
        "email" => {
            let from = required(config, "email", "from")?;
            let to = required(config, "email", "to")?;
            validate_address("from", &from)?;
            validate_address("to", &to)?;
            ChannelConfig::Email(EmailConfig {
                api_key: required(config, "email", "api_key")?,
                from,
                to,
                api_base: api_base(config, "email", DEFAULT_EMAIL_API_BASE),
            })
        }
        other => {
            return Err(DigestError::invalid(
                "notify",
                "channel",
                format!("unknown channel {other:?}, expected sms or email"),
            ));
        }
    };

    Ok(NotifyConfig {
        channel,
        timeout,
    })
}

fn timeout(config: &dyn ConfigPort, section: &str) -> Result<Duration, DigestError> {
    let secs = typed(config.get_int(section, "timeout_secs"), section, "timeout_secs")?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if secs <= 0 {
        return Err(DigestError::invalid(
            section,
            "timeout_secs",
            "timeout_secs must be positive",
        ));
    }
    Ok(Duration::from_secs(secs as u64))
}

fn typed<T>(
    value: Result<Option<T>, String>,
    section: &str,
    key: &str,
) -> Result<Option<T>, DigestError> {
    value.map_err(|reason| DigestError::invalid(section, key, reason))
}

fn optional(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, DigestError> {
    optional(config, section, key).ok_or_else(|| DigestError::missing(section, key))
}

fn parse_setting<T>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, DigestError>
where
    T: std::str::FromStr<Err = String>,
{
    optional(config, section, key)
        .map(|v| v.parse().map_err(|reason| DigestError::invalid(section, key, reason)))
        .transpose()
}

fn api_base(config: &dyn ConfigPort, section: &str, default: &str) -> String {
    optional(config, section, "api_base")
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn validate_address(key: &str, value: &str) -> Result<(), DigestError> {
    match value.split_once('@') {
        Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DigestError::invalid(
            "email",
            key,
            format!("{value:?} is not an email address"),
        )),
    }
}
