//! Error taxonomy and exit-code mapping.

/// Recoverable data-shape problem found while reading the ledger.
///
/// Never aborts a run: the affected rows or cells degrade to "no rows" or
/// "contributes zero" and the issue is logged as a warning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataFormatError {
    #[error("ledger header has no {0} column")]
    MissingColumn(&'static str),

    #[error("unparsable {column} value {value:?} in row {row}")]
    UnparsableNumber {
        column: &'static str,
        row: usize,
        value: String,
    },
}

/// Failure reported by a notification channel.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("{channel} rejected the message: HTTP {status}: {body}")]
    Rejected {
        channel: &'static str,
        status: u16,
        body: String,
    },

    #[error("{channel} transport error: {reason}")]
    Transport {
        channel: &'static str,
        reason: String,
    },
}

/// Top-level error type for tradedigest.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DigestError {
    pub fn missing(section: &str, key: &str) -> Self {
        DigestError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        DigestError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn ledger(reason: impl Into<String>) -> Self {
        DigestError::Ledger {
            reason: reason.into(),
        }
    }
}

impl From<&DigestError> for std::process::ExitCode {
    fn from(err: &DigestError) -> Self {
        let code: u8 = match err {
            DigestError::Io(_) => 1,
            DigestError::ConfigParse { .. }
            | DigestError::ConfigMissing { .. }
            | DigestError::ConfigInvalid { .. } => 2,
            DigestError::Ledger { .. } => 3,
            DigestError::Notification(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
