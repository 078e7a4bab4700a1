//! Concrete adapter implementations for ports.

#[cfg(feature = "sqlite")]
pub mod sqlite_ledger_adapter;
pub mod csv_ledger_adapter;
pub mod email_notifier;
pub mod env_config_adapter;
pub mod file_config_adapter;
pub mod sheets_ledger_adapter;
pub(crate) mod http_channel;
pub mod sms_notifier;
