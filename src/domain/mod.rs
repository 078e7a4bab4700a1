//! Core domain types and logic.

pub mod ledger;
pub mod date_filter;
pub mod classifier;
pub mod metrics;
pub mod summary;
pub mod digest;
pub mod config_validation;
pub mod error;
