//! Port traits at the edges of the digest pipeline.

pub mod config_port;
pub mod notifier;
pub mod row_source;
