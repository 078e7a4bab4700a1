//! Ledger access port trait.

use crate::domain::error::DigestError;
use crate::domain::ledger::LedgerSnapshot;

/// Read-only provider of the full ledger.
///
/// One call per run; the returned snapshot is not re-read. An empty ledger is
/// an empty header with no rows, not an error.
pub trait RowSource {
    fn fetch_all(&self) -> Result<LedgerSnapshot, DigestError>;

    /// Human-readable location used in log lines.
    fn describe(&self) -> String;
}
