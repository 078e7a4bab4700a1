//! CSV file ledger adapter.
//!
//! The store is a directory under `base_path`, each tab a CSV file inside it:
//! `<base_path>/<store>/<tab>.csv`.

use crate::domain::error::DigestError;
use crate::domain::ledger::LedgerSnapshot;
use crate::ports::row_source::RowSource;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvLedgerAdapter {
    base_path: PathBuf,
    store: String,
    tab: String,
}

impl CsvLedgerAdapter {
    pub fn new(base_path: PathBuf, store: &str, tab: &str) -> Self {
        Self {
            base_path,
            store: store.to_string(),
            tab: tab.to_string(),
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.base_path
            .join(&self.store)
            .join(format!("{}.csv", self.tab))
    }
}

impl RowSource for CsvLedgerAdapter {
    fn fetch_all(&self) -> Result<LedgerSnapshot, DigestError> {
        let path = self.csv_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            DigestError::ledger(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        for result in rdr.records() {
            let record =
                result.map_err(|e| DigestError::ledger(format!("CSV parse error: {}", e)))?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        debug!(path = %path.display(), records = records.len(), "read ledger CSV");
        Ok(LedgerSnapshot::from_records(records))
    }

    fn describe(&self) -> String {
        format!("{} / {} ({})", self.store, self.tab, self.csv_path().display())
    }
}
