//! Ledger snapshot types: header plus ordered text rows.

pub const TIMESTAMP: &str = "Timestamp";
pub const SIDE: &str = "Side";
pub const PRICE: &str = "Price";
pub const NOTIONAL: &str = "Notional";

/// Column names in ledger order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Position of `name`, first occurrence wins. Matching is exact.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Header {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// One ledger row. May be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerRow {
    cells: Vec<String>,
}

impl LedgerRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell at `index`, `None` when the row is too short.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LedgerRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Immutable view of the whole ledger for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub header: Header,
    pub rows: Vec<LedgerRow>,
}

impl LedgerSnapshot {
    pub fn new(header: Header, rows: Vec<LedgerRow>) -> Self {
        Self { header, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from raw records where the first record is the header.
    pub fn from_records(mut records: Vec<Vec<String>>) -> Self {
        if records.is_empty() {
            return Self::empty();
        }
        let header = Header::new(records.remove(0));
        let rows = records.into_iter().map(LedgerRow::new).collect();
        Self { header, rows }
    }
}
