#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::process::ExitCode;
use tradedigest::domain::date_filter::DateMatch;
use tradedigest::domain::digest::DigestOptions;
use tradedigest::domain::error::{DigestError, NotificationError};
use tradedigest::domain::ledger::{Header, LedgerRow, LedgerSnapshot};
use tradedigest::domain::summary::RenderPolicy;
use tradedigest::ports::notifier::{DeliveryReceipt, Notifier};
use tradedigest::ports::row_source::RowSource;

pub const FULL_HEADER: &[&str] = &["Timestamp", "Side", "Price", "Notional"];

pub struct MockRowSource {
    pub snapshot: LedgerSnapshot,
    pub error: Option<String>,
    pub fetches: Cell<usize>,
}

impl MockRowSource {
    pub fn new(snapshot: LedgerSnapshot) -> Self {
        Self {
            snapshot,
            error: None,
            fetches: Cell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            snapshot: LedgerSnapshot::empty(),
            error: Some(reason.to_string()),
            fetches: Cell::new(0),
        }
    }
}

impl RowSource for MockRowSource {
    fn fetch_all(&self) -> Result<LedgerSnapshot, DigestError> {
        self.fetches.set(self.fetches.get() + 1);
        match &self.error {
            Some(reason) => Err(DigestError::ledger(reason.clone())),
            None => Ok(self.snapshot.clone()),
        }
    }

    fn describe(&self) -> String {
        "mock ledger".to_string()
    }
}

/// Records every send; optionally rejects with the given HTTP status.
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<(Option<String>, String)>>,
    pub reject_with: Option<u16>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            reject_with: None,
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            reject_with: Some(status),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn send(
        &self,
        subject: Option<&str>,
        body: &str,
    ) -> Result<DeliveryReceipt, NotificationError> {
        self.sent
            .borrow_mut()
            .push((subject.map(str::to_string), body.to_string()));
        match self.reject_with {
            Some(status) => Err(NotificationError::Rejected {
                channel: "mock",
                status,
                body: "rejected".into(),
            }),
            None => Ok(DeliveryReceipt {
                channel: "mock",
                status: 200,
                message_id: Some(format!("msg-{}", self.sent.borrow().len())),
            }),
        }
    }

    fn channel(&self) -> &'static str {
        "mock"
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn snapshot(header: &[&str], rows: &[&[&str]]) -> LedgerSnapshot {
    LedgerSnapshot::new(
        header.iter().copied().collect::<Header>(),
        rows.iter()
            .map(|r| r.iter().copied().collect::<LedgerRow>())
            .collect(),
    )
}

pub fn options(today: NaiveDate, policy: RenderPolicy) -> DigestOptions {
    DigestOptions {
        today,
        date_match: DateMatch::Substring,
        policy,
    }
}

/// The two-row mixed day: one buy costing 100, one sell with 150 proceeds.
pub fn scenario_a() -> LedgerSnapshot {
    snapshot(
        FULL_HEADER,
        &[
            &["2024-06-01T10:00Z", "buy", "", "100"],
            &["2024-06-01T11:00Z", "sell", "150", ""],
        ],
    )
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Writes `<dir>/Trading Log/log.csv` and returns the directory.
pub fn write_csv_ledger(content: &str) -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    let store = dir.path().join("Trading Log");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(store.join("log.csv"), content).unwrap();
    dir
}

/// Creates `table` with all-TEXT `columns` in a new database file and inserts
/// `rows` in order. Short rows leave trailing columns NULL.
#[cfg(feature = "sqlite")]
pub fn write_sqlite_ledger(
    path: &std::path::Path,
    table: &str,
    columns: &[&str],
    rows: &[&[&str]],
) {
    let quote = |name: &str| format!("\"{}\"", name.replace('"', "\"\""));
    let mut conn = rusqlite::Connection::open(path).unwrap();

    let defs: Vec<String> = columns.iter().map(|c| format!("{} TEXT", quote(c))).collect();
    conn.execute_batch(&format!("CREATE TABLE {} ({})", quote(table), defs.join(", ")))
        .unwrap();

    let tx = conn.transaction().unwrap();
    for row in rows {
        let used = &columns[..row.len().min(columns.len())];
        let names: Vec<String> = used.iter().map(|c| quote(c)).collect();
        let params: Vec<String> = (1..=used.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(table),
            names.join(", "),
            params.join(", ")
        );
        tx.execute(&sql, rusqlite::params_from_iter(row.iter().take(used.len())))
            .unwrap();
    }
    tx.commit().unwrap();
}

/// `ExitCode` has no stable accessor for its value; compare the debug form.
pub fn assert_exit_code(code: ExitCode, expected: u8) {
    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(expected)));
}
