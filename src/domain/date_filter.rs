//! Selection of the rows recorded on the current UTC calendar day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::error::DataFormatError;
use super::ledger::{Header, LedgerRow, LedgerSnapshot, TIMESTAMP};

/// How a Timestamp cell is matched against "today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateMatch {
    /// The cell contains the `YYYY-MM-DD` string anywhere.
    #[default]
    Substring,
    /// The cell parses as a timestamp whose UTC date equals today.
    Calendar,
}

impl FromStr for DateMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(DateMatch::Substring),
            "calendar" => Ok(DateMatch::Calendar),
            other => Err(format!(
                "unknown date match {other:?}, expected substring or calendar"
            )),
        }
    }
}

impl fmt::Display for DateMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateMatch::Substring => write!(f, "substring"),
            DateMatch::Calendar => write!(f, "calendar"),
        }
    }
}

/// Rows selected for one day, with the header they are positioned against.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySelection {
    pub header: Header,
    pub rows: Vec<LedgerRow>,
    pub warnings: Vec<DataFormatError>,
}

impl DaySelection {
    pub fn had_any_trades(&self) -> bool {
        !self.rows.is_empty()
    }
}

pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn select_today(snapshot: &LedgerSnapshot, today: NaiveDate, mode: DateMatch) -> DaySelection {
    let header = snapshot.header.clone();
    let Some(ts_idx) = header.position(TIMESTAMP) else {
        return DaySelection {
            header,
            rows: Vec::new(),
            warnings: vec![DataFormatError::MissingColumn(TIMESTAMP)],
        };
    };

    let today_str = today.format("%Y-%m-%d").to_string();
    let rows = snapshot
        .rows
        .iter()
        .filter(|row| match row.cell(ts_idx) {
            Some(cell) if !cell.is_empty() => match mode {
                DateMatch::Substring => cell.contains(&today_str),
                DateMatch::Calendar => parse_utc_date(cell) == Some(today),
            },
            _ => false,
        })
        .cloned()
        .collect();

    DaySelection {
        header,
        rows,
        warnings: Vec::new(),
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%:z"];

/// UTC calendar date of a ledger timestamp. Naive timestamps are taken as UTC.
/// A cell that is not entirely a timestamp has no date.
pub fn parse_utc_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
