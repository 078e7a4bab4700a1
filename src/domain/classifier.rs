//! Buy/sell classification of the day's ledger rows.

use super::error::DataFormatError;
use super::ledger::{Header, LedgerRow, NOTIONAL, PRICE, SIDE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
    Unknown,
}

impl Side {
    /// Case-insensitive, whitespace-tolerant. Anything but buy/sell is `Unknown`.
    pub fn parse(cell: &str) -> Self {
        match cell.trim().to_lowercase().as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            _ => Side::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub side: Side,
    pub price: Option<f64>,
    pub notional: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub buys: Vec<TradeRecord>,
    pub sells: Vec<TradeRecord>,
    pub warnings: Vec<DataFormatError>,
}

impl Classification {
    pub fn trade_count(&self) -> usize {
        self.buys.len() + self.sells.len()
    }
}

struct Columns {
    side: usize,
    price: Option<usize>,
    notional: Option<usize>,
}

pub fn classify(header: &Header, rows: &[LedgerRow]) -> Classification {
    let Some(side) = header.position(SIDE) else {
        return Classification {
            warnings: vec![DataFormatError::MissingColumn(SIDE)],
            ..Classification::default()
        };
    };
    let columns = Columns {
        side,
        price: header.position(PRICE),
        notional: header.position(NOTIONAL),
    };

    let mut result = Classification::default();
    for (row_no, row) in rows.iter().enumerate() {
        let Some(cell) = row.cell(columns.side) else {
            continue;
        };
        let side = Side::parse(cell);
        if side == Side::Unknown {
            continue;
        }

        let record = TradeRecord {
            side,
            price: numeric_cell(row, columns.price, PRICE, row_no, &mut result.warnings),
            notional: numeric_cell(row, columns.notional, NOTIONAL, row_no, &mut result.warnings),
        };
        match side {
            Side::Buy => result.buys.push(record),
            Side::Sell => result.sells.push(record),
            Side::Unknown => {}
        }
    }
    result
}

/// Parses an optional numeric cell. Empty or missing cells are `None` silently;
/// unparsable or non-finite values are `None` and recorded as a warning.
fn numeric_cell(
    row: &LedgerRow,
    index: Option<usize>,
    column: &'static str,
    row_no: usize,
    warnings: &mut Vec<DataFormatError>,
) -> Option<f64> {
    let raw = row.cell(index?)?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warnings.push(DataFormatError::UnparsableNumber {
                column,
                row: row_no,
                value: raw.to_string(),
            });
            None
        }
    }
}
