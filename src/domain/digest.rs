//! Day digest pipeline: filter, classify, aggregate, render.
//!
//! Pure over a [`LedgerSnapshot`]; fetching and dispatch live at the edges.

use chrono::NaiveDate;

use super::classifier::classify;
use super::date_filter::{select_today, DateMatch};
use super::error::DataFormatError;
use super::ledger::LedgerSnapshot;
use super::metrics::DailyMetrics;
use super::summary::{render, RenderPolicy, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestOptions {
    pub today: NaiveDate,
    pub date_match: DateMatch,
    pub policy: RenderPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub today: NaiveDate,
    /// Rows selected for `today`, recognised side or not.
    pub rows_today: usize,
    pub metrics: DailyMetrics,
    pub summary: Summary,
    pub warnings: Vec<DataFormatError>,
}

pub fn build_digest(snapshot: &LedgerSnapshot, options: &DigestOptions) -> Digest {
    let selection = select_today(snapshot, options.today, options.date_match);
    let classification = classify(&selection.header, &selection.rows);
    let metrics = DailyMetrics::compute(&classification);
    let summary = render(&metrics, selection.had_any_trades(), options.policy);

    let mut warnings = selection.warnings.clone();
    // A missing Side column only matters once there are rows to classify.
    if selection.had_any_trades() {
        warnings.extend(classification.warnings);
    }

    Digest {
        today: options.today,
        rows_today: selection.rows.len(),
        metrics,
        summary,
        warnings,
    }
}
