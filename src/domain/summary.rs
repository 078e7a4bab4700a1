//! Rendering of daily metrics into notification subject/body text.
//!
//! Rendering is a pure function of [`DailyMetrics`], the "any trades today" flag
//! and the configured [`RenderPolicy`]. When no rows were recorded today every
//! policy returns [`NO_TRADES_MESSAGE`] verbatim as both subject and body.

use std::fmt;
use std::str::FromStr;

use super::metrics::DailyMetrics;

pub const NO_TRADES_MESSAGE: &str = "No trades today. Bot ran successfully.";
pub const DEFAULT_SUBJECT: &str = "Daily trading summary";
pub const NO_PROFIT_PHRASE: &str = "No profit generated today.";
pub const SUBJECT_ONLY_FILLER: &str = "See the trading log for details.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderPolicy {
    /// Always the canonical no-trades message.
    None,
    #[default]
    Verbose,
    /// Verbose, but a loss is never shown.
    SuppressedLoss,
    /// Short subject line, fixed filler body.
    SubjectOnly,
}

impl RenderPolicy {
    pub const ALL: [RenderPolicy; 4] = [
        RenderPolicy::None,
        RenderPolicy::Verbose,
        RenderPolicy::SuppressedLoss,
        RenderPolicy::SubjectOnly,
    ];
}

impl FromStr for RenderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "none" => Ok(RenderPolicy::None),
            "verbose" => Ok(RenderPolicy::Verbose),
            "suppressed-loss" => Ok(RenderPolicy::SuppressedLoss),
            "subject-only" => Ok(RenderPolicy::SubjectOnly),
            other => Err(format!(
                "unknown policy {other:?}, expected none, verbose, suppressed-loss or subject-only"
            )),
        }
    }
}

impl fmt::Display for RenderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderPolicy::None => "none",
            RenderPolicy::Verbose => "verbose",
            RenderPolicy::SuppressedLoss => "suppressed-loss",
            RenderPolicy::SubjectOnly => "subject-only",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub subject: String,
    pub body: String,
}

impl Summary {
    pub fn no_trades() -> Self {
        Summary {
            subject: NO_TRADES_MESSAGE.to_string(),
            body: NO_TRADES_MESSAGE.to_string(),
        }
    }
}

/// Two-decimal fixed point. Negative zero renders as `0.00`.
pub fn format_money(value: f64) -> String {
    let s = format!("{value:.2}");
    if s == "-0.00" { "0.00".to_string() } else { s }
}

pub fn render(metrics: &DailyMetrics, had_any_trades_today: bool, policy: RenderPolicy) -> Summary {
    if !had_any_trades_today {
        return Summary::no_trades();
    }
    match policy {
        RenderPolicy::None => Summary::no_trades(),
        RenderPolicy::Verbose => render_verbose(metrics, false),
        RenderPolicy::SuppressedLoss => render_verbose(metrics, true),
        RenderPolicy::SubjectOnly => render_subject_only(metrics),
    }
}

fn count_clauses(metrics: &DailyMetrics) -> Vec<String> {
    let mut parts = Vec::new();
    if metrics.buy_count > 0 {
        parts.push(format!("Bought {} stocks", metrics.buy_count));
    }
    if metrics.sell_count > 0 {
        parts.push(format!("Sold {} stocks", metrics.sell_count));
    }
    parts
}

fn render_verbose(metrics: &DailyMetrics, suppress_loss: bool) -> Summary {
    let mut parts = count_clauses(metrics);
    let profit = format_money(metrics.net_profit);
    if suppress_loss && profit.starts_with('-') {
        parts.push(NO_PROFIT_PHRASE.to_string());
    } else {
        parts.push(format!("Generated ${profit} profit today."));
    }

    Summary {
        subject: DEFAULT_SUBJECT.to_string(),
        body: parts.join(". "),
    }
}

fn render_subject_only(metrics: &DailyMetrics) -> Summary {
    let mut subject = format!("Bought {} stocks", metrics.buy_count);
    if metrics.proceeds > 0.0 {
        subject.push_str(&format!(
            ". Proceeds ${} today.",
            format_money(metrics.proceeds)
        ));
    } else {
        subject.push('.');
    }

    Summary {
        subject,
        body: SUBJECT_ONLY_FILLER.to_string(),
    }
}
