//! Daily aggregate metrics: counts, proceeds, cost and net profit.

use super::classifier::Classification;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyMetrics {
    pub buy_count: usize,
    pub sell_count: usize,
    /// Sum of sell `Price` cells.
    pub proceeds: f64,
    /// Sum of buy `Notional` cells.
    pub cost: f64,
    pub net_profit: f64,
}

impl DailyMetrics {
    /// Missing or unparsable amounts contribute zero.
    pub fn compute(classification: &Classification) -> Self {
        let proceeds: f64 = classification
            .sells
            .iter()
            .map(|t| t.price.unwrap_or(0.0))
            .sum();
        let cost: f64 = classification
            .buys
            .iter()
            .map(|t| t.notional.unwrap_or(0.0))
            .sum();

        DailyMetrics {
            buy_count: classification.buys.len(),
            sell_count: classification.sells.len(),
            proceeds,
            cost,
            net_profit: proceeds - cost,
        }
    }

    pub fn trade_count(&self) -> usize {
        self.buy_count + self.sell_count
    }
}
