//! Converts fund totals into the reporting currency and sums them.

use crate::core::config::FundConfig;
use crate::core::cost_basis::CostBasisStore;
use crate::core::error::ValuationError;
use crate::core::quote::QuoteMap;
use crate::core::valuation::{FundValuation, summarize_fund};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Static currency table: one unit of `currency` is worth `rate` units of
/// the reporting currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRates(HashMap<String, f64>);

impl ExchangeRates {
    pub fn new(rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self(rates.into_iter().collect())
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.0.get(currency).copied()
    }

    pub fn rate_for(&self, fund: &FundConfig) -> Result<f64, ValuationError> {
        self.rate_for_currency(&fund.id, &fund.currency)
    }

    /// Rate for `currency`, blaming `fund_id` when it is missing.
    pub fn rate_for_currency(&self, fund_id: &str, currency: &str) -> Result<f64, ValuationError> {
        self.get(currency)
            .ok_or_else(|| ValuationError::MissingExchangeRate {
                fund: fund_id.to_string(),
                currency: currency.to_string(),
            })
    }
}

/// Sums already summarized funds in the reporting currency.
pub fn aggregate(
    valuations: &[FundValuation],
    rates: &ExchangeRates,
) -> Result<f64, ValuationError> {
    let mut total = 0.0;
    for valuation in valuations {
        let summary = &valuation.summary;
        let rate = rates.rate_for_currency(&valuation.fund_id, &summary.currency)?;
        let contribution = summary.total_current_value * rate;
        debug!(
            fund = %valuation.fund_id,
            currency = %summary.currency,
            rate,
            contribution,
            "Converted fund total"
        );
        total += contribution;
    }
    Ok(total)
}

/// Summarizes every fund against `quotes` and sums the converted totals.
pub fn aggregate_funds(
    funds: &[FundConfig],
    quotes: &QuoteMap,
    store: &mut CostBasisStore,
    rates: &ExchangeRates,
) -> Result<f64, ValuationError> {
    let valuations: Vec<FundValuation> = funds
        .iter()
        .map(|fund| summarize_fund(fund, quotes, store))
        .collect();
    aggregate(&valuations, rates)
}
