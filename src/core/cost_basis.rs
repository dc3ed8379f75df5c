//! Cost basis per holding, seeded from configuration and bootstrapped from
//! the first observed live price.

use crate::core::config::FundConfig;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CostBasisStore {
    // (fund id, holding code) -> purchase price
    prices: HashMap<(String, String), f64>,
}

impl CostBasisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with every purchase price recorded in the funds.
    pub fn from_funds(funds: &[FundConfig]) -> Self {
        let prices = funds
            .iter()
            .flat_map(|fund| {
                fund.holdings.iter().filter_map(move |h| {
                    h.purchase_price
                        .map(|price| ((fund.id.clone(), h.code.clone()), price))
                })
            })
            .collect();
        Self { prices }
    }

    pub fn get(&self, fund_id: &str, code: &str) -> Option<f64> {
        self.prices
            .get(&(fund_id.to_string(), code.to_string()))
            .copied()
    }

    /// Records `price` as the cost basis unless one already exists, and
    /// returns whichever is now stored.
    pub fn bootstrap(&mut self, fund_id: &str, code: &str, price: f64) -> f64 {
        *self
            .prices
            .entry((fund_id.to_string(), code.to_string()))
            .or_insert_with(|| {
                info!(fund = fund_id, code, price, "Bootstrapped cost basis");
                price
            })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
