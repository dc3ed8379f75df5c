//! Quote types and the feed transport abstraction

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Feed symbol (with market prefix) to its latest quote.
pub type QuoteMap = HashMap<String, Quote>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Latest price; `0.0` means the feed had no usable price.
    pub current_price: f64,
    /// Previous session close.
    pub reference_price: f64,
    /// Day change in percent, formatted to two decimals.
    pub change_percent: String,
}

impl Quote {
    pub fn new(current_price: f64, reference_price: f64) -> Self {
        Self {
            current_price,
            reference_price,
            change_percent: change_percent(current_price, reference_price),
        }
    }

    pub fn has_price(&self) -> bool {
        self.current_price > 0.0
    }
}

fn change_percent(current: f64, reference: f64) -> String {
    if current != 0.0 && reference != 0.0 {
        format!("{:.2}", (current - reference) / reference * 100.0)
    } else {
        "0.00".to_string()
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches quotes for already prefixed feed symbols.
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<QuoteMap>;
}
