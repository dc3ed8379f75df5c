//! Quick portfolio marks from parallel symbol/weight arrays.
//!
//! Every holding is marked against the previous close, and holdings without
//! both prices are left out of the totals entirely.
use crate::core::config::LegacyPortfolio;
use crate::core::quote::QuoteMap;
use crate::core::symbol::feed_symbol;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    pub name: String,
    pub total_value: f64,
    pub total_initial_value: f64,
    pub net_value: String,
    pub profit: String,
    pub return_rate: String,
    /// Holdings that contributed to the totals.
    pub priced: usize,
}

pub fn calculate_portfolio(
    portfolio: &LegacyPortfolio,
    initial_investment: f64,
    quotes: &QuoteMap,
) -> PortfolioSnapshot {
    let mut total_value = 0.0;
    let mut total_initial_value = 0.0;
    let mut priced = 0;

    for (symbol, weight) in portfolio.symbols.iter().zip(&portfolio.weights) {
        let initial_amount = initial_investment * weight;
        let Some(quote) = quotes.get(&feed_symbol(symbol)) else {
            continue;
        };
        if quote.current_price > 0.0 && quote.reference_price > 0.0 {
            let shares = initial_amount / quote.reference_price;
            total_value += shares * quote.current_price;
            total_initial_value += initial_amount;
            priced += 1;
        }
    }

    let profit = total_value - total_initial_value;
    let return_rate = if total_initial_value != 0.0 {
        format!("{:.2}", profit / total_initial_value * 100.0)
    } else {
        "0.00".to_string()
    };

    PortfolioSnapshot {
        name: portfolio.name.clone(),
        total_value,
        total_initial_value,
        net_value: format!("{total_value:.2}"),
        profit: format!("{profit:.2}"),
        return_rate,
        priced,
    }
}
