//! Holding and fund valuation against a fixed allocation model.
use crate::core::config::{FundConfig, Holding};
use crate::core::cost_basis::CostBasisStore;
use crate::core::quote::{Quote, QuoteMap};
use crate::core::symbol::feed_symbol;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// The two ways this crate can mark a portfolio to market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValuationStrategy {
    /// Marks each holding against its purchase price, bootstrapped from the
    /// first live quote. Unpriced holdings count flat at their allocation.
    #[default]
    CostBasis,
    /// Marks each holding against the previous close. Unpriced holdings are
    /// left out of the totals altogether.
    PreviousClose,
}

impl Display for ValuationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ValuationStrategy::CostBasis => "cost-basis",
                ValuationStrategy::PreviousClose => "previous-close",
            }
        )
    }
}

impl FromStr for ValuationStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cost-basis" => Ok(ValuationStrategy::CostBasis),
            "previous-close" => Ok(ValuationStrategy::PreviousClose),
            _ => Err(anyhow::anyhow!("Invalid valuation strategy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingDetail {
    pub code: String,
    pub name: String,
    pub allocation: f64,
    pub allocation_amount: f64,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    pub change_percent: Option<String>,
    pub shares: f64,
    pub current_value: f64,
    pub profit: f64,
    pub profit_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundSummary {
    pub total_amount: f64,
    pub currency: String,
    pub total_current_value: f64,
    pub total_profit: f64,
    pub total_allocation_amount: f64,
    pub total_profit_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundValuation {
    pub fund_id: String,
    pub name: String,
    pub holdings: Vec<HoldingDetail>,
    pub summary: FundSummary,
}

/// Values one holding of `fund`.
///
/// A holding without a cost basis takes the quote's current price as its
/// cost basis (recorded in `store`) before anything is computed, so its first
/// valuation is always flat. Without any current price the holding counts as
/// unchanged at its allocation amount.
pub fn valuate_holding(
    fund: &FundConfig,
    holding: &Holding,
    quote: Option<&Quote>,
    store: &mut CostBasisStore,
) -> HoldingDetail {
    let allocation_amount = fund.total_amount * holding.allocation;
    let current_price = quote.filter(|q| q.has_price()).map(|q| q.current_price);

    let purchase_price = match (store.get(&fund.id, &holding.code), current_price) {
        (Some(price), _) => Some(price),
        (None, Some(price)) => Some(store.bootstrap(&fund.id, &holding.code, price)),
        (None, None) => None,
    };

    let shares = purchase_price.map_or(0.0, |p| allocation_amount / p);
    let current_value = match current_price {
        Some(price) => shares * price,
        None => allocation_amount,
    };
    let profit = current_value - allocation_amount;

    HoldingDetail {
        code: holding.code.clone(),
        name: holding.name.clone(),
        allocation: holding.allocation,
        allocation_amount,
        purchase_price,
        current_price,
        change_percent: quote.map(|q| q.change_percent.clone()),
        shares,
        current_value,
        profit,
        profit_rate: profit / allocation_amount * 100.0,
    }
}

/// Values every holding of `fund`, in configuration order, and totals them.
pub fn summarize_fund(
    fund: &FundConfig,
    quotes: &QuoteMap,
    store: &mut CostBasisStore,
) -> FundValuation {
    let mut total_current_value = 0.0;
    let mut total_profit = 0.0;
    let mut total_allocation_amount = 0.0;

    let holdings: Vec<HoldingDetail> = fund
        .holdings
        .iter()
        .map(|holding| {
            let symbol = feed_symbol(&holding.code);
            let quote = quotes.get(&symbol);
            if quote.is_none() {
                debug!("No quote for {} ({}) in fund {}", holding.code, symbol, fund.id);
            }
            let detail = valuate_holding(fund, holding, quote, store);
            total_current_value += detail.current_value;
            total_profit += detail.profit;
            total_allocation_amount += detail.allocation_amount;
            detail
        })
        .collect();

    FundValuation {
        fund_id: fund.id.clone(),
        name: fund.display_name().to_string(),
        holdings,
        summary: FundSummary {
            total_amount: fund.total_amount,
            currency: fund.currency.clone(),
            total_current_value,
            total_profit,
            total_allocation_amount,
            total_profit_rate: total_profit / total_allocation_amount * 100.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(code: &str, allocation: f64, purchase_price: Option<f64>) -> Holding {
        Holding {
            code: code.to_string(),
            name: format!("{code} ETF"),
            allocation,
            purchase_price,
        }
    }

    fn fund(holdings: Vec<Holding>) -> FundConfig {
        FundConfig {
            id: "a-share".to_string(),
            name: Some("A-Share".to_string()),
            currency: "CNY".to_string(),
            total_amount: 1_000_000.0,
            purchase_date: None,
            holdings,
        }
    }

    #[test]
    fn test_bootstrap_from_first_price() {
        let fund = fund(vec![holding("513390", 1.0, None)]);
        let mut store = CostBasisStore::new();
        let quote = Quote::new(100.0, 98.0);

        let detail = valuate_holding(&fund, &fund.holdings[0], Some(&quote), &mut store);

        assert_eq!(store.get("a-share", "513390"), Some(100.0));
        assert_eq!(detail.purchase_price, Some(100.0));
        assert_eq!(detail.shares, 10_000.0);
        assert_eq!(detail.profit, 0.0);
        assert_eq!(detail.profit_rate, 0.0);
        assert_eq!(detail.change_percent.as_deref(), Some("2.04"));
    }

    #[test]
    fn test_revaluation_is_idempotent() {
        let fund = fund(vec![holding("513390", 1.0, Some(80.0))]);
        let mut store = CostBasisStore::from_funds(std::slice::from_ref(&fund));
        let quote = Quote::new(100.0, 98.0);

        let first = valuate_holding(&fund, &fund.holdings[0], Some(&quote), &mut store);
        let second = valuate_holding(&fund, &fund.holdings[0], Some(&quote), &mut store);

        assert_eq!(first, second);
        assert_eq!(store.get("a-share", "513390"), Some(80.0));
        assert_eq!(first.current_value, 1_250_000.0);
        assert_eq!(first.profit, 250_000.0);
        assert_eq!(first.profit_rate, 25.0);
    }

    #[test]
    fn test_bootstrapped_basis_survives_price_moves() {
        let fund = fund(vec![holding("513390", 1.0, None)]);
        let mut store = CostBasisStore::new();

        valuate_holding(&fund, &fund.holdings[0], Some(&Quote::new(100.0, 99.0)), &mut store);
        let moved = valuate_holding(
            &fund,
            &fund.holdings[0],
            Some(&Quote::new(110.0, 100.0)),
            &mut store,
        );

        assert_eq!(moved.purchase_price, Some(100.0));
        assert!((moved.profit - 100_000.0).abs() < 1e-6);
        assert!((moved.profit_rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_unpriced_holding_is_flat() {
        let fund = fund(vec![holding("513390", 1.0, None)]);
        let mut store = CostBasisStore::new();

        let missing = valuate_holding(&fund, &fund.holdings[0], None, &mut store);
        let zero = valuate_holding(
            &fund,
            &fund.holdings[0],
            Some(&Quote::new(0.0, 98.0)),
            &mut store,
        );

        for detail in [missing, zero] {
            assert_eq!(detail.shares, 0.0);
            assert_eq!(detail.current_value, detail.allocation_amount);
            assert_eq!(detail.profit, 0.0);
            assert_eq!(detail.purchase_price, None);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_known_basis_without_price_is_flat() {
        let fund = fund(vec![holding("513390", 1.0, Some(50.0))]);
        let mut store = CostBasisStore::from_funds(std::slice::from_ref(&fund));

        let detail = valuate_holding(&fund, &fund.holdings[0], None, &mut store);
        assert_eq!(detail.shares, 20_000.0);
        assert_eq!(detail.current_value, 1_000_000.0);
        assert_eq!(detail.profit, 0.0);
    }

    #[test]
    fn test_summarize_keeps_order_and_totals() {
        let fund = fund(vec![
            holding("513390", 0.25, Some(1.0)),
            holding("159652", 0.25, None),
            holding("588200", 0.25, None),
            holding("515880", 0.15, None),
            holding("518880", 0.10, Some(5.0)),
        ]);
        let mut store = CostBasisStore::from_funds(std::slice::from_ref(&fund));
        let mut quotes = QuoteMap::new();
        quotes.insert("sh513390".to_string(), Quote::new(1.2, 1.1));
        quotes.insert("sz159652".to_string(), Quote::new(2.0, 2.0));
        quotes.insert("sh518880".to_string(), Quote::new(4.5, 4.6));

        let valuation = summarize_fund(&fund, &quotes, &mut store);

        let codes: Vec<&str> = valuation.holdings.iter().map(|h| h.code.as_str()).collect();
        assert_eq!(codes, vec!["513390", "159652", "588200", "515880", "518880"]);

        let allocated: f64 = valuation.holdings.iter().map(|h| h.allocation_amount).sum();
        assert!((allocated - fund.total_amount).abs() <= 1e-9 * fund.total_amount);

        let summary = &valuation.summary;
        // 513390: +50000, 518880: -10000, the rest flat.
        assert!((summary.total_profit - 40_000.0).abs() < 1e-6);
        assert!((summary.total_current_value - 1_040_000.0).abs() < 1e-6);
        assert!((summary.total_allocation_amount - 1_000_000.0).abs() < 1e-6);
        assert!((summary.total_profit_rate - 4.0).abs() < 1e-9);
        assert_eq!(summary.currency, "CNY");
        assert_eq!(store.get("a-share", "159652"), Some(2.0));
        assert_eq!(store.get("a-share", "588200"), None);
    }

    #[test]
    fn test_strategy_round_trips_through_str() {
        for strategy in [ValuationStrategy::CostBasis, ValuationStrategy::PreviousClose] {
            assert_eq!(strategy.to_string().parse::<ValuationStrategy>().unwrap(), strategy);
        }
        assert!("mark-to-dream".parse::<ValuationStrategy>().is_err());
    }
}
