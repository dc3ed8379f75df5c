//! One refresh cycle is: fetch the feed, then value everything synchronously.

use crate::core::aggregate::aggregate;
use crate::core::config::AppConfig;
use crate::core::cost_basis::CostBasisStore;
use crate::core::error::ValuationError;
use crate::core::legacy::{PortfolioSnapshot, calculate_portfolio};
use crate::core::quote::{QuoteMap, QuoteProvider};
use crate::core::symbol::feed_symbol;
use crate::core::valuation::{FundValuation, summarize_fund};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub refreshed_at: DateTime<Utc>,
    /// `false` when the fetch failed and an empty quote map was used.
    pub feed_ok: bool,
    pub quotes: usize,
    pub funds: Vec<FundValuation>,
    /// Sum of all funds in the reporting currency.
    pub total: std::result::Result<f64, ValuationError>,
    pub snapshots: Vec<PortfolioSnapshot>,
}

/// Owns the cost-basis state across cycles.
///
/// Every cycle values both views: the cost-basis funds and the
/// previous-close snapshots. `ValuationStrategy` only selects what gets
/// rendered, so a `quick` view still bootstraps cost bases.
pub struct Tracker<P: QuoteProvider> {
    config: AppConfig,
    provider: P,
    store: CostBasisStore,
    symbols: Vec<String>,
}

impl<P: QuoteProvider> Tracker<P> {
    pub fn new(config: AppConfig, provider: P) -> Self {
        let store = CostBasisStore::from_funds(&config.funds);
        let symbols = feed_symbols(&config);
        Self {
            config,
            provider,
            store,
            symbols,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cost_basis(&self) -> &CostBasisStore {
        &self.store
    }

    /// Fetches quotes; a transport failure is logged and yields no quotes.
    async fn fetch(&self) -> (QuoteMap, bool) {
        match self.provider.fetch_quotes(&self.symbols).await {
            Ok(quotes) => {
                debug!("Fetched {} quotes for {} symbols", quotes.len(), self.symbols.len());
                (quotes, true)
            }
            Err(e) => {
                warn!(error = %e, "Quote fetch failed, valuing without prices");
                (QuoteMap::new(), false)
            }
        }
    }

    pub async fn refresh(&mut self) -> RefreshReport {
        let (quotes, feed_ok) = self.fetch().await;
        self.value(quotes, feed_ok)
    }

    fn value(&mut self, quotes: QuoteMap, feed_ok: bool) -> RefreshReport {
        let funds: Vec<FundValuation> = self
            .config
            .funds
            .iter()
            .map(|fund| summarize_fund(fund, &quotes, &mut self.store))
            .collect();
        let total = aggregate(&funds, &self.config.exchange_rates);
        let snapshots = self
            .config
            .legacy
            .portfolios
            .iter()
            .map(|p| calculate_portfolio(p, self.config.legacy.initial_investment, &quotes))
            .collect();

        RefreshReport {
            refreshed_at: Utc::now(),
            feed_ok,
            quotes: quotes.len(),
            funds,
            total,
            snapshots,
        }
    }

    /// Runs a cycle on every tick of `period` and hands each report to
    /// `publish`. Stops after `max_cycles` cycles when given, or at the first
    /// error `publish` returns.
    pub async fn watch<F>(
        &mut self,
        period: Duration,
        max_cycles: Option<usize>,
        mut publish: F,
    ) -> Result<()>
    where
        F: FnMut(&RefreshReport) -> Result<()>,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut cycle = 0usize;
        loop {
            if max_cycles.is_some_and(|max| cycle >= max) {
                break;
            }
            ticker.tick().await;
            cycle += 1;
            info!(cycle, "Refresh cycle starting");
            let report = self.refresh().await;
            publish(&report)?;
        }
        Ok(())
    }
}

/// Every distinct feed symbol referenced by funds and legacy portfolios,
/// in first-seen order.
pub fn feed_symbols(config: &AppConfig) -> Vec<String> {
    let codes = config
        .funds
        .iter()
        .flat_map(|f| f.holdings.iter().map(|h| h.code.as_str()))
        .chain(
            config
                .legacy
                .portfolios
                .iter()
                .flat_map(|p| p.symbols.iter().map(String::as_str)),
        );

    let mut symbols: Vec<String> = Vec::new();
    for code in codes {
        let symbol = feed_symbol(code);
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}
