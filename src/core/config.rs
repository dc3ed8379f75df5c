use crate::core::aggregate::ExchangeRates;
use crate::core::error::ValuationError;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::PathBuf};
use tracing::debug;

const ALLOCATION_TOLERANCE: f64 = 1e-6;
const RATE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Holding {
    pub code: String,
    pub name: String,
    pub allocation: f64,
    /// Cost basis recorded at purchase. Unset holdings bootstrap from the
    /// first live price.
    #[serde(default)]
    pub purchase_price: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FundConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub currency: String,
    pub total_amount: f64,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    pub holdings: Vec<Holding>,
}

impl FundConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    fn validate(&self) -> Result<(), ValuationError> {
        let invalid = |msg: String| Err(ValuationError::InvalidConfig(msg));

        if !(self.total_amount > 0.0) {
            return invalid(format!("fund {} has non-positive total_amount", self.id));
        }
        if self.holdings.is_empty() {
            return invalid(format!("fund {} has no holdings", self.id));
        }

        let mut codes = HashSet::new();
        for holding in &self.holdings {
            if !codes.insert(holding.code.as_str()) {
                return invalid(format!(
                    "fund {} lists holding {} more than once",
                    self.id, holding.code
                ));
            }
            if !(holding.allocation > 0.0 && holding.allocation <= 1.0) {
                return invalid(format!(
                    "holding {} in fund {} has allocation {} outside (0, 1]",
                    holding.code, self.id, holding.allocation
                ));
            }
            if let Some(price) = holding.purchase_price {
                if !(price > 0.0) {
                    return invalid(format!(
                        "holding {} in fund {} has non-positive purchase_price {}",
                        holding.code, self.id, price
                    ));
                }
            }
        }

        let total: f64 = self.holdings.iter().map(|h| h.allocation).sum();
        if (total - 1.0).abs() > ALLOCATION_TOLERANCE {
            return invalid(format!(
                "allocations in fund {} sum to {total}, expected 1.0",
                self.id
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LegacyPortfolio {
    pub name: String,
    pub symbols: Vec<String>,
    pub weights: Vec<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct LegacyConfig {
    #[serde(default)]
    pub initial_investment: f64,
    #[serde(default)]
    pub portfolios: Vec<LegacyPortfolio>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SinaProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub sina: Option<SinaProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            sina: Some(SinaProviderConfig {
                base_url: "https://hq.sinajs.cn".to_string(),
            }),
        }
    }
}

fn default_reporting_currency() -> String {
    "CNY".to_string()
}

fn default_refresh_interval() -> u64 {
    60
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub funds: Vec<FundConfig>,
    pub exchange_rates: ExchangeRates,
    #[serde(default = "default_reporting_currency")]
    pub reporting_currency: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub legacy: LegacyConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fundtrack", "fundtrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to load config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn sina_base_url(&self) -> &str {
        self.providers
            .sina
            .as_ref()
            .map_or("https://hq.sinajs.cn", |p| &p.base_url)
    }

    /// Checks the invariants the valuation engine relies on.
    pub fn validate(&self) -> Result<(), ValuationError> {
        let mut ids = HashSet::new();
        for fund in &self.funds {
            if !ids.insert(fund.id.as_str()) {
                return Err(ValuationError::InvalidConfig(format!(
                    "fund id {} is defined more than once",
                    fund.id
                )));
            }
            fund.validate()?;
            self.exchange_rates.rate_for(fund)?;
        }

        // Rates are multipliers into the reporting currency.
        match self.exchange_rates.get(&self.reporting_currency) {
            Some(rate) if (rate - 1.0).abs() <= RATE_TOLERANCE => {}
            rate => {
                return Err(ValuationError::InvalidConfig(format!(
                    "reporting currency {} must have an exchange rate of 1.0, found {:?}",
                    self.reporting_currency, rate
                )));
            }
        }

        if self.refresh_interval_secs == 0 {
            return Err(ValuationError::InvalidConfig(
                "refresh_interval_secs must be at least 1".to_string(),
            ));
        }

        for portfolio in &self.legacy.portfolios {
            if portfolio.symbols.len() != portfolio.weights.len() {
                return Err(ValuationError::InvalidConfig(format!(
                    "legacy portfolio {} has {} symbols but {} weights",
                    portfolio.name,
                    portfolio.symbols.len(),
                    portfolio.weights.len()
                )));
            }
        }
        Ok(())
    }
}
