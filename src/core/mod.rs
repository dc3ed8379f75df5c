//! Valuation engine and the abstractions around it

pub mod aggregate;
pub mod config;
pub mod cost_basis;
pub mod error;
pub mod legacy;
pub mod log;
pub mod parser;
pub mod quote;
pub mod refresh;
pub mod symbol;
pub mod valuation;

// Re-export main types for cleaner imports
pub use aggregate::ExchangeRates;
pub use cost_basis::CostBasisStore;
pub use error::ValuationError;
pub use quote::{Quote, QuoteMap, QuoteProvider};
pub use valuation::{FundSummary, FundValuation, HoldingDetail, ValuationStrategy};
