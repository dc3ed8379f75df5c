use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("No exchange rate for currency {currency} (fund: {fund})")]
    MissingExchangeRate { fund: String, currency: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
