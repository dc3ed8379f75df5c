use crate::core::parser::parse_feed;
use crate::core::quote::{QuoteMap, QuoteProvider};
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::header::REFERER;
use tracing::{debug, instrument};

/// The feed refuses requests without a Sina referer.
const FEED_REFERER: &str = "https://finance.sina.com.cn";

pub struct SinaQuoteProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl SinaQuoteProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fundtrack/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SinaQuoteProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries: 3,
            retry_delay_ms: 500,
        })
    }

    pub fn with_retry_policy(mut self, retries: usize, retry_delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

#[async_trait]
impl QuoteProvider for SinaQuoteProvider {
    #[instrument(name = "SinaQuoteFetch", skip(self, symbols), fields(count = symbols.len()))]
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<QuoteMap> {
        if symbols.is_empty() {
            return Ok(QuoteMap::new());
        }

        let url = format!("{}/list={}", self.base_url, symbols.join(","));
        debug!("Requesting quotes from {}", url);

        let response = with_retry(
            || async {
                self.client
                    .get(&url)
                    .header(REFERER, FEED_REFERER)
                    .send()
                    .await
            },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Request error for URL: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read quote feed body from {url}"))?;

        let quotes = parse_feed(&body);
        debug!("Parsed {} of {} requested quotes", quotes.len(), symbols.len());
        Ok(quotes)
    }
}
