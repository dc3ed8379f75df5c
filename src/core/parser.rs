//! Parser for the `hq_str` quote feed.
//!
//! Each record is one line of the form `var hq_str_<SYMBOL>="<f0>,<f1>,...";`.
//! Anything else is skipped without complaint.

use crate::core::quote::{Quote, QuoteMap};

const RECORD_PREFIX: &str = "var hq_str_";
const MIN_FIELDS: usize = 3;

/// Which columns hold the current and previous-close prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Market {
    Mainland,
    HongKong,
    Us,
}

impl Market {
    /// Case-sensitive substring match, checked in this order.
    fn of(symbol: &str) -> Self {
        if symbol.contains("sh") || symbol.contains("sz") {
            Market::Mainland
        } else if symbol.contains("hk") {
            Market::HongKong
        } else {
            Market::Us
        }
    }

    /// `(current, reference)` column indices.
    fn columns(self) -> (usize, usize) {
        match self {
            Market::Mainland => (3, 2),
            Market::HongKong => (6, 3),
            // The US feed's field 1 is the open, used here as the current price.
            Market::Us => (1, 2),
        }
    }
}

pub fn parse_feed(text: &str) -> QuoteMap {
    text.lines().filter_map(parse_record).collect()
}

fn parse_record(line: &str) -> Option<(String, Quote)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let rest = &line[line.find(RECORD_PREFIX)? + RECORD_PREFIX.len()..];
    // Greedy on both ends: the symbol runs to the last `="`, the payload to the last `";`.
    let body = &rest[..rest.rfind("\";")?];
    let (symbol, payload) = body.rsplit_once("=\"")?;
    if symbol.is_empty() {
        return None;
    }

    let fields: Vec<&str> = payload.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let (current_col, reference_col) = Market::of(symbol).columns();
    let quote = Quote::new(
        numeric_field(&fields, current_col),
        numeric_field(&fields, reference_col),
    );
    Some((symbol.to_string(), quote))
}

/// Missing or unparseable fields read as zero.
fn numeric_field(fields: &[&str], index: usize) -> f64 {
    fields
        .get(index)
        .and_then(|f| f.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
