//! Maps configured holding codes onto feed symbols.

/// Adds the market prefix the quote feed expects.
///
/// - `600000.SH` / `000001.SZ` style codes are lower-cased into `sh600000`.
/// - 5-digit numeric codes are Hong Kong listings: `hk03455`.
/// - Short alphabetic codes are US listings: `gb_qqq`.
/// - 6-digit numeric codes are mainland listings, routed by leading digit.
pub fn feed_symbol(code: &str) -> String {
    let code = code.trim();
    let upper = code.to_ascii_uppercase();

    for exchange in ["SH", "SZ"] {
        if let Some(digits) = upper.strip_suffix(exchange) {
            let digits = digits.trim_end_matches('.');
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return format!("{}{}", exchange.to_ascii_lowercase(), digits);
            }
        }
    }

    let numeric = !code.is_empty() && code.chars().all(|c| c.is_ascii_digit());
    if numeric && code.len() == 5 {
        return format!("hk{code}");
    }
    if numeric && code.len() == 6 {
        return match code.as_bytes()[0] {
            b'6' | b'5' => format!("sh{code}"),
            b'0' | b'3' | b'1' => format!("sz{code}"),
            _ => code.to_string(),
        };
    }
    if !code.is_empty() && code.len() <= 5 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        return format!("gb_{}", code.to_ascii_lowercase());
    }

    code.to_string()
}
