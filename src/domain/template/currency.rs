//! Currency formatting for the `format_currency` template filter.
//!
//! Output follows the Austrian German (`de-AT`) conventions regardless of the
//! host locale: `€ 1.234,56`, with a no-break space after the symbol.

use thiserror::Error;

/// No-break space placed between symbol and amount
const SYMBOL_SEPARATOR: char = '\u{a0}';
const GROUP_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Currencies without minor units
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "KRW", "ISK", "CLP", "VND"];

#[derive(Debug, Error, PartialEq)]
pub enum CurrencyError {
    #[error("Invalid currency code: {0}")]
    InvalidCode(String),

    #[error("Amount is not a finite number: {0}")]
    NotFinite(f64),
}

/// Format `amount` in `currency` (ISO 4217 code, case-insensitive)
pub fn format_currency(amount: f64, currency: &str) -> Result<String, CurrencyError> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CurrencyError::InvalidCode(currency.to_string()));
    }
    if !amount.is_finite() {
        return Err(CurrencyError::NotFinite(amount));
    }

    let code = currency.to_ascii_uppercase();
    let digits = minor_digits(&code);

    let fixed = format!("{:.*}", digits, amount.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut number = group_thousands(integer);
    if let Some(fraction) = fraction {
        number.push(DECIMAL_SEPARATOR);
        number.push_str(fraction);
    }

    // Rounding may turn a tiny negative into zero; no sign then.
    let negative = amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };

    Ok(format!("{}{}{}{}", sign, symbol(&code), SYMBOL_SEPARATOR, number))
}

fn minor_digits(code: &str) -> usize {
    if ZERO_DECIMAL_CURRENCIES.contains(&code) {
        0
    } else {
        2
    }
}

fn symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "USD" => "$",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

fn group_thousands(integer: &str) -> String {
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}
