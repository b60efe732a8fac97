//! Statement renderers. Section contents and ordering
//! (Revenue → Expenses → Summary) are the contract shared by all three
//! output formats; page geometry and cell widths are not.

pub mod csv;
pub mod pdf;
pub mod saft;

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Placeholder for a missing required text field. Renderers substitute it
/// instead of failing.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Placeholder for a missing customer/guest name.
pub const UNKNOWN: &str = "Unknown";

/// Format a monetary amount for display: currency symbol, grouped integer
/// digits, always two decimals. Negative amounts keep a leading minus.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let cents = (amount.abs() * dec!(100))
        .round()
        .to_i128()
        .unwrap_or_default();
    let units = (cents / 100).to_formatted_string(&Locale::en);
    let fraction = cents % 100;
    let sign = if amount.is_sign_negative() && cents != 0 {
        "-"
    } else {
        ""
    };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{units}.{fraction:02}"),
        None => format!("{sign}{units}.{fraction:02} {currency}"),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "EUR" => Some("\u{20ac}"),
        "USD" => Some("$"),
        "GBP" => Some("\u{a3}"),
        _ => None,
    }
}

/// A fixed two-decimal plain string for machine-readable outputs.
pub fn plain_amount(amount: Decimal) -> String {
    let mut fixed =
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(2);
    fixed.to_string()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}
