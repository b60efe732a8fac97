//! Hostkit upstream gateway: the single data-fetch contract this service
//! needs — invoices for a property in a date range. Credentials and base URL
//! come from config; the shared reqwest client carries the request timeout.
//!
//! Failures here are surfaced as `AppError::Dependency` so callers can tell
//! "could not reach upstream" apart from "no invoices in range".

use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::services::statement::{parse_amount, Invoice};

#[derive(Debug, Deserialize)]
struct HostkitInvoice {
    id: Option<Value>,
    name: Option<String>,
    value: Option<Value>,
    date: Option<i64>,
    series: Option<String>,
    tax: Option<Value>,
}

/// Fetch invoices for a property over an inclusive calendar range.
pub async fn fetch_invoices(
    http: &Client,
    config: &AppConfig,
    property_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<Invoice>> {
    let api_key = config.hostkit_api_key.as_deref().ok_or_else(|| {
        AppError::Dependency("Hostkit is not configured. Set HOSTKIT_API_KEY.".to_string())
    })?;

    let (date_start, date_end) = period_bounds(start, end);
    let url = format!("{}/getInvoices", config.hostkit_api_base.trim_end_matches('/'));

    let res = http
        .get(&url)
        .query(&[
            ("APIKEY", api_key.to_string()),
            ("property_id", property_id.to_string()),
            ("date_start", date_start.to_string()),
            ("date_end", date_end.to_string()),
        ])
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                AppError::Dependency(format!(
                    "Hostkit request timed out after {}s.",
                    config.upstream_timeout_seconds
                ))
            } else {
                AppError::Dependency(format!("Hostkit is unreachable: {e}"))
            }
        })?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(AppError::Dependency(format!(
            "Hostkit returned {status}: {body}"
        )));
    }

    let raw = res
        .json::<Vec<HostkitInvoice>>()
        .await
        .map_err(|e| AppError::Dependency(format!("Hostkit response is not invoice data: {e}")))?;

    Ok(raw.into_iter().map(normalize_invoice).collect())
}

/// Unix-second bounds for an inclusive calendar range: midnight on the start
/// date through 23:59:59 on the end date.
fn period_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
    (start_ts, end_ts)
}

fn normalize_invoice(raw: HostkitInvoice) -> Invoice {
    let id = match raw.id {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    let value = coerce_amount(&id, "value", raw.value.as_ref()).unwrap_or(Decimal::ZERO);
    let tax = raw
        .tax
        .as_ref()
        .and_then(|v| coerce_amount(&id, "tax", Some(v)));

    Invoice {
        name: raw
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        value,
        date: raw
            .date
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.date_naive()),
        series: raw.series,
        tax,
        id,
    }
}

/// Coercion-to-zero policy for malformed upstream amounts: the failure is
/// logged with the raw value, then the caller substitutes zero.
fn coerce_amount(invoice_id: &str, field: &str, raw: Option<&Value>) -> Option<Decimal> {
    let text = match raw {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => return None,
    };
    match parse_amount(&text) {
        Ok(amount) => Some(amount),
        Err(e) => {
            tracing::warn!(invoice_id, field, error = %e, "unparseable Hostkit amount, using 0");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn period_bounds_cover_the_inclusive_range() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let (start_ts, end_ts) = period_bounds(start, end);
        assert_eq!(start_ts, 1_709_251_200);
        assert_eq!(end_ts, 1_711_929_599);
    }

    #[test]
    fn single_day_range_spans_one_day() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (start_ts, end_ts) = period_bounds(day, day);
        assert_eq!(end_ts - start_ts, 86_399);
    }

    #[test]
    fn normalizes_string_and_numeric_amounts() {
        let raw: HostkitInvoice = serde_json::from_value(serde_json::json!({
            "id": 101,
            "name": "  Maria Santos ",
            "value": "150.00",
            "date": 1_709_337_600,
            "series": "FT 2024",
            "tax": 9.25,
        }))
        .unwrap();
        let invoice = normalize_invoice(raw);
        assert_eq!(invoice.id, "101");
        assert_eq!(invoice.name.as_deref(), Some("Maria Santos"));
        assert_eq!(invoice.value, dec!(150.00));
        assert_eq!(invoice.tax, Some(dec!(9.25)));
        assert_eq!(
            invoice.date,
            NaiveDate::from_ymd_opt(2024, 3, 2)
        );
    }

    #[test]
    fn malformed_value_coerces_to_zero() {
        let raw: HostkitInvoice = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "value": "not-a-number",
        }))
        .unwrap();
        let invoice = normalize_invoice(raw);
        assert_eq!(invoice.value, Decimal::ZERO);
        assert!(invoice.tax.is_none());
        assert!(invoice.date.is_none());
    }
}
