use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::statement::StatementPeriod;

pub fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|errors| AppError::UnprocessableEntity(format!("Validation failed: {errors}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
    Pdf,
    Csv,
    Xml,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OwnerStatementQuery {
    #[serde(rename = "propertyId")]
    #[validate(range(min = 1, message = "propertyId must be a positive integer"))]
    pub property_id: i64,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub format: Option<StatementFormat>,
}

impl OwnerStatementQuery {
    /// Parse and order-check the ISO date range before anything upstream is
    /// called.
    pub fn period(&self) -> AppResult<StatementPeriod> {
        let start_date = parse_date(&self.start_date)?;
        let end_date = parse_date(&self.end_date)?;
        if end_date < start_date {
            return Err(AppError::BadRequest(
                "endDate must not be before startDate.".to_string(),
            ));
        }
        Ok(StatementPeriod {
            start_date,
            end_date,
        })
    }
}

pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid ISO date: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(property_id: i64, start: &str, end: &str) -> OwnerStatementQuery {
        OwnerStatementQuery {
            property_id,
            start_date: start.to_string(),
            end_date: end.to_string(),
            format: None,
        }
    }

    #[test]
    fn accepts_a_valid_range() {
        let period = query(3, "2024-01-01", "2024-01-31").period().unwrap();
        assert_eq!(period.start_date.to_string(), "2024-01-01");
        assert_eq!(period.end_date.to_string(), "2024-01-31");
    }

    #[test]
    fn rejects_malformed_dates_and_reversed_ranges() {
        assert!(query(3, "01/02/2024", "2024-01-31").period().is_err());
        assert!(query(3, "2024-02-01", "2024-01-31").period().is_err());
    }

    #[test]
    fn rejects_non_positive_property_ids() {
        assert!(validate_input(&query(0, "2024-01-01", "2024-01-31")).is_err());
        assert!(validate_input(&query(12, "2024-01-01", "2024-01-31")).is_ok());
    }

    #[test]
    fn parses_format_values() {
        let raw = r#"{"propertyId": 1, "startDate": "2024-01-01", "endDate": "2024-01-02", "format": "pdf"}"#;
        let parsed: OwnerStatementQuery = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.format, Some(StatementFormat::Pdf));
    }
}
