//! Owner-statement computation: the commission formula applied to the
//! invoices of a property over a period, plus assembly of the response
//! object. Pure arithmetic over `Decimal`; no I/O.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use uuid::Uuid;

use crate::services::properties::Property;

/// Portal (booking channel) commission on gross revenue.
pub const PORTAL_COMMISSION_RATE: Decimal = dec!(0.15);
/// Flat cleaning fee charged per invoice, in currency units.
pub const CLEANING_FEE_PER_INVOICE: Decimal = dec!(75);
/// Management commission on revenue net of cleaning and portal fees.
pub const MANAGEMENT_COMMISSION_RATE: Decimal = dec!(0.25);

/// A normalized upstream invoice. Immutable once fetched; never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub name: Option<String>,
    pub value: Decimal,
    pub date: Option<NaiveDate>,
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: i64,
    pub name: String,
    pub is_admin_owned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementCalculations {
    pub gross_amount: Decimal,
    pub portal_commission: Decimal,
    pub cleaning_fee: Decimal,
    pub management_commission: Decimal,
    pub final_owner_amount: Decimal,
}

/// Per-invoice line item as returned to the caller: the invoice trimmed to
/// its reportable fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub id: String,
    pub name: Option<String>,
    pub value: Decimal,
    pub date: Option<NaiveDate>,
    pub series: Option<String>,
    /// Kept for the SAFT renderer; not part of the JSON line-item shape.
    #[serde(skip_serializing)]
    pub tax: Option<Decimal>,
}

/// The derived owner statement. Created fresh on every request, never
/// mutated, no lifecycle beyond the response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStatement {
    pub id: Uuid,
    pub property: PropertySummary,
    pub period: StatementPeriod,
    pub calculations: StatementCalculations,
    pub invoice_count: usize,
    pub invoices: Vec<StatementLine>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
#[error("not a decimal amount: {raw:?}")]
pub struct ParseAmountError {
    pub raw: String,
}

/// Parse a monetary amount from upstream text. Callers decide what to do
/// with failures; the gateway coerces them to zero and logs the raw value.
pub fn parse_amount(raw: &str) -> Result<Decimal, ParseAmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseAmountError {
            raw: raw.to_string(),
        });
    }
    trimmed.parse::<Decimal>().map_err(|_| ParseAmountError {
        raw: raw.to_string(),
    })
}

/// Apply the commission formula.
///
/// Each component is rounded to 2 decimal places, half away from zero.
/// `final_owner_amount` is the exact difference of the rounded components,
/// so `final + portal + cleaning + management == gross` holds exactly.
pub fn calculate(invoices: &[Invoice], is_admin_owned: bool) -> StatementCalculations {
    let gross_amount = round2(invoices.iter().map(|invoice| invoice.value).sum());
    let portal_commission = round2(gross_amount * PORTAL_COMMISSION_RATE);
    let cleaning_fee = round2(Decimal::from(invoices.len() as u64) * CLEANING_FEE_PER_INVOICE);
    let management_commission = if is_admin_owned {
        round2(Decimal::ZERO)
    } else {
        round2((gross_amount - cleaning_fee - portal_commission) * MANAGEMENT_COMMISSION_RATE)
    };
    let final_owner_amount =
        round2(gross_amount - portal_commission - cleaning_fee - management_commission);

    StatementCalculations {
        gross_amount,
        portal_commission,
        cleaning_fee,
        management_commission,
        final_owner_amount,
    }
}

/// Package calculations and trimmed line items into the response object.
pub fn build_statement(
    property: &Property,
    period: StatementPeriod,
    invoices: Vec<Invoice>,
) -> OwnerStatement {
    let calculations = calculate(&invoices, property.is_admin_owned);
    let lines = invoices
        .into_iter()
        .map(|invoice| StatementLine {
            id: invoice.id,
            name: invoice.name,
            value: invoice.value,
            date: invoice.date,
            series: invoice.series,
            tax: invoice.tax,
        })
        .collect::<Vec<_>>();

    OwnerStatement {
        id: Uuid::new_v4(),
        property: PropertySummary {
            id: property.id,
            name: property.name.clone(),
            is_admin_owned: property.is_admin_owned,
        },
        period,
        invoice_count: lines.len(),
        invoices: lines,
        calculations,
        generated_at: Utc::now(),
    }
}

fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(value: Decimal) -> Invoice {
        Invoice {
            id: "inv".to_string(),
            name: Some("Guest".to_string()),
            value,
            date: NaiveDate::from_ymd_opt(2024, 3, 10),
            series: Some("FT 2024".to_string()),
            tax: None,
        }
    }

    fn assert_identity(calc: &StatementCalculations) {
        assert_eq!(
            calc.final_owner_amount
                + calc.portal_commission
                + calc.cleaning_fee
                + calc.management_commission,
            calc.gross_amount
        );
    }

    #[test]
    fn empty_invoice_list_is_all_zeros() {
        let calc = calculate(&[], false);
        assert_eq!(calc.gross_amount, Decimal::ZERO);
        assert_eq!(calc.portal_commission, Decimal::ZERO);
        assert_eq!(calc.cleaning_fee, Decimal::ZERO);
        assert_eq!(calc.management_commission, Decimal::ZERO);
        assert_eq!(calc.final_owner_amount, Decimal::ZERO);
        assert_identity(&calc);
    }

    #[test]
    fn cleaning_fee_can_exceed_revenue() {
        // Two small invoices: the flat 75-per-invoice fee outweighs them.
        let invoices = vec![invoice(dec!(100.00)), invoice(dec!(50.00))];
        let calc = calculate(&invoices, false);
        assert_eq!(calc.gross_amount, dec!(150.00));
        assert_eq!(calc.portal_commission, dec!(22.50));
        assert_eq!(calc.cleaning_fee, dec!(150.00));
        // (150 - 150 - 22.50) * 0.25 = -5.625, half away from zero
        assert_eq!(calc.management_commission, dec!(-5.63));
        assert_eq!(calc.final_owner_amount, dec!(-16.87));
        assert_identity(&calc);
    }

    #[test]
    fn admin_owned_waives_management_commission() {
        let calc = calculate(&[invoice(dec!(1000.00))], true);
        assert_eq!(calc.gross_amount, dec!(1000.00));
        assert_eq!(calc.portal_commission, dec!(150.00));
        assert_eq!(calc.cleaning_fee, dec!(75.00));
        assert_eq!(calc.management_commission, Decimal::ZERO);
        assert_eq!(calc.final_owner_amount, dec!(775.00));
        assert_identity(&calc);
    }

    #[test]
    fn admin_owned_commission_is_zero_regardless_of_gross() {
        for value in [dec!(0), dec!(-250.40), dec!(99999.99)] {
            let calc = calculate(&[invoice(value)], true);
            assert_eq!(calc.management_commission, Decimal::ZERO);
            assert_identity(&calc);
        }
    }

    #[test]
    fn credit_notes_sum_as_is() {
        let invoices = vec![invoice(dec!(200.00)), invoice(dec!(-80.50))];
        let calc = calculate(&invoices, false);
        assert_eq!(calc.gross_amount, dec!(119.50));
        assert_identity(&calc);
    }

    #[test]
    fn identity_holds_for_assorted_inputs() {
        let cases: Vec<Vec<Decimal>> = vec![
            vec![],
            vec![dec!(0.01)],
            vec![dec!(123.45), dec!(678.90), dec!(-45.67)],
            vec![dec!(1.11); 7],
            vec![dec!(0.005), dec!(0.005)],
        ];
        for values in cases {
            for is_admin_owned in [false, true] {
                let invoices = values.iter().copied().map(invoice).collect::<Vec<_>>();
                let calc = calculate(&invoices, is_admin_owned);
                assert_identity(&calc);
            }
        }
    }

    #[test]
    fn calculation_is_idempotent() {
        let invoices = vec![invoice(dec!(310.25)), invoice(dec!(98.10))];
        let first = calculate(&invoices, false);
        let second = calculate(&invoices, false);
        assert_eq!(first, second);
    }

    #[test]
    fn parses_amounts_and_rejects_garbage() {
        assert_eq!(parse_amount("100.00").unwrap(), dec!(100.00));
        assert_eq!(parse_amount(" -42.5 ").unwrap(), dec!(-42.5));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("12,50").is_err());
        assert!(parse_amount("n/a").is_err());
    }

    #[test]
    fn builds_statement_with_trimmed_lines() {
        let property = Property {
            id: 42,
            name: "Casa do Mar".to_string(),
            is_admin_owned: false,
            owner: Some("owner-1".to_string()),
        };
        let period = StatementPeriod {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        let statement = build_statement(&property, period, vec![invoice(dec!(500.00))]);
        assert_eq!(statement.property.id, 42);
        assert_eq!(statement.invoice_count, 1);
        assert_eq!(statement.invoices.len(), 1);
        assert_eq!(statement.calculations.gross_amount, dec!(500.00));
        assert_identity(&statement.calculations);

        // Line items carry only the reportable fields; tax is dropped.
        let line = serde_json::to_value(&statement.invoices[0]).unwrap();
        let mut keys = line
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        keys.sort();
        assert_eq!(keys, vec!["date", "id", "name", "series", "value"]);
    }
}
