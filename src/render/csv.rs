//! CSV rendering: the statement's three sections as quoted rows, with a
//! blank row between sections. Amounts are plain two-decimal strings so the
//! file re-parses cleanly.

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{AppError, AppResult};
use crate::render::{format_date, plain_amount, NOT_SPECIFIED, UNKNOWN};
use crate::services::statement::OwnerStatement;

pub fn render(statement: &OwnerStatement) -> AppResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(Vec::new());

    let property_name = if statement.property.name.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        statement.property.name.as_str()
    };

    write_row(&mut writer, &["Owner Statement", property_name])?;
    write_row(
        &mut writer,
        &[
            "Period",
            &statement.period.start_date.to_string(),
            &statement.period.end_date.to_string(),
        ],
    )?;
    write_row(
        &mut writer,
        &["Generated", &statement.generated_at.to_rfc3339()],
    )?;
    write_separator(&mut writer)?;

    write_row(&mut writer, &["Revenue"])?;
    write_row(&mut writer, &["Invoice", "Date", "Guest", "Series", "Amount"])?;
    for line in &statement.invoices {
        write_row(
            &mut writer,
            &[
                line.id.as_str(),
                &format_date(line.date),
                line.name.as_deref().unwrap_or(UNKNOWN),
                line.series.as_deref().unwrap_or(NOT_SPECIFIED),
                &plain_amount(line.value),
            ],
        )?;
    }
    write_row(
        &mut writer,
        &[
            "Total revenue",
            &plain_amount(statement.calculations.gross_amount),
        ],
    )?;
    write_separator(&mut writer)?;

    let calc = &statement.calculations;
    write_row(&mut writer, &["Expenses"])?;
    write_row(&mut writer, &["Description", "Amount"])?;
    write_row(
        &mut writer,
        &["Portal commission", &plain_amount(calc.portal_commission)],
    )?;
    write_row(
        &mut writer,
        &["Cleaning fees", &plain_amount(calc.cleaning_fee)],
    )?;
    write_row(
        &mut writer,
        &[
            "Management commission",
            &plain_amount(calc.management_commission),
        ],
    )?;
    write_separator(&mut writer)?;

    write_row(&mut writer, &["Summary"])?;
    write_row(
        &mut writer,
        &["Gross amount", &plain_amount(calc.gross_amount)],
    )?;
    write_row(
        &mut writer,
        &["Portal commission", &plain_amount(calc.portal_commission)],
    )?;
    write_row(
        &mut writer,
        &["Cleaning fee", &plain_amount(calc.cleaning_fee)],
    )?;
    write_row(
        &mut writer,
        &[
            "Management commission",
            &plain_amount(calc.management_commission),
        ],
    )?;
    write_row(
        &mut writer,
        &[
            "Net payout to owner",
            &plain_amount(calc.final_owner_amount),
        ],
    )?;

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV buffer error: {e}")))
}

fn write_row<W: std::io::Write>(writer: &mut csv::Writer<W>, fields: &[&str]) -> AppResult<()> {
    writer
        .write_record(fields)
        .map_err(|e| AppError::Internal(format!("CSV write error: {e}")))
}

/// Section separator: a single empty quoted field on its own row.
fn write_separator<W: std::io::Write>(writer: &mut csv::Writer<W>) -> AppResult<()> {
    write_row(writer, &[""])
}
