//! SAFT-style XML audit file: an `AuditFile` root with a `Header` for the
//! property and period, and one `Invoice` element per statement line item.

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::render::{format_date, plain_amount, NOT_SPECIFIED, UNKNOWN};
use crate::services::statement::OwnerStatement;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Serialize)]
#[serde(rename = "AuditFile")]
struct AuditFile {
    #[serde(rename = "Header")]
    header: Header,
    #[serde(rename = "Invoices")]
    invoices: Invoices,
}

#[derive(Debug, Serialize)]
struct Header {
    #[serde(rename = "CompanyID")]
    company_id: i64,
    #[serde(rename = "CompanyName")]
    company_name: String,
    #[serde(rename = "StartDate")]
    start_date: String,
    #[serde(rename = "EndDate")]
    end_date: String,
}

#[derive(Debug, Serialize)]
struct Invoices {
    #[serde(rename = "Invoice")]
    invoice: Vec<XmlInvoice>,
}

#[derive(Debug, Serialize)]
struct XmlInvoice {
    #[serde(rename = "InvoiceNo")]
    invoice_no: String,
    #[serde(rename = "InvoiceDate")]
    invoice_date: String,
    #[serde(rename = "CustomerName")]
    customer_name: String,
    #[serde(rename = "InvoiceTotal")]
    invoice_total: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Tax", skip_serializing_if = "Option::is_none")]
    tax: Option<String>,
}

pub fn render(statement: &OwnerStatement, currency: &str) -> AppResult<String> {
    let company_name = if statement.property.name.trim().is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        statement.property.name.clone()
    };

    let audit_file = AuditFile {
        header: Header {
            company_id: statement.property.id,
            company_name,
            start_date: statement.period.start_date.to_string(),
            end_date: statement.period.end_date.to_string(),
        },
        invoices: Invoices {
            invoice: statement
                .invoices
                .iter()
                .map(|line| XmlInvoice {
                    invoice_no: if line.id.is_empty() {
                        UNKNOWN.to_string()
                    } else {
                        line.id.clone()
                    },
                    invoice_date: format_date(line.date),
                    customer_name: line
                        .name
                        .clone()
                        .filter(|name| !name.trim().is_empty())
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    invoice_total: plain_amount(line.value),
                    currency: currency.to_string(),
                    tax: line.tax.map(plain_amount),
                })
                .collect(),
        },
    };

    let body = quick_xml::se::to_string(&audit_file)
        .map_err(|e| AppError::Internal(format!("XML serialization error: {e}")))?;
    Ok(format!("{XML_DECLARATION}{body}"))
}
