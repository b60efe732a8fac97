//! PDF rendering with `printpdf` builtin fonts. A4 portrait, one column
//! layout: header block, Revenue table, Expenses table, Summary table with
//! an emphasized net-payout row, statement identifier in the footer.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::error::{AppError, AppResult};
use crate::render::{format_currency, format_date, NOT_SPECIFIED, UNKNOWN};
use crate::services::statement::OwnerStatement;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 18.0;

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> AppResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.cursor_y - needed_mm >= MARGIN_MM {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn text(&mut self, text: &str, size: f32, x_mm: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(x_mm), Mm(self.cursor_y), font);
    }

    fn row(&mut self, cells: &[(&str, f32)], bold: bool) {
        self.ensure_room(LINE_HEIGHT_MM);
        for (text, x_mm) in cells {
            self.text(text, BODY_SIZE, *x_mm, bold);
        }
        self.cursor_y -= LINE_HEIGHT_MM;
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(LINE_HEIGHT_MM * 2.0);
        self.cursor_y -= LINE_HEIGHT_MM * 0.5;
        self.text(text, HEADING_SIZE, MARGIN_MM, true);
        self.cursor_y -= LINE_HEIGHT_MM;
    }

    fn rule(&mut self) {
        self.ensure_room(LINE_HEIGHT_MM);
        let y = self.cursor_y + LINE_HEIGHT_MM * 0.5;
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn finish(self) -> AppResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(e: printpdf::Error) -> AppError {
    AppError::Internal(format!("PDF generation error: {e}"))
}

pub fn render(statement: &OwnerStatement, currency: &str) -> AppResult<Vec<u8>> {
    let property_name = if statement.property.name.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        statement.property.name.as_str()
    };
    let period = format!(
        "{} to {}",
        statement.period.start_date, statement.period.end_date
    );
    let calc = &statement.calculations;

    let mut writer = PdfWriter::new("Owner Statement")?;

    // Header block
    writer.text("Owner Statement", TITLE_SIZE, MARGIN_MM, true);
    writer.cursor_y -= LINE_HEIGHT_MM * 1.6;
    writer.row(&[("Property:", MARGIN_MM), (property_name, 55.0)], false);
    writer.row(&[("Period:", MARGIN_MM), (&period, 55.0)], false);
    writer.row(
        &[
            ("Generated:", MARGIN_MM),
            (
                &statement
                    .generated_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string(),
                55.0,
            ),
        ],
        false,
    );
    writer.rule();

    // Revenue table
    writer.heading("Revenue");
    writer.row(
        &[
            ("Invoice", MARGIN_MM),
            ("Date", 60.0),
            ("Guest", 95.0),
            ("Amount", 160.0),
        ],
        true,
    );
    for line in &statement.invoices {
        let invoice_no = if line.id.is_empty() { UNKNOWN } else { &line.id };
        writer.row(
            &[
                (invoice_no, MARGIN_MM),
                (&format_date(line.date), 60.0),
                (line.name.as_deref().unwrap_or(UNKNOWN), 95.0),
                (&format_currency(line.value, currency), 160.0),
            ],
            false,
        );
    }
    writer.row(
        &[
            ("Total revenue", MARGIN_MM),
            (&format_currency(calc.gross_amount, currency), 160.0),
        ],
        true,
    );

    // Expenses table
    writer.heading("Expenses");
    writer.row(&[("Description", MARGIN_MM), ("Amount", 160.0)], true);
    writer.row(
        &[
            ("Portal commission", MARGIN_MM),
            (&format_currency(calc.portal_commission, currency), 160.0),
        ],
        false,
    );
    writer.row(
        &[
            ("Cleaning fees", MARGIN_MM),
            (&format_currency(calc.cleaning_fee, currency), 160.0),
        ],
        false,
    );
    writer.row(
        &[
            ("Management commission", MARGIN_MM),
            (
                &format_currency(calc.management_commission, currency),
                160.0,
            ),
        ],
        false,
    );

    // Summary table, net payout emphasized
    writer.heading("Summary");
    writer.row(
        &[
            ("Gross amount", MARGIN_MM),
            (&format_currency(calc.gross_amount, currency), 160.0),
        ],
        false,
    );
    writer.row(
        &[
            ("Portal commission", MARGIN_MM),
            (&format_currency(calc.portal_commission, currency), 160.0),
        ],
        false,
    );
    writer.row(
        &[
            ("Cleaning fee", MARGIN_MM),
            (&format_currency(calc.cleaning_fee, currency), 160.0),
        ],
        false,
    );
    writer.row(
        &[
            ("Management commission", MARGIN_MM),
            (
                &format_currency(calc.management_commission, currency),
                160.0,
            ),
        ],
        false,
    );
    writer.rule();
    writer.row(
        &[
            ("Net payout to owner", MARGIN_MM),
            (&format_currency(calc.final_owner_amount, currency), 160.0),
        ],
        true,
    );

    // Footer with the statement identifier
    writer.ensure_room(LINE_HEIGHT_MM * 2.0);
    writer.cursor_y -= LINE_HEIGHT_MM;
    writer.text(
        &format!("Statement {}", statement.id),
        8.0,
        MARGIN_MM,
        false,
    );

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::properties::Property;
    use crate::services::statement::{build_statement, Invoice, StatementPeriod};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_statement(invoice_count: usize) -> OwnerStatement {
        let property = Property {
            id: 5,
            name: "Villa Atlantico".to_string(),
            is_admin_owned: false,
            owner: None,
        };
        let period = StatementPeriod {
            start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
        };
        let invoices = (0..invoice_count)
            .map(|n| Invoice {
                id: format!("FT-{n}"),
                name: Some("Guest".to_string()),
                value: dec!(120.00),
                date: NaiveDate::from_ymd_opt(2024, 8, 2),
                series: None,
                tax: None,
            })
            .collect();
        build_statement(&property, period, invoices)
    }

    #[test]
    fn produces_a_pdf_document() {
        let bytes = render(&sample_statement(3), "EUR").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn long_statements_paginate_without_panicking() {
        let bytes = render(&sample_statement(80), "EUR").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn missing_property_name_renders_placeholder() {
        let mut statement = sample_statement(1);
        statement.property.name = String::new();
        let bytes = render(&statement, "EUR").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
