use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::require_api_key;
use crate::error::{AppError, AppResult};
use crate::render;
use crate::schemas::{validate_input, OwnerStatementQuery, StatementFormat};
use crate::services::hostkit;
use crate::services::statement::{build_statement, OwnerStatement, StatementPeriod};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route(
        "/owner-statements",
        axum::routing::get(generate_owner_statement),
    )
}

/// Compute an owner statement for a property over an inclusive date range.
/// JSON by default; `format=pdf|csv|xml` streams the rendered document.
async fn generate_owner_statement(
    State(state): State<AppState>,
    Query(query): Query<OwnerStatementQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    require_api_key(&state, &headers)?;
    validate_input(&query)?;
    let period = query.period()?;

    let property = state
        .properties
        .get(query.property_id)
        .ok_or_else(|| {
            AppError::NotFound(format!("Unknown property id {}.", query.property_id))
        })?
        .clone();

    let statement = cached_statement(&state, query.property_id, period, &property).await?;
    let currency = state.config.default_currency.as_str();

    let basename = format!(
        "owner-statement-{}-{}-{}",
        query.property_id, period.start_date, period.end_date
    );

    match query.format {
        None => Ok(Json(json!({
            "message": "Owner statement generated.",
            "statement": &*statement,
        }))
        .into_response()),
        Some(StatementFormat::Pdf) => {
            let bytes = render::pdf::render(&statement, currency)?;
            Ok(file_response(
                bytes,
                "application/pdf",
                format!("{basename}.pdf"),
            ))
        }
        Some(StatementFormat::Csv) => {
            let bytes = render::csv::render(&statement)?;
            Ok(file_response(
                bytes,
                "text/csv; charset=utf-8",
                format!("{basename}.csv"),
            ))
        }
        Some(StatementFormat::Xml) => {
            let xml = render::saft::render(&statement, currency)?;
            Ok(file_response(
                xml.into_bytes(),
                "application/xml; charset=utf-8",
                format!("{basename}.xml"),
            ))
        }
    }
}

/// Read-through cache around fetch + calculate. Statements are ephemeral;
/// the short TTL only absorbs bursts of identical requests.
async fn cached_statement(
    state: &AppState,
    property_id: i64,
    period: StatementPeriod,
    property: &crate::services::properties::Property,
) -> AppResult<Arc<OwnerStatement>> {
    let cache_key = format!("{property_id}:{}:{}", period.start_date, period.end_date);
    if let Some(cached) = state.statement_cache.get(&cache_key).await {
        return Ok(cached);
    }

    let invoices = hostkit::fetch_invoices(
        &state.http,
        &state.config,
        property_id,
        period.start_date,
        period.end_date,
    )
    .await?;
    tracing::info!(
        property_id,
        invoice_count = invoices.len(),
        "Computed owner statement"
    );

    let statement = Arc::new(build_statement(property, period, invoices));
    state
        .statement_cache
        .insert(cache_key, statement.clone())
        .await;
    Ok(statement)
}

fn file_response(bytes: Vec<u8>, content_type: &str, filename: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
