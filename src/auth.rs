use axum::http::HeaderMap;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Static bearer-key guard for service callers. When no key is configured
/// the guard is disabled (a startup warning covers that case).
pub fn require_api_key(state: &AppState, headers: &HeaderMap) -> AppResult<()> {
    let Some(expected) = state.config.internal_api_key.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match provided {
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(AppError::Unauthorized("Invalid API key.".to_string())),
        None => Err(AppError::Unauthorized(
            "Missing Authorization: Bearer header.".to_string(),
        )),
    }
}
