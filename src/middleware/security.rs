use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Reject requests whose Host header is not in the configured allow-list.
/// A lone `*` entry disables the check.
pub async fn enforce_trusted_hosts(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let trusted = &state.config.trusted_hosts;
    if trusted.iter().any(|host| host.trim() == "*") {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(axum::http::header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(strip_port)
        .unwrap_or_default();

    if host.is_empty() || !trusted.iter().any(|t| t.eq_ignore_ascii_case(host)) {
        tracing::warn!(host, "Rejected request from untrusted host");
        return (StatusCode::BAD_REQUEST, "Untrusted host").into_response();
    }

    next.run(request).await
}

fn strip_port(host: &str) -> &str {
    host.rsplit_once(':')
        .map(|(name, _)| name)
        .unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::strip_port;

    #[test]
    fn strips_ports_from_host_headers() {
        assert_eq!(strip_port("localhost:8000"), "localhost");
        assert_eq!(strip_port("api.example.com"), "api.example.com");
    }
}
