#![allow(dead_code)]

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub environment: String,
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub trusted_hosts: Vec<String>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst_size: u32,
    pub internal_api_key: Option<String>,
    pub hostkit_api_base: String,
    pub hostkit_api_key: Option<String>,
    pub upstream_timeout_seconds: u64,
    pub default_currency: String,
    pub statement_cache_ttl_seconds: u64,
    pub statement_cache_max_entries: u64,
    pub properties_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            app_name: env_or("APP_NAME", "Solmar API"),
            environment: env_or("ENVIRONMENT", "development"),
            api_prefix: normalize_prefix(&env_or("API_PREFIX", "/v1")),
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse_or("PORT", 8000),
            cors_origins: parse_csv(&env_or("CORS_ORIGINS", "http://localhost:3000")),
            trusted_hosts: parse_csv(&env_or("TRUSTED_HOSTS", "localhost,127.0.0.1")),
            rate_limit_per_second: env_parse_or("RATE_LIMIT_PER_SECOND", 10),
            rate_limit_burst_size: env_parse_or("RATE_LIMIT_BURST_SIZE", 100),
            internal_api_key: env_opt("INTERNAL_API_KEY"),
            hostkit_api_base: env_or("HOSTKIT_API_BASE", "https://app.hostkit.pt/api"),
            hostkit_api_key: env_opt("HOSTKIT_API_KEY"),
            upstream_timeout_seconds: env_parse_or("UPSTREAM_TIMEOUT_SECONDS", 30),
            default_currency: env_or("DEFAULT_CURRENCY", "EUR")
                .trim()
                .to_ascii_uppercase(),
            statement_cache_ttl_seconds: env_parse_or("STATEMENT_CACHE_TTL_SECONDS", 20),
            statement_cache_max_entries: env_parse_or("STATEMENT_CACHE_MAX_ENTRIES", 2000),
            properties_file: env_opt("PROPERTIES_FILE"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.trim().eq_ignore_ascii_case("production")
    }

    pub fn auth_enabled(&self) -> bool {
        self.internal_api_key.is_some()
    }

    pub fn hostkit_configured(&self) -> bool {
        self.hostkit_api_key.is_some()
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env_opt(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn normalize_prefix(raw: &str) -> String {
    let mut prefix = raw.trim().to_string();
    if prefix.is_empty() {
        return "/v1".to_string();
    }
    if !prefix.starts_with('/') {
        prefix.insert(0, '/');
    }
    while prefix.ends_with('/') && prefix.len() > 1 {
        prefix.pop();
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::{normalize_prefix, parse_csv};

    #[test]
    fn normalizes_prefix() {
        assert_eq!(normalize_prefix("v1"), "/v1");
        assert_eq!(normalize_prefix("/v1/"), "/v1");
        assert_eq!(normalize_prefix(""), "/v1");
    }

    #[test]
    fn parses_csv_lists() {
        assert_eq!(parse_csv("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(parse_csv("  ").is_empty());
    }
}
