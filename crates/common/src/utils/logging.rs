use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Request spans from tower_http stay visible; SQL statement logs are noisy.
const COMPACT_FILTER: &str = "info,tower_http=info,sqlx=warn,sea_orm=warn";
const JSON_FILTER: &str = "info,service::store=debug,sqlx=warn,sea_orm=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else, or nothing, is compact.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Human-readable logs on stdout. `RUST_LOG` overrides the default filter.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(filter(COMPACT_FILTER))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event, with the current span list, for log shippers.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(filter(JSON_FILTER))
        .with_target(true)
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the output format from `LOG_FORMAT`.
pub fn init_logging_from_env() {
    match LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref()) {
        LogFormat::Json => init_logging_json(),
        LogFormat::Compact => init_logging_default(),
    }
}
