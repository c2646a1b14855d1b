//! Application configuration.
//!
//! Built once at process start: TOML file (optional), then environment
//! overrides, then normalisation and validation. The resulting `AppConfig`
//! is immutable and handed to every component that needs a piece of it.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub reservations: ReservationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            worker_threads: Some(4),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// In-memory SQLite, one connection so every query sees the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_ascii_lowercase().starts_with("sqlite:")
    }

    pub fn is_in_memory(&self) -> bool {
        self.is_sqlite() && self.url.contains(":memory:")
    }
}

fn default_database_url() -> String {
    "sqlite://restaurants.db?mode=rwc".into()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    30
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_max_lifetime() -> u64 {
    3600
}
fn default_acquire_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    #[default]
    Offline,
}

impl AiProvider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "offline" | "none" | "" => Some(Self::Offline),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: AiProvider,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_ai_temperature")]
    pub temperature: f32,
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::Offline,
            api_key: String::new(),
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            temperature: default_ai_temperature(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

impl AiConfig {
    /// The upstream client is only used when selected and a key is present.
    pub fn upstream_enabled(&self) -> bool {
        self.provider == AiProvider::OpenAi && !self.api_key.trim().is_empty()
    }
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_ai_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_ai_temperature() -> f32 {
    0.7
}
fn default_ai_timeout() -> u64 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReservationConfig {
    #[serde(default = "default_max_days_ahead")]
    pub max_days_ahead: i64,
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            max_days_ahead: default_max_days_ahead(),
            default_duration_minutes: default_duration_minutes(),
        }
    }
}

fn default_max_days_ahead() -> i64 {
    90
}
fn default_duration_minutes() -> i64 {
    120
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

impl AppConfig {
    /// File if present (defaults otherwise), then process environment, then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(ConfigError::Io { .. }) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("SERVER_PORT is not a port: {port}")))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = threads.parse().ok();
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(provider) = lookup("AI_PROVIDER") {
            self.ai.provider = AiProvider::parse(&provider)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown AI_PROVIDER: {provider}")))?;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            // A key alone is enough to opt into the upstream client.
            if !key.trim().is_empty() && lookup("AI_PROVIDER").is_none() {
                self.ai.provider = AiProvider::OpenAi;
            }
            self.ai.api_key = key;
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.ai.base_url = url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.ai.model = model;
        }
        if let Some(days) = lookup("MAX_RESERVATION_DAYS_AHEAD") {
            self.reservations.max_days_ahead = days.parse().map_err(|_| {
                ConfigError::Invalid(format!("MAX_RESERVATION_DAYS_AHEAD is not a number: {days}"))
            })?;
        }
        if let Some(minutes) = lookup("DEFAULT_RESERVATION_DURATION_MINUTES") {
            self.reservations.default_duration_minutes = minutes.parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "DEFAULT_RESERVATION_DURATION_MINUTES is not a number: {minutes}"
                ))
            })?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<(), ConfigError> {
        self.server.normalize()?;
        self.database.validate()?;
        self.ai.normalize();
        self.reservations.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("server.port must be in 1..=65535".into()));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database.url is empty; set it in config.toml or DATABASE_URL".into(),
            ));
        }
        let lower = self.url.to_lowercase();
        let known = ["postgresql://", "postgres://", "sqlite:"];
        if !known.iter().any(|scheme| lower.starts_with(scheme)) {
            return Err(ConfigError::Invalid(
                "database.url must start with postgres://, postgresql:// or sqlite:".into(),
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid("database.min_connections must be >= 1".into()));
        }
        if self.max_connections < self.min_connections {
            return Err(ConfigError::Invalid(
                "database.max_connections must be >= min_connections".into(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(ConfigError::Invalid("database timeouts must be positive seconds".into()));
        }
        Ok(())
    }
}

impl AiConfig {
    fn normalize(&mut self) {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_ai_timeout();
        }
    }
}

impl ReservationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_days_ahead < 0 {
            return Err(ConfigError::Invalid("reservations.max_days_ahead must be >= 0".into()));
        }
        if self.default_duration_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "reservations.default_duration_minutes must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_file_yields_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.reservations.max_days_ahead, 90);
        assert_eq!(cfg.reservations.default_duration_minutes, 120);
        assert_eq!(cfg.ai.provider, AiProvider::Offline);
        assert!(cfg.database.run_migrations);
        assert!(cfg.database.is_sqlite());
    }

    #[test]
    fn toml_sections_are_read() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090

            [database]
            url = "postgres://localhost/restaurants"
            max_connections = 5

            [ai]
            provider = "openai"
            api_key = "sk-test"
            base_url = "http://llm.local/v1/"

            [reservations]
            max_days_ahead = 30
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.min_connections, 1);
        assert!(cfg.ai.upstream_enabled());
        assert_eq!(cfg.reservations.max_days_ahead, 30);
        assert_eq!(cfg.reservations.default_duration_minutes, 120);

        let mut cfg = cfg;
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.ai.base_url, "http://llm.local/v1");
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[
            ("SERVER_PORT", "7000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("OPENAI_API_KEY", "sk-live"),
            ("MAX_RESERVATION_DAYS_AHEAD", "14"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 7000);
        assert!(cfg.database.is_in_memory());
        assert_eq!(cfg.ai.provider, AiProvider::OpenAi);
        assert_eq!(cfg.reservations.max_days_ahead, 14);
    }

    #[test]
    fn explicit_offline_provider_wins_over_key() {
        let mut cfg = AppConfig::default();
        let vars = [("AI_PROVIDER", "offline"), ("OPENAI_API_KEY", "sk-live")];
        cfg.apply_env(env(&vars)).unwrap();
        assert_eq!(cfg.ai.provider, AiProvider::Offline);
        assert!(!cfg.ai.upstream_enabled());
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("SERVER_PORT", "eighty")])).is_err());
        assert!(cfg.apply_env(env(&[("AI_PROVIDER", "llama")])).is_err());
    }

    #[test]
    fn database_url_scheme_is_validated() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "mysql://localhost/db".into();
        assert!(matches!(cfg.normalize_and_validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reservation_duration_must_be_positive() {
        let mut cfg = AppConfig::default();
        cfg.reservations.default_duration_minutes = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
