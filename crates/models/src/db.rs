use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Open a pool for `cfg`. An in-memory SQLite database lives in a single
/// connection, so the pool is pinned to one.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    if cfg.is_in_memory() {
        // the database dies with its connection, so it must never be recycled
        opt.max_connections(1)
            .min_connections(1)
            .max_lifetime(Duration::from_secs(u64::from(u32::MAX)));
    } else {
        opt.max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }
    opt.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);

    let db = Database::connect(opt).await?;
    info!(
        backend = ?db.get_database_backend(),
        in_memory = cfg.is_in_memory(),
        "database connected"
    );
    Ok(db)
}

pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    connect_with_config(&DatabaseConfig::in_memory()).await
}
