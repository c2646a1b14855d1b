use std::future::Future;

use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use service::{ai::AiService, EntityStore, ReservationPolicy};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the store (migrating it when configured) and pick the assistant.
pub async fn build_state(config: AppConfig) -> Result<AppState, StartupError> {
    let db = models::db::connect_with_config(&config.database).await?;
    if config.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let policy = ReservationPolicy::from(&config.reservations);
    let store = EntityStore::new(db, policy);
    let ai = AiService::from_config(&config.ai);
    info!(
        ai_provider = ai.provider(),
        in_memory = config.database.is_in_memory(),
        "application state ready"
    );

    Ok(AppState { store, ai })
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Build the app, bind and serve until `shutdown` resolves.
pub async fn run<F>(config: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "restaurant service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(StartupError::Serve)?;
    info!("restaurant service stopped");
    Ok(())
}
