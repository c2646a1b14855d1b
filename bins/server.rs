use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // load .env first so RUST_LOG and LOG_FORMAT take effect
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "restaurant", event = "logger_init", "tracing subscriber initialized");
}

async fn shutdown_signal(service_id: Uuid) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(
            service = "restaurant",
            event = "signal_error",
            error = %e,
            "cannot listen for Ctrl+C"
        );
        std::future::pending::<()>().await;
    }
    info!(
        service = "restaurant",
        event = "shutdown_signal",
        %service_id,
        "received Ctrl+C, draining connections"
    );
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "restaurant",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let config = match configs::AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(
                service = "restaurant",
                event = "config_invalid",
                error = %e,
                "cannot load configuration"
            );
            return std::process::ExitCode::FAILURE;
        }
    };
    let worker_threads = config.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "restaurant",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "restaurant",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "restaurant service starting"
    );

    rt.block_on(async move {
        match server::run(config, shutdown_signal(service_id)).await {
            Ok(()) => {
                info!(
                    service = "restaurant",
                    event = "stop",
                    %service_id,
                    pid,
                    "server stopped normally"
                );
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    service = "restaurant",
                    event = "run_failed",
                    error = %e,
                    "server::run returned error"
                );
                std::process::ExitCode::FAILURE
            }
        }
    })
}
