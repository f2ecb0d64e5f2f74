use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use agency_backend::app_state::AppState;
use agency_backend::build_router;
use agency_backend::config::Config;
use agency_backend::db::pool::get_db_pool;
use agency_backend::db::Repositories;

/// Logs go to stdout, or to a daily rolling file under `LOG_DIR`. The
/// returned guard must live as long as the process.
fn init_tracing(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "agency-backend.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    let _guard = init_tracing(&config)?;

    let (repos, pool) = match config.database_url.clone() {
        Some(url) => {
            let pool = get_db_pool(&config, &url)
                .await
                .context("Failed to connect to the database")?;
            (Repositories::postgres(pool.clone(), config.db_timeout), Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-process store; data is lost on exit");
            (Repositories::in_memory(), None)
        }
    };

    let addr = config.bind_addr();
    let state = AppState::new(config, repos, pool.clone());
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server encountered an error")?;

    if let Some(pool) = pool {
        tracing::info!("Closing database pool...");
        pool.close().await;
    }
    tracing::info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down...");
}
