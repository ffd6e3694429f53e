use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use timetable::config::AppConfig;
use timetable::db::TimetableDb;
use timetable::server::create_router;
use timetable::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(std::env::args().nth(1))?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level()?)
        .init();

    let db = TimetableDb::open(&config.database_path, config.axes.clone())
        .with_context(|| format!("could not open {}", config.database_path.display()))?;
    if config.seed_sample_data {
        db.seed_sample_week().context("could not seed sample data")?;
    }

    let addr = config.bind_address()?;
    let app_state = Arc::new(AppState::new(db, config));
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!("Timetable server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => warn!("Could not listen for Ctrl-C: {}", e),
    }
}
