//! Terminal driver for the Game of Life engine.

mod driver;
mod render;
mod telemetry;

use anyhow::Result;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let json_logs = std::env::var("LIFE_LOG_FORMAT").is_ok_and(|format| format == "json");
    telemetry::init_telemetry(json_logs)?;

    let config = driver::load_config()?;
    info!(
        rows = config.simulation.grid.rows,
        cols = config.simulation.grid.cols,
        frame_interval_ms = config.frame_interval_ms,
        "Starting Game of Life"
    );

    let mut simulation = driver::build_simulation(&config.simulation)?;
    let mut stdout = std::io::stdout().lock();

    let summary = driver::run_loop(&mut simulation, &config, &mut stdout, shutdown_signal()).await?;

    info!(
        generations = summary.generations,
        total_births = summary.total_births,
        total_survivals = summary.total_survivals,
        "Shutting down"
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
