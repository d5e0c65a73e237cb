//! This file defines the leaderboard server binary entry point.

use leaderboard::app;
use leaderboard::cli;
use leaderboard::metrics;
use leaderboard::server;
use leaderboard::tracing;

use std::process::ExitCode;

/// Application entry point
#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    tracing::init_tracing();
    ::tracing::debug!("{:?}", args);
    metrics::register_metrics();
    let service = app::service(&args);
    match server::serve(&args, service).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ::tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
