//! Plotboard is a web dashboard for exploring tabular data.
//!
//! Upload a CSV or Excel file, preview every row, then pick a plot kind and
//! the columns to draw. Charts are built on the server as ECharts
//! configurations and drawn in the browser.
//!
//! This library provides a web server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod plot;
mod routing;
mod session;
mod table;
#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_MAX_UPLOAD_MB};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// How long open connections get to finish once shutdown starts.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Wait for Ctrl+C or, on Unix, SIGTERM, then ask the server behind `handle`
/// to stop accepting connections and shut down.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let signal_name = shutdown_signal().await;

    tracing::info!("Received {signal_name}, shutting down.");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}

/// Resolves with the name of the first shutdown signal received.
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    let mut terminate = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(terminate) => terminate,
        Err(error) => {
            tracing::error!("Could not listen for SIGTERM: {error}");
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        name = wait_for_ctrl_c() => name,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() -> &'static str {
    if let Err(error) = signal::ctrl_c().await {
        tracing::error!("Could not listen for Ctrl+C: {error}");
        std::future::pending::<()>().await;
    }

    "Ctrl+C"
}
