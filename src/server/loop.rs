// Server loop module
// Accepts connections until shutdown is requested, then drains open connections

use hyper_util::server::graceful::GracefulShutdown;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections until `shutdown` is notified
///
/// After shutdown the listener is closed immediately and in-flight
/// connections get up to the configured write timeout to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_info("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);

    let open = state.connection_count();
    let grace = Duration::from_secs(state.config.performance.write_timeout.max(1));
    if open > 0 {
        logger::log_info(&format!(
            "Waiting up to {}s for {open} open connection(s)",
            grace.as_secs()
        ));
    }

    tokio::select! {
        () = graceful.shutdown() => {
            logger::log_info("All connections closed");
        }
        () = tokio::time::sleep(grace) => {
            logger::log_warning(&format!(
                "Grace period elapsed with {} connection(s) still open",
                state.connection_count()
            ));
        }
    }

    Ok(())
}
