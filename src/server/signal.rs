// Signal handling module (nginx-style)
//
// Supported signals:
// - SIGHUP:  Forget the memoized docs version
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGUSR1: Reopen log files

use std::sync::Arc;
use tokio::sync::Notify;

use crate::config::AppState;
use crate::logger;

/// Start signal handlers (Unix only)
///
/// Handlers are registered before the listening task is spawned;
/// registration errors are returned to the caller.
///
/// # Signals
///
/// | Signal  | Action                   | Nginx Equivalent |
/// |---------|--------------------------|------------------|
/// | SIGHUP  | Re-read version marker   | `nginx -s reload`|
/// | SIGTERM | Graceful stop            | `nginx -s stop`  |
/// | SIGINT  | Graceful stop            | Ctrl+C           |
/// | SIGUSR1 | Reopen logs              | `nginx -s reopen`|
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>, shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;

    logger::log_info(&format!(
        "Signal handlers registered (pid {}): HUP=refresh version, TERM/INT=shutdown, USR1=reopen logs",
        std::process::id()
    ));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    state.resolver.versions().invalidate().await;
                    logger::log_info("SIGHUP received, docs version will be re-read on next request");
                }

                _ = sigterm.recv() => {
                    logger::log_info("SIGTERM received, initiating graceful shutdown");
                    shutdown.notify_one();
                    break;
                }

                _ = sigint.recv() => {
                    logger::log_info("SIGINT received, initiating graceful shutdown");
                    shutdown.notify_one();
                    break;
                }

                _ = sigusr1.recv() => {
                    match logger::writer::get() {
                        Some(writer) => match writer.reopen() {
                            Ok(()) => logger::log_info("SIGUSR1 received, log files reopened"),
                            Err(e) => logger::log_error(&format!("Failed to reopen log files: {e}")),
                        },
                        None => logger::log_debug("SIGUSR1 received, no log files configured"),
                    }
                }
            }
        }
    });

    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(_state: Arc<AppState>, shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("Ctrl+C received, initiating graceful shutdown");
            shutdown.notify_one();
        }
    });
    Ok(())
}
