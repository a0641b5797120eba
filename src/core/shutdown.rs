//! # Host shutdown signals.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives a
//! termination signal: SIGINT, SIGTERM, or SIGQUIT on Unix, Ctrl-C
//! elsewhere.

/// Waits for a termination signal.
///
/// Each call registers independent listeners. Returns `Err` only when
/// signal registration itself fails.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
        _ = sigquit.recv() => {}
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call registers independent listeners. Returns `Err` only when
/// signal registration itself fails.
#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
