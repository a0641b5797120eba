//! # Operator handle to a running supervisor.
//!
//! [`SupervisorHandle`] is the command side of the boundary: it submits
//! `start` / `stop` commands without waiting for progress, and owns the
//! engine's join handle so [`close`](SupervisorHandle::close) can wait for
//! the drain to finish.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::core::command::Command;
use crate::core::shutdown;
use crate::error::CommandError;

/// Command handle returned by [`Supervisor::init`](crate::Supervisor::init).
///
/// Submission is send-only: a returned `Ok` means the command was queued,
/// not that the service moved. Progress is observed on the event stream.
pub struct SupervisorHandle {
    commands: mpsc::Sender<Command>,
    engine: JoinHandle<()>,
}

impl SupervisorHandle {
    pub(crate) fn new(commands: mpsc::Sender<Command>, engine: JoinHandle<()>) -> Self {
        Self { commands, engine }
    }

    /// Requests a start of `name` and its not-yet-running requirements.
    ///
    /// A start of an already-active service, or any start after
    /// [`close`](SupervisorHandle::close), is silently discarded by the
    /// engine.
    pub async fn start(&self, name: impl Into<String>) -> Result<(), CommandError> {
        self.send(Command::Start(name.into())).await
    }

    /// Requests a stop of `name`'s active subtree, requirements first.
    ///
    /// A stop of an inactive service is silently discarded by the engine.
    pub async fn stop(&self, name: impl Into<String>) -> Result<(), CommandError> {
        self.send(Command::Stop(name.into())).await
    }

    /// Stops every active service and waits for the supervisor to drain.
    ///
    /// Each previously-active service emits exactly one terminal event
    /// before the event stream closes. There is no timeout: a child that
    /// ignores its interrupt keeps the close waiting.
    pub async fn close(self) {
        let _ = self.commands.send(Command::Close).await;
        if let Err(err) = self.engine.await {
            warn!(error = %err, "supervisor engine task failed");
        }
    }

    /// Waits for a process termination signal, then closes.
    ///
    /// Convenience for hosts that keep the supervisor up for the process
    /// lifetime and want Ctrl-C to drain it.
    pub async fn close_on_signal(self) {
        if let Err(err) = shutdown::wait_for_shutdown_signal().await {
            warn!(error = %err, "failed to listen for shutdown signals");
        }
        self.close().await;
    }

    async fn send(&self, command: Command) -> Result<(), CommandError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CommandError::Closed)
    }
}
