//! # Service runner: one spawn, one channel, one terminal event.
//!
//! [`spawn`] launches the child process described by a [`ServiceSpec`] and
//! publishes [`ServiceMessage`]s on a private channel until exactly one
//! terminal state, then closes the channel.
//!
//! ```text
//!   spawn(spec) ──► Started (+ Running when no pattern)
//!        │
//!        ├─ spawn error ──► Failed, channel closed
//!        │
//!        └─ scanner task: stdout line by line
//!              ├─ first pattern match ──► Running
//!              ├─ every line ──► Line
//!              ├─ read error ──► Failed, channel closed
//!              └─ EOF ──► wait(): exit 0 ──► Finished
//!                                 else   ──► Failed, channel closed
//! ```
//!
//! ## Rules
//! - The channel buffer absorbs the pre-scanner burst (`Started`, an
//!   immediate `Running`, a spawn-error `Failed`) without a reader.
//! - Stopping is not the runner's job: the supervisor interrupts the child
//!   through [`ProcessHandle`] and the exit flows through the EOF path.
//! - The cancellation token is a last-resort kill switch, not the stop path;
//!   a cancelled child surfaces as `Failed` via its kill signal.

use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::messages::ServiceMessage;
use crate::service::{ServiceSpec, ServiceState};

/// Buffer for the initial burst: `Started` + optional `Running` + a
/// spawn-error `Failed`.
const CHANNEL_CAPACITY: usize = 3;

/// A live runner: its event channel and a handle to its child process.
pub(crate) struct RunnerHandle {
    /// Private event channel; closes after the terminal event.
    pub(crate) events: mpsc::Receiver<ServiceMessage>,
    /// Signal handle for the spawned child, if the spawn succeeded.
    pub(crate) process: ProcessHandle,
}

/// Best-effort signal handle for one spawned child.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProcessHandle {
    pid: Option<i32>,
}

impl ProcessHandle {
    fn absent() -> Self {
        Self { pid: None }
    }

    /// Delivers SIGINT to the child. Idempotent; errors are logged and
    /// ignored (the child may already have exited).
    #[cfg(unix)]
    pub(crate) fn interrupt(&self) {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let Some(pid) = self.pid else { return };
        if let Err(err) = kill(Pid::from_raw(pid), Signal::SIGINT) {
            warn!(pid, error = %err, "failed to interrupt service process");
        }
    }

    #[cfg(not(unix))]
    pub(crate) fn interrupt(&self) {
        warn!(pid = ?self.pid, "process interrupt is not supported on this platform");
    }
}

/// Launches the child and returns its event channel.
///
/// Publishes `Started` (and `Running` when the spec has no readiness
/// pattern) before attempting the spawn, so the observer sees the same
/// prefix whether or not the spawn succeeds. On spawn failure the channel
/// carries a final `Failed` and closes; no scanner task is left behind.
pub(crate) fn spawn(spec: Arc<ServiceSpec>, token: CancellationToken) -> RunnerHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let _ = tx.try_send(ServiceMessage::state(spec.name(), ServiceState::Started));
    if spec.running_pattern().is_none() {
        let _ = tx.try_send(ServiceMessage::state(spec.name(), ServiceState::Running));
    }

    let mut command = Command::new(spec.command());
    command
        .args(spec.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            let _ = tx.try_send(failed(&spec, err.to_string()));
            return RunnerHandle {
                events: rx,
                process: ProcessHandle::absent(),
            };
        }
    };

    let Some(stdout) = child.stdout.take() else {
        let _ = tx.try_send(failed(&spec, "stdout pipe unavailable"));
        return RunnerHandle {
            events: rx,
            process: ProcessHandle::absent(),
        };
    };

    let pid = child.id().map(|pid| pid as i32);
    tokio::spawn(scan(spec, child, stdout, tx, token));

    RunnerHandle {
        events: rx,
        process: ProcessHandle { pid },
    }
}

/// Reads stdout line by line, classifies readiness, and reports the
/// terminal outcome. Owns the child until it exits.
async fn scan(
    spec: Arc<ServiceSpec>,
    mut child: Child,
    stdout: ChildStdout,
    tx: mpsc::Sender<ServiceMessage>,
    token: CancellationToken,
) {
    let mut lines = BufReader::new(stdout).lines();
    let mut running = spec.running_pattern().is_none();

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                if let Err(err) = child.kill().await {
                    warn!(service = spec.name(), error = %err, "failed to kill cancelled service");
                }
                break;
            }
            next = lines.next_line() => match next {
                Ok(Some(line)) => {
                    if !running && matches(&spec, &line) {
                        running = true;
                        if tx
                            .send(ServiceMessage::state(spec.name(), ServiceState::Running))
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                    if tx.send(ServiceMessage::line(spec.name(), line)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    let _ = tx.send(failed(&spec, err.to_string())).await;
                    return;
                }
            }
        }
    }

    match child.wait().await {
        Ok(status) if status.success() => {
            let _ = tx
                .send(ServiceMessage::state(spec.name(), ServiceState::Finished))
                .await;
        }
        Ok(status) => {
            let _ = tx.send(failed(&spec, status.to_string())).await;
        }
        Err(err) => {
            let _ = tx.send(failed(&spec, err.to_string())).await;
        }
    }
}

fn matches(spec: &ServiceSpec, line: &str) -> bool {
    spec.running_pattern().is_some_and(|pattern| pattern.is_match(line))
}

fn failed(spec: &ServiceSpec, reason: impl Into<String>) -> ServiceMessage {
    ServiceMessage::state(
        spec.name(),
        ServiceState::Failed {
            reason: reason.into(),
        },
    )
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use regex::Regex;
    use tokio::time::timeout;

    use super::*;
    use crate::messages::MessageKind;

    fn sh(name: &str, script: &str) -> Arc<ServiceSpec> {
        Arc::new(ServiceSpec::new(name, "/bin/sh").with_args(["-c", script]))
    }

    async fn drain(mut handle: RunnerHandle) -> Vec<ServiceMessage> {
        let mut recorded = Vec::new();
        while let Some(msg) = timeout(Duration::from_secs(5), handle.events.recv())
            .await
            .expect("runner stalled")
        {
            recorded.push(msg);
        }
        recorded
    }

    #[tokio::test]
    async fn no_pattern_runs_immediately_and_finishes() {
        let handle = spawn(sh("simple", "true"), CancellationToken::new());
        let recorded = drain(handle).await;

        assert_eq!(
            recorded,
            vec![
                ServiceMessage::state("simple", ServiceState::Started),
                ServiceMessage::state("simple", ServiceState::Running),
                ServiceMessage::state("simple", ServiceState::Finished),
            ]
        );
    }

    #[tokio::test]
    async fn nonzero_exit_fails_with_status_text() {
        let handle = spawn(sh("broken", "exit 10"), CancellationToken::new());
        let recorded = drain(handle).await;

        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0], ServiceMessage::state("broken", ServiceState::Started));
        assert_eq!(recorded[1], ServiceMessage::state("broken", ServiceState::Running));
        match &recorded[2].kind {
            MessageKind::State(ServiceState::Failed { reason }) => {
                assert!(reason.contains("10"), "unexpected reason: {reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pattern_match_flips_running_before_the_line() {
        let spec = Arc::new(
            ServiceSpec::new("cat", "/bin/sh")
                .with_args(["-c", "printf 'hello\\nready\\nexit\\n'"])
                .with_running_pattern(Regex::new("ready").unwrap()),
        );
        let recorded = drain(spawn(spec, CancellationToken::new())).await;

        assert_eq!(
            recorded,
            vec![
                ServiceMessage::state("cat", ServiceState::Started),
                ServiceMessage::line("cat", "hello"),
                ServiceMessage::state("cat", ServiceState::Running),
                ServiceMessage::line("cat", "ready"),
                ServiceMessage::line("cat", "exit"),
                ServiceMessage::state("cat", ServiceState::Finished),
            ]
        );
    }

    #[tokio::test]
    async fn interrupt_lets_a_trapping_child_finish() {
        let spec = Arc::new(
            ServiceSpec::new("loop", "/bin/sh")
                .with_args(["-c", "trap 'exit 0' INT; echo ready; while :; do sleep 0.1; done"])
                .with_running_pattern(Regex::new("ready").unwrap()),
        );
        let mut handle = spawn(spec, CancellationToken::new());

        let mut recorded = Vec::new();
        while let Some(msg) = timeout(Duration::from_secs(5), handle.events.recv())
            .await
            .expect("runner stalled")
        {
            if msg.as_state() == Some(&ServiceState::Running) {
                handle.process.interrupt();
            }
            recorded.push(msg);
        }

        assert_eq!(
            recorded.last(),
            Some(&ServiceMessage::state("loop", ServiceState::Finished))
        );
        assert!(!recorded
            .iter()
            .any(|msg| matches!(msg.kind, MessageKind::State(ServiceState::Failed { .. }))));
    }

    #[tokio::test]
    async fn spawn_error_fails_after_started() {
        let spec = Arc::new(ServiceSpec::new("missing", "/nonexistent/depvisor-test-binary"));
        let recorded = drain(spawn(spec, CancellationToken::new())).await;

        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0].as_state(), Some(&ServiceState::Started));
        assert_eq!(recorded[1].as_state(), Some(&ServiceState::Running));
        assert!(matches!(
            recorded[2].kind,
            MessageKind::State(ServiceState::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn cancellation_kills_and_fails() {
        let spec = Arc::new(
            ServiceSpec::new("stuck", "/bin/sh")
                .with_args(["-c", "echo ready; sleep 600"])
                .with_running_pattern(Regex::new("ready").unwrap()),
        );
        let token = CancellationToken::new();
        let mut handle = spawn(spec, token.clone());

        let mut recorded = Vec::new();
        while let Some(msg) = timeout(Duration::from_secs(5), handle.events.recv())
            .await
            .expect("runner stalled")
        {
            if msg.as_state() == Some(&ServiceState::Running) {
                token.cancel();
            }
            recorded.push(msg);
        }

        assert!(matches!(
            recorded.last().map(|msg| &msg.kind),
            Some(MessageKind::State(ServiceState::Failed { .. }))
        ));
    }
}
