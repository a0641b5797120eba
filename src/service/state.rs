//! # Per-service lifecycle state.
//!
//! Every registered service is in exactly one [`ServiceState`] at any moment,
//! and only the supervisor loop writes it. One spawn moves through:
//!
//! ```text
//!       spawn ok, no pattern        line matches
//! Dead ───────────────────────► Running
//!   │            ▲                  │
//!   │ spawn ok   │                  │ EOF, exit = 0
//!   │ + pattern  │                  ▼
//!   └──► Started ──────────────► Finished
//!             │     line matches
//!             │
//!             └─ spawn / scanner / wait error ──► Failed
//! ```
//!
//! `Finished` and `Failed` are terminal for the spawn, not for the service:
//! a later start goes through `Dead → Started` again.

/// Lifecycle state of one registered service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceState {
    /// No child process. Initial state, and the state after a runner winds down.
    Dead,
    /// Child process spawned, readiness not yet observed.
    Started,
    /// Child process spawned and observed ready (pattern matched, or no pattern).
    Running,
    /// Child process exited with success.
    Finished,
    /// Spawn, scanner, or wait error, or a non-zero exit.
    Failed {
        /// Human-readable error text (exit status or I/O error).
        reason: String,
    },
}

impl ServiceState {
    /// A service is active while a live runner owns its child process.
    pub fn is_active(&self) -> bool {
        matches!(self, ServiceState::Started | ServiceState::Running)
    }

    /// Terminal states of one spawn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceState::Finished | ServiceState::Failed { .. })
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceState::Dead => "dead",
            ServiceState::Started => "started",
            ServiceState::Running => "running",
            ServiceState::Finished => "finished",
            ServiceState::Failed { .. } => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_covers_started_and_running() {
        assert!(ServiceState::Started.is_active());
        assert!(ServiceState::Running.is_active());
        assert!(!ServiceState::Dead.is_active());
        assert!(!ServiceState::Finished.is_active());
        assert!(!ServiceState::Failed { reason: "exit status: 1".into() }.is_active());
    }

    #[test]
    fn terminal_covers_finished_and_failed() {
        assert!(ServiceState::Finished.is_terminal());
        assert!(ServiceState::Failed { reason: "boom".into() }.is_terminal());
        assert!(!ServiceState::Dead.is_terminal());
        assert!(!ServiceState::Started.is_terminal());
    }
}
