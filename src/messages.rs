//! # Wire messages of the unified event stream.
//!
//! Runners publish [`ServiceMessage`]s on their private channels; the
//! supervisor merges them and forwards them to the observer. The stream for
//! one spawn of a service always reads:
//!
//! ```text
//! State(Started) → [Line ...] → State(Running)? → [Line ...] → State(Finished | Failed)
//! ```
//!
//! Ordering holds per service only; messages from different services
//! interleave arbitrarily.
//!
//! ## Example
//! ```rust
//! use depvisor::{MessageKind, ServiceMessage, ServiceState};
//!
//! let msg = ServiceMessage::state("db", ServiceState::Running);
//! assert_eq!(msg.name, "db");
//! assert!(matches!(msg.kind, MessageKind::State(ServiceState::Running)));
//!
//! let line = ServiceMessage::line("db", "listening on 5432");
//! assert_eq!(format!("{line}"), "[line] service=db value=\"listening on 5432\"");
//! ```

use std::fmt;

use crate::service::ServiceState;

/// Payload of a [`ServiceMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// State transition of the service.
    State(ServiceState),
    /// One line of the child's stdout.
    Line(String),
}

/// One message on the unified event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMessage {
    /// Name of the service the message belongs to.
    pub name: String,
    /// State transition or output line.
    pub kind: MessageKind,
}

impl ServiceMessage {
    /// Creates a state-transition message.
    pub fn state(name: impl Into<String>, state: ServiceState) -> Self {
        Self {
            name: name.into(),
            kind: MessageKind::State(state),
        }
    }

    /// Creates an output-line message.
    pub fn line(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MessageKind::Line(line.into()),
        }
    }

    /// Returns the carried state, if this is a state message.
    pub fn as_state(&self) -> Option<&ServiceState> {
        match &self.kind {
            MessageKind::State(state) => Some(state),
            MessageKind::Line(_) => None,
        }
    }

    /// True for the internal runner-gone sentinel (`State(Dead)`).
    ///
    /// The supervisor posts it after a runner's channel closes and never
    /// forwards it to the observer.
    pub(crate) fn is_dead_sentinel(&self) -> bool {
        matches!(self.kind, MessageKind::State(ServiceState::Dead))
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MessageKind::State(ServiceState::Failed { reason }) => {
                write!(f, "[failed] service={} err={reason:?}", self.name)
            }
            MessageKind::State(state) => {
                write!(f, "[{}] service={}", state.as_label(), self.name)
            }
            MessageKind::Line(line) => {
                write!(f, "[line] service={} value={line:?}", self.name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_internal_dead_state() {
        assert!(ServiceMessage::state("a", ServiceState::Dead).is_dead_sentinel());
        assert!(!ServiceMessage::state("a", ServiceState::Finished).is_dead_sentinel());
        assert!(!ServiceMessage::line("a", "dead").is_dead_sentinel());
    }

    #[test]
    fn display_renders_labels() {
        let failed = ServiceMessage::state("web", ServiceState::Failed { reason: "exit status: 10".into() });
        assert_eq!(format!("{failed}"), "[failed] service=web err=\"exit status: 10\"");

        let running = ServiceMessage::state("web", ServiceState::Running);
        assert_eq!(format!("{running}"), "[running] service=web");
    }
}
