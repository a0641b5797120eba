//! Operator commands consumed by the supervisor loop.

/// A command submitted through the [`SupervisorHandle`](crate::SupervisorHandle).
///
/// Commands queue up inside the engine; the head of the queue is driven to
/// completion across as many dispatch rounds as its dependency frontier
/// needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Bring the named service (and, first, its requirements) up.
    Start(String),
    /// Take the named service's subtree down, requirements first.
    Stop(String),
    /// Drain every active service and shut the loop down.
    Close,
}

impl Command {
    /// Returns a short stable label (snake_case) for use in logs.
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            Command::Start(_) => "start",
            Command::Stop(_) => "stop",
            Command::Close => "close",
        }
    }
}
