//! # Supervisor engine: the single-writer event loop.
//!
//! One task owns the authoritative state map, the pending command queue,
//! and every process handle. Everything else talks to it over channels:
//!
//! ```text
//!  SupervisorHandle ──commands──►┐
//!                                │  select!
//!  runner ──► forwarder ──merged─┤
//!  runner ──► forwarder ──merged─┤──► ingest ──► events ──► observer
//!                                │
//!                                └──► dispatch (graph frontier of the
//!                                     head command → start/stop batch)
//! ```
//!
//! ## Rules
//! - `states` is written here and nowhere else; runners never read it.
//! - The head command stays queued until its frontier computes empty; only
//!   then does the next command get driven.
//! - The `changed` set records services already commanded during the head
//!   command's lifetime, so a service mid-transition (`Started`, not yet
//!   `Running`) is not dispatched twice. It resets when the head pops.
//! - A forwarder posts a synthetic `Dead` state after its runner's channel
//!   closes. The sentinel is never forwarded to the observer; it retires
//!   the process handle and frees the name for a later start.
//! - Output lines advance nothing: `Line` messages are forwarded and the
//!   dispatch step is skipped.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::command::Command;
use crate::graph;
use crate::messages::ServiceMessage;
use crate::service::{self, ProcessHandle, RunnerHandle, ServiceSpec, ServiceState};

pub(crate) struct Engine {
    specs: HashMap<String, Arc<ServiceSpec>>,
    requirements: HashMap<String, Vec<String>>,
    /// Authoritative per-service state. Single-writer: this task only.
    states: HashMap<String, ServiceState>,
    /// Signal handles of live runners, by service name.
    handles: HashMap<String, ProcessHandle>,
    merged: mpsc::Sender<ServiceMessage>,
    events: mpsc::Sender<ServiceMessage>,
    /// Root of the per-runner kill-switch tokens.
    runtime_token: CancellationToken,
    /// FIFO of admitted commands; the front is being driven.
    pending: VecDeque<Command>,
    /// Services already commanded during the head command's lifetime.
    changed: HashSet<String>,
    closing: bool,
}

impl Engine {
    pub(crate) fn new(
        specs: HashMap<String, Arc<ServiceSpec>>,
        requirements: HashMap<String, Vec<String>>,
        states: HashMap<String, ServiceState>,
        merged: mpsc::Sender<ServiceMessage>,
        events: mpsc::Sender<ServiceMessage>,
    ) -> Self {
        Self {
            specs,
            requirements,
            states,
            handles: HashMap::new(),
            merged,
            events,
            runtime_token: CancellationToken::new(),
            pending: VecDeque::new(),
            changed: HashSet::new(),
            closing: false,
        }
    }

    /// Runs until a `Close` command has drained every active service.
    ///
    /// Dropping every [`SupervisorHandle`](crate::SupervisorHandle) without
    /// closing counts as a close request: an unreachable supervisor drains
    /// and exits instead of idling forever.
    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut merged: mpsc::Receiver<ServiceMessage>,
    ) {
        let mut commands_open = true;

        loop {
            tokio::select! {
                command = commands.recv(), if commands_open => {
                    let command = match command {
                        Some(command) => command,
                        None => {
                            commands_open = false;
                            Command::Close
                        }
                    };
                    if !self.admit(command) {
                        continue;
                    }
                }
                message = merged.recv() => {
                    // The engine keeps a sender clone, so the channel cannot close.
                    let Some(message) = message else { continue };
                    if !self.ingest(message).await {
                        continue;
                    }
                }
            }

            self.dispatch();

            if self.pending.is_empty() && self.closing {
                debug!("supervisor drained, loop exiting");
                break;
            }
        }
    }

    /// Screens a command. Idempotent no-ops (start of an active or unknown
    /// service, stop of an inactive one, start after close) are discarded.
    /// Returns true when the queue changed.
    fn admit(&mut self, command: Command) -> bool {
        match &command {
            Command::Start(name) => {
                if self.closing || self.is_active(name) {
                    debug!(service = %name, command = command.as_label(), "command discarded");
                    return false;
                }
                if !self.specs.contains_key(name) {
                    warn!(service = %name, "start of unknown service discarded");
                    return false;
                }
            }
            Command::Stop(name) => {
                if !self.is_active(name) {
                    debug!(service = %name, command = command.as_label(), "command discarded");
                    return false;
                }
            }
            Command::Close => {
                self.closing = true;
            }
        }

        self.pending.push_back(command);
        true
    }

    /// Applies one merged message. Returns true when the dispatch step
    /// should run (state changed), false for plain output lines.
    async fn ingest(&mut self, message: ServiceMessage) -> bool {
        if message.is_dead_sentinel() {
            // A sentinel racing a restart is stale: the name already belongs
            // to a newer runner whose handle must survive.
            if !self.is_active(&message.name) {
                self.handles.remove(&message.name);
                self.states.insert(message.name, ServiceState::Dead);
            }
            return true;
        }

        let update = message
            .as_state()
            .map(|state| (message.name.clone(), state.clone()));

        // Blocks when the observer lags; the consumer paces the system.
        let _ = self.events.send(message).await;

        match update {
            Some((name, state)) => {
                debug!(service = %name, state = state.as_label(), "state updated");
                self.states.insert(name, state);
                true
            }
            None => false,
        }
    }

    /// Drives the head command: computes its frontier, acts on every name
    /// not already commanded, and pops the command once the frontier is
    /// empty. Pops cascade so a queued command whose work is already done
    /// does not wait for another event.
    fn dispatch(&mut self) {
        while let Some(head) = self.pending.front().cloned() {
            let schedule = self.schedule(&head);
            if schedule.is_empty() {
                debug!(command = head.as_label(), "command complete");
                self.pending.pop_front();
                self.changed.clear();
                continue;
            }

            let actionable: Vec<String> = schedule
                .into_iter()
                .filter(|name| !self.changed.contains(name))
                .collect();
            if actionable.is_empty() {
                // Everything on the frontier is mid-transition; wait for
                // the next state event.
                return;
            }

            for name in actionable {
                match head {
                    Command::Start(_) => self.start_service(&name),
                    Command::Stop(_) | Command::Close => self.stop_service(&name),
                }
                self.changed.insert(name);
            }
            return;
        }
    }

    /// Selects the frontier algorithm by command kind.
    fn schedule(&self, command: &Command) -> Vec<String> {
        match command {
            Command::Start(name) => {
                graph::disabled_leaves_from(name, &self.states, &self.requirements)
            }
            Command::Stop(name) => {
                graph::enabled_leaves_from(name, &self.states, &self.requirements)
            }
            Command::Close => graph::enabled_leaves(&self.states, &self.requirements),
        }
    }

    /// Spawns a runner for `name` and a forwarder that merges its events,
    /// posting the `Dead` sentinel once the runner's channel closes.
    fn start_service(&mut self, name: &str) {
        if self.is_active(name) {
            return;
        }
        let Some(spec) = self.specs.get(name) else {
            return;
        };

        let RunnerHandle { events, process } =
            service::spawn(spec.clone(), self.runtime_token.child_token());
        self.states.insert(name.to_string(), ServiceState::Started);
        self.handles.insert(name.to_string(), process);
        debug!(service = name, "service starting");

        tokio::spawn(forward(name.to_string(), events, self.merged.clone()));
    }

    /// Interrupts `name`'s child. No state change here: the terminal event
    /// arrives through the runner like any other exit.
    fn stop_service(&mut self, name: &str) {
        if !self.is_active(name) {
            return;
        }
        if let Some(process) = self.handles.get(name) {
            debug!(service = name, "service interrupt requested");
            process.interrupt();
        }
    }

    fn is_active(&self, name: &str) -> bool {
        self.states.get(name).is_some_and(ServiceState::is_active)
    }
}

/// Copies one runner's events into the merged channel, then reports the
/// runner gone.
async fn forward(
    name: String,
    mut events: mpsc::Receiver<ServiceMessage>,
    merged: mpsc::Sender<ServiceMessage>,
) {
    while let Some(message) = events.recv().await {
        if merged.send(message).await.is_err() {
            return;
        }
    }
    let _ = merged
        .send(ServiceMessage::state(name, ServiceState::Dead))
        .await;
}
