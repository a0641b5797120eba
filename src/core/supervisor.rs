//! # Supervisor: registration boundary and engine launch.
//!
//! [`Supervisor`] collects service registrations, validates the requirement
//! graph, and turns into a running engine plus its operator-facing pieces:
//!
//! ```text
//! Supervisor::new(cfg)
//!   ├─ register(spec)*          (pre-init, duplicates rejected)
//!   └─ init()
//!        ├─ validate: requirements known, graph acyclic
//!        ├─ spawn engine task (single writer of states)
//!        └─ return (SupervisorHandle, event stream, sorted names)
//! ```
//!
//! ## Rules
//! - All registration happens before [`init`](Supervisor::init); specs are
//!   immutable afterwards.
//! - Validation failures keep the engine from starting; nothing is spawned.
//! - The returned event stream carries every forwarded [`ServiceMessage`]
//!   and closes once a close command has drained the system.
//!
//! ```no_run
//! use depvisor::{Config, ServiceSpec, Supervisor};
//! use regex::Regex;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut supervisor = Supervisor::new(Config::default());
//!     supervisor.register(
//!         ServiceSpec::new("db", "postgres")
//!             .with_running_pattern(Regex::new("ready to accept connections")?),
//!     )?;
//!     supervisor.register(ServiceSpec::new("api", "./api-server").with_requirements(["db"]))?;
//!
//!     let (handle, mut events, _names) = supervisor.init()?;
//!     handle.start("api").await?;
//!
//!     while let Some(message) = events.recv().await {
//!         println!("{message}");
//!     }
//!     Ok(())
//! }
//! ```

use tokio::sync::mpsc;

use crate::config::Config;
use crate::core::engine::Engine;
use crate::core::handle::SupervisorHandle;
use crate::core::registry::Registry;
use crate::error::RegistryError;
use crate::messages::ServiceMessage;
use crate::service::ServiceSpec;

/// Collects registrations, then launches the engine.
pub struct Supervisor {
    cfg: Config,
    registry: Registry,
}

impl Supervisor {
    /// Creates an empty supervisor with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            registry: Registry::new(),
        }
    }

    /// Registers one service. Names must be unique.
    pub fn register(&mut self, spec: ServiceSpec) -> Result<(), RegistryError> {
        self.registry.insert(spec)
    }

    /// Validates the catalog and starts the engine.
    ///
    /// Returns the command handle, the unified event stream, and the sorted
    /// list of registered names. Must be called inside a tokio runtime; the
    /// engine runs as a spawned task until the handle closes it.
    ///
    /// ### Errors
    /// - [`RegistryError::UnknownRequirement`] when a requirement list
    ///   names an unregistered service.
    /// - [`RegistryError::RequirementCycle`] when the graph is not a DAG.
    pub fn init(
        self,
    ) -> Result<
        (
            SupervisorHandle,
            mpsc::Receiver<ServiceMessage>,
            Vec<String>,
        ),
        RegistryError,
    > {
        self.registry.validate()?;

        let names = self.registry.names_sorted();
        let states = self.registry.initial_states();
        let (specs, requirements) = self.registry.into_parts();

        let (command_tx, command_rx) = mpsc::channel(self.cfg.command_capacity.max(1));
        let (merged_tx, merged_rx) = mpsc::channel(self.cfg.merged_capacity.max(1));
        let (event_tx, event_rx) = mpsc::channel(self.cfg.event_capacity.max(1));

        let engine = Engine::new(specs, requirements, states, merged_tx, event_tx);
        let join = tokio::spawn(engine.run(command_rx, merged_rx));

        Ok((SupervisorHandle::new(command_tx, join), event_rx, names))
    }
}
