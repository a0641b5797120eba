//! # depvisor
//!
//! **Depvisor** is a dependency-aware supervisor for long-lived child
//! processes.
//!
//! Services are registered with a command, an optional readiness pattern
//! matched against stdout, and the names of services that must be running
//! first. The supervisor walks the requirement DAG to decide what to launch
//! or interrupt next, and streams every state transition and output line to
//! one observer.
//!
//! ## Features
//!
//! | Area             | Description                                                        | Key types                                |
//! |------------------|--------------------------------------------------------------------|------------------------------------------|
//! | **Registration** | Declare services and their requirement edges.                      | [`ServiceSpec`], [`Supervisor`]          |
//! | **Commands**     | Start a service (requirements first), stop a subtree, drain all.   | [`SupervisorHandle`]                     |
//! | **Events**       | Unified stream of state transitions and stdout lines.              | [`ServiceMessage`], [`ServiceState`]     |
//! | **Graph**        | The pure frontier algorithms, usable on their own.                 | [`graph`]                                |
//! | **Errors**       | Typed registration/validation and command errors.                  | [`RegistryError`], [`CommandError`]      |
//! | **Configuration**| Channel sizing; the observer paces the whole pipeline.             | [`Config`]                               |
//!
//! ```no_run
//! use depvisor::{Config, ServiceSpec, Supervisor};
//! use regex::Regex;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut supervisor = Supervisor::new(Config::default());
//!
//!     supervisor.register(
//!         ServiceSpec::new("db", "postgres")
//!             .with_args(["-D", "/var/lib/postgres"])
//!             .with_running_pattern(Regex::new("ready to accept connections")?),
//!     )?;
//!     supervisor.register(
//!         ServiceSpec::new("api", "./api-server").with_requirements(["db"]),
//!     )?;
//!
//!     let (handle, mut events, names) = supervisor.init()?;
//!     println!("supervising: {names:?}");
//!
//!     handle.start("api").await?;
//!
//!     let reader = tokio::spawn(async move {
//!         while let Some(message) = events.recv().await {
//!             println!("{message}");
//!         }
//!     });
//!
//!     handle.close_on_signal().await;
//!     reader.await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//! - Per service, one spawn always reads `Started → (Running?) → (Finished |
//!   Failed)`, with output lines only in between. Across services the
//!   stream is an arbitrary interleaving.
//! - A service starts only after every requirement is `Running`; a failed
//!   requirement simply never unblocks its dependents.
//! - Per-service failures become `Failed` messages; they never take the
//!   supervisor down.
//!
//! ---

mod config;
mod core;
mod error;
mod messages;
mod service;

pub mod graph;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Supervisor, SupervisorHandle};
pub use error::{CommandError, RegistryError};
pub use messages::{MessageKind, ServiceMessage};
pub use service::{ServiceSpec, ServiceState};
