//! # Runtime core: the engine and its boundary.
//!
//! The only public API re-exported from here is the boundary pair
//! [`Supervisor`] / [`SupervisorHandle`]. Everything else is an internal
//! building block the boundary wires together.
//!
//! ## Files & responsibilities
//! - **supervisor.rs**: public facade; collects registrations, validates the
//!   requirement graph, builds the channels, and spawns the engine.
//! - **handle.rs**: command side after init; submits start/stop, waits for
//!   the drain on close.
//! - **engine.rs**: the single-writer loop; owns states, the pending
//!   command queue, and every process handle.
//! - **registry.rs**: specs plus the requirement graph; duplicate and
//!   validation checks.
//! - **command.rs**: the operator command type.
//! - **shutdown.rs**: OS signal handling used by `close_on_signal`.
//!
//! ## Wiring
//! ```text
//! Application code
//!   ├─ Supervisor::new(cfg) → register(spec)* → init()
//!   │                                             │
//!   │                     ┌───────────────────────┤
//!   │                     ▼                       ▼
//!   │             SupervisorHandle          engine task (single writer)
//!   │               start/stop/close ──────► command queue → graph frontier
//!   │                                             │
//!   │                                   runner per started service
//!   │                                             │
//!   └─ observer ◄── event stream ◄── merge ◄── forwarder per runner
//! ```

mod command;
mod engine;
mod handle;
mod registry;
mod shutdown;
mod supervisor;

pub use handle::SupervisorHandle;
pub use supervisor::Supervisor;
