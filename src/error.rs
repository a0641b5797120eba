//! # Error types of the supervisor boundary.
//!
//! Two enums cover the two failure surfaces:
//!
//! - [`RegistryError`] — registration and graph validation failures, raised
//!   synchronously before the engine starts.
//! - [`CommandError`] — command submission failures after the engine has
//!   gone away.
//!
//! Per-service runtime failures are **not** errors at this boundary: they
//! surface as `Failed` state messages on the event stream and never crash
//! the supervisor.

use thiserror::Error;

/// # Registration and validation errors.
///
/// Raised by [`Supervisor::register`](crate::Supervisor::register) and
/// [`Supervisor::init`](crate::Supervisor::init); the engine does not start
/// when one of these is returned.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A service with this name was already registered.
    #[error("service name '{name}' already used")]
    DuplicateName {
        /// The duplicate service name.
        name: String,
    },
    /// A requirement list names a service that was never registered.
    #[error("service '{service}' requires unknown service '{requirement}'")]
    UnknownRequirement {
        /// The service whose requirement list is invalid.
        service: String,
        /// The unregistered name it refers to.
        requirement: String,
    },
    /// The requirement graph contains a cycle.
    #[error("requirement graph contains a cycle")]
    RequirementCycle,
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DuplicateName { .. } => "registry_duplicate_name",
            RegistryError::UnknownRequirement { .. } => "registry_unknown_requirement",
            RegistryError::RequirementCycle => "registry_requirement_cycle",
        }
    }
}

/// # Command submission errors.
///
/// Raised by [`SupervisorHandle`](crate::SupervisorHandle) methods when the
/// engine task has already terminated.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The supervisor loop is no longer running.
    #[error("supervisor is closed")]
    Closed,
}

impl CommandError {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            CommandError::Closed => "command_closed",
        }
    }
}
