//! # Supervisor configuration.
//!
//! [`Config`] sizes the channels the supervisor owns. The defaults keep the
//! pipeline tight: a slow observer back-pressures the supervisor, which in
//! turn paces the runners.
//!
//! # Example
//! ```
//! use depvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.command_capacity = 32;
//!
//! assert_eq!(cfg.command_capacity, 32);
//! ```

/// Channel capacities for the supervisor runtime.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the operator command channel (`start` / `stop` / `close`).
    pub command_capacity: usize,
    /// Capacity of the merged runner fan-in channel.
    pub merged_capacity: usize,
    /// Capacity of the outward event stream.
    pub event_capacity: usize,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `command_capacity = 16`
    /// - `merged_capacity = 1`
    /// - `event_capacity = 1`
    fn default() -> Self {
        Self {
            command_capacity: 16,
            merged_capacity: 1,
            event_capacity: 1,
        }
    }
}
