//! # Pure graph algorithms over the requirement DAG.
//!
//! Everything in this module is a side-effect-free function of
//! `(states, requirements)`:
//!
//! - [`is_acyclic`] — validation at init time
//! - [`init_order`] — topological start order for one root
//! - [`enabled_leaves_from`] / [`enabled_leaves`] — the frontier of active
//!   services safe to stop next
//! - [`disabled_leaves_from`] — the frontier of inactive services safe to
//!   start next
//! - [`orphaned_active`] — active services nothing else depends on
//!
//! ## Rules
//! - All returned lists are sorted by name ascending, so the supervisor
//!   dispatches deterministically.
//! - Walks recurse over the requirement edges; the graph is validated as
//!   acyclic before the supervisor runs, and catalogs are small.

mod acyclic;
mod leaves;
mod order;

pub use acyclic::is_acyclic;
pub use leaves::{disabled_leaves_from, enabled_leaves, enabled_leaves_from, orphaned_active};
pub use order::init_order;
