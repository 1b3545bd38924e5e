//! Timeline engine session and its collaborator ports.
//!
//! # Responsibility
//! - Hold the minimal mutable state between triggers: current layout,
//!   per-year reveal cursors, loaded years and the no-results countdown.
//! - Route recompute, reveal, zoom and countdown triggers synchronously.
//!
//! # Invariants
//! - One trigger is handled at a time; no trigger re-enters the engine.

pub mod countdown;
pub mod ports;
pub mod session;
