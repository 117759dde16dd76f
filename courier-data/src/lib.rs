//! Adapters that connect the Courier engine to external services.
//!
//! Responsibilities:
//! - Implement [`courier_core::RoutingProvider`] over HTTP.
//! - Own the wire formats of the services consumed.
//!
//! Boundaries:
//! - Do not encode routing rules (those live in `courier-core`); replies are
//!   passed through with their service statuses intact.
//! - Keep blocking I/O off async executors the caller may be running.
//!
//! Invariants:
//! - API keys never appear in error messages or logs.
//! - No global mutable state.

pub mod routing;
