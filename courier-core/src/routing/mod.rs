//! Capability traits for the external routing service and its credentials.
//!
//! The engine never computes road distances itself. It asks a
//! [`RoutingProvider`] for distance-matrix and directions answers, using an
//! API key obtained from a [`ConfigurationProvider`]. Both traits are
//! synchronous; adapters that talk to the network block internally and honour
//! the [`CancellationToken`](tokio_util::sync::CancellationToken) passed with
//! each call.

mod config;
mod error;
mod provider;

pub use config::{ConfigurationError, ConfigurationProvider, RoutingConfiguration};
pub(crate) use config::resolve_api_key;
pub use error::ProviderError;
pub use provider::{
    DirectionsQuery, DirectionsResponse, DirectionsRoute, DistanceElement, DistanceQuery,
    DistanceResponse, RoutingProvider, STATUS_OK,
};
