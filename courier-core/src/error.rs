//! Error type shared by the routing operations.

use thiserror::Error;

use crate::{ConfigurationError, ProviderError};

/// Errors from [`DistanceAggregator`](crate::DistanceAggregator) and
/// [`RouteOptimiser`](crate::RouteOptimiser).
///
/// No variant carries a partial result: once an error is returned, nothing
/// computed before it is observable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The provider answered with a non-OK overall status.
    #[error("routing service could not produce a route (status {status})")]
    RouteUnavailable {
        /// Status string reported by the service.
        status: String,
    },
    /// The caller cancelled the operation.
    #[error("routing operation was cancelled")]
    Cancelled,
    /// No usable API key was configured.
    #[error("no maps API key is configured")]
    MissingApiKey,
    /// Configuration could not be read.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The provider could not be reached or its reply could not be read.
    #[error(transparent)]
    Provider(ProviderError),
    /// Distance aggregation needs an origin and at least one further point.
    #[error("at least two points are required, got {count}")]
    InsufficientPoints {
        /// Number of points supplied.
        count: usize,
    },
    /// Route optimisation was asked to order an empty stop list.
    #[error("at least one stop is required")]
    NoStops,
    /// The provider reported success but returned no route.
    #[error("routing service returned no routes")]
    EmptyRoutes,
    /// The provider's waypoint order is not a permutation of the waypoints.
    #[error("routing service returned an invalid waypoint order {order:?}")]
    InvalidWaypointOrder {
        /// Order as returned by the service.
        order: Vec<usize>,
    },
    /// The provider returned a different number of legs than requested hops.
    #[error("expected {expected} route legs, got {actual}")]
    LegCountMismatch {
        /// Legs implied by the request.
        expected: usize,
        /// Legs in the reply.
        actual: usize,
    },
}

/// Cancellation observed by the provider is the caller's cancellation, not
/// a transport failure.
impl From<ProviderError> for RoutingError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Cancelled => Self::Cancelled,
            other => Self::Provider(other),
        }
    }
}
