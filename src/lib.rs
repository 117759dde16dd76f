//! Facade crate for the Courier routing engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP routing
//! provider behind the `http` feature.

#![forbid(unsafe_code)]

pub use courier_core::{
    AggregateResult, AggregatorConfig, CancellationToken, ConfigurationError,
    ConfigurationProvider, Coordinate, DistanceAggregator, Leg, Point, PolylineError,
    RouteOptimiser, RouteResult, RoutingConfiguration, RoutingError, RoutingProvider, Stop,
    geometry, polyline,
};

#[cfg(feature = "http")]
pub use courier_data::routing::{
    HttpRoutingProvider, HttpRoutingProviderConfig, ProviderBuildError,
};
