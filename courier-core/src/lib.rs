//! Core routing logic for the Courier engine.
//!
//! The crate answers three questions for a delivery marketplace:
//!
//! - how far, and for how long, a courier travels along an ordered list of
//!   points ([`DistanceAggregator`]);
//! - in which order a courier should collect from several stops before
//!   heading to a single destination ([`RouteOptimiser`]);
//! - what an encoded provider polyline looks like as coordinates
//!   ([`polyline::decode`]).
//!
//! All geospatial computation is delegated to a [`RoutingProvider`], and the
//! credentials for it come from a [`ConfigurationProvider`]. Both are
//! capability traits so tests can substitute deterministic fakes (see
//! [`test_support`]).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod error;
pub mod geometry;
mod optimise;
mod point;
pub mod polyline;
mod route;
pub mod routing;
#[doc(hidden)]
pub mod test_support;

pub use aggregate::{AggregatorConfig, DistanceAggregator};
pub use error::RoutingError;
pub use optimise::RouteOptimiser;
pub use point::{Coordinate, Point, Stop};
pub use polyline::PolylineError;
pub use route::{AggregateResult, Leg, RouteResult};
pub use routing::{
    ConfigurationError, ConfigurationProvider, DirectionsQuery, DirectionsResponse,
    DirectionsRoute, DistanceElement, DistanceQuery, DistanceResponse, ProviderError,
    RoutingConfiguration, RoutingProvider, STATUS_OK,
};
pub use tokio_util::sync::CancellationToken;
