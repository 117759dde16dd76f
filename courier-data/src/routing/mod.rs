//! HTTP-based routing providers.
//!
//! This module provides [`HttpRoutingProvider`], an implementation of
//! [`courier_core::RoutingProvider`] that talks to the Google Maps Distance
//! Matrix and Directions web services, or any service exposing the same
//! JSON shapes under a different base URL.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use courier_core::{
//!     CancellationToken, DistanceAggregator, Point, RoutingConfiguration,
//! };
//! use courier_data::routing::{HttpRoutingProvider, HttpRoutingProviderConfig};
//!
//! let config = HttpRoutingProviderConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpRoutingProvider::with_config(config)?;
//! let aggregator =
//!     DistanceAggregator::new(provider, RoutingConfiguration::with_api_key("secret"));
//!
//! let points = [Point::new(51.5, -0.1), Point::new(51.6, -0.2)];
//! let totals = aggregator.sum_distance_and_duration(&points, &CancellationToken::new())?;
//! println!("{} m", totals.total_distance_meters);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod google;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpRoutingProvider,
    HttpRoutingProviderConfig, ProviderBuildError,
};
