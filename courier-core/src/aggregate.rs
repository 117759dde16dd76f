//! Total distance and duration along an ordered list of points.

use log::{debug, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::polyline::{self, PolylineError};
use crate::routing::resolve_api_key;
use crate::{
    AggregateResult, ConfigurationProvider, Coordinate, DirectionsQuery, DistanceQuery, Point,
    ProviderError, RoutingError, RoutingProvider,
};

/// Options for [`DistanceAggregator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Fetch a directions overview for the whole trip and decode it into
    /// [`AggregateResult::preview_path`]. Failures are logged and ignored.
    pub preview_path: bool,
}

/// Why the optional preview path could not be produced.
///
/// Never returned to callers; the aggregator logs it and carries on.
#[derive(Debug, Error)]
enum TransientEnrichmentFailure {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("directions request returned status {status}")]
    Status { status: String },
    #[error("directions request returned no routes")]
    NoRoutes,
    #[error("overview path is malformed: {0}")]
    MalformedPath(#[from] PolylineError),
}

/// Sums provider-reported legs between consecutive points.
///
/// # Examples
/// ```
/// use courier_core::test_support::{ScriptedRoutingProvider, ok_distance, test_configuration};
/// use courier_core::{CancellationToken, DistanceAggregator, Point};
///
/// let provider = ScriptedRoutingProvider::new()
///     .with_distance_reply(Ok(ok_distance(1_000, 120)))
///     .with_distance_reply(Ok(ok_distance(500, 60)));
/// let aggregator = DistanceAggregator::new(provider, test_configuration());
///
/// let points = [Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 1.0)];
/// let totals = aggregator.sum_distance_and_duration(&points, &CancellationToken::new())?;
/// assert_eq!(totals.total_distance_meters, 1_500);
/// assert_eq!(totals.total_duration_seconds, 180);
/// # Ok::<(), courier_core::RoutingError>(())
/// ```
#[derive(Debug)]
pub struct DistanceAggregator<P, C> {
    provider: P,
    configuration: C,
    config: AggregatorConfig,
}

impl<P, C> DistanceAggregator<P, C>
where
    P: RoutingProvider,
    C: ConfigurationProvider,
{
    /// Create an aggregator with default options.
    pub const fn new(provider: P, configuration: C) -> Self {
        Self::with_config(provider, configuration, AggregatorConfig {
            preview_path: false,
        })
    }

    /// Create an aggregator with explicit options.
    pub const fn with_config(provider: P, configuration: C, config: AggregatorConfig) -> Self {
        Self {
            provider,
            configuration,
            config,
        }
    }

    /// Sum distance and duration over each consecutive pair of `points`.
    ///
    /// One distance query is issued per pair, strictly in order. Elements
    /// whose own status is not OK contribute nothing. When preview paths are
    /// enabled, a single directions query follows the legs; its failure
    /// leaves `preview_path` empty. Once every leg has been summed the totals
    /// are returned even if `cancel` fires: the preview is skipped, or
    /// abandoned when already in flight.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::InsufficientPoints`] for fewer than two points.
    /// - [`RoutingError::MissingApiKey`] or [`RoutingError::Configuration`]
    ///   before any provider call when no key is available.
    /// - [`RoutingError::RouteUnavailable`] when any leg reports a non-OK
    ///   status; no totals are returned.
    /// - [`RoutingError::Cancelled`] when `cancel` fires before the last
    ///   leg is summed; no further leg is requested.
    /// - [`RoutingError::Provider`] on transport failure.
    pub fn sum_distance_and_duration(
        &self,
        points: &[Point],
        cancel: &CancellationToken,
    ) -> Result<AggregateResult, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InsufficientPoints {
                count: points.len(),
            });
        }
        let api_key = resolve_api_key(&self.configuration)?;

        let mut totals = AggregateResult::default();
        for (leg, (origin, destination)) in points.iter().zip(points.iter().skip(1)).enumerate() {
            if cancel.is_cancelled() {
                return Err(RoutingError::Cancelled);
            }
            let query = DistanceQuery {
                origin: *origin,
                destination: *destination,
                api_key: &api_key,
            };
            let reply = self.provider.query_distance(&query, cancel)?;
            debug!(
                "distance leg {leg} ({origin} -> {destination}): status={}, elements={}",
                reply.status,
                reply.elements.len()
            );
            if !reply.is_ok() {
                return Err(RoutingError::RouteUnavailable {
                    status: reply.status,
                });
            }
            for element in &reply.elements {
                if element.is_ok() {
                    totals.total_distance_meters = totals
                        .total_distance_meters
                        .saturating_add(element.distance_meters);
                    totals.total_duration_seconds = totals
                        .total_duration_seconds
                        .saturating_add(element.duration_seconds);
                } else {
                    warn!(
                        "skipping distance element on leg {leg} with status {}",
                        element.status
                    );
                }
            }
        }

        if self.config.preview_path {
            if cancel.is_cancelled() {
                debug!("skipping preview path: cancelled after the last leg");
            } else {
                match self.preview_path(points, &api_key, cancel) {
                    Ok(path) => totals.preview_path = path,
                    Err(failure) => warn!("preview path unavailable: {failure}"),
                }
            }
        }
        Ok(totals)
    }

    fn preview_path(
        &self,
        points: &[Point],
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Coordinate>, TransientEnrichmentFailure> {
        let Some((origin, rest)) = points.split_first() else {
            return Ok(Vec::new());
        };
        let Some((destination, waypoints)) = rest.split_last() else {
            return Ok(Vec::new());
        };
        let query = DirectionsQuery {
            origin: *origin,
            destination: *destination,
            waypoints,
            optimize_waypoints: false,
            api_key,
        };
        let reply = self.provider.query_directions(&query, cancel)?;
        debug!(
            "preview directions: status={}, routes={}",
            reply.status,
            reply.routes.len()
        );
        if !reply.is_ok() {
            return Err(TransientEnrichmentFailure::Status {
                status: reply.status,
            });
        }
        let route = reply
            .routes
            .first()
            .ok_or(TransientEnrichmentFailure::NoRoutes)?;
        Ok(polyline::decode(&route.encoded_path)?)
    }
}
