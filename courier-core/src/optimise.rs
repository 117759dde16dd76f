//! Visiting order for several pickups ahead of one destination.
//!
//! The stop farthest from the destination becomes the anchor and is always
//! visited first. The provider then optimises the order of the remaining
//! stops between the anchor and the destination.

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::geometry::farthest_from;
use crate::routing::resolve_api_key;
use crate::{
    ConfigurationProvider, DirectionsQuery, Leg, Point, RouteResult, RoutingError,
    RoutingProvider, Stop,
};

/// Orders pickup stops using the farthest-anchor heuristic.
///
/// # Examples
/// ```
/// use courier_core::test_support::{ScriptedRoutingProvider, ok_directions, route_with, test_configuration};
/// use courier_core::{CancellationToken, Leg, Point, RouteOptimiser, Stop};
///
/// let stops = [
///     Stop::new(1, Point::new(0.0, 1.0)),
///     Stop::new(2, Point::new(0.0, 9.0)),
///     Stop::new(3, Point::new(0.0, 4.0)),
/// ];
/// // Anchor is stop 2; the provider visits stop 3 before stop 1.
/// let provider = ScriptedRoutingProvider::new().with_directions_reply(Ok(ok_directions(
///     route_with(vec![1, 0], vec![Leg::new(500, 50), Leg::new(300, 30), Leg::new(100, 10)], ""),
/// )));
/// let optimiser = RouteOptimiser::new(provider, test_configuration());
///
/// let route = optimiser.find_best_route(&stops, Point::new(0.0, 0.0), &CancellationToken::new())?;
/// let ids: Vec<u64> = route.ordered_stops.iter().map(|stop| stop.id).collect();
/// assert_eq!(ids, [2, 3, 1]);
/// assert_eq!(route.legs.len(), 2);
/// assert_eq!(route.destination_leg, Leg::new(100, 10));
/// # Ok::<(), courier_core::RoutingError>(())
/// ```
#[derive(Debug)]
pub struct RouteOptimiser<P, C> {
    provider: P,
    configuration: C,
}

impl<P, C> RouteOptimiser<P, C>
where
    P: RoutingProvider,
    C: ConfigurationProvider,
{
    /// Create an optimiser.
    pub const fn new(provider: P, configuration: C) -> Self {
        Self {
            provider,
            configuration,
        }
    }

    /// Order `stops` for a trip ending at `destination`.
    ///
    /// Issues exactly one directions query with waypoint optimisation
    /// enabled. The returned `ordered_stops` is a permutation of `stops`
    /// with the anchor first.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::NoStops`] when `stops` is empty.
    /// - [`RoutingError::MissingApiKey`] or [`RoutingError::Configuration`]
    ///   before any provider call when no key is available.
    /// - [`RoutingError::Cancelled`] when `cancel` fires first.
    /// - [`RoutingError::RouteUnavailable`] for a non-OK reply and
    ///   [`RoutingError::EmptyRoutes`] for an OK reply without routes.
    /// - [`RoutingError::InvalidWaypointOrder`] or
    ///   [`RoutingError::LegCountMismatch`] when the reply does not match
    ///   the request.
    /// - [`RoutingError::Provider`] on transport failure.
    pub fn find_best_route(
        &self,
        stops: &[Stop],
        destination: Point,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RoutingError> {
        let (anchor_index, anchor) =
            farthest_from(stops, destination).ok_or(RoutingError::NoStops)?;
        let remaining: Vec<Stop> = stops
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != anchor_index)
            .map(|(_, stop)| stop.clone())
            .collect();
        let waypoints: Vec<Point> = remaining.iter().map(|stop| stop.location).collect();

        let api_key = resolve_api_key(&self.configuration)?;
        if cancel.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }
        let query = DirectionsQuery {
            origin: anchor.location,
            destination,
            waypoints: &waypoints,
            optimize_waypoints: true,
            api_key: &api_key,
        };
        let reply = self.provider.query_directions(&query, cancel)?;
        debug!(
            "optimised directions from anchor stop {}: status={}, routes={}",
            anchor.id,
            reply.status,
            reply.routes.len()
        );
        if !reply.is_ok() {
            return Err(RoutingError::RouteUnavailable {
                status: reply.status,
            });
        }
        let route = reply
            .routes
            .into_iter()
            .next()
            .ok_or(RoutingError::EmptyRoutes)?;

        let ordered_stops = reorder(anchor, remaining, &route.waypoint_order)?;
        let (legs, destination_leg) = split_legs(route.legs, stops.len())?;
        Ok(RouteResult {
            ordered_stops,
            legs,
            destination_leg,
        })
    }
}

/// Prepend `anchor` to `remaining` rearranged by `order`.
///
/// `order` must name every index of `remaining` exactly once.
fn reorder(
    anchor: &Stop,
    remaining: Vec<Stop>,
    order: &[usize],
) -> Result<Vec<Stop>, RoutingError> {
    let invalid = || RoutingError::InvalidWaypointOrder {
        order: order.to_vec(),
    };
    if order.len() != remaining.len() {
        return Err(invalid());
    }
    let mut slots: Vec<Option<Stop>> = remaining.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len() + 1);
    ordered.push(anchor.clone());
    for &index in order {
        let stop = slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(invalid)?;
        ordered.push(stop);
    }
    Ok(ordered)
}

/// Split provider legs into stop-to-stop legs and the final destination leg.
fn split_legs(mut legs: Vec<Leg>, expected: usize) -> Result<(Vec<Leg>, Leg), RoutingError> {
    let mismatch = |actual| RoutingError::LegCountMismatch { expected, actual };
    if legs.len() != expected {
        return Err(mismatch(legs.len()));
    }
    let destination_leg = legs.pop().ok_or_else(|| mismatch(0))?;
    Ok((legs, destination_leg))
}
