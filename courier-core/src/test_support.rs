//! Deterministic routing fakes used by unit and behaviour tests.
//!
//! [`ScriptedRoutingProvider`] replays queued replies in order and records
//! every query it receives, so tests can assert both on results and on the
//! exact calls the engine made.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use tokio_util::sync::CancellationToken;

use crate::{
    ConfigurationError, ConfigurationProvider, DirectionsQuery, DirectionsResponse,
    DirectionsRoute, DistanceElement, DistanceQuery, DistanceResponse, Leg, Point, ProviderError,
    RoutingConfiguration, RoutingProvider, STATUS_OK,
};

/// API key served by [`test_configuration`].
pub const TEST_API_KEY: &str = "test-key";

/// Owned copy of a [`DistanceQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDistanceQuery {
    /// Requested origin.
    pub origin: Point,
    /// Requested destination.
    pub destination: Point,
    /// Key sent with the request.
    pub api_key: String,
}

/// Owned copy of a [`DirectionsQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDirectionsQuery {
    /// Requested origin.
    pub origin: Point,
    /// Requested destination.
    pub destination: Point,
    /// Requested waypoints, in request order.
    pub waypoints: Vec<Point>,
    /// Whether waypoint optimisation was requested.
    pub optimize_waypoints: bool,
    /// Key sent with the request.
    pub api_key: String,
}

type DistanceReply = Result<DistanceResponse, ProviderError>;
type DirectionsReply = Result<DirectionsResponse, ProviderError>;

/// `RoutingProvider` that replays scripted replies.
///
/// Distance and directions replies are queued separately. When a queue runs
/// dry the provider reports a [`ProviderError::NetworkError`]. A call made
/// with an already-cancelled token returns [`ProviderError::Cancelled`]
/// without consuming a reply or being recorded.
#[derive(Debug, Default)]
pub struct ScriptedRoutingProvider {
    distance_replies: RefCell<VecDeque<DistanceReply>>,
    directions_replies: RefCell<VecDeque<DirectionsReply>>,
    distance_queries: RefCell<Vec<RecordedDistanceQuery>>,
    directions_queries: RefCell<Vec<RecordedDirectionsQuery>>,
    calls: Cell<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedRoutingProvider {
    /// Create a provider with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a distance reply.
    #[must_use]
    pub fn with_distance_reply(self, reply: DistanceReply) -> Self {
        self.push_distance_reply(reply);
        self
    }

    /// Queue a directions reply.
    #[must_use]
    pub fn with_directions_reply(self, reply: DirectionsReply) -> Self {
        self.push_directions_reply(reply);
        self
    }

    /// Cancel `token` once `calls` answered queries have been served.
    #[must_use]
    pub fn cancel_after(mut self, calls: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    /// Queue a distance reply through a shared reference.
    pub fn push_distance_reply(&self, reply: DistanceReply) {
        self.distance_replies.borrow_mut().push_back(reply);
    }

    /// Queue a directions reply through a shared reference.
    pub fn push_directions_reply(&self, reply: DirectionsReply) {
        self.directions_replies.borrow_mut().push_back(reply);
    }

    /// Distance queries received so far.
    #[must_use]
    pub fn distance_queries(&self) -> Vec<RecordedDistanceQuery> {
        self.distance_queries.borrow().clone()
    }

    /// Directions queries received so far.
    #[must_use]
    pub fn directions_queries(&self) -> Vec<RecordedDirectionsQuery> {
        self.directions_queries.borrow().clone()
    }

    fn served(&self) {
        let calls = self.calls.get().saturating_add(1);
        self.calls.set(calls);
        if let Some((limit, token)) = &self.cancel_after
            && calls >= *limit
        {
            token.cancel();
        }
    }
}

fn exhausted() -> ProviderError {
    ProviderError::NetworkError {
        url: "scripted://provider".to_owned(),
        message: "no scripted reply left".to_owned(),
    }
}

impl RoutingProvider for ScriptedRoutingProvider {
    fn query_distance(
        &self,
        query: &DistanceQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DistanceResponse, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        self.distance_queries
            .borrow_mut()
            .push(RecordedDistanceQuery {
                origin: query.origin,
                destination: query.destination,
                api_key: query.api_key.to_owned(),
            });
        let reply = self
            .distance_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()));
        self.served();
        reply
    }

    fn query_directions(
        &self,
        query: &DirectionsQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DirectionsResponse, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        self.directions_queries
            .borrow_mut()
            .push(RecordedDirectionsQuery {
                origin: query.origin,
                destination: query.destination,
                waypoints: query.waypoints.to_vec(),
                optimize_waypoints: query.optimize_waypoints,
                api_key: query.api_key.to_owned(),
            });
        let reply = self
            .directions_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()));
        self.served();
        reply
    }
}

/// `ConfigurationProvider` whose source is always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingConfiguration;

impl ConfigurationProvider for FailingConfiguration {
    fn configuration(&self) -> Result<RoutingConfiguration, ConfigurationError> {
        Err(ConfigurationError::Unavailable {
            message: "configuration store offline".to_owned(),
        })
    }
}

/// Configuration carrying [`TEST_API_KEY`].
#[must_use]
pub fn test_configuration() -> RoutingConfiguration {
    RoutingConfiguration::with_api_key(TEST_API_KEY)
}

/// A successful element.
#[must_use]
pub fn ok_element(distance_meters: u64, duration_seconds: u64) -> DistanceElement {
    DistanceElement {
        status: STATUS_OK.to_owned(),
        distance_meters,
        duration_seconds,
    }
}

/// An element that failed with `status` and carries no values.
#[must_use]
pub fn failed_element(status: &str) -> DistanceElement {
    DistanceElement {
        status: status.to_owned(),
        distance_meters: 0,
        duration_seconds: 0,
    }
}

/// An OK distance reply holding `elements`.
#[must_use]
pub fn distance_reply(elements: Vec<DistanceElement>) -> DistanceResponse {
    DistanceResponse {
        status: STATUS_OK.to_owned(),
        elements,
    }
}

/// An OK distance reply with one successful element.
#[must_use]
pub fn ok_distance(distance_meters: u64, duration_seconds: u64) -> DistanceResponse {
    distance_reply(vec![ok_element(distance_meters, duration_seconds)])
}

/// A distance reply with overall `status` and no elements.
#[must_use]
pub fn distance_with_status(status: &str) -> DistanceResponse {
    DistanceResponse {
        status: status.to_owned(),
        elements: Vec::new(),
    }
}

/// A route with the given order, legs and encoded path.
#[must_use]
pub fn route_with(
    waypoint_order: Vec<usize>,
    legs: Vec<Leg>,
    encoded_path: &str,
) -> DirectionsRoute {
    DirectionsRoute {
        encoded_path: encoded_path.to_owned(),
        waypoint_order,
        legs,
    }
}

/// An OK directions reply holding `route`.
#[must_use]
pub fn ok_directions(route: DirectionsRoute) -> DirectionsResponse {
    DirectionsResponse {
        status: STATUS_OK.to_owned(),
        routes: vec![route],
    }
}

/// A directions reply with overall `status` and no routes.
#[must_use]
pub fn directions_with_status(status: &str) -> DirectionsResponse {
    DirectionsResponse {
        status: status.to_owned(),
        routes: Vec::new(),
    }
}
