//! Provider trait and the request/response shapes it exchanges.

use tokio_util::sync::CancellationToken;

use crate::{Leg, Point};

use super::error::ProviderError;

/// Service status string that marks a successful reply or element.
pub const STATUS_OK: &str = "OK";

/// A distance-matrix request for a single origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceQuery<'a> {
    /// Where the leg starts.
    pub origin: Point,
    /// Where the leg ends.
    pub destination: Point,
    /// Credential forwarded to the service.
    pub api_key: &'a str,
}

/// One cell of a distance-matrix reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceElement {
    /// Element status; only `"OK"` elements carry meaningful values.
    pub status: String,
    /// Distance in metres.
    pub distance_meters: u64,
    /// Duration in seconds.
    pub duration_seconds: u64,
}

impl DistanceElement {
    /// Whether the element reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// A distance-matrix reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceResponse {
    /// Overall service status.
    pub status: String,
    /// Elements for the requested origin row.
    pub elements: Vec<DistanceElement>,
}

impl DistanceResponse {
    /// Whether the reply as a whole reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// A directions request from `origin` through `waypoints` to `destination`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsQuery<'a> {
    /// Where the route starts.
    pub origin: Point,
    /// Where the route ends.
    pub destination: Point,
    /// Intermediate stops, in the caller's order.
    pub waypoints: &'a [Point],
    /// Let the service reorder `waypoints` for the shortest trip.
    pub optimize_waypoints: bool,
    /// Credential forwarded to the service.
    pub api_key: &'a str,
}

/// One candidate route in a directions reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionsRoute {
    /// Overview path in encoded polyline form.
    pub encoded_path: String,
    /// Visiting order of the request's waypoints, as indices into them.
    pub waypoint_order: Vec<usize>,
    /// One leg per hop: origin to first waypoint through to destination.
    pub legs: Vec<Leg>,
}

/// A directions reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsResponse {
    /// Overall service status.
    pub status: String,
    /// Candidate routes, best first.
    pub routes: Vec<DirectionsRoute>,
}

impl DirectionsResponse {
    /// Whether the reply as a whole reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Answer distance-matrix and directions questions.
///
/// Implementations return the service's reply verbatim, including non-OK
/// statuses; only transport failures become [`ProviderError`]. A cancelled
/// `cancel` token should yield [`ProviderError::Cancelled`] promptly.
///
/// # Examples
///
/// ```rust
/// use courier_core::{
///     CancellationToken, DirectionsQuery, DirectionsResponse, DistanceElement, DistanceQuery,
///     DistanceResponse, Point, ProviderError, RoutingProvider, STATUS_OK,
/// };
///
/// struct FixedProvider;
///
/// impl RoutingProvider for FixedProvider {
///     fn query_distance(
///         &self,
///         _query: &DistanceQuery<'_>,
///         _cancel: &CancellationToken,
///     ) -> Result<DistanceResponse, ProviderError> {
///         Ok(DistanceResponse {
///             status: STATUS_OK.to_owned(),
///             elements: vec![DistanceElement {
///                 status: STATUS_OK.to_owned(),
///                 distance_meters: 1_000,
///                 duration_seconds: 60,
///             }],
///         })
///     }
///
///     fn query_directions(
///         &self,
///         _query: &DirectionsQuery<'_>,
///         _cancel: &CancellationToken,
///     ) -> Result<DirectionsResponse, ProviderError> {
///         Ok(DirectionsResponse { status: "ZERO_RESULTS".to_owned(), routes: Vec::new() })
///     }
/// }
///
/// let query = DistanceQuery {
///     origin: Point::new(0.0, 0.0),
///     destination: Point::new(0.0, 1.0),
///     api_key: "key",
/// };
/// let reply = FixedProvider.query_distance(&query, &CancellationToken::new())?;
/// assert!(reply.is_ok());
/// # Ok::<(), ProviderError>(())
/// ```
pub trait RoutingProvider {
    /// Fetch distance and duration for one origin/destination pair.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the service cannot be reached, the
    /// reply cannot be decoded, or `cancel` fires first.
    fn query_distance(
        &self,
        query: &DistanceQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DistanceResponse, ProviderError>;

    /// Fetch a route through the query's waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the service cannot be reached, the
    /// reply cannot be decoded, or `cancel` fires first.
    fn query_directions(
        &self,
        query: &DirectionsQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DirectionsResponse, ProviderError>;
}

impl<T: RoutingProvider + ?Sized> RoutingProvider for &T {
    fn query_distance(
        &self,
        query: &DistanceQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DistanceResponse, ProviderError> {
        (**self).query_distance(query, cancel)
    }

    fn query_directions(
        &self,
        query: &DirectionsQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DirectionsResponse, ProviderError> {
        (**self).query_directions(query, cancel)
    }
}

impl<T: RoutingProvider + ?Sized> RoutingProvider for Box<T> {
    fn query_distance(
        &self,
        query: &DistanceQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DistanceResponse, ProviderError> {
        (**self).query_distance(query, cancel)
    }

    fn query_directions(
        &self,
        query: &DirectionsQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DirectionsResponse, ProviderError> {
        (**self).query_directions(query, cancel)
    }
}
