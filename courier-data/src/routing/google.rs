//! Wire types for the Google Maps Distance Matrix and Directions services.
//!
//! Only the fields the engine consumes are modelled. Everything else in the
//! reply is ignored, and fields that the service omits on failure default to
//! empty values so non-OK replies still deserialise.
//!
//! See: <https://developers.google.com/maps/documentation/distance-matrix/distance-matrix>
//! and <https://developers.google.com/maps/documentation/directions/get-directions>

use courier_core::{
    DirectionsResponse, DirectionsRoute, DistanceElement, DistanceResponse, Leg,
};
use serde::Deserialize;

/// A `{ "text": ..., "value": ... }` measurement; only `value` is kept.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Measurement {
    /// Metres for distances, seconds for durations.
    pub value: u64,
}

/// Distance Matrix reply.
#[derive(Debug, Deserialize)]
pub struct DistanceMatrixReply {
    /// Overall status such as `"OK"` or `"REQUEST_DENIED"`.
    pub status: String,
    /// Human-readable detail accompanying a non-OK status.
    #[serde(default)]
    pub error_message: Option<String>,
    /// One row per origin.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

/// One origin's row of a Distance Matrix reply.
#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    /// One element per destination.
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// One origin/destination cell.
#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    /// Element status such as `"OK"` or `"ZERO_RESULTS"`.
    pub status: String,
    /// Present when `status` is `"OK"`.
    #[serde(default)]
    pub distance: Option<Measurement>,
    /// Present when `status` is `"OK"`.
    #[serde(default)]
    pub duration: Option<Measurement>,
}

impl From<MatrixElement> for DistanceElement {
    fn from(element: MatrixElement) -> Self {
        Self {
            status: element.status,
            distance_meters: element.distance.map_or(0, |m| m.value),
            duration_seconds: element.duration.map_or(0, |m| m.value),
        }
    }
}

/// The engine always sends one origin, so only the first row is kept.
impl From<DistanceMatrixReply> for DistanceResponse {
    fn from(reply: DistanceMatrixReply) -> Self {
        let elements = reply
            .rows
            .into_iter()
            .next()
            .map(|row| row.elements.into_iter().map(DistanceElement::from).collect())
            .unwrap_or_default();
        Self {
            status: reply.status,
            elements,
        }
    }
}

/// Directions reply.
#[derive(Debug, Deserialize)]
pub struct DirectionsReply {
    /// Overall status such as `"OK"` or `"ZERO_RESULTS"`.
    pub status: String,
    /// Human-readable detail accompanying a non-OK status.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<RouteReply>,
}

/// One route of a Directions reply.
#[derive(Debug, Deserialize)]
pub struct RouteReply {
    /// Smoothed path for the whole route.
    #[serde(default)]
    pub overview_polyline: Option<EncodedPolyline>,
    /// Order in which the requested waypoints are visited.
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
    /// One leg per hop.
    #[serde(default)]
    pub legs: Vec<LegReply>,
}

/// An encoded polyline wrapper.
#[derive(Debug, Deserialize)]
pub struct EncodedPolyline {
    /// The encoded path.
    pub points: String,
}

/// One leg of a route.
#[derive(Debug, Deserialize)]
pub struct LegReply {
    /// Leg distance.
    #[serde(default)]
    pub distance: Option<Measurement>,
    /// Leg duration.
    #[serde(default)]
    pub duration: Option<Measurement>,
}

impl From<LegReply> for Leg {
    fn from(leg: LegReply) -> Self {
        Self::new(
            leg.distance.map_or(0, |m| m.value),
            leg.duration.map_or(0, |m| m.value),
        )
    }
}

impl From<RouteReply> for DirectionsRoute {
    fn from(route: RouteReply) -> Self {
        Self {
            encoded_path: route
                .overview_polyline
                .map(|polyline| polyline.points)
                .unwrap_or_default(),
            waypoint_order: route.waypoint_order,
            legs: route.legs.into_iter().map(Leg::from).collect(),
        }
    }
}

impl From<DirectionsReply> for DirectionsResponse {
    fn from(reply: DirectionsReply) -> Self {
        Self {
            status: reply.status,
            routes: reply.routes.into_iter().map(DirectionsRoute::from).collect(),
        }
    }
}
