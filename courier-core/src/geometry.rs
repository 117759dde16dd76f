//! Planar distance heuristics used to pick a route anchor.
//!
//! Degrees are treated as Cartesian units. The numbers are only meaningful
//! relative to each other for a shared reference point and are never
//! reported as travel distances.

use std::cmp::Ordering;

use geo::Coord;

use crate::{Point, Stop};

/// Straight-line distance between two points in degree space.
///
/// Symmetric and infallible. Not geodesic.
///
/// # Examples
/// ```
/// use courier_core::Point;
/// use courier_core::geometry::planar_distance;
///
/// let origin = Point::new(0.0, 0.0);
/// let other = Point::new(3.0, 4.0);
/// assert_eq!(planar_distance(origin, other), 5.0);
/// assert_eq!(planar_distance(other, origin), 5.0);
/// ```
#[must_use]
pub fn planar_distance(a: Point, b: Point) -> f64 {
    let offset = Coord::from(a) - Coord::from(b);
    offset.x.hypot(offset.y)
}

/// A stop scored against the destination during anchor selection.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    index: usize,
    stop: &'a Stop,
    distance: f64,
}

/// True when `challenger` lies strictly farther out than `incumbent`.
fn is_strictly_farther(challenger: &Candidate<'_>, incumbent: &Candidate<'_>) -> bool {
    challenger.distance.total_cmp(&incumbent.distance) == Ordering::Greater
}

/// Find the stop farthest from `destination`, with its position in `stops`.
///
/// The stops are folded left to right and the running best is replaced only
/// on strict improvement, so among equally distant stops the first one
/// wins. Returns `None` for an empty slice.
///
/// # Examples
/// ```
/// use courier_core::{Point, Stop};
/// use courier_core::geometry::farthest_from;
///
/// let stops = [
///     Stop::new(1, Point::new(1.0, 0.0)),
///     Stop::new(2, Point::new(0.0, 4.0)),
///     Stop::new(3, Point::new(4.0, 0.0)),
/// ];
/// let (index, anchor) = farthest_from(&stops, Point::new(0.0, 0.0)).expect("non-empty");
/// assert_eq!(index, 1);
/// assert_eq!(anchor.id, 2);
/// ```
#[must_use]
pub fn farthest_from(stops: &[Stop], destination: Point) -> Option<(usize, &Stop)> {
    stops
        .iter()
        .enumerate()
        .map(|(index, stop)| Candidate {
            index,
            stop,
            distance: planar_distance(stop.location, destination),
        })
        .fold(None, |best: Option<Candidate<'_>>, challenger| match best {
            Some(incumbent) if !is_strictly_farther(&challenger, &incumbent) => Some(incumbent),
            _ => Some(challenger),
        })
        .map(|winner| (winner.index, winner.stop))
}
