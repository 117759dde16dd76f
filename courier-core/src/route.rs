//! Results of route computations.
//!
//! Distances are metres and durations are seconds, both as reported by the
//! routing provider. Totals are integer sums and never lose precision.

use std::time::Duration;

use geo::LineString;

use crate::{Coordinate, Stop};

/// One provider-measured hop between two consecutive locations.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use courier_core::Leg;
///
/// let leg = Leg::new(1_200, 180);
/// assert_eq!(leg.duration(), Duration::from_secs(180));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    /// Travel distance in metres.
    pub distance_meters: u64,
    /// Travel time in seconds.
    pub duration_seconds: u64,
}

impl Leg {
    /// Construct a leg from distance and duration.
    #[must_use]
    pub const fn new(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }

    /// Travel time as a [`Duration`].
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_seconds)
    }
}

/// Totals for an ordered list of points, with an optional preview path.
///
/// `preview_path` stays empty unless path enrichment was enabled and the
/// provider returned a usable encoded path.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateResult {
    /// Sum of all successful element distances in metres.
    pub total_distance_meters: u64,
    /// Sum of all successful element durations in seconds.
    pub total_duration_seconds: u64,
    /// Decoded overview path, possibly empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preview_path: Vec<Coordinate>,
}

impl AggregateResult {
    /// Total travel time as a [`Duration`].
    #[must_use]
    pub const fn total_duration(&self) -> Duration {
        Duration::from_secs(self.total_duration_seconds)
    }

    /// The preview path as a [`LineString`] with `x = longitude`.
    ///
    /// # Examples
    /// ```
    /// use courier_core::{AggregateResult, Coordinate};
    ///
    /// let result = AggregateResult {
    ///     preview_path: vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)],
    ///     ..AggregateResult::default()
    /// };
    /// let line = result.preview_line();
    /// assert_eq!(line.0.len(), 2);
    /// assert_eq!(line.0[0].x, 2.0);
    /// ```
    #[must_use]
    pub fn preview_line(&self) -> LineString<f64> {
        self.preview_path.iter().copied().collect()
    }
}

/// A visiting order for pickup stops followed by a fixed destination.
///
/// `ordered_stops` starts with the anchor stop. `legs[i]` runs from
/// `ordered_stops[i]` to `ordered_stops[i + 1]`, and `destination_leg` runs
/// from the last stop to the destination, which is never part of
/// `ordered_stops`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    /// Stops in visiting order, anchor first.
    pub ordered_stops: Vec<Stop>,
    /// Legs between consecutive stops; one fewer than `ordered_stops`.
    pub legs: Vec<Leg>,
    /// Final leg from the last stop to the destination.
    pub destination_leg: Leg,
}

impl RouteResult {
    /// Total distance in metres, destination leg included.
    ///
    /// # Examples
    /// ```
    /// use courier_core::{Leg, Point, RouteResult, Stop};
    ///
    /// let route = RouteResult {
    ///     ordered_stops: vec![
    ///         Stop::new(1, Point::new(0.0, 0.0)),
    ///         Stop::new(2, Point::new(0.0, 1.0)),
    ///     ],
    ///     legs: vec![Leg::new(100, 10)],
    ///     destination_leg: Leg::new(50, 5),
    /// };
    /// assert_eq!(route.total_distance_meters(), 150);
    /// assert_eq!(route.total_duration_seconds(), 15);
    /// ```
    #[must_use]
    pub fn total_distance_meters(&self) -> u64 {
        self.all_legs()
            .fold(0, |total, leg| total.saturating_add(leg.distance_meters))
    }

    /// Total duration in seconds, destination leg included.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u64 {
        self.all_legs()
            .fold(0, |total, leg| total.saturating_add(leg.duration_seconds))
    }

    fn all_legs(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter().chain(std::iter::once(&self.destination_leg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use rstest::rstest;

    #[rstest]
    fn leg_defaults_to_zero() {
        assert_eq!(Leg::default(), Leg::new(0, 0));
    }

    #[rstest]
    fn totals_saturate_instead_of_wrapping() {
        let route = RouteResult {
            ordered_stops: vec![
                Stop::new(1, Point::new(0.0, 0.0)),
                Stop::new(2, Point::new(1.0, 0.0)),
            ],
            legs: vec![Leg::new(u64::MAX, 1)],
            destination_leg: Leg::new(1, 1),
        };
        assert_eq!(route.total_distance_meters(), u64::MAX);
        assert_eq!(route.total_duration_seconds(), 2);
    }

    #[rstest]
    fn empty_preview_gives_empty_line() {
        assert!(AggregateResult::default().preview_line().0.is_empty());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn aggregate_result_serialises_snake_case_fields() {
        let result = AggregateResult {
            total_distance_meters: 10,
            total_duration_seconds: 20,
            preview_path: Vec::new(),
        };
        let json = serde_json::to_value(&result).expect("serialise");
        assert_eq!(json["total_distance_meters"], 10);
        assert_eq!(json["total_duration_seconds"], 20);
        assert!(json["preview_path"].as_array().is_some_and(Vec::is_empty));
    }
}
