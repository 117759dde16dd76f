//! Locations exchanged with the routing provider.

use std::fmt;

use geo::Coord;

/// A WGS84 position in decimal degrees.
///
/// Conversions to and from [`geo::Coord`] use `x = longitude` and
/// `y = latitude`. When deserialised, the short `lat`/`lng` keys used by
/// map SDKs are accepted as well.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use courier_core::Point;
///
/// let point = Point::new(51.5, -0.1);
/// let coord: Coord<f64> = point.into();
///
/// assert_eq!(coord, Coord { x: -0.1, y: 51.5 });
/// assert_eq!(point.to_string(), "51.5,-0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Latitude in decimal degrees.
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[cfg_attr(feature = "serde", serde(alias = "lng"))]
    pub longitude: f64,
}

impl Point {
    /// Construct a point from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Formats as `lat,lng`, the form routing query strings expect.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl From<Point> for Coord<f64> {
    fn from(point: Point) -> Self {
        Self {
            x: point.longitude,
            y: point.latitude,
        }
    }
}

impl From<Coord<f64>> for Point {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

/// A pickup location owned by the caller.
///
/// The engine reorders stops but never interprets `id`; it is carried so
/// callers can map results back onto their own records.
///
/// # Examples
/// ```
/// use courier_core::{Point, Stop};
///
/// let stop = Stop::new(7, Point::new(40.7, -74.0));
/// assert_eq!(stop.id, 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Caller-assigned identifier.
    pub id: u64,
    /// Where the stop is.
    pub location: Point,
}

impl Stop {
    /// Construct a stop.
    #[must_use]
    pub const fn new(id: u64, location: Point) -> Self {
        Self { id, location }
    }
}

/// A point decoded from an encoded polyline, at five decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            x: coordinate.longitude,
            y: coordinate.latitude,
        }
    }
}

impl From<Coordinate> for Point {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(coordinate.latitude, coordinate.longitude)
    }
}
