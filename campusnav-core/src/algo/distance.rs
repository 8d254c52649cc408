//! Great-circle helpers shared by graph construction, routing and matching

use geo::{Bearing, Distance, Haversine, Point};
use itertools::Itertools;

use crate::{Coordinate, Meters};

/// Great-circle distance in meters
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

/// Edge weight for two node positions: rounded meters, never below 1
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn edge_weight(a: Coordinate, b: Coordinate) -> Meters {
    (haversine_m(a, b).round() as Meters).max(1)
}

/// Sum of consecutive great-circle distances
pub fn polyline_length_m(points: &[Coordinate]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| haversine_m(*a, *b))
        .sum()
}

/// Initial bearing from `a` to `b`, degrees clockwise from north in `[0, 360)`
pub fn bearing_deg(a: Coordinate, b: Coordinate) -> f64 {
    Haversine
        .bearing(Point::from(a), Point::from(b))
        .rem_euclid(360.0)
}
