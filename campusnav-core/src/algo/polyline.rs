//! Point-to-route geometry in a local planar projection
//!
//! Route polylines are short (a campus), so an equirectangular projection
//! around the query point keeps perpendicular distances within centimetres
//! of the geodesic answer.

use geo::{Closest, ClosestPoint, Distance, Euclidean, Line, Point};

use super::distance::haversine_m;
use crate::Coordinate;

const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Equirectangular projection centred on an origin, output in meters
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: Coordinate,
    meters_per_deg_lat: f64,
    meters_per_deg_lng: f64,
}

impl LocalProjection {
    pub fn new(origin: Coordinate) -> Self {
        let meters_per_deg_lat = EARTH_RADIUS_M.to_radians();
        Self {
            origin,
            meters_per_deg_lat,
            meters_per_deg_lng: meters_per_deg_lat * origin.lat.to_radians().cos(),
        }
    }

    pub fn project(&self, c: Coordinate) -> Point<f64> {
        Point::new(
            (c.lng - self.origin.lng) * self.meters_per_deg_lng,
            (c.lat - self.origin.lat) * self.meters_per_deg_lat,
        )
    }

    pub fn unproject(&self, p: Point<f64>) -> Coordinate {
        let lng = if self.meters_per_deg_lng.abs() < f64::EPSILON {
            self.origin.lng
        } else {
            self.origin.lng + p.x() / self.meters_per_deg_lng
        };
        Coordinate::new(self.origin.lat + p.y() / self.meters_per_deg_lat, lng)
    }
}

/// Closest point of a polyline to some position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineSnap {
    /// Closest point on the polyline
    pub point: Coordinate,
    /// Index of the segment holding `point` (segment `i` joins vertex `i` and `i + 1`)
    pub segment: usize,
    /// Perpendicular distance from the query position in meters
    pub distance_m: f64,
    /// Distance along the polyline from its first vertex to `point`
    pub offset_m: f64,
}

/// Snap a position onto the nearest segment of `polyline`.
///
/// Returns `None` for an empty polyline. A single-vertex polyline snaps to
/// that vertex.
pub fn snap_to_polyline(polyline: &[Coordinate], target: Coordinate) -> Option<PolylineSnap> {
    let first = *polyline.first()?;
    let projection = LocalProjection::new(target);
    let query = projection.project(target);

    if polyline.len() == 1 {
        return Some(PolylineSnap {
            point: first,
            segment: 0,
            distance_m: haversine_m(first, target),
            offset_m: 0.0,
        });
    }

    let mut best: Option<(usize, Point<f64>, f64)> = None;
    for (idx, pair) in polyline.windows(2).enumerate() {
        let start = projection.project(pair[0]);
        let line = Line::new(start, projection.project(pair[1]));
        let closest = match line.closest_point(&query) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => p,
            Closest::Indeterminate => start,
        };
        let distance = Euclidean.distance(closest, query);
        if best.is_none_or(|(_, _, d)| distance < d) {
            best = Some((idx, closest, distance));
        }
    }

    let (segment, closest, distance_m) = best?;
    let point = projection.unproject(closest);
    let offset_m = polyline[..=segment]
        .windows(2)
        .map(|w| haversine_m(w[0], w[1]))
        .sum::<f64>()
        + haversine_m(polyline[segment], point);

    Some(PolylineSnap {
        point,
        segment,
        distance_m,
        offset_m,
    })
}

/// Perpendicular distance from `target` to the polyline, infinite when empty
pub fn distance_to_polyline_m(polyline: &[Coordinate], target: Coordinate) -> f64 {
    snap_to_polyline(polyline, target).map_or(f64::INFINITY, |snap| snap.distance_m)
}

/// The part of `polyline` ahead of `snap`, starting at the snapped point.
pub fn remainder_from(polyline: &[Coordinate], snap: &PolylineSnap) -> Vec<Coordinate> {
    let mut rest = Vec::with_capacity(polyline.len().saturating_sub(snap.segment) + 1);
    rest.push(snap.point);
    for &vertex in polyline.iter().skip(snap.segment + 1) {
        // Drop the vertex the snap landed on
        if rest.len() == 1 && haversine_m(vertex, snap.point) < 0.5 {
            continue;
        }
        rest.push(vertex);
    }
    rest
}
