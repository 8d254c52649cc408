//! Live map matching of GPS fixes against the active route
//!
//! The matcher is unengaged until a good fix (fast enough or accurate
//! enough) comes within the enter threshold of the route, and stays engaged until a fix reaches the larger exit
//! threshold. While engaged, good fixes are pulled toward the route.

use campusnav_core::Coordinate;
use campusnav_core::algo::{bearing_deg, haversine_m, snap_to_polyline};
use chrono::{DateTime, Utc};
use log::trace;
use serde::{Deserialize, Serialize};

/// A position reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionFix {
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters
    pub accuracy_m: f64,
    /// Ground speed in meters per second, when the device reports one
    #[serde(default)]
    pub speed_mps: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    pub fn new(coordinate: Coordinate, accuracy_m: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            accuracy_m,
            speed_mps: None,
            timestamp,
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }
}

/// Thresholds of the live matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Engage when the route is at most this far (meters)
    pub enter_threshold_m: f64,
    /// Disengage when the route is at least this far (meters)
    pub exit_threshold_m: f64,
    /// Fixes this close are drawn fully onto the route (meters)
    pub full_snap_m: f64,
    /// Distance at which the pull reaches its floor (meters)
    pub blend_m: f64,
    /// Minimum pull toward the route while engaged
    pub floor_weight: f64,
    /// Share of the previous snapped point kept in the new one
    pub previous_snap_weight: f64,
    /// A fix at least this fast qualifies for snapping (m/s)
    pub min_speed_mps: f64,
    /// A fix at least this accurate qualifies for snapping (meters)
    pub good_accuracy_m: f64,
    /// Heading is only updated after moving this far (meters)
    pub heading_min_move_m: f64,
    /// Fraction of each heading change applied per update
    pub heading_gain: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            enter_threshold_m: 12.0,
            exit_threshold_m: 25.0,
            full_snap_m: 6.0,
            blend_m: 20.0,
            floor_weight: 0.25,
            previous_snap_weight: 0.35,
            min_speed_mps: 0.5,
            good_accuracy_m: 25.0,
            heading_min_move_m: 2.0,
            heading_gain: 0.3,
        }
    }
}

impl MatcherConfig {
    /// Pull toward the route for a fix `distance_m` away from it
    pub fn snap_weight(&self, distance_m: f64) -> f64 {
        if distance_m <= self.full_snap_m {
            return 1.0;
        }
        if distance_m >= self.blend_m {
            return self.floor_weight;
        }
        let t = (distance_m - self.full_snap_m) / (self.blend_m - self.full_snap_m);
        1.0 - (1.0 - self.floor_weight) * t
    }

    fn qualifies(&self, fix: &PositionFix) -> bool {
        fix.speed_mps.is_some_and(|speed| speed >= self.min_speed_mps)
            || fix.accuracy_m <= self.good_accuracy_m
    }
}

/// Output of the matcher for one fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPosition {
    /// Position to display
    pub coordinate: Coordinate,
    /// Whether `coordinate` was pulled toward the route
    pub snapped: bool,
    pub engaged: bool,
    /// Perpendicular distance from the raw fix to the route
    pub distance_to_route_m: f64,
    /// Distance along the route to the point nearest the raw fix
    pub route_offset_m: f64,
    /// Degrees clockwise from north, once enough movement was seen
    pub heading_deg: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct LiveMapMatcher {
    config: MatcherConfig,
    engaged: bool,
    last_snapped: Option<Coordinate>,
    heading_anchor: Option<Coordinate>,
    heading: Option<f64>,
}

impl LiveMapMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config,
            engaged: false,
            last_snapped: None,
            heading_anchor: None,
            heading: None,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn last_snapped(&self) -> Option<Coordinate> {
        self.last_snapped
    }

    /// Forget the snap state, e.g. after the route changed. Heading is kept.
    pub fn reset(&mut self) {
        self.engaged = false;
        self.last_snapped = None;
    }

    pub fn update(&mut self, route: &[Coordinate], fix: &PositionFix) -> MatchedPosition {
        let raw = fix.coordinate;
        let Some(snap) = snap_to_polyline(route, raw) else {
            self.reset();
            return MatchedPosition {
                coordinate: raw,
                snapped: false,
                engaged: false,
                distance_to_route_m: f64::INFINITY,
                route_offset_m: 0.0,
                heading_deg: self.update_heading(raw),
            };
        };

        let distance = snap.distance_m;
        let qualifies = self.config.qualifies(fix);
        if !self.engaged && distance <= self.config.enter_threshold_m && qualifies {
            trace!("matcher engaged at {distance:.1} m");
            self.engaged = true;
        } else if self.engaged && distance >= self.config.exit_threshold_m {
            trace!("matcher disengaged at {distance:.1} m");
            self.engaged = false;
            self.last_snapped = None;
        }

        let mut coordinate = raw;
        let mut snapped = false;
        if self.engaged && qualifies {
            let target = match self.last_snapped {
                Some(previous) => snap.point.lerp(previous, self.config.previous_snap_weight),
                None => snap.point,
            };
            self.last_snapped = Some(target);
            coordinate = raw.lerp(target, self.config.snap_weight(distance));
            snapped = true;
        }

        MatchedPosition {
            coordinate,
            snapped,
            engaged: self.engaged,
            distance_to_route_m: distance,
            route_offset_m: snap.offset_m,
            heading_deg: self.update_heading(coordinate),
        }
    }

    fn update_heading(&mut self, position: Coordinate) -> Option<f64> {
        let Some(anchor) = self.heading_anchor else {
            self.heading_anchor = Some(position);
            return self.heading;
        };
        if haversine_m(anchor, position) < self.config.heading_min_move_m {
            return self.heading;
        }

        let bearing = bearing_deg(anchor, position);
        let heading = match self.heading {
            Some(current) => {
                // Shortest signed turn, in [-180, 180)
                let turn = (bearing - current + 540.0).rem_euclid(360.0) - 180.0;
                (current + self.config.heading_gain * turn).rem_euclid(360.0)
            }
            None => bearing,
        };
        self.heading = Some(heading);
        self.heading_anchor = Some(position);
        self.heading
    }
}

impl Default for LiveMapMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}
