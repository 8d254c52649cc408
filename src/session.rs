//! State of one navigation from start to arrival or cancellation

use campusnav_core::algo::{haversine_m, polyline_length_m, remainder_from, snap_to_polyline};
use campusnav_core::{Coordinate, Destination, RouteOptions, RouteRequest, RouteResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::matcher::{LiveMapMatcher, MatcherConfig, PositionFix};
use crate::reroute::{RerouteConfig, RerouteController, RerouteDecision, RerouteStrategy};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub matcher: MatcherConfig,
    pub reroute: RerouteConfig,
    /// The walk ends within this distance of the route end (meters)
    pub arrival_radius_m: f64,
    /// A new route gets a leading segment from the walker when it starts
    /// farther away than this (meters)
    pub approach_min_gap_m: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::default(),
            reroute: RerouteConfig::default(),
            arrival_radius_m: 15.0,
            approach_min_gap_m: 1.0,
        }
    }
}

/// Distances of the walk so far, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Walked on all routes of this session
    pub walked_m: f64,
    /// Left on the current route
    pub remaining_m: f64,
    /// Length of the current route
    pub route_length_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    Position {
        coordinate: Coordinate,
        heading_deg: Option<f64>,
        snapped: bool,
        distance_to_route_m: f64,
        progress: Progress,
    },
    /// A new route is active
    RouteUpdated {
        path: Vec<Coordinate>,
        length_m: f64,
        spliced: bool,
    },
    /// The caller should fetch a route for this request
    RerouteRequested(RouteRequest),
    Arrived { walked_m: f64 },
    Ended,
}

/// One navigation from a start position to a destination.
///
/// Fixes are fed in order through [`NavigationSession::on_fix`]. The session
/// never fetches routes itself: it emits [`NavigationEvent::RerouteRequested`]
/// and waits for [`NavigationSession::apply_route`] or
/// [`NavigationSession::reroute_failed`]. At most one request is pending.
#[derive(Debug)]
pub struct NavigationSession {
    config: SessionConfig,
    destination: Destination,
    options: RouteOptions,
    route: Vec<Coordinate>,
    route_length_m: f64,
    /// Distance walked on routes that were replaced
    walked_before_m: f64,
    /// Offset of the walker along the current route
    route_offset_m: f64,
    matcher: LiveMapMatcher,
    reroute: RerouteController,
    last_fix: Option<PositionFix>,
    reroute_pending: bool,
    finished: bool,
}

impl NavigationSession {
    /// Start navigating along `route`, fetched for `request`
    pub fn new(
        config: SessionConfig,
        request: &RouteRequest,
        route: &RouteResult,
    ) -> Self {
        let matcher = LiveMapMatcher::new(config.matcher.clone());
        let reroute = RerouteController::new(config.reroute.clone());
        let mut session = Self {
            config,
            destination: request.destination.clone(),
            options: request.options,
            route: Vec::new(),
            route_length_m: 0.0,
            walked_before_m: 0.0,
            route_offset_m: 0.0,
            matcher,
            reroute,
            last_fix: None,
            reroute_pending: false,
            finished: false,
        };
        session.set_route(with_approach(
            request.from,
            &route.path,
            session.config.approach_min_gap_m,
        ));
        session
    }

    pub fn route(&self) -> &[Coordinate] {
        &self.route
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn options(&self) -> RouteOptions {
        self.options
    }

    pub fn is_reroute_pending(&self) -> bool {
        self.reroute_pending
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_snap_engaged(&self) -> bool {
        self.matcher.is_engaged()
    }

    pub fn off_route_streak(&self) -> u32 {
        self.reroute.streak()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            walked_m: self.walked_before_m + self.route_offset_m,
            remaining_m: (self.route_length_m - self.route_offset_m).max(0.0),
            route_length_m: self.route_length_m,
        }
    }

    /// Event announcing the active route
    pub fn route_event(&self, spliced: bool) -> NavigationEvent {
        NavigationEvent::RouteUpdated {
            path: self.route.clone(),
            length_m: self.route_length_m,
            spliced,
        }
    }

    fn route_end(&self) -> Option<Coordinate> {
        self.route.last().copied()
    }

    fn set_route(&mut self, route: Vec<Coordinate>) {
        self.route_length_m = polyline_length_m(&route);
        self.route = route;
        self.route_offset_m = 0.0;
        self.matcher.reset();
    }

    /// Close the walk on the current route before switching to another one
    fn bank_progress(&mut self) {
        self.walked_before_m += self.route_offset_m;
        self.route_offset_m = 0.0;
    }

    /// Fill in a missing speed from the previous fix
    fn infer_speed(&self, mut fix: PositionFix) -> PositionFix {
        if fix.speed_mps.is_none()
            && let Some(previous) = &self.last_fix
        {
            let elapsed = fix.timestamp.signed_duration_since(previous.timestamp);
            #[allow(clippy::cast_precision_loss)]
            let secs = elapsed.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                fix.speed_mps = Some(haversine_m(previous.coordinate, fix.coordinate) / secs);
            }
        }
        fix
    }

    /// Process one position fix
    pub fn on_fix(&mut self, fix: PositionFix) -> Vec<NavigationEvent> {
        if self.finished {
            return Vec::new();
        }
        let fix = self.infer_speed(fix);
        self.last_fix = Some(fix);

        let matched = self.matcher.update(&self.route, &fix);
        if matched.distance_to_route_m.is_finite() {
            self.route_offset_m = matched.route_offset_m;
        }

        let mut events = vec![NavigationEvent::Position {
            coordinate: matched.coordinate,
            heading_deg: matched.heading_deg,
            snapped: matched.snapped,
            distance_to_route_m: matched.distance_to_route_m,
            progress: self.progress(),
        }];

        let Some(end) = self.route_end() else {
            return events;
        };
        if haversine_m(fix.coordinate, end) <= self.config.arrival_radius_m {
            self.route_offset_m = self.route_length_m;
            let walked_m = self.progress().walked_m;
            info!("Arrived after {walked_m:.0} m");
            self.finished = true;
            events.push(NavigationEvent::Arrived { walked_m });
            return events;
        }

        if self.reroute_pending {
            return events;
        }

        if let RerouteDecision::Reroute { distance_m } =
            self.reroute.observe(&self.route, end, &fix)
        {
            info!("Off route by {distance_m:.0} m, rerouting");
            match self.config.reroute.strategy {
                RerouteStrategy::Fetch => {
                    self.reroute_pending = true;
                    events.push(NavigationEvent::RerouteRequested(RouteRequest::new(
                        fix.coordinate,
                        self.destination.clone(),
                        self.options,
                    )));
                }
                RerouteStrategy::Splice => {
                    self.bank_progress();
                    self.splice(fix.coordinate);
                    events.push(self.route_event(true));
                }
            }
        }
        events
    }

    /// Rejoin the current route at its nearest point
    fn splice(&mut self, position: Coordinate) {
        let Some(snap) = snap_to_polyline(&self.route, position) else {
            return;
        };
        let remainder = remainder_from(&self.route, &snap);
        debug!(
            "Spliced onto segment {} at {:.0} m from the route",
            snap.segment, snap.distance_m
        );
        let route = with_approach(position, &remainder, self.config.approach_min_gap_m);
        self.set_route(route);
    }

    /// Install a route fetched in response to a reroute request
    pub fn apply_route(&mut self, route: &RouteResult) -> Option<NavigationEvent> {
        if self.finished {
            return None;
        }
        self.reroute_pending = false;
        // The old route stays active until here, so its progress is final now
        self.bank_progress();
        let from = self
            .last_fix
            .map(|fix| fix.coordinate)
            .or_else(|| route.path.first().copied())?;
        self.set_route(with_approach(
            from,
            &route.path,
            self.config.approach_min_gap_m,
        ));
        Some(self.route_event(false))
    }

    /// The pending reroute fetch failed; wait for the next confirmed departure
    pub fn reroute_failed(&mut self, reason: &str) {
        warn!("Reroute failed: {reason}");
        self.reroute_pending = false;
    }

    /// End the session and drop the route along with all progress
    pub fn cancel(&mut self) -> NavigationEvent {
        debug!("Navigation cancelled");
        self.finished = true;
        self.reroute_pending = false;
        self.route.clear();
        self.route_length_m = 0.0;
        self.walked_before_m = 0.0;
        self.route_offset_m = 0.0;
        self.last_fix = None;
        self.matcher.reset();
        self.reroute = RerouteController::new(self.config.reroute.clone());
        NavigationEvent::Ended
    }
}

/// Prefix `path` with `from` unless they already coincide
fn with_approach(from: Coordinate, path: &[Coordinate], min_gap_m: f64) -> Vec<Coordinate> {
    let mut route = Vec::with_capacity(path.len() + 1);
    if path
        .first()
        .is_none_or(|&start| haversine_m(from, start) > min_gap_m)
    {
        route.push(from);
    }
    route.extend_from_slice(path);
    route
}
