//! Deciding when a walker has left the route for good

use std::time::Duration;

use campusnav_core::Coordinate;
use campusnav_core::algo::{distance_to_polyline_m, haversine_m};
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::matcher::PositionFix;

/// How a confirmed departure from the route is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerouteStrategy {
    /// Ask the route provider for a new route from the current position
    #[default]
    Fetch,
    /// Rejoin the nearest segment of the current route and keep its remainder
    Splice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerouteConfig {
    /// Quiet period after a reroute
    #[serde(with = "seconds")]
    pub cooldown: Duration,
    /// Slower fixes are not counted (m/s)
    pub min_speed_mps: f64,
    /// Less accurate fixes are not counted (meters)
    pub max_accuracy_m: f64,
    /// No rerouting this close to the destination (meters)
    pub near_destination_m: f64,
    /// A fix this far from the route counts as off-route (meters)
    pub off_route_m: f64,
    /// A fix this close to the route clears the off-route streak (meters)
    pub on_route_m: f64,
    /// Consecutive off-route fixes needed to reroute
    pub confirm_fixes: u32,
    pub strategy: RerouteStrategy,
}

impl Default for RerouteConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(8),
            min_speed_mps: 0.3,
            max_accuracy_m: 35.0,
            near_destination_m: 20.0,
            off_route_m: 30.0,
            on_route_m: 15.0,
            confirm_fixes: 3,
            strategy: RerouteStrategy::Fetch,
        }
    }
}

/// Why a fix did not take part in off-route counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NearDestination,
    Cooldown,
    TooSlow,
    PoorAccuracy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RerouteDecision {
    Skipped(SkipReason),
    /// Within the on-route distance; the streak is cleared
    OnRoute,
    /// Off the route but not yet confirmed
    Drifting { distance_m: f64, streak: u32 },
    /// Departure confirmed; the caller reroutes now
    Reroute { distance_m: f64 },
}

/// Off-route streak and cooldown bookkeeping
#[derive(Debug, Clone)]
pub struct RerouteController {
    config: RerouteConfig,
    streak: u32,
    last_reroute: Option<DateTime<Utc>>,
}

impl RerouteController {
    pub fn new(config: RerouteConfig) -> Self {
        Self {
            config,
            streak: 0,
            last_reroute: None,
        }
    }

    pub fn config(&self) -> &RerouteConfig {
        &self.config
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn last_reroute(&self) -> Option<DateTime<Utc>> {
        self.last_reroute
    }

    /// Start the cooldown without a confirmed departure
    pub fn mark_rerouted(&mut self, at: DateTime<Utc>) {
        self.streak = 0;
        self.last_reroute = Some(at);
    }

    fn in_cooldown(&self, now: DateTime<Utc>) -> bool {
        let cooldown = TimeDelta::from_std(self.config.cooldown).unwrap_or(TimeDelta::MAX);
        self.last_reroute
            .is_some_and(|last| now.signed_duration_since(last) < cooldown)
    }

    /// Account for one fix against the current route.
    ///
    /// Fixes near the destination are ignored entirely. A fix within the
    /// on-route distance always clears the streak; the other guards only
    /// keep a fix from being counted.
    pub fn observe(
        &mut self,
        route: &[Coordinate],
        destination: Coordinate,
        fix: &PositionFix,
    ) -> RerouteDecision {
        if haversine_m(fix.coordinate, destination) <= self.config.near_destination_m {
            return RerouteDecision::Skipped(SkipReason::NearDestination);
        }

        let distance_m = distance_to_polyline_m(route, fix.coordinate);
        if distance_m <= self.config.on_route_m {
            self.streak = 0;
            return RerouteDecision::OnRoute;
        }

        if self.in_cooldown(fix.timestamp) {
            return RerouteDecision::Skipped(SkipReason::Cooldown);
        }
        if fix.speed_mps.is_none_or(|speed| speed < self.config.min_speed_mps) {
            return RerouteDecision::Skipped(SkipReason::TooSlow);
        }
        if fix.accuracy_m > self.config.max_accuracy_m {
            return RerouteDecision::Skipped(SkipReason::PoorAccuracy);
        }

        if distance_m < self.config.off_route_m {
            return RerouteDecision::Drifting {
                distance_m,
                streak: self.streak,
            };
        }

        self.streak += 1;
        if self.streak < self.config.confirm_fixes {
            debug!(
                "off route by {distance_m:.0} m ({}/{})",
                self.streak, self.config.confirm_fixes
            );
            return RerouteDecision::Drifting {
                distance_m,
                streak: self.streak,
            };
        }

        debug!("off route confirmed after {} fixes", self.streak);
        self.mark_rerouted(fix.timestamp);
        RerouteDecision::Reroute { distance_m }
    }
}

impl Default for RerouteController {
    fn default() -> Self {
        Self::new(RerouteConfig::default())
    }
}

/// `Duration` as fractional seconds
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
