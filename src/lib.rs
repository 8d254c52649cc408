//! Live campus navigation
//!
//! Keeps a walker anchored to a route computed by `campusnav_core`: matches
//! noisy position fixes onto the route, detects confirmed departures and
//! obtains replacement routes from a [`RouteProvider`].

pub mod driver;
pub mod matcher;
pub mod provider;
pub mod reroute;
pub mod session;

pub use driver::{SessionInput, run_navigation};
pub use matcher::{LiveMapMatcher, MatchedPosition, MatcherConfig, PositionFix};
pub use provider::{FallbackRouter, HttpRouter, LocalRouter, ProviderError, RouteProvider};
pub use reroute::{RerouteConfig, RerouteController, RerouteDecision, RerouteStrategy, SkipReason};
pub use session::{NavigationEvent, NavigationSession, Progress, SessionConfig};

pub use campusnav_core;
