//! Campus pedestrian routing engine
//!
//! Builds a single connected path graph out of map-derived network nodes,
//! hand-authored connectors and point-of-interest entrances, and answers
//! shortest-path queries over it with an optional wheelchair constraint.

pub mod algo;
mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{CampusGraphConfig, GraphSources, create_campus_model};
pub use model::{CampusGraph, CampusModel, Coordinate};
pub use routing::{
    Destination, RouteOptions, RouteQuery, RouteRequest, RouteResponse, RouteResult, campus_routing,
};

/// Edge weight in whole meters
pub type Meters = u32;

/// Radius around the user searched for route entry points (meters)
pub const START_SEARCH_RADIUS_M: f64 = 120.0;

/// Radius used when a destination is given as raw coordinates (meters)
pub const DESTINATION_SNAP_RADIUS_M: f64 = 90.0;

/// Straight-line approach distances are stretched by this factor when
/// compared against network path lengths.
pub const APPROACH_PENALTY: f64 = 1.5;
