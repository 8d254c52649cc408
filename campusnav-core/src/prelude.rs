pub use crate::{APPROACH_PENALTY, DESTINATION_SNAP_RADIUS_M, START_SEARCH_RADIUS_M};

// Building the model
pub use crate::loading::{CampusGraphConfig, GraphSources, create_campus_model};
pub use crate::model::{CampusGraph, CampusModel, Coordinate, GraphStats};

// Routing
pub use crate::routing::{
    Destination, RouteOptions, RouteQuery, RouteRequest, RouteResponse, RouteResult,
    campus_routing,
};

pub use crate::Error;
pub use crate::Meters;
