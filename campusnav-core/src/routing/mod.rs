pub mod dijkstra;
pub mod entry;
pub mod path;
pub mod query;
mod to_geojson;

pub use entry::{find_best_start_node, find_nearest_node_id};
pub use path::{RouteOptions, RouteResult, calculate_path_with_length};
pub use query::{
    Destination, RouteQuery, RouteRequest, RouteResponse, campus_routing, resolve_destination,
};
