//! Geometry primitives: great-circle distances and route polyline snapping

pub mod distance;
pub mod polyline;

pub use distance::{bearing_deg, edge_weight, haversine_m, polyline_length_m};
pub use polyline::{
    LocalProjection, PolylineSnap, distance_to_polyline_m, remainder_from, snap_to_polyline,
};
