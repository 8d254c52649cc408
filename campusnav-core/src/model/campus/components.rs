//! Campus graph components - nodes, edges and accessibility tags

use serde::{Deserialize, Serialize};

use crate::{Coordinate, Meters};

/// Campus graph node
#[derive(Debug, Clone)]
pub struct CampusNode {
    /// Identifier from the source tables
    pub id: String,
    /// Node coordinates
    pub coordinate: Coordinate,
}

/// Walkable connection between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEdge {
    /// Walking distance in meters, at least 1
    pub weight: Meters,
    pub access: AccessTag,
}

/// Accessibility classification of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessTag {
    #[default]
    All,
    Stairs,
    Ramp,
}
