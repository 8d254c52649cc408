use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::dijkstra::shortest_path;
use crate::Coordinate;
use crate::algo::polyline_length_m;
use crate::model::CampusGraph;

/// Options affecting graph selection for a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Avoid edges tagged as stairs
    #[serde(default)]
    pub wheelchair: bool,
}

impl RouteOptions {
    pub const fn wheelchair() -> Self {
        Self { wheelchair: true }
    }
}

/// A computed walking route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Node ids along the route
    pub nodes: Vec<String>,
    /// Route polyline
    pub path: Vec<Coordinate>,
    /// Sum of great-circle distances between consecutive polyline points
    pub length_m: f64,
}

impl RouteResult {
    /// Length rounded to whole meters, as reported to clients
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn length_m_rounded(&self) -> u64 {
        self.length_m.round() as u64
    }
}

/// Shortest path between two nodes with its polyline length.
///
/// Returns `None` when there is no path or the path has fewer than two
/// points (start and end coincide).
pub fn calculate_path_with_length(
    graph: &CampusGraph,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<RouteResult> {
    let nodes = shortest_path(graph, start, end)?;
    if nodes.len() < 2 {
        return None;
    }

    let path = graph.path_coordinates(&nodes);
    let length_m = polyline_length_m(&path);
    Some(RouteResult {
        nodes: nodes
            .iter()
            .map(|&idx| graph.node_id(idx).to_owned())
            .collect(),
        path,
        length_m,
    })
}
