//! Choosing where a GPS position enters the path network
//!
//! Two deliberately different policies live here. Route starts weigh the
//! approach distance against the remaining network distance, so a nearby
//! dead end loses to a slightly farther, well-connected node. Destinations
//! given as raw coordinates simply take the nearest candidate.

use log::trace;
use petgraph::graph::NodeIndex;

use super::dijkstra::dijkstra_path_weights;
use crate::model::CampusGraph;
use crate::{APPROACH_PENALTY, Coordinate, DESTINATION_SNAP_RADIUS_M, START_SEARCH_RADIUS_M};

/// Best node to start walking from towards `destination`.
///
/// Considers snap candidates within [`START_SEARCH_RADIUS_M`] of the user and
/// minimizes `approach × APPROACH_PENALTY + path length`. Candidates without
/// a path to the destination, and the destination itself, are skipped.
pub fn find_best_start_node(
    graph: &CampusGraph,
    user: Coordinate,
    destination: NodeIndex,
) -> Option<NodeIndex> {
    let candidates = graph.candidates_within(user, START_SEARCH_RADIUS_M);
    if candidates.is_empty() {
        return None;
    }

    // The graph is undirected, so one search from the destination gives the
    // path length of every candidate
    let lengths = dijkstra_path_weights(graph, destination);

    candidates
        .into_iter()
        .filter(|&(idx, _)| idx != destination)
        .filter_map(|(idx, approach)| {
            let length = *lengths.get(&idx)?;
            let cost = approach * APPROACH_PENALTY + f64::from(length);
            trace!(
                "start candidate {}: approach {approach:.1} m, path {length} m, cost {cost:.1}",
                graph.node_id(idx)
            );
            Some((idx, cost))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        .map(|(idx, _)| idx)
}

/// Nearest snap candidate within [`DESTINATION_SNAP_RADIUS_M`]
pub fn find_nearest_node_id(graph: &CampusGraph, target: Coordinate) -> Option<NodeIndex> {
    graph
        .candidates_within(target, DESTINATION_SNAP_RADIUS_M)
        .first()
        .map(|&(idx, _)| idx)
}
